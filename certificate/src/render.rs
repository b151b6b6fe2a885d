//! Certificate page renderer.
//!
//! Composes the full page in one pass: header, two info columns, a
//! framed facility screenshot, the proof row with two QR codes, and a
//! timestamped footer. Geometry tracks the constants in
//! [`crate::layout`]; vertical positions flow downward from the header
//! so column content of varying length never overlaps the panel.

use std::io::BufWriter;
use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use rust_decimal::Decimal;

use crate::error::CertificateError;
use crate::font::load_font;
use crate::layout::*;
use crate::qr::make_qr;

/// Explorer transaction page the burn-proof QR points at.
const EXPLORER_TX_URL: &str = "https://testnet.xrpl.org/transactions/";
/// Explorer landing page used when no burn hash is available.
const EXPLORER_HOME_URL: &str = "https://testnet.xrpl.org/";
/// Note embedded in the plain payment QR payload.
const PAY_NOTE: &str = "VOLTREC-REC Testnet Purchase";

/// Everything the renderer needs, already resolved by the caller.
#[derive(Debug, Clone, Default)]
pub struct CertificateData {
    pub issuer_address: String,
    pub hot_address: String,
    pub owner_address: String,
    pub buyer_address: String,
    pub currency_code: String,
    pub kwh: Decimal,
    pub jurisdiction: String,
    pub program: String,
    pub vintage: String,
    pub facility_name: Option<String>,
    pub facility_location: Option<String>,
    pub grid_region: Option<String>,
    pub technology: Option<String>,
    pub vintage_start: Option<String>,
    pub vintage_end: Option<String>,
    pub burn_tx_hash: Option<String>,
    pub price_usd: String,
    pub price_drops: String,
    pub nft_id: Option<String>,
    pub sign_url: Option<String>,
}

/// Where the burn-proof QR sends a scanner.
fn burn_proof_url(burn_tx_hash: Option<&str>) -> String {
    match burn_tx_hash {
        Some(hash) if !hash.is_empty() => format!("{EXPLORER_TX_URL}{hash}"),
        _ => EXPLORER_HOME_URL.to_string(),
    }
}

/// Payload and caption for the payment QR: a wallet sign URL when one
/// exists, otherwise a plain JSON pay-to reference.
fn pay_qr_payload(data: &CertificateData) -> (String, &'static str) {
    match &data.sign_url {
        Some(url) if !url.is_empty() => (url.clone(), "Scan to sign in your wallet"),
        _ => {
            let payload = serde_json::json!({
                "to": data.owner_address,
                "amount_drops": data.price_drops,
                "note": PAY_NOTE,
            });
            (payload.to_string(), "Scan to pay owner (XRP drops)")
        }
    }
}

/// Output format chosen by file extension: JPEG for `.jpg`/`.jpeg`,
/// PNG for everything else.
fn output_format(path: &Path) -> ImageFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") => {
            ImageFormat::Jpeg
        }
        _ => ImageFormat::Png,
    }
}

/// Renders the certificate to `output` using the screenshot at
/// `screenshot`. Returns the output path on success.
pub fn render(
    data: &CertificateData,
    screenshot: &Path,
    output: &Path,
) -> Result<(), CertificateError> {
    let font = load_font(None)?;
    let mut canvas = RgbImage::from_pixel(CANVAS_W, CANVAS_H, CARD_BG);

    // Header.
    let mut y = MARGIN as i32;
    let title = "Voltrec Renewable Energy Certificate (Testnet)";
    text(&mut canvas, ACCENT, MARGIN as i32, y, TITLE_SIZE, &font, title);
    y += (TITLE_SIZE * 1.2) as i32;
    let subtitle = format!(
        "1 REC minted per 1,000 {} burned | Transfer fee 10% | Price ${}",
        data.currency_code, data.price_usd
    );
    text(&mut canvas, TEXT_SECOND, MARGIN as i32, y, SUBTITLE_SIZE, &font, &subtitle);
    y += (SUBTITLE_SIZE * 1.8) as i32;
    hrule(&mut canvas, y);
    y += 30;

    // Info columns.
    let col1_x = MARGIN as i32;
    let col2_x = (CANVAS_W / 2 + 20) as i32;

    let issuer = short_addr(&data.issuer_address, 6, 6);
    let hot = short_addr(&data.hot_address, 6, 6);
    let owner = short_addr(&data.owner_address, 6, 6);
    let buyer = short_addr(&data.buyer_address, 6, 6);
    let mut y1 = y;
    y1 = info_block(&mut canvas, &font, col1_x, y1, "Issuer", &issuer);
    y1 = info_block(&mut canvas, &font, col1_x, y1, "Hot Wallet", &hot);
    y1 = info_block(&mut canvas, &font, col1_x, y1, "System Owner", &owner);
    y1 = info_block(&mut canvas, &font, col1_x, y1, "Buyer", &buyer);
    y1 = info_block(&mut canvas, &font, col1_x, y1, "Vintage", &data.vintage);
    y1 = info_block(
        &mut canvas,
        &font,
        col1_x,
        y1,
        "Jurisdiction / Program",
        &format!("{} / {}", data.jurisdiction, data.program),
    );
    if let Some(name) = non_empty(&data.facility_name) {
        y1 = info_block(&mut canvas, &font, col1_x, y1, "Facility", name);
    }
    if let Some(location) = non_empty(&data.facility_location) {
        y1 = info_block(&mut canvas, &font, col1_x, y1, "Location", location);
    }
    if data.grid_region.is_some() || data.technology.is_some() {
        let grid = non_empty(&data.grid_region).unwrap_or("");
        let tech = non_empty(&data.technology).unwrap_or("");
        y1 = info_block(&mut canvas, &font, col1_x, y1, "Grid / Tech", &format!("{grid} / {tech}"));
    }
    if data.vintage_start.is_some() || data.vintage_end.is_some() {
        let start = non_empty(&data.vintage_start).unwrap_or("");
        let end = non_empty(&data.vintage_end).unwrap_or("");
        y1 = info_block(
            &mut canvas,
            &font,
            col1_x,
            y1,
            "Vintage Window",
            &format!("{start} \u{2192} {end}"),
        );
    }

    let kwh = group_thousands(data.kwh);
    let mut y2 = y;
    y2 = info_block(&mut canvas, &font, col2_x, y2, "Production (kWh)", &kwh);
    y2 = info_block(
        &mut canvas,
        &font,
        col2_x,
        y2,
        &format!("{} Minted", data.currency_code),
        &format!("{} {}", kwh, data.currency_code),
    );
    y2 = info_block(
        &mut canvas,
        &font,
        col2_x,
        y2,
        &format!("{} Burned", data.currency_code),
        "1,000.00",
    );
    y2 = info_block(&mut canvas, &font, col2_x, y2, "Price (XRP drops)", &data.price_drops);

    // Screenshot panel.
    let panel_top = y1.max(y2) + 10;
    let panel_w = CANVAS_W - 2 * MARGIN;
    let panel = Rect::at(MARGIN as i32, panel_top).of_size(panel_w, PANEL_HEIGHT);
    draw_filled_rect_mut(&mut canvas, panel, PANEL_FILL);
    draw_hollow_rect_mut(&mut canvas, panel, BORDER);
    draw_hollow_rect_mut(
        &mut canvas,
        Rect::at(MARGIN as i32 + 1, panel_top + 1).of_size(panel_w - 2, PANEL_HEIGHT - 2),
        BORDER,
    );
    paste_screenshot(
        &mut canvas,
        screenshot,
        MARGIN + PANEL_INSET,
        (panel_top as u32) + PANEL_INSET,
        panel_w - 2 * PANEL_INSET,
        PANEL_HEIGHT - 2 * PANEL_INSET,
    )?;

    // Proof row.
    let mut section_y = panel_top + PANEL_HEIGHT as i32 + 24;
    hrule(&mut canvas, section_y);
    section_y += 20;

    let burn_url = burn_proof_url(data.burn_tx_hash.as_deref());
    let burn_qr = make_qr(&burn_url, QR_SIZE)?;
    let qr_y = section_y + 10;
    image::imageops::overlay(&mut canvas, &burn_qr, MARGIN as i64, qr_y as i64);

    let txt_x = (MARGIN + burn_qr.width() + 18) as i32;
    let burn_hash = data.burn_tx_hash.as_deref().unwrap_or("<pending>");
    let mut y_txt = section_y;
    y_txt = proof_block(&mut canvas, &font, txt_x, y_txt, "Burn Proof (Tx Hash)", burn_hash);
    proof_block(&mut canvas, &font, txt_x, y_txt, "Explorer URL", &burn_url);

    let (pay_payload, pay_caption) = pay_qr_payload(data);
    let pay_qr = make_qr(&pay_payload, QR_SIZE)?;
    let pay_x = CANVAS_W - MARGIN - pay_qr.width();
    image::imageops::overlay(&mut canvas, &pay_qr, pay_x as i64, qr_y as i64);
    text(
        &mut canvas,
        TEXT_SECOND,
        pay_x as i32,
        qr_y + pay_qr.height() as i32 + 8,
        SMALL_LABEL_SIZE,
        &font,
        pay_caption,
    );

    // Footer.
    let mut footer_y = (CANVAS_H - MARGIN - 90) as i32;
    hrule(&mut canvas, footer_y);
    footer_y += 16;
    let stamp = chrono::Utc::now().format("%Y-%m-%d %H:%M UTC");
    let footer = format!(
        "Generated: {stamp} \u{2022} NFT Flags: Transferable, Burnable \u{2022} \
         Transfer Fee: 10% \u{2022} Testnet"
    );
    text(&mut canvas, TEXT_SECOND, MARGIN as i32, footer_y, FOOTER_SIZE, &font, &footer);
    if let Some(nft_id) = non_empty(&data.nft_id) {
        text(
            &mut canvas,
            TEXT_SECOND,
            MARGIN as i32,
            footer_y + 30,
            FOOTER_SIZE,
            &font,
            &format!("NFTokenID: {}", short_addr(nft_id, 10, 10)),
        );
    }

    save(&canvas, output)
}

// ---------------------------------------------------------------------------
// Drawing helpers
// ---------------------------------------------------------------------------

fn text(canvas: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, size: f32, font: &FontVec, s: &str) {
    draw_text_mut(canvas, color, x, y, PxScale::from(size), font, s);
}

/// Full-width horizontal rule, two pixels thick.
fn hrule(canvas: &mut RgbImage, y: i32) {
    let rect = Rect::at(MARGIN as i32, y).of_size(CANVAS_W - 2 * MARGIN, 2);
    draw_filled_rect_mut(canvas, rect, BORDER);
}

/// Label over value, returning the y below the block.
fn info_block(
    canvas: &mut RgbImage,
    font: &FontVec,
    x: i32,
    y: i32,
    label: &str,
    value: &str,
) -> i32 {
    labeled_block(canvas, font, x, y, label, value, LABEL_SIZE, VALUE_SIZE)
}

/// Smaller variant for the proof row.
fn proof_block(
    canvas: &mut RgbImage,
    font: &FontVec,
    x: i32,
    y: i32,
    label: &str,
    value: &str,
) -> i32 {
    labeled_block(canvas, font, x, y, label, value, SMALL_LABEL_SIZE, SMALL_VALUE_SIZE)
}

fn labeled_block(
    canvas: &mut RgbImage,
    font: &FontVec,
    x: i32,
    mut y: i32,
    label: &str,
    value: &str,
    label_size: f32,
    value_size: f32,
) -> i32 {
    text(canvas, TEXT_SECOND, x, y, label_size, font, label);
    y += (label_size * 1.2) as i32;
    text(canvas, TEXT_PRIMARY, x, y, value_size, font, value);
    y + (value_size * 1.5) as i32 + 6
}

/// Loads the screenshot, scales it to fit the box without upscaling or
/// distortion, and centers it.
fn paste_screenshot(
    canvas: &mut RgbImage,
    path: &Path,
    box_x: u32,
    box_y: u32,
    box_w: u32,
    box_h: u32,
) -> Result<(), CertificateError> {
    let img = image::open(path)?.to_rgb8();
    let (iw, ih) = img.dimensions();
    let scale = f64::min(box_w as f64 / iw as f64, box_h as f64 / ih as f64).min(1.0);
    let tw = ((iw as f64 * scale) as u32).max(1);
    let th = ((ih as f64 * scale) as u32).max(1);
    let thumb = image::imageops::resize(&img, tw, th, FilterType::Triangle);
    let x = box_x + (box_w - tw) / 2;
    let y = box_y + (box_h - th) / 2;
    image::imageops::overlay(canvas, &thumb, x as i64, y as i64);
    Ok(())
}

fn save(canvas: &RgbImage, output: &Path) -> Result<(), CertificateError> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| CertificateError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    match output_format(output) {
        ImageFormat::Jpeg => {
            let file = std::fs::File::create(output).map_err(|source| CertificateError::Io {
                path: output.to_path_buf(),
                source,
            })?;
            let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), 92);
            canvas.write_with_encoder(encoder)?;
        }
        _ => {
            canvas
                .save_with_format(output, ImageFormat::Png)
                .map_err(CertificateError::Image)?;
        }
    }
    Ok(())
}

fn non_empty(opt: &Option<String>) -> Option<&str> {
    opt.as_deref().filter(|s| !s.is_empty())
}
