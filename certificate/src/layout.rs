//! Canvas geometry and palette.
//!
//! All positions in the renderer derive from these constants, so a
//! layout tweak happens here rather than scattered through draw calls.

use image::Rgb;

/// Canvas width in pixels.
pub const CANVAS_W: u32 = 1800;
/// Canvas height in pixels.
pub const CANVAS_H: u32 = 1200;
/// Outer margin on all four sides.
pub const MARGIN: u32 = 60;

/// Very light gray-blue card background.
pub const CARD_BG: Rgb<u8> = Rgb([248, 250, 252]);
/// Dark teal accent for the title.
pub const ACCENT: Rgb<u8> = Rgb([6, 95, 70]);
/// Primary text (slate-900).
pub const TEXT_PRIMARY: Rgb<u8> = Rgb([15, 23, 42]);
/// Secondary text (slate-600).
pub const TEXT_SECOND: Rgb<u8> = Rgb([71, 85, 105]);
/// Rules and frames (slate-300).
pub const BORDER: Rgb<u8> = Rgb([203, 213, 225]);
/// Panel fill behind the screenshot.
pub const PANEL_FILL: Rgb<u8> = Rgb([255, 255, 255]);

/// Title text size.
pub const TITLE_SIZE: f32 = 64.0;
/// Subtitle text size.
pub const SUBTITLE_SIZE: f32 = 28.0;
/// Info-column label size.
pub const LABEL_SIZE: f32 = 26.0;
/// Info-column value size.
pub const VALUE_SIZE: f32 = 36.0;
/// Proof-section label size.
pub const SMALL_LABEL_SIZE: f32 = 22.0;
/// Proof-section value size.
pub const SMALL_VALUE_SIZE: f32 = 26.0;
/// Footer text size.
pub const FOOTER_SIZE: f32 = 22.0;

/// Height of the framed screenshot panel.
pub const PANEL_HEIGHT: u32 = 480;
/// Inset between the panel frame and the thumbnail.
pub const PANEL_INSET: u32 = 16;
/// Side length of the rendered QR codes.
pub const QR_SIZE: u32 = 260;

/// Truncates a ledger address for display: `start` leading and `end`
/// trailing characters around an ellipsis. Short inputs pass through.
pub fn short_addr(addr: &str, start: usize, end: usize) -> String {
    let chars: Vec<char> = addr.chars().collect();
    if chars.len() <= start + end {
        return addr.to_string();
    }
    let head: String = chars[..start].iter().collect();
    let tail: String = chars[chars.len() - end..].iter().collect();
    format!("{head}\u{2026}{tail}")
}

/// Formats a two-decimal quantity with thousands separators, e.g.
/// `12345.5` becomes `12,345.50`.
pub fn group_thousands(value: rust_decimal::Decimal) -> String {
    let rounded = value.round_dp(2);
    let text = format!("{rounded:.2}");
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, f),
        None => (text.as_str(), "00"),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}.{frac_part}")
}
