//! QR rasterization.
//!
//! Encodes a payload with medium error correction and rasterizes the
//! module grid onto an RGB image at a fixed target size with a
//! two-module quiet zone, scaled with nearest-neighbour blocks so the
//! modules stay crisp.

use image::{Rgb, RgbImage};
use qrcode::{Color, EcLevel, QrCode};

use crate::error::CertificateError;

/// Quiet-zone width in modules on each side.
const QUIET_ZONE: u32 = 2;

const DARK: Rgb<u8> = Rgb([0, 0, 0]);
const LIGHT: Rgb<u8> = Rgb([255, 255, 255]);

/// Renders `data` as a QR image with sides of at least `size` pixels.
///
/// The result is the smallest whole-pixel-per-module rendering that
/// reaches `size`, so the actual side length can exceed `size` by up to
/// one module's worth of pixels.
pub fn make_qr(data: &str, size: u32) -> Result<RgbImage, CertificateError> {
    let code = QrCode::with_error_correction_level(data, EcLevel::M)?;
    let modules = code.width() as u32 + 2 * QUIET_ZONE;
    let scale = size.div_ceil(modules).max(1);
    let side = modules * scale;

    let mut img = RgbImage::from_pixel(side, side, LIGHT);
    let width = code.width() as u32;
    let colors = code.to_colors();
    for row in 0..width {
        for col in 0..width {
            if colors[(row * width + col) as usize] != Color::Dark {
                continue;
            }
            let x0 = (QUIET_ZONE + col) * scale;
            let y0 = (QUIET_ZONE + row) * scale;
            for dy in 0..scale {
                for dx in 0..scale {
                    img.put_pixel(x0 + dx, y0 + dy, DARK);
                }
            }
        }
    }
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qr_is_square_and_at_least_requested_size() {
        let img = make_qr("https://testnet.xrpl.org/transactions/ABC", 260).unwrap();
        assert_eq!(img.width(), img.height());
        assert!(img.width() >= 260);
    }

    #[test]
    fn quiet_zone_stays_light() {
        let img = make_qr("hello", 100).unwrap();
        // Every pixel on the outer edge belongs to the quiet zone.
        for x in 0..img.width() {
            assert_eq!(*img.get_pixel(x, 0), LIGHT);
            assert_eq!(*img.get_pixel(x, img.height() - 1), LIGHT);
        }
    }

    #[test]
    fn payload_produces_some_dark_modules() {
        let img = make_qr("payload", 64).unwrap();
        assert!(img.pixels().any(|p| *p == DARK));
    }
}
