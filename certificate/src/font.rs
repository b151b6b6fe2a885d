//! System font discovery.
//!
//! The renderer ships no font of its own; it probes a fixed list of
//! paths covering the common Linux and macOS installs and loads the
//! first file that parses.

use std::path::{Path, PathBuf};

use ab_glyph::FontVec;

use crate::error::CertificateError;

/// Probed in order. First readable, parseable entry wins.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Helvetica.ttf",
];

/// Loads a specific font file.
pub fn load_font_file(path: &Path) -> Result<FontVec, CertificateError> {
    let bytes = std::fs::read(path).map_err(|source| CertificateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    FontVec::try_from_vec(bytes).map_err(|e| CertificateError::FontInvalid {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Loads the first usable system font, or the explicit override if one
/// is given. An override that fails to load is an error rather than a
/// silent fallback.
pub fn load_font(explicit: Option<&Path>) -> Result<FontVec, CertificateError> {
    if let Some(path) = explicit {
        return load_font_file(path);
    }
    for candidate in FONT_CANDIDATES {
        let path = PathBuf::from(candidate);
        if !path.is_file() {
            continue;
        }
        match load_font_file(&path) {
            Ok(font) => {
                tracing::debug!(path = %path.display(), "using system font");
                return Ok(font);
            }
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "skipping unusable font");
            }
        }
    }
    Err(CertificateError::FontUnavailable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_missing_font_is_an_io_error() {
        let err = load_font(Some(Path::new("/nonexistent/font.ttf"))).unwrap_err();
        assert!(matches!(err, CertificateError::Io { .. }));
    }

    #[test]
    fn explicit_garbage_font_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        let err = load_font(Some(&path)).unwrap_err();
        assert!(matches!(err, CertificateError::FontInvalid { .. }));
    }
}
