//! Error types for certificate rendering.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while rendering a certificate image.
#[derive(Debug, Error)]
pub enum CertificateError {
    /// No usable font was found on this system.
    #[error("no usable system font found; install DejaVu Sans or point at a TTF")]
    FontUnavailable,

    /// A font file existed but could not be parsed.
    #[error("failed to load font {path}: {message}")]
    FontInvalid {
        /// Path of the rejected font file.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// The QR payload could not be encoded.
    #[error("qr encoding failed: {0}")]
    Qr(#[from] qrcode::types::QrError),

    /// Reading or decoding the screenshot, or encoding the output.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Filesystem failure on the screenshot or the output path.
    #[error("io error on {path}: {source}")]
    Io {
        /// Path involved in the failure.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}
