//! Error types for the signing bridge.

use thiserror::Error;

/// Errors from the signing-platform client.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// API credentials were not supplied and are not in the environment.
    #[error(
        "signing platform credentials missing: \
         set VOLTREC_SIGN_API_KEY and VOLTREC_SIGN_API_SECRET"
    )]
    MissingCredentials,

    /// The platform answered with a non-success status.
    #[error("signing platform error {status}: {body}")]
    Platform {
        /// HTTP status code returned.
        status: u16,
        /// Response body, verbatim, for diagnostics.
        body: String,
    },

    /// Transport-level failure reaching the platform.
    #[error("signing platform transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform's response could not be interpreted.
    #[error("unparseable platform response: {0}")]
    InvalidPayload(String),
}
