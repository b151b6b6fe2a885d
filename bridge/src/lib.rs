//! # voltrec-bridge — Wallet-Signing Bridge
//!
//! Converts in-memory transaction descriptions into sign requests a mobile
//! wallet can open. The heavy lifting — payload storage, QR generation,
//! user approval — belongs to the external signing platform; this crate
//! only builds transaction JSON, calls the platform's payload endpoint,
//! and extracts a human-followable sign link from the response.
//!
//! When the platform is unreachable or credentials are absent, the client
//! degrades to a best-effort link embedding the percent-encoded
//! transaction JSON. Not every wallet honors that form — it is a demo
//! fallback, not a protocol guarantee, and it is logged as such.
//!
//! The [`server`] module wraps payload creation in a small axum service so
//! API credentials can stay server-side.

pub mod client;
pub mod error;
pub mod payloads;
pub mod server;

pub use client::{PayloadResponse, SignClient};
pub use error::BridgeError;

/// Default base URL of the signing platform's REST API.
pub const PLATFORM_BASE_URL: &str = "https://xumm.app/api/v1";

/// Base of the platform's public sign page, used for constructed links.
pub const SIGN_PAGE_URL: &str = "https://xumm.app/sign";

/// Environment variable holding the platform API key.
pub const API_KEY_ENV: &str = "VOLTREC_SIGN_API_KEY";

/// Environment variable holding the platform API secret.
pub const API_SECRET_ENV: &str = "VOLTREC_SIGN_API_SECRET";
