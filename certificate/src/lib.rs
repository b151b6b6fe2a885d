//! Printable certificate rendering.
//!
//! Produces a single-page certificate image from flow results: account
//! summary, production figures, the facility screenshot, a burn-proof QR
//! pointing at the ledger explorer, and a payment/sign QR. Entirely
//! offline; every input arrives through [`CertificateData`].

pub mod error;
pub mod font;
pub mod layout;
pub mod qr;
pub mod render;

pub use error::CertificateError;
pub use render::{render, CertificateData};
