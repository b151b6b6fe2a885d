//! Account handles: a classic address paired with its secret seed.
//!
//! No key derivation happens in this crate — signing is delegated to the
//! gateway's sign-and-submit mode, so both halves come straight from the
//! validated configuration. The seed's only journey is into the JSON-RPC
//! request body; it never appears in logs or `Debug` output.

use std::fmt;

/// A ledger account this process can spend from.
#[derive(Clone)]
pub struct Wallet {
    /// Classic address (`r...`).
    pub address: String,
    /// Secret seed (`s...`). Exclusively owned by the process for its
    /// lifetime; redacted from all formatting.
    pub seed: String,
}

impl Wallet {
    pub fn new(address: impl Into<String>, seed: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            seed: seed.into(),
        }
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .field("seed", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}
