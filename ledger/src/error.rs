//! Error types for ledger operations.
//!
//! Three families, kept deliberately distinct (never conflated):
//!
//! 1. **Local, pre-network** — missing config keys, unreadable files.
//!    These must surface before any remote call is attempted.
//! 2. **Remote** — transport failures, rejected submissions, transactions
//!    that never reach a validated state. All fatal for the current run;
//!    re-running is the only recovery mechanism.
//! 3. **Parsing** — a response that arrived but doesn't carry the field we
//!    need. We fail loudly here instead of guessing from unrelated fields.
//!
//! "NFT not found" is intentionally absent: lookups return `Option`, not
//! an error.

use thiserror::Error;

/// Errors that can occur while driving the ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// One or more required configuration keys are missing. Collected in a
    /// single validation pass so the operator sees the full list at once.
    #[error("configuration is missing required keys: {}", missing.join(", "))]
    Config {
        /// Every missing key, in declaration order.
        missing: Vec<String>,
    },

    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        /// Path that was attempted.
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML.
    #[error("invalid YAML in config file: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// The proof image could not be read. Raised before any mint
    /// submission so a bad path never costs a burn.
    #[error("failed to read image file {path}: {source}")]
    ImageRead {
        /// Path that was attempted.
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// HTTP transport failure talking to the ledger.
    #[error("ledger transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The JSON-RPC layer returned an error object for a request.
    #[error("ledger rpc error in '{method}': {message}")]
    Rpc {
        /// The JSON-RPC method that failed.
        method: String,
        /// Diagnostic supplied by the server.
        message: String,
    },

    /// The ledger accepted the request but rejected the transaction.
    #[error("transaction rejected: {engine_result}: {message}")]
    Submission {
        /// Preliminary engine result code (e.g. `tecUNFUNDED_PAYMENT`).
        engine_result: String,
        /// Human-readable engine result message.
        message: String,
    },

    /// The transaction was submitted but never reported as validated
    /// within the polling window. Its final fate is unknown.
    #[error("transaction {hash} not validated after {attempts} polls")]
    NotValidated {
        /// Hash of the submitted transaction.
        hash: String,
        /// Number of status polls performed before giving up.
        attempts: u32,
    },

    /// A response arrived but is structurally missing an expected field.
    #[error("malformed ledger response: {context}")]
    MalformedResponse {
        /// What we were looking for and where.
        context: String,
    },

    /// An offer-creation result carried no extractable offer index.
    /// We refuse to substitute an unrelated field (like the tx hash).
    #[error("offer index not found in creation result for tx {tx_hash}")]
    OfferIndexMissing {
        /// Hash of the offer-creation transaction, for manual inspection.
        tx_hash: String,
    },
}
