// Copyright (c) 2026 Voltrec. MIT License.
// See LICENSE for details.

//! # voltrec-ledger — Core Library
//!
//! Everything needed to run one full "produce → tokenize → burn → certify →
//! transfer → pay" cycle for renewable-energy credits on the XRPL testnet.
//!
//! This crate deliberately implements **no** ledger protocol logic: no
//! consensus, no fee math, no signatures, no canonical binary encoding.
//! Transactions are assembled as typed JSON bodies and handed to the
//! network's JSON-RPC interface, which signs and validates them. What lives
//! here is the sequencing, the bookkeeping, and the refusal to guess when a
//! response doesn't say what it should.
//!
//! ## Architecture
//!
//! - **config** — Typed YAML configuration, validated once, eagerly.
//! - **wallet** — Account address + seed pairs (seed never printed).
//! - **tx** — Typed transaction bodies with the ledger's wire field names.
//! - **gateway** — JSON-RPC submission with blocking wait-for-validated.
//! - **account** — One-time account flag configuration and trust-line
//!   authorization.
//! - **trust** — Trust-line establishment and token issuance.
//! - **transfer** — Holder-to-holder moves and provable burns.
//! - **metadata** — Burn-proof metadata → base64 data URI → hex.
//! - **nft** — Mint, locate-by-URI, and custody transfer via zero-price
//!   destination-restricted offers.
//! - **payment** — Plain drops payments.
//! - **flow** — The nine-step end-to-end orchestrator.
//!
//! ## Design Philosophy
//!
//! 1. Fail before the network: config and file errors surface before any
//!    remote call is made.
//! 2. Amounts are decimal strings on the wire. Floats never touch money.
//! 3. Absence is not an error: lookups return `Option`, hard failures
//!    return `Err`. The two are never conflated.

pub mod account;
pub mod config;
pub mod error;
pub mod flow;
pub mod gateway;
pub mod metadata;
pub mod nft;
pub mod payment;
pub mod transfer;
pub mod trust;
pub mod tx;
pub mod wallet;

pub use config::FlowConfig;
pub use error::LedgerError;
pub use gateway::{Gateway, JsonRpcGateway, TxOutcome};
pub use wallet::Wallet;

/// Public JSON-RPC endpoint of the XRPL testnet.
pub const TESTNET_URL: &str = "https://s.altnet.rippletest.net:51234";

/// Transaction page on the testnet explorer; append a transaction hash.
pub const EXPLORER_TX_URL: &str = "https://testnet.xrpl.org/transactions/";

/// The canonical unspendable sink address. Tokens paid here are gone.
pub const BLACKHOLE_ADDRESS: &str = "rrrrrrrrrrrrrrrrrrrrrhoLvTp";
