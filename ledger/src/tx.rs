//! Typed transaction bodies and flag constants.
//!
//! Each variant of [`TxEnvelope`] serializes to exactly the `tx_json`
//! object the ledger's JSON-RPC interface expects, using the wire's
//! PascalCase field names. The internally-tagged enum representation puts
//! `TransactionType` alongside the fields, which is precisely the wire
//! shape — no hand-rolled JSON assembly anywhere.
//!
//! Only the transaction types this system submits are modeled. Fee,
//! sequence, and signature fields are absent on purpose: the gateway's
//! sign-and-submit mode autofills them server-side.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Flags
// ---------------------------------------------------------------------------

/// AccountSet tf flag: refuse incoming native-currency payments.
pub const TF_DISALLOW_XRP: u32 = 0x0010_0000;
/// AccountSet tf flag: require a destination tag on incoming payments.
pub const TF_REQUIRE_DEST_TAG: u32 = 0x0001_0000;

/// AccountSet asf flag: enable rippling through the issuer by default.
/// Required for issued tokens to move between holders.
pub const ASF_DEFAULT_RIPPLE: u32 = 8;
/// AccountSet asf flag: trust lines must be authorized by this account.
pub const ASF_REQUIRE_AUTH: u32 = 2;

/// TrustSet tf flag: authorize the counterparty's trust line.
pub const TF_SET_AUTH: u32 = 0x0001_0000;

/// NFTokenCreateOffer tf flag: this is a sell offer.
pub const TF_SELL_OFFER: u32 = 1;

/// NFTokenMint tf flag: the issuer may burn this token later.
pub const NFT_TF_BURNABLE: u32 = 0x0000_0001;
/// NFTokenMint tf flag: the token may be transferred between holders.
pub const NFT_TF_TRANSFERABLE: u32 = 0x0000_0008;

// ---------------------------------------------------------------------------
// Amounts
// ---------------------------------------------------------------------------

/// An issued-currency amount: `{currency, value, issuer}` with the value
/// carried as a decimal string. Never a float.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedAmount {
    pub currency: String,
    pub value: String,
    pub issuer: String,
}

impl IssuedAmount {
    pub fn new(
        currency: impl Into<String>,
        value: impl Into<String>,
        issuer: impl Into<String>,
    ) -> Self {
        Self {
            currency: currency.into(),
            value: value.into(),
            issuer: issuer.into(),
        }
    }
}

/// A payment amount: either native drops (a plain string on the wire) or
/// an issued-currency object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    /// Native currency, denominated in drops.
    Drops(String),
    /// Issued token amount.
    Issued(IssuedAmount),
}

// ---------------------------------------------------------------------------
// Memos
// ---------------------------------------------------------------------------

/// A single memo attachment, hex-encoded per the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    #[serde(rename = "MemoType")]
    pub memo_type: String,
    #[serde(rename = "MemoData")]
    pub memo_data: String,
}

/// Wire wrapper: memos nest one level (`{"Memo": {...}}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoWrapper {
    #[serde(rename = "Memo")]
    pub memo: Memo,
}

/// Builds a hex-encoded text memo.
pub fn text_memo(text: &str) -> MemoWrapper {
    MemoWrapper {
        memo: Memo {
            memo_type: hex::encode("text"),
            memo_data: hex::encode(text),
        },
    }
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

/// Every transaction body this system submits.
///
/// Serialized form is the ledger's `tx_json`: the enum tag becomes the
/// `TransactionType` field and variant fields sit alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "TransactionType")]
pub enum TxEnvelope {
    /// Account settings update.
    AccountSet {
        #[serde(rename = "Account")]
        account: String,
        /// tf flag bitmask.
        #[serde(rename = "Flags", skip_serializing_if = "Option::is_none")]
        flags: Option<u32>,
        /// asf flag; the ledger allows at most one per transaction.
        #[serde(rename = "SetFlag", skip_serializing_if = "Option::is_none")]
        set_flag: Option<u32>,
    },

    /// Trust-line establishment, extension, or authorization.
    TrustSet {
        #[serde(rename = "Account")]
        account: String,
        #[serde(rename = "Flags", skip_serializing_if = "Option::is_none")]
        flags: Option<u32>,
        #[serde(rename = "LimitAmount")]
        limit_amount: IssuedAmount,
    },

    /// Value movement: issuance, transfer, burn, and native payments are
    /// all Payment-shaped on this ledger.
    Payment {
        #[serde(rename = "Account")]
        account: String,
        #[serde(rename = "Amount")]
        amount: Amount,
        #[serde(rename = "Destination")]
        destination: String,
        #[serde(rename = "DestinationTag", skip_serializing_if = "Option::is_none")]
        destination_tag: Option<u32>,
        #[serde(rename = "Memos", skip_serializing_if = "Option::is_none")]
        memos: Option<Vec<MemoWrapper>>,
    },

    /// Non-fungible token mint carrying a hex-encoded metadata URI.
    NFTokenMint {
        #[serde(rename = "Account")]
        account: String,
        #[serde(rename = "URI")]
        uri: String,
        /// Secondary-sale fee in basis points of 0.001% (10000 = 10%).
        #[serde(rename = "TransferFee")]
        transfer_fee: u32,
        #[serde(rename = "Flags")]
        flags: u32,
        #[serde(rename = "NFTokenTaxon")]
        nftoken_taxon: u32,
    },

    /// Sell-offer creation, optionally restricted to one destination.
    NFTokenCreateOffer {
        #[serde(rename = "Account")]
        account: String,
        #[serde(rename = "NFTokenID")]
        nftoken_id: String,
        #[serde(rename = "Amount")]
        amount: Amount,
        #[serde(rename = "Destination", skip_serializing_if = "Option::is_none")]
        destination: Option<String>,
        #[serde(rename = "Flags")]
        flags: u32,
    },

    /// Acceptance of a standing sell offer, consuming it.
    NFTokenAcceptOffer {
        #[serde(rename = "Account")]
        account: String,
        #[serde(rename = "NFTokenSellOffer")]
        nftoken_sell_offer: String,
    },
}

impl TxEnvelope {
    /// Wire name of the transaction type, for logs and test assertions.
    pub fn tx_type(&self) -> &'static str {
        match self {
            TxEnvelope::AccountSet { .. } => "AccountSet",
            TxEnvelope::TrustSet { .. } => "TrustSet",
            TxEnvelope::Payment { .. } => "Payment",
            TxEnvelope::NFTokenMint { .. } => "NFTokenMint",
            TxEnvelope::NFTokenCreateOffer { .. } => "NFTokenCreateOffer",
            TxEnvelope::NFTokenAcceptOffer { .. } => "NFTokenAcceptOffer",
        }
    }

    /// The account the transaction spends from.
    pub fn account(&self) -> &str {
        match self {
            TxEnvelope::AccountSet { account, .. }
            | TxEnvelope::TrustSet { account, .. }
            | TxEnvelope::Payment { account, .. }
            | TxEnvelope::NFTokenMint { account, .. }
            | TxEnvelope::NFTokenCreateOffer { account, .. }
            | TxEnvelope::NFTokenAcceptOffer { account, .. } => account,
        }
    }
}
