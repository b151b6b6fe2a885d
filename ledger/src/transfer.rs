//! Holder-to-holder transfers and provable burns.
//!
//! Burning on this ledger is a Payment to an address the tokens cannot
//! leave. Two sinks are in operational use and both are kept explicit:
//! the canonical blackhole account (full flow) and the issuer itself
//! (standalone burn-and-mint, where returning tokens to the issuer
//! retires them). The validated burn hash is the proof embedded in NFT
//! metadata, so [`burn`] returns it directly.

use crate::error::LedgerError;
use crate::gateway::{Gateway, TxOutcome};
use crate::tx::{Amount, IssuedAmount, TxEnvelope};
use crate::wallet::Wallet;
use crate::BLACKHOLE_ADDRESS;

/// Where burned tokens are routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BurnSink {
    /// The canonical unspendable account. Nothing ever leaves it.
    Blackhole,
    /// Back to the issuer, retiring the units from circulation.
    Issuer,
}

/// Moves `amount` units of issued currency from `from` to `to_address`.
pub async fn transfer(
    gateway: &dyn Gateway,
    from: &Wallet,
    to_address: &str,
    currency: &str,
    amount: &str,
    issuer_address: &str,
) -> Result<TxOutcome, LedgerError> {
    let tx = TxEnvelope::Payment {
        account: from.address.clone(),
        amount: Amount::Issued(IssuedAmount::new(currency, amount, issuer_address)),
        destination: to_address.to_string(),
        destination_tag: None,
        memos: None,
    };
    gateway.submit_and_wait(&tx, from).await
}

/// Burns `amount` units held by `owner` by paying them into `sink`.
///
/// The caller must ensure the account actually holds the amount; an
/// unfunded burn fails at submission with the ledger's diagnostic.
/// Returns the validated outcome whose `hash` is the burn proof.
pub async fn burn(
    gateway: &dyn Gateway,
    owner: &Wallet,
    currency: &str,
    amount: &str,
    issuer_address: &str,
    sink: BurnSink,
) -> Result<TxOutcome, LedgerError> {
    let destination = match sink {
        BurnSink::Blackhole => BLACKHOLE_ADDRESS,
        BurnSink::Issuer => issuer_address,
    };
    let tx = TxEnvelope::Payment {
        account: owner.address.clone(),
        amount: Amount::Issued(IssuedAmount::new(currency, amount, issuer_address)),
        destination: destination.to_string(),
        destination_tag: None,
        memos: None,
    };
    gateway.submit_and_wait(&tx, owner).await
}
