//! Account configurator: one-time settings for issuer and holder accounts.
//!
//! Both roles get the same tf flags (disallow native payments, require a
//! destination tag). The asf flags differ: the issuer enables default
//! rippling so its token can move between holders, and also requires
//! authorization on incoming trust lines; holders require authorization to
//! prevent accidental issuance against themselves.
//!
//! The ledger accepts at most one asf flag per AccountSet, so each asf is
//! its own transaction. All of these are idempotent — re-applying a flag
//! that is already set succeeds and changes nothing, which is why the flow
//! can safely re-run them on every invocation.

use crate::error::LedgerError;
use crate::gateway::{Gateway, TxOutcome};
use crate::tx::{
    IssuedAmount, TxEnvelope, ASF_DEFAULT_RIPPLE, ASF_REQUIRE_AUTH, TF_DISALLOW_XRP,
    TF_REQUIRE_DEST_TAG, TF_SET_AUTH,
};
use crate::wallet::Wallet;

/// Which side of the issuance relationship an account plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountRole {
    /// Cold wallet that issues the token.
    Issuer,
    /// Any account that holds the token.
    Holder,
}

/// Applies the recommended flag set for `role` to `wallet`'s account.
///
/// Submits the common tf flags first, then one AccountSet per asf flag.
/// Safe to repeat.
pub async fn configure_account(
    gateway: &dyn Gateway,
    wallet: &Wallet,
    role: AccountRole,
) -> Result<Vec<TxOutcome>, LedgerError> {
    let mut outcomes = Vec::new();

    let common = TxEnvelope::AccountSet {
        account: wallet.address.clone(),
        flags: Some(TF_DISALLOW_XRP | TF_REQUIRE_DEST_TAG),
        set_flag: None,
    };
    outcomes.push(gateway.submit_and_wait(&common, wallet).await?);

    let asf_flags: &[u32] = match role {
        AccountRole::Issuer => &[ASF_DEFAULT_RIPPLE, ASF_REQUIRE_AUTH],
        AccountRole::Holder => &[ASF_REQUIRE_AUTH],
    };
    for &asf in asf_flags {
        let tx = TxEnvelope::AccountSet {
            account: wallet.address.clone(),
            flags: None,
            set_flag: Some(asf),
        };
        outcomes.push(gateway.submit_and_wait(&tx, wallet).await?);
    }

    Ok(outcomes)
}

/// Issuer-side authorization of a holder's trust line.
///
/// With RequireAuth set on the issuer, a freshly created trust line cannot
/// receive tokens until the issuer approves it: a TrustSet from the issuer
/// with tfSetAuth where the limit's `issuer` field names the counterparty
/// (the holder) and the value is zero.
pub async fn authorize_trust_line(
    gateway: &dyn Gateway,
    issuer: &Wallet,
    holder_address: &str,
    currency: &str,
) -> Result<TxOutcome, LedgerError> {
    let tx = TxEnvelope::TrustSet {
        account: issuer.address.clone(),
        flags: Some(TF_SET_AUTH),
        limit_amount: IssuedAmount::new(currency, "0", holder_address),
    };
    gateway.submit_and_wait(&tx, issuer).await
}
