//! Trust-line establishment and token issuance.
//!
//! A trust line is the holder-set ceiling that authorizes receipt of a
//! specific issuer's token; issuance is then just a Payment of issued
//! currency from the issuer to the holder. Amounts are carried as decimal
//! strings end to end — the kWh quantity arrives as a `rust_decimal`
//! value and is stringified without ever passing through a float.

use rust_decimal::Decimal;

use crate::error::LedgerError;
use crate::gateway::{Gateway, TxOutcome};
use crate::tx::{Amount, IssuedAmount, TxEnvelope};
use crate::wallet::Wallet;

/// Trust-line ceiling used by the flow: one billion units, generously
/// above any realistic issuance so limit failures never interrupt a run.
pub const TRUST_LIMIT: u64 = 1_000_000_000;

/// Establishes (or extends) a trust line from `holder` to the issuer for
/// `currency`, with the given ceiling.
pub async fn create_trust_line(
    gateway: &dyn Gateway,
    holder: &Wallet,
    issuer_address: &str,
    currency: &str,
    limit: &str,
) -> Result<TxOutcome, LedgerError> {
    let tx = TxEnvelope::TrustSet {
        account: holder.address.clone(),
        flags: None,
        limit_amount: IssuedAmount::new(currency, limit, issuer_address),
    };
    gateway.submit_and_wait(&tx, holder).await
}

/// Issues `amount` units of `currency` from the issuer to `holder_address`.
pub async fn issue(
    gateway: &dyn Gateway,
    issuer: &Wallet,
    holder_address: &str,
    currency: &str,
    amount: &Decimal,
) -> Result<TxOutcome, LedgerError> {
    let tx = TxEnvelope::Payment {
        account: issuer.address.clone(),
        amount: Amount::Issued(IssuedAmount::new(
            currency,
            amount.to_string(),
            issuer.address.clone(),
        )),
        destination: holder_address.to_string(),
        destination_tag: None,
        memos: None,
    };
    gateway.submit_and_wait(&tx, issuer).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn decimal_amounts_keep_precision_as_strings() {
        let kwh = Decimal::from_str("8.19").unwrap();
        assert_eq!(kwh.to_string(), "8.19");
        let fine = Decimal::from_str("0.000001").unwrap();
        assert_eq!(fine.to_string(), "0.000001");
    }
}
