//! Plain native-currency payments, denominated in drops.

use crate::error::LedgerError;
use crate::gateway::{Gateway, TxOutcome};
use crate::tx::{text_memo, Amount, TxEnvelope};
use crate::wallet::Wallet;

/// Sends `drops` from `sender` to `destination`, with an optional
/// destination tag (required by accounts configured with RequireDestTag)
/// and an optional text memo.
pub async fn send_drops(
    gateway: &dyn Gateway,
    sender: &Wallet,
    destination: &str,
    drops: &str,
    destination_tag: Option<u32>,
    memo: Option<&str>,
) -> Result<TxOutcome, LedgerError> {
    let tx = TxEnvelope::Payment {
        account: sender.address.clone(),
        amount: Amount::Drops(drops.to_string()),
        destination: destination.to_string(),
        destination_tag,
        memos: memo.map(|text| vec![text_memo(text)]),
    };
    gateway.submit_and_wait(&tx, sender).await
}
