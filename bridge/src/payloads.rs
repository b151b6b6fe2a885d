//! Sign-request transaction JSON builders.
//!
//! These produce exactly the `tx_json` bodies a wallet expects to be asked
//! to sign: a drops payment with a text memo, a sell-offer creation, and
//! an offer acceptance. Pure functions — the network enters only in
//! [`crate::client`].

use serde_json::{json, Value};

/// Memo text attached to payment sign requests when none is supplied.
pub const DEFAULT_MEMO: &str = "VOLTREC-REC Testnet Purchase";

/// Builds a minimal payment transaction for wallet signing.
///
/// `account` may be empty: the wallet fills in the signer's own address
/// when it opens the request.
pub fn payment_tx(account: &str, destination: &str, drops: &str, memo_text: &str) -> Value {
    json!({
        "TransactionType": "Payment",
        "Account": account,
        "Destination": destination,
        "Amount": drops,
        "Memos": [{
            "Memo": {
                "MemoType": hex::encode("text"),
                "MemoData": hex::encode(memo_text),
            }
        }],
    })
}

/// Builds a sell-offer creation for wallet signing, optionally restricted
/// to a single destination.
pub fn create_offer_tx(nft_id: &str, amount_drops: &str, destination: Option<&str>) -> Value {
    let mut tx = json!({
        "TransactionType": "NFTokenCreateOffer",
        "NFTokenID": nft_id,
        "Amount": amount_drops,
    });
    if let Some(dest) = destination {
        tx["Destination"] = json!(dest);
    }
    tx
}

/// Builds an acceptance of a standing sell offer for wallet signing.
pub fn accept_offer_tx(offer_index: &str) -> Value {
    json!({
        "TransactionType": "NFTokenAcceptOffer",
        "NFTokenSellOffer": offer_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_tx_hex_encodes_memo() {
        let tx = payment_tx("", "rOwner", "270000000", DEFAULT_MEMO);
        assert_eq!(tx["Amount"], "270000000");
        assert_eq!(tx["Memos"][0]["Memo"]["MemoType"], "74657874");
        let data = tx["Memos"][0]["Memo"]["MemoData"].as_str().unwrap();
        assert_eq!(hex::decode(data).unwrap(), DEFAULT_MEMO.as_bytes());
    }

    #[test]
    fn offer_tx_omits_destination_when_unrestricted() {
        let open = create_offer_tx("NFTID", "1000", None);
        assert!(open.get("Destination").is_none());
        let restricted = create_offer_tx("NFTID", "0", Some("rOwner"));
        assert_eq!(restricted["Destination"], "rOwner");
    }

    #[test]
    fn accept_tx_references_the_offer_index() {
        let tx = accept_offer_tx("OFFERIDX");
        assert_eq!(tx["TransactionType"], "NFTokenAcceptOffer");
        assert_eq!(tx["NFTokenSellOffer"], "OFFERIDX");
    }
}
