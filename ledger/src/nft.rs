//! NFT mint, locate-by-URI, and custody transfer via sell offers.
//!
//! The ledger does not return the minted token's ID directly; discovery is
//! a linear scan of the minter's holdings for an exact URI match. The scan
//! covers the single page the network returns — good enough for a
//! dedicated minter account that holds its NFTs only transiently.
//!
//! Custody moves through a zero-price sell offer restricted to the final
//! owner's address, which the owner then accepts. The offer index is
//! extracted strictly from the creation result (`offer_id`, or the created
//! `NFTokenOffer` ledger node in the transaction metadata); if neither is
//! present we fail with [`LedgerError::OfferIndexMissing`] rather than
//! substituting an unrelated field.

use serde_json::Value;

use crate::error::LedgerError;
use crate::gateway::{Gateway, NftRecord, TxOutcome};
use crate::tx::{Amount, TxEnvelope, NFT_TF_BURNABLE, NFT_TF_TRANSFERABLE, TF_SELL_OFFER};
use crate::wallet::Wallet;

/// Secondary-sale fee the minter collects, in units of 0.001%.
/// 10000 = 10% (8% marketplace + 2% ESG pool).
pub const TRANSFER_FEE_BPS: u32 = 10_000;

/// Mint flag set: burnable and transferable.
pub const MINT_FLAGS: u32 = NFT_TF_BURNABLE | NFT_TF_TRANSFERABLE;

/// Taxon for all certificate NFTs. A single series, so zero.
pub const NFT_TAXON: u32 = 0;

/// Mints one NFT from `minter` carrying the hex metadata URI.
///
/// Returns the full validated outcome; token-ID extraction is the
/// caller's concern (see [`find_by_uri`]).
pub async fn mint(
    gateway: &dyn Gateway,
    minter: &Wallet,
    uri_hex: &str,
) -> Result<TxOutcome, LedgerError> {
    let tx = TxEnvelope::NFTokenMint {
        account: minter.address.clone(),
        uri: uri_hex.to_string(),
        transfer_fee: TRANSFER_FEE_BPS,
        flags: MINT_FLAGS,
        nftoken_taxon: NFT_TAXON,
    };
    gateway.submit_and_wait(&tx, minter).await
}

/// Scans `account`'s holdings for the first NFT whose stored URI equals
/// `uri_hex` exactly.
///
/// `Ok(None)` means no current holding matches — which the caller must
/// treat as ambiguous between "not yet indexed" and "truly absent". It is
/// never an error.
pub async fn find_by_uri(
    gateway: &dyn Gateway,
    account: &str,
    uri_hex: &str,
) -> Result<Option<NftRecord>, LedgerError> {
    let holdings = gateway.account_nfts(account).await?;
    Ok(holdings
        .into_iter()
        .find(|nft| nft.uri.as_deref() == Some(uri_hex)))
}

/// Creates a sell offer for `nft_id` at `amount_drops`, optionally
/// restricted to a single destination address.
pub async fn create_sell_offer(
    gateway: &dyn Gateway,
    seller: &Wallet,
    nft_id: &str,
    amount_drops: &str,
    destination: Option<&str>,
) -> Result<TxOutcome, LedgerError> {
    let tx = TxEnvelope::NFTokenCreateOffer {
        account: seller.address.clone(),
        nftoken_id: nft_id.to_string(),
        amount: Amount::Drops(amount_drops.to_string()),
        destination: destination.map(str::to_string),
        flags: TF_SELL_OFFER,
    };
    gateway.submit_and_wait(&tx, seller).await
}

/// Accepts a standing sell offer by its ledger index, consuming it.
pub async fn accept_sell_offer(
    gateway: &dyn Gateway,
    buyer: &Wallet,
    offer_index: &str,
) -> Result<TxOutcome, LedgerError> {
    let tx = TxEnvelope::NFTokenAcceptOffer {
        account: buyer.address.clone(),
        nftoken_sell_offer: offer_index.to_string(),
    };
    gateway.submit_and_wait(&tx, buyer).await
}

/// Moves `nft_id` from `minter` to `owner`: zero-price sell offer
/// restricted to the owner, then the owner's accept.
///
/// Returns the (create, accept) outcomes in order.
pub async fn transfer_via_offer(
    gateway: &dyn Gateway,
    minter: &Wallet,
    owner: &Wallet,
    nft_id: &str,
) -> Result<(TxOutcome, TxOutcome), LedgerError> {
    let created = create_sell_offer(gateway, minter, nft_id, "0", Some(&owner.address)).await?;
    let offer_index = extract_offer_index(&created)?;
    let accepted = accept_sell_offer(gateway, owner, &offer_index).await?;
    Ok((created, accepted))
}

/// Pulls the new offer's ledger index out of a validated creation result.
///
/// Checked locations, in order:
/// 1. a top-level `offer_id` (some servers surface it directly),
/// 2. the `CreatedNode` of type `NFTokenOffer` in `meta.AffectedNodes`.
///
/// Anything else fails closed: guessing an index from unrelated fields
/// (such as the transaction hash) would submit an accept against garbage.
pub fn extract_offer_index(outcome: &TxOutcome) -> Result<String, LedgerError> {
    if let Some(id) = outcome
        .result
        .get("offer_id")
        .or_else(|| outcome.result.get("OfferID"))
        .and_then(Value::as_str)
    {
        return Ok(id.to_string());
    }

    let created = outcome
        .result
        .pointer("/meta/AffectedNodes")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|node| node.get("CreatedNode"))
        .find(|node| {
            node.get("LedgerEntryType").and_then(Value::as_str) == Some("NFTokenOffer")
        })
        .and_then(|node| node.get("LedgerIndex"))
        .and_then(Value::as_str);

    created
        .map(str::to_string)
        .ok_or_else(|| LedgerError::OfferIndexMissing {
            tx_hash: outcome.hash.clone(),
        })
}
