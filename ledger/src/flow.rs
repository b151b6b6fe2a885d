//! End-to-end flow: one full produce → tokenize → burn → certify →
//! transfer → pay cycle.
//!
//! The pipeline is strictly sequential. Each step's externally observable
//! effect (a balance, a validated hash, a minted token) is the
//! precondition for the next, so ordering is enforced by control flow
//! alone — no locks, no shared in-process state. The first failure aborts
//! the remainder; there is no compensation or rollback. A partial run
//! leaves the ledger in an intermediate state the operator reconciles by
//! re-running, optionally passing a previously captured burn hash to skip
//! the non-idempotent burn.
//!
//! Two independent runs against the same accounts are not safe
//! concurrently: nothing prevents their trust-line or burn submissions
//! from interleaving.
//!
//! ## Steps
//!
//! 1. Configure issuer account (idempotent).
//! 2. Configure holder (hot) account (idempotent).
//! 3. Trust line from hot to issuer, plus issuer-side authorization.
//! 4. Issue `kwh` tokens issuer → hot.
//! 5. Transfer the full quantity hot → system owner.
//! 6. Burn exactly [`BURN_AMOUNT`] from the system owner into the
//!    blackhole; the validated hash is the burn proof.
//! 7. Build metadata (burn hash + inline image) as a hex data URI.
//! 8. Mint the NFT from the dedicated minter.
//! 9. Locate the NFT by exact URI match, move custody to the system
//!    owner via a zero-price restricted offer, and — if a price was
//!    supplied — settle from the buyer.

use std::path::PathBuf;

use rust_decimal::Decimal;

use crate::account::{configure_account, AccountRole};
use crate::config::FlowConfig;
use crate::error::LedgerError;
use crate::gateway::Gateway;
use crate::transfer::BurnSink;
use crate::wallet::Wallet;
use crate::{account, metadata, nft, payment, transfer, trust};

/// Tokens destroyed per certificate. A policy constant, deliberately
/// decoupled from the kWh quantity: one NFT per 1000-unit burn no matter
/// how many units were minted.
pub const BURN_AMOUNT: &str = "1000";

/// Per-run inputs that are not part of the static configuration.
#[derive(Debug, Clone)]
pub struct FlowOptions {
    /// Kilowatt-hours to tokenize. Arbitrary precision; carried as a
    /// decimal string on the wire.
    pub kwh: Decimal,
    /// Proof image override; falls back to the config's `image_path`.
    pub image: Option<PathBuf>,
    /// Sale price in drops; overrides the config. Absent in both places
    /// means the settlement step is skipped without error.
    pub price_drops: Option<String>,
    /// Previously captured burn proof. Supplying it skips the burn —
    /// the manual reconcile path after a partially completed run.
    pub burn_tx_hash: Option<String>,
}

/// Everything an operator needs to reconcile or audit one run.
///
/// Hashes are recorded as steps complete; a run that fails midway still
/// surfaces the hashes captured so far through the error path's logs.
#[derive(Debug, Default, Clone)]
pub struct FlowReport {
    /// AccountSet hashes for issuer and holder configuration.
    pub account_config: Vec<String>,
    /// Trust-line establishment hash.
    pub trust_line: Option<String>,
    /// Issuer-side trust-line authorization hash.
    pub trust_authorization: Option<String>,
    /// Issuance payment hash.
    pub issue: Option<String>,
    /// Hot → system-owner transfer hash.
    pub transfer: Option<String>,
    /// The burn proof (performed this run or supplied by the operator).
    pub burn_proof: Option<String>,
    /// Hex data URI attached to the mint.
    pub uri_hex: Option<String>,
    /// Mint transaction hash.
    pub mint: Option<String>,
    /// Token ID located by URI scan; `None` records the "not yet indexed
    /// vs truly absent" ambiguity for the operator.
    pub nft_id: Option<String>,
    /// Offer-creation hash for the custody transfer.
    pub offer_create: Option<String>,
    /// Offer-acceptance hash for the custody transfer.
    pub offer_accept: Option<String>,
    /// Buyer settlement hash, when a price was supplied.
    pub payment: Option<String>,
}

/// Runs the full nine-step cycle against `gateway`.
///
/// # Errors
///
/// Local preconditions (image path) are checked before the first
/// submission. Any remote failure propagates immediately; subsequent
/// steps never execute.
pub async fn run(
    gateway: &dyn Gateway,
    config: &FlowConfig,
    opts: FlowOptions,
) -> Result<FlowReport, LedgerError> {
    let mut report = FlowReport::default();

    // Resolve and preflight the proof image before anything is submitted:
    // a typo'd path must never cost a burn.
    let image_path = opts
        .image
        .clone()
        .or_else(|| config.image_path.clone().map(PathBuf::from))
        .ok_or_else(|| LedgerError::Config {
            missing: vec!["image_path".to_string()],
        })?;
    let file_meta =
        std::fs::metadata(&image_path).map_err(|source| LedgerError::ImageRead {
            path: image_path.display().to_string(),
            source,
        })?;
    if !file_meta.is_file() {
        return Err(LedgerError::ImageRead {
            path: image_path.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
        });
    }

    let currency = config.currency_code.as_str();

    // 1-2. Account configuration, issuer then holder.
    tracing::info!(issuer = %config.issuer, "configuring issuer account");
    let issuer_setup = configure_account(gateway, &config.issuer, AccountRole::Issuer).await?;
    record_config(&mut report, issuer_setup);
    tracing::info!(holder = %config.hot, "configuring hot account");
    let holder_setup = configure_account(gateway, &config.hot, AccountRole::Holder).await?;
    record_config(&mut report, holder_setup);

    // 3. Trust line with a generously high ceiling, then authorization.
    tracing::info!(limit = trust::TRUST_LIMIT, "creating trust line");
    let line = trust::create_trust_line(
        gateway,
        &config.hot,
        &config.issuer.address,
        currency,
        &trust::TRUST_LIMIT.to_string(),
    )
    .await?;
    report.trust_line = Some(line.hash);
    let auth =
        account::authorize_trust_line(gateway, &config.issuer, &config.hot.address, currency)
            .await?;
    report.trust_authorization = Some(auth.hash);

    // 4. Issue kWh-equivalent tokens to the hot wallet.
    tracing::info!(kwh = %opts.kwh, %currency, "issuing tokens");
    let issued = trust::issue(gateway, &config.issuer, &config.hot.address, currency, &opts.kwh)
        .await?;
    report.issue = Some(issued.hash);

    // 5. Move the full quantity to the system owner.
    tracing::info!(owner = %config.system_owner, "transferring to system owner");
    let moved = transfer::transfer(
        gateway,
        &config.hot,
        &config.system_owner.address,
        currency,
        &opts.kwh.to_string(),
        &config.issuer.address,
    )
    .await?;
    report.transfer = Some(moved.hash);

    // 6. Burn the fixed amount, unless the operator supplied a prior proof.
    let burn_hash = match &opts.burn_tx_hash {
        Some(hash) => {
            tracing::info!(%hash, "using supplied burn proof, skipping burn");
            hash.clone()
        }
        None => {
            tracing::info!(amount = BURN_AMOUNT, "burning from system owner");
            let burned = transfer::burn(
                gateway,
                &config.system_owner,
                currency,
                BURN_AMOUNT,
                &config.issuer.address,
                BurnSink::Blackhole,
            )
            .await?;
            burned.hash
        }
    };
    report.burn_proof = Some(burn_hash.clone());

    // 7. Metadata only exists after the burn proof is known.
    let uri_hex = metadata::build_metadata(&config.certificate, currency, &burn_hash, &image_path)?;
    report.uri_hex = Some(uri_hex.clone());

    // 8. Mint from the dedicated minter.
    tracing::info!(minter = %config.nft_minter, "minting certificate NFT");
    let minted = nft::mint(gateway, &config.nft_minter, &uri_hex).await?;
    report.mint = Some(minted.hash);

    // 9a. Locate and hand custody to the system owner.
    match nft::find_by_uri(gateway, &config.nft_minter.address, &uri_hex).await? {
        Some(record) => {
            tracing::info!(nft_id = %record.nftoken_id, "transferring NFT to system owner");
            let (created, accepted) = nft::transfer_via_offer(
                gateway,
                &config.nft_minter,
                &config.system_owner,
                &record.nftoken_id,
            )
            .await?;
            report.nft_id = Some(record.nftoken_id);
            report.offer_create = Some(created.hash);
            report.offer_accept = Some(accepted.hash);
        }
        None => {
            // Could be indexing lag or a genuine miss; the operator
            // re-runs the market helpers once the token shows up.
            tracing::warn!("minted NFT not found by URI scan; custody transfer skipped");
        }
    }

    // 9b. Optional settlement from the buyer.
    let price = opts
        .price_drops
        .clone()
        .or_else(|| config.price_xrp_drops.clone());
    match price {
        Some(drops) => {
            tracing::info!(%drops, buyer = %config.nft_buyer, "settling payment to system owner");
            let paid = payment::send_drops(
                gateway,
                &config.nft_buyer,
                &config.system_owner.address,
                &drops,
                None,
                None,
            )
            .await?;
            report.payment = Some(paid.hash);
        }
        None => tracing::info!("no sale price supplied; skipping settlement"),
    }

    tracing::info!("flow complete");
    Ok(report)
}

fn record_config(report: &mut FlowReport, outcomes: Vec<crate::gateway::TxOutcome>) {
    report
        .account_config
        .extend(outcomes.into_iter().map(|o| o.hash));
}

/// Convenience used by the standalone burn-and-mint path: burn to the
/// issuer (retiring the units) instead of the blackhole.
pub async fn burn_for_proof(
    gateway: &dyn Gateway,
    owner: &Wallet,
    currency: &str,
    issuer_address: &str,
) -> Result<String, LedgerError> {
    let outcome = transfer::burn(
        gateway,
        owner,
        currency,
        BURN_AMOUNT,
        issuer_address,
        BurnSink::Issuer,
    )
    .await?;
    Ok(outcome.hash)
}
