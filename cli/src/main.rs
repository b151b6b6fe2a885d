// Copyright (c) 2026 Voltrec. MIT License.
// See LICENSE for details.

//! # Voltrec CLI
//!
//! Entry point for the `voltrec` binary. Parses CLI arguments,
//! initializes logging, and dispatches to one of the workflows:
//!
//! - `mint-token`  — configure accounts and issue energy-credit tokens
//! - `burn-mint`   — burn for a proof and mint the certificate NFT
//! - `market`      — sell-offer helpers
//! - `pay`         — plain drops payment
//! - `flow`        — the full certificate cycle in one run
//! - `certificate` — render a printable certificate image
//! - `deeplink`    — print a wallet sign link
//! - `bridge`      — run the payload server
//!
//! Results land on stdout; logs go to stderr.

mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use voltrec_bridge::{payloads, server, SignClient};
use voltrec_certificate::CertificateData;
use voltrec_ledger::{
    account::{self, AccountRole},
    flow::{self, FlowOptions, FlowReport},
    metadata, nft, payment, trust, FlowConfig, JsonRpcGateway, Wallet, EXPLORER_TX_URL,
    TESTNET_URL,
};

use cli::{Commands, MarketCommands, VoltrecCli, WalletRole};

/// Default per-crate log levels; overridable through `RUST_LOG`.
const DEFAULT_LOG_FILTER: &str = "voltrec=info,voltrec_ledger=info,voltrec_bridge=info,\
                                  voltrec_certificate=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = VoltrecCli::parse();
    logging::init_logging(
        DEFAULT_LOG_FILTER,
        logging::LogFormat::from_str_lossy(&cli.log_format),
    );

    match cli.command {
        Commands::MintToken(args) => mint_token(args).await,
        Commands::BurnMint(args) => burn_mint(args).await,
        Commands::Market(cmd) => market(cmd).await,
        Commands::Pay(args) => pay(args).await,
        Commands::Flow(args) => run_flow(args).await,
        Commands::Certificate(args) => certificate(args),
        Commands::Deeplink(args) => deeplink(args).await,
        Commands::Bridge(args) => bridge(args).await,
    }
}

// ---------------------------------------------------------------------------
// Workflows
// ---------------------------------------------------------------------------

/// Account configuration, trust line, authorization, issuance.
async fn mint_token(args: cli::MintTokenArgs) -> Result<()> {
    let config = load_config(&args.config.config)?;
    let gateway = JsonRpcGateway::new(TESTNET_URL);
    let currency = config.currency_code.as_str();

    account::configure_account(&gateway, &config.issuer, AccountRole::Issuer).await?;
    account::configure_account(&gateway, &config.hot, AccountRole::Holder).await?;

    let line = trust::create_trust_line(
        &gateway,
        &config.hot,
        &config.issuer.address,
        currency,
        &trust::TRUST_LIMIT.to_string(),
    )
    .await?;
    println!("trust line:    {}", explorer(&line.hash));

    let auth =
        account::authorize_trust_line(&gateway, &config.issuer, &config.hot.address, currency)
            .await?;
    println!("authorization: {}", explorer(&auth.hash));

    let issued =
        trust::issue(&gateway, &config.issuer, &config.hot.address, currency, &args.kwh).await?;
    println!("issuance:      {}", explorer(&issued.hash));
    Ok(())
}

/// Burn for a proof (unless one is supplied) and mint the NFT.
async fn burn_mint(args: cli::BurnMintArgs) -> Result<()> {
    let config = load_config(&args.config.config)?;
    let image_path = resolve_image(args.image.as_deref(), &config)?;

    let gateway = JsonRpcGateway::new(TESTNET_URL);
    let currency = config.currency_code.as_str();

    let burn_hash = match args.burn_tx_hash {
        Some(hash) => {
            tracing::info!(%hash, "using supplied burn proof, skipping burn");
            hash
        }
        None => {
            let hash = flow::burn_for_proof(
                &gateway,
                &config.system_owner,
                currency,
                &config.issuer.address,
            )
            .await?;
            println!("burn proof: {}", explorer(&hash));
            hash
        }
    };

    let uri_hex =
        metadata::build_metadata(&config.certificate, currency, &burn_hash, &image_path)?;
    let minted = nft::mint(&gateway, &config.nft_minter, &uri_hex).await?;
    println!("mint:       {}", explorer(&minted.hash));

    match nft::find_by_uri(&gateway, &config.nft_minter.address, &uri_hex).await? {
        Some(record) => println!("nft id:     {}", record.nftoken_id),
        None => tracing::warn!("minted NFT not found by URI scan yet; re-run the lookup later"),
    }
    Ok(())
}

/// Sell-offer helpers.
async fn market(cmd: MarketCommands) -> Result<()> {
    match cmd {
        MarketCommands::CreateSell(args) => {
            let config = load_config(&args.config.config)?;
            let seller = wallet_for(&config, args.wallet);
            let gateway = JsonRpcGateway::new(TESTNET_URL);
            let created = nft::create_sell_offer(
                &gateway,
                seller,
                &args.nft_id,
                &args.drops,
                args.destination.as_deref(),
            )
            .await?;
            println!("offer tx:    {}", explorer(&created.hash));
            let offer_index = nft::extract_offer_index(&created)?;
            println!("offer index: {offer_index}");
        }
        MarketCommands::AcceptSell(args) => {
            let config = load_config(&args.config.config)?;
            let buyer = wallet_for(&config, args.wallet);
            let gateway = JsonRpcGateway::new(TESTNET_URL);
            let accepted = nft::accept_sell_offer(&gateway, buyer, &args.offer_index).await?;
            println!("accept tx: {}", explorer(&accepted.hash));
        }
    }
    Ok(())
}

/// Plain drops payment from a configured account.
async fn pay(args: cli::PayArgs) -> Result<()> {
    let config = load_config(&args.config.config)?;
    let sender = wallet_for(&config, args.from);
    let gateway = JsonRpcGateway::new(TESTNET_URL);
    let paid = payment::send_drops(
        &gateway,
        sender,
        &args.to,
        &args.drops,
        args.tag,
        args.memo.as_deref(),
    )
    .await?;
    println!("payment: {}", explorer(&paid.hash));
    Ok(())
}

/// The full certificate cycle.
async fn run_flow(args: cli::FlowArgs) -> Result<()> {
    let config = load_config(&args.config.config)?;
    let gateway = JsonRpcGateway::new(TESTNET_URL);
    let report = flow::run(
        &gateway,
        &config,
        FlowOptions {
            kwh: args.kwh,
            image: args.image,
            price_drops: args.price_drops,
            burn_tx_hash: args.burn_tx_hash,
        },
    )
    .await?;
    print_report(&report);
    Ok(())
}

/// Offline certificate rendering.
fn certificate(args: cli::CertificateArgs) -> Result<()> {
    let config = load_config(&args.config.config)?;
    let screenshot = resolve_image(args.image.as_deref(), &config)?;

    let fields = &config.certificate;
    let data = CertificateData {
        issuer_address: config.issuer.address.clone(),
        hot_address: config.hot.address.clone(),
        owner_address: config.system_owner.address.clone(),
        buyer_address: config.nft_buyer.address.clone(),
        currency_code: config.currency_code.clone(),
        kwh: args.kwh,
        jurisdiction: fields.jurisdiction.clone().unwrap_or_default(),
        program: fields.program.clone().unwrap_or_default(),
        vintage: fields.vintage.clone().unwrap_or_default(),
        facility_name: fields.facility_name.clone(),
        facility_location: fields.facility_location.clone(),
        grid_region: fields.grid_region.clone(),
        technology: fields.technology.clone(),
        vintage_start: fields.vintage_start.clone(),
        vintage_end: fields.vintage_end.clone(),
        burn_tx_hash: args.burn_tx_hash,
        price_usd: config.price_usd.clone().unwrap_or_default(),
        price_drops: config.price_xrp_drops.clone().unwrap_or_default(),
        nft_id: args.nft_id,
        sign_url: args.sign_url,
    };

    voltrec_certificate::render(&data, &screenshot, &args.output)
        .with_context(|| format!("failed to render {}", args.output.display()))?;
    println!("wrote {}", args.output.display());
    Ok(())
}

/// Prints a wallet sign link for a payment.
async fn deeplink(args: cli::DeeplinkArgs) -> Result<()> {
    let client = SignClient::from_env();
    let memo = args.memo.as_deref().unwrap_or(payloads::DEFAULT_MEMO);
    let tx = payloads::payment_tx(&args.account, &args.destination, &args.drops, memo);
    let link = client.deeplink_or_fallback(&tx).await;
    println!("{link}");
    Ok(())
}

/// Runs the payload server until interrupted.
async fn bridge(args: cli::BridgeArgs) -> Result<()> {
    let addr = format!("{}:{}", args.host, args.port);
    server::serve(&addr, SignClient::from_env())
        .await
        .with_context(|| format!("payload server failed on {addr}"))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_config(path: &Path) -> Result<FlowConfig> {
    FlowConfig::load(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))
}

/// Resolves the screenshot path from the flag or the config, and
/// verifies it exists before anything is submitted or rendered.
fn resolve_image(flag: Option<&Path>, config: &FlowConfig) -> Result<PathBuf> {
    let path = match flag {
        Some(p) => p.to_path_buf(),
        None => match &config.image_path {
            Some(p) => PathBuf::from(p),
            None => bail!("no image supplied: pass --image or set image_path in the config"),
        },
    };
    if !path.is_file() {
        bail!("image not found: {}", path.display());
    }
    Ok(path)
}

fn wallet_for(config: &FlowConfig, role: WalletRole) -> &Wallet {
    match role {
        WalletRole::Issuer => &config.issuer,
        WalletRole::Hot => &config.hot,
        WalletRole::Owner => &config.system_owner,
        WalletRole::Buyer => &config.nft_buyer,
        WalletRole::Minter => &config.nft_minter,
    }
}

fn explorer(hash: &str) -> String {
    format!("{EXPLORER_TX_URL}{hash}")
}

fn print_report(report: &FlowReport) {
    let line = |label: &str, hash: &Option<String>| {
        if let Some(hash) = hash {
            println!("{label:<16}{}", explorer(hash));
        }
    };
    for hash in &report.account_config {
        println!("{:<16}{}", "account config", explorer(hash));
    }
    line("trust line", &report.trust_line);
    line("authorization", &report.trust_authorization);
    line("issuance", &report.issue);
    line("transfer", &report.transfer);
    line("burn proof", &report.burn_proof);
    line("mint", &report.mint);
    line("offer create", &report.offer_create);
    line("offer accept", &report.offer_accept);
    line("payment", &report.payment);
    if let Some(nft_id) = &report.nft_id {
        println!("{:<16}{nft_id}", "nft id");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voltrec_ledger::config::RawConfig;

    fn minimal_config() -> FlowConfig {
        RawConfig {
            issuer_address: Some("rIssuer".into()),
            issuer_seed: Some("sIssuer".into()),
            hot_address: Some("rHot".into()),
            hot_seed: Some("sHot".into()),
            system_owner_address: Some("rOwner".into()),
            system_owner_seed: Some("sOwner".into()),
            nft_buyer_address: Some("rBuyer".into()),
            nft_buyer_seed: Some("sBuyer".into()),
            nft_minter_address: Some("rMinter".into()),
            nft_minter_seed: Some("sMinter".into()),
            currency_code: Some("WATT".into()),
            ..Default::default()
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn wallet_roles_map_to_configured_accounts() {
        let config = minimal_config();
        assert_eq!(wallet_for(&config, WalletRole::Issuer).address, "rIssuer");
        assert_eq!(wallet_for(&config, WalletRole::Hot).address, "rHot");
        assert_eq!(wallet_for(&config, WalletRole::Owner).address, "rOwner");
        assert_eq!(wallet_for(&config, WalletRole::Buyer).address, "rBuyer");
        assert_eq!(wallet_for(&config, WalletRole::Minter).address, "rMinter");
    }

    #[test]
    fn missing_image_is_reported_before_any_network_use() {
        let config = minimal_config();
        let err = resolve_image(None, &config).unwrap_err();
        assert!(err.to_string().contains("image"));

        let err = resolve_image(Some(Path::new("/nonexistent.jpeg")), &config).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
