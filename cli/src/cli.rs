//! # CLI Interface
//!
//! Defines the command-line argument structure for `voltrec` using
//! `clap` derive. One subcommand per workflow: token issuance, the
//! burn-and-mint cycle, market helpers, payments, the full flow, the
//! certificate renderer, wallet deep links, and the payload server.

use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Voltrec renewable-energy certificate toolkit.
///
/// Issues energy-credit tokens on the test ledger, burns them for
/// certificate proofs, mints certificate NFTs with embedded burn
/// evidence, and renders printable certificate images.
#[derive(Parser, Debug)]
#[command(
    name = "voltrec",
    about = "Renewable-energy certificate toolkit for the XRPL testnet",
    version,
    propagate_version = true
)]
pub struct VoltrecCli {
    /// Log output format: "pretty" or "json".
    #[arg(long, global = true, default_value = "pretty")]
    pub log_format: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configure accounts, establish and authorize the trust line, and
    /// issue kWh-equivalent tokens to the hot wallet.
    MintToken(MintTokenArgs),
    /// Burn the fixed 1000-unit amount for a proof and mint the
    /// certificate NFT carrying it.
    BurnMint(BurnMintArgs),
    /// NFT sell-offer helpers.
    #[command(subcommand)]
    Market(MarketCommands),
    /// Send a plain XRP payment, denominated in drops.
    Pay(PayArgs),
    /// Run the full cycle: configure, issue, transfer, burn, mint,
    /// hand over custody, settle.
    Flow(FlowArgs),
    /// Render a printable certificate image.
    Certificate(CertificateArgs),
    /// Print a wallet sign link for a payment.
    Deeplink(DeeplinkArgs),
    /// Run the payload server that keeps signing credentials
    /// server-side.
    Bridge(BridgeArgs),
}

/// Which configured account a command acts as.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletRole {
    /// Cold issuing wallet.
    Issuer,
    /// Hot distribution wallet.
    Hot,
    /// System owner.
    Owner,
    /// Certificate buyer.
    Buyer,
    /// Dedicated NFT minter.
    Minter,
}

/// Arguments for `mint-token`.
#[derive(Args, Debug)]
pub struct MintTokenArgs {
    /// Kilowatt-hours to tokenize (1 token per kWh).
    #[arg(long)]
    pub kwh: Decimal,

    #[command(flatten)]
    pub config: ConfigArg,
}

/// Arguments for `burn-mint`.
#[derive(Args, Debug)]
pub struct BurnMintArgs {
    /// Proof image to embed in the NFT metadata. Falls back to the
    /// config's `image_path`.
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Reuse a previously captured burn transaction hash instead of
    /// burning again. The resume path after a partial run.
    #[arg(long)]
    pub burn_tx_hash: Option<String>,

    #[command(flatten)]
    pub config: ConfigArg,
}

/// Market subcommands.
#[derive(Subcommand, Debug)]
pub enum MarketCommands {
    /// Create a sell offer for an NFT, optionally restricted to one
    /// destination address.
    CreateSell(CreateSellArgs),
    /// Accept a standing sell offer by its ledger index.
    AcceptSell(AcceptSellArgs),
}

/// Arguments for `market create-sell`.
#[derive(Args, Debug)]
pub struct CreateSellArgs {
    /// Token ID of the NFT to offer.
    #[arg(long)]
    pub nft_id: String,

    /// Asking price in drops. Zero makes a pure transfer offer.
    #[arg(long, default_value = "0")]
    pub drops: String,

    /// Restrict the offer to this address; only it can accept.
    #[arg(long)]
    pub destination: Option<String>,

    /// Account the offer is created from.
    #[arg(long, value_enum, default_value_t = WalletRole::Minter)]
    pub wallet: WalletRole,

    #[command(flatten)]
    pub config: ConfigArg,
}

/// Arguments for `market accept-sell`.
#[derive(Args, Debug)]
pub struct AcceptSellArgs {
    /// Ledger index of the sell offer to accept.
    #[arg(long)]
    pub offer_index: String,

    /// Account accepting the offer.
    #[arg(long, value_enum, default_value_t = WalletRole::Owner)]
    pub wallet: WalletRole,

    #[command(flatten)]
    pub config: ConfigArg,
}

/// Arguments for `pay`.
#[derive(Args, Debug)]
pub struct PayArgs {
    /// Destination address.
    #[arg(long)]
    pub to: String,

    /// Amount in drops.
    #[arg(long)]
    pub drops: String,

    /// Destination tag, required by accounts configured to demand one.
    #[arg(long)]
    pub tag: Option<u32>,

    /// Text memo attached to the payment.
    #[arg(long)]
    pub memo: Option<String>,

    /// Sending account.
    #[arg(long, value_enum, default_value_t = WalletRole::Hot)]
    pub from: WalletRole,

    #[command(flatten)]
    pub config: ConfigArg,
}

/// Arguments for `flow`.
#[derive(Args, Debug)]
pub struct FlowArgs {
    /// Kilowatt-hours to tokenize.
    #[arg(long)]
    pub kwh: Decimal,

    /// Proof image override; falls back to the config's `image_path`.
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Sale price in drops, overriding the config. Absent in both
    /// places skips the settlement step.
    #[arg(long)]
    pub price_drops: Option<String>,

    /// Reuse a previously captured burn proof instead of burning again.
    #[arg(long)]
    pub burn_tx_hash: Option<String>,

    #[command(flatten)]
    pub config: ConfigArg,
}

/// Arguments for `certificate`.
#[derive(Args, Debug)]
pub struct CertificateArgs {
    /// Output image path; `.jpg`/`.jpeg` saves JPEG, anything else PNG.
    #[arg(long, default_value = "VOLTREC_REC.png")]
    pub output: PathBuf,

    /// Facility screenshot to embed. Falls back to the config's
    /// `image_path`.
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Production figure displayed on the certificate.
    #[arg(long, default_value = "1000")]
    pub kwh: Decimal,

    /// Burn transaction hash for the proof QR.
    #[arg(long)]
    pub burn_tx_hash: Option<String>,

    /// Token ID printed in the footer.
    #[arg(long)]
    pub nft_id: Option<String>,

    /// Wallet sign URL for the payment QR; without it the QR carries a
    /// plain pay-to reference.
    #[arg(long)]
    pub sign_url: Option<String>,

    #[command(flatten)]
    pub config: ConfigArg,
}

/// Arguments for `deeplink`.
#[derive(Args, Debug)]
pub struct DeeplinkArgs {
    /// Destination address of the payment.
    #[arg(long)]
    pub destination: String,

    /// Amount in drops.
    #[arg(long)]
    pub drops: String,

    /// Signing account. Left empty, the wallet fills in the signer's
    /// own address.
    #[arg(long, default_value = "")]
    pub account: String,

    /// Memo text attached to the sign request.
    #[arg(long)]
    pub memo: Option<String>,
}

/// Arguments for `bridge`.
#[derive(Args, Debug)]
pub struct BridgeArgs {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "VOLTREC_BRIDGE_PORT", default_value_t = 5000)]
    pub port: u16,
}

/// Shared `--config` flag.
#[derive(Args, Debug)]
pub struct ConfigArg {
    /// Path to the YAML configuration file.
    #[arg(long, short = 'c', env = "VOLTREC_CONFIG", default_value = "config.yaml")]
    pub config: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        VoltrecCli::command().debug_assert();
    }

    #[test]
    fn flow_parses_with_overrides() {
        let cli = VoltrecCli::parse_from([
            "voltrec",
            "flow",
            "--kwh",
            "1234.5",
            "--price-drops",
            "270000000",
            "--burn-tx-hash",
            "ABC",
        ]);
        match cli.command {
            Commands::Flow(args) => {
                assert_eq!(args.kwh.to_string(), "1234.5");
                assert_eq!(args.price_drops.as_deref(), Some("270000000"));
                assert_eq!(args.burn_tx_hash.as_deref(), Some("ABC"));
                assert_eq!(args.config.config, PathBuf::from("config.yaml"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn market_create_sell_defaults_to_minter_and_zero_price() {
        let cli =
            VoltrecCli::parse_from(["voltrec", "market", "create-sell", "--nft-id", "NFT123"]);
        match cli.command {
            Commands::Market(MarketCommands::CreateSell(args)) => {
                assert_eq!(args.wallet, WalletRole::Minter);
                assert_eq!(args.drops, "0");
                assert!(args.destination.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
