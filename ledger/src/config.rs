//! Typed configuration, validated once at startup.
//!
//! The original operational surface is a flat `config.yaml` holding account
//! seeds/addresses, the token currency code, pricing, and certificate
//! fields. Every script consumed it as an untyped mapping and discovered
//! missing keys deep inside the flow; here the document deserializes into
//! optionals and a single eager [`RawConfig::validate`] pass reports every
//! missing required key at once, before any network call.
//!
//! Seeds are secrets. [`FlowConfig`] implements `Debug` manually so a log
//! line can never leak one.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::LedgerError;
use crate::wallet::Wallet;

/// Raw, fully-optional mirror of the YAML document. Field names match the
/// config keys the operators already have on disk.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    pub issuer_address: Option<String>,
    pub issuer_seed: Option<String>,
    pub hot_address: Option<String>,
    pub hot_seed: Option<String>,
    pub system_owner_address: Option<String>,
    pub system_owner_seed: Option<String>,
    pub nft_buyer_address: Option<String>,
    pub nft_buyer_seed: Option<String>,
    pub nft_minter_address: Option<String>,
    pub nft_minter_seed: Option<String>,
    pub currency_code: Option<String>,

    pub image_path: Option<String>,
    pub price_usd: Option<String>,
    pub price_xrp_drops: Option<String>,

    pub schema_version: Option<String>,
    pub jurisdiction: Option<String>,
    pub program: Option<String>,
    pub vintage: Option<String>,
    pub vintage_start: Option<String>,
    pub vintage_end: Option<String>,
    pub facility_name: Option<String>,
    pub facility_location: Option<String>,
    pub grid_region: Option<String>,
    pub technology: Option<String>,
    pub meter_hash: Option<String>,
    pub oracle_reference: Option<String>,
    pub rec_serial_prefix: Option<String>,
}

/// Certificate and compliance fields carried into NFT metadata and the
/// rendered certificate. All optional; absent fields serialize as null or
/// are omitted from the layout.
#[derive(Debug, Clone, Default)]
pub struct CertificateFields {
    pub schema_version: Option<String>,
    pub jurisdiction: Option<String>,
    pub program: Option<String>,
    pub vintage: Option<String>,
    pub vintage_start: Option<String>,
    pub vintage_end: Option<String>,
    pub facility_name: Option<String>,
    pub facility_location: Option<String>,
    pub grid_region: Option<String>,
    pub technology: Option<String>,
    pub meter_hash: Option<String>,
    pub oracle_reference: Option<String>,
    pub rec_serial_prefix: Option<String>,
}

/// Immutable, validated configuration for one run.
///
/// Constructed only through [`FlowConfig::load`] (or [`RawConfig::validate`]
/// in tests), so holding a `FlowConfig` is proof that every required key
/// was present.
#[derive(Clone)]
pub struct FlowConfig {
    /// Cold wallet that issues the energy-credit token.
    pub issuer: Wallet,
    /// Hot wallet that first receives issued tokens.
    pub hot: Wallet,
    /// System owner: receives tokens, performs the burn, ends up holding
    /// the NFT.
    pub system_owner: Wallet,
    /// Buyer paying for the certificate NFT.
    pub nft_buyer: Wallet,
    /// Dedicated minter account the NFT originates from.
    pub nft_minter: Wallet,
    /// Currency code of the energy-credit token (3-char or 20-byte hex).
    pub currency_code: String,
    /// Default proof image, overridable per invocation.
    pub image_path: Option<String>,
    /// Display price in USD for the certificate layout.
    pub price_usd: Option<String>,
    /// Sale price in drops; absent means the payment step is skipped.
    pub price_xrp_drops: Option<String>,
    /// Compliance metadata for the NFT and the certificate image.
    pub certificate: CertificateFields,
}

impl fmt::Debug for FlowConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowConfig")
            .field("issuer", &self.issuer)
            .field("hot", &self.hot)
            .field("system_owner", &self.system_owner)
            .field("nft_buyer", &self.nft_buyer)
            .field("nft_minter", &self.nft_minter)
            .field("currency_code", &self.currency_code)
            .field("price_xrp_drops", &self.price_xrp_drops)
            .finish_non_exhaustive()
    }
}

impl FlowConfig {
    /// Reads and validates the YAML config at `path`.
    ///
    /// # Errors
    ///
    /// * [`LedgerError::ConfigRead`] if the file cannot be read.
    /// * [`LedgerError::ConfigParse`] if the YAML is malformed.
    /// * [`LedgerError::Config`] listing every missing required key.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LedgerError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LedgerError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        let raw: RawConfig = serde_yaml::from_str(&text)?;
        raw.validate()
    }
}

impl RawConfig {
    /// Promotes the raw document to a [`FlowConfig`], collecting every
    /// missing required key into a single error.
    pub fn validate(self) -> Result<FlowConfig, LedgerError> {
        let mut missing = Vec::new();

        let mut require = |key: &str, value: &Option<String>| -> String {
            match value {
                Some(v) if !v.trim().is_empty() => v.clone(),
                _ => {
                    missing.push(key.to_string());
                    String::new()
                }
            }
        };

        let issuer_address = require("issuer_address", &self.issuer_address);
        let issuer_seed = require("issuer_seed", &self.issuer_seed);
        let hot_address = require("hot_address", &self.hot_address);
        let hot_seed = require("hot_seed", &self.hot_seed);
        let owner_address = require("system_owner_address", &self.system_owner_address);
        let owner_seed = require("system_owner_seed", &self.system_owner_seed);
        let buyer_address = require("nft_buyer_address", &self.nft_buyer_address);
        let buyer_seed = require("nft_buyer_seed", &self.nft_buyer_seed);
        let minter_address = require("nft_minter_address", &self.nft_minter_address);
        let minter_seed = require("nft_minter_seed", &self.nft_minter_seed);
        let currency_code = require("currency_code", &self.currency_code);

        if !missing.is_empty() {
            return Err(LedgerError::Config { missing });
        }

        Ok(FlowConfig {
            issuer: Wallet::new(issuer_address, issuer_seed),
            hot: Wallet::new(hot_address, hot_seed),
            system_owner: Wallet::new(owner_address, owner_seed),
            nft_buyer: Wallet::new(buyer_address, buyer_seed),
            nft_minter: Wallet::new(minter_address, minter_seed),
            currency_code,
            image_path: self.image_path,
            price_usd: self.price_usd,
            price_xrp_drops: self.price_xrp_drops,
            certificate: CertificateFields {
                schema_version: self.schema_version,
                jurisdiction: self.jurisdiction,
                program: self.program,
                vintage: self.vintage,
                vintage_start: self.vintage_start,
                vintage_end: self.vintage_end,
                facility_name: self.facility_name,
                facility_location: self.facility_location,
                grid_region: self.grid_region,
                technology: self.technology,
                meter_hash: self.meter_hash,
                oracle_reference: self.oracle_reference,
                rec_serial_prefix: self.rec_serial_prefix,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn full_yaml() -> String {
        let mut doc = String::new();
        for role in ["issuer", "hot", "system_owner", "nft_buyer", "nft_minter"] {
            doc.push_str(&format!("{role}_address: rAddr{role}\n"));
            doc.push_str(&format!("{role}_seed: sSeed{role}\n"));
        }
        doc.push_str("currency_code: WATT\n");
        doc
    }

    #[test]
    fn valid_config_promotes() {
        let raw: RawConfig = serde_yaml::from_str(&full_yaml()).unwrap();
        let cfg = raw.validate().unwrap();
        assert_eq!(cfg.currency_code, "WATT");
        assert_eq!(cfg.issuer.address, "rAddrissuer");
        assert!(cfg.price_xrp_drops.is_none());
    }

    #[test]
    fn missing_keys_are_collected_in_one_error() {
        let raw: RawConfig =
            serde_yaml::from_str("issuer_address: rIssuer\ncurrency_code: WATT\n").unwrap();
        let err = raw.validate().unwrap_err();
        match err {
            LedgerError::Config { missing } => {
                assert!(missing.contains(&"issuer_seed".to_string()));
                assert!(missing.contains(&"hot_address".to_string()));
                assert!(missing.contains(&"nft_minter_seed".to_string()));
                assert!(!missing.contains(&"issuer_address".to_string()));
                // All nine absent account keys plus nothing else.
                assert_eq!(missing.len(), 9);
            }
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let mut doc = full_yaml();
        doc = doc.replace("currency_code: WATT", "currency_code: \"  \"");
        let raw: RawConfig = serde_yaml::from_str(&doc).unwrap();
        let err = raw.validate().unwrap_err();
        match err {
            LedgerError::Config { missing } => assert_eq!(missing, vec!["currency_code"]),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn optional_fields_pass_through() {
        let mut doc = full_yaml();
        doc.push_str("jurisdiction: US-NJ\nprice_xrp_drops: \"270000000\"\n");
        let raw: RawConfig = serde_yaml::from_str(&doc).unwrap();
        let cfg = raw.validate().unwrap();
        assert_eq!(cfg.certificate.jurisdiction.as_deref(), Some("US-NJ"));
        assert_eq!(cfg.price_xrp_drops.as_deref(), Some("270000000"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = FlowConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, LedgerError::ConfigRead { .. }));
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(full_yaml().as_bytes()).unwrap();
        let cfg = FlowConfig::load(file.path()).unwrap();
        assert_eq!(cfg.hot.address, "rAddrhot");
    }

    #[test]
    fn debug_does_not_leak_seeds() {
        let raw: RawConfig = serde_yaml::from_str(&full_yaml()).unwrap();
        let cfg = raw.validate().unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("sSeed"));
    }
}
