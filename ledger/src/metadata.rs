//! NFT metadata: burn proof, compliance fields, and an inline image,
//! encoded as a hex data URI for attachment to a mint.
//!
//! The document embeds the proof image as inline base64 rather than an
//! external content address — the URI payload grows with the image, which
//! is the accepted tradeoff for a certificate that stays verifiable with
//! nothing but the ledger.
//!
//! Encoding is a pure function of (config fields, burn hash, image bytes):
//! struct field order fixes the JSON key order, serialization is compact,
//! and there is no timestamp or entropy anywhere. Identical inputs yield
//! byte-identical output.
//!
//! Pipeline: JSON document → base64 → `data:application/json;base64,...`
//! → lowercase hex. Decoding the hex back to UTF-8 and base64-decoding
//! the URI body reproduces the exact JSON.

use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::CertificateFields;
use crate::error::LedgerError;
use crate::flow::BURN_AMOUNT;
use crate::nft::TRANSFER_FEE_BPS;
use crate::EXPLORER_TX_URL;

/// Schema identifier stamped into every metadata document.
pub const METADATA_SCHEMA: &str = "https://schema.voltrec.energy/rec-nft-metadata.json#";

/// Schema version used when the config does not pin one.
const DEFAULT_SCHEMA_VERSION: &str = "1.0";

// ---------------------------------------------------------------------------
// Document structure
// ---------------------------------------------------------------------------

/// Facility block: where the energy was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub name: Option<String>,
    pub location: Option<String>,
    pub grid_region: Option<String>,
    pub technology: String,
}

/// Meter block: how production was measured and attested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meter {
    pub meter_hash: Option<String>,
    pub oracle_reference: Option<String>,
}

/// Burn-proof block: the on-ledger evidence backing this certificate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnProof {
    /// Validated hash of the burn transaction.
    pub tx_hash: String,
    /// Explorer deep link for human verification.
    pub explorer: String,
    /// Always the fixed policy amount; see [`BURN_AMOUNT`].
    pub amount_burned: String,
    pub currency: String,
}

/// One display attribute in the conventional trait_type/value shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: Value,
}

/// The complete metadata document attached to a certificate NFT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecMetadata {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub schema_version: String,
    pub jurisdiction: Option<String>,
    pub program: Option<String>,
    pub vintage: Option<String>,
    pub vintage_start: Option<String>,
    pub vintage_end: Option<String>,
    pub facility: Facility,
    pub meter: Meter,
    pub burn_proof: BurnProof,
    pub attributes: Vec<Attribute>,
    /// Inline `data:image/jpeg;base64,...` payload.
    pub image: String,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Reads the proof image and returns its raw base64 (no data-URI prefix).
///
/// # Errors
///
/// [`LedgerError::ImageRead`] if the path does not exist or is unreadable.
/// This is checked before any mint submission occurs.
pub fn read_image_base64(path: &Path) -> Result<String, LedgerError> {
    let bytes = std::fs::read(path).map_err(|source| LedgerError::ImageRead {
        path: path.display().to_string(),
        source,
    })?;
    Ok(BASE64.encode(bytes))
}

/// Assembles the metadata document from validated config fields, the burn
/// proof, and the already-encoded image.
pub fn build_document(
    fields: &CertificateFields,
    currency: &str,
    burn_tx_hash: &str,
    image_b64: &str,
) -> RecMetadata {
    RecMetadata {
        schema: METADATA_SCHEMA.to_string(),
        schema_version: fields
            .schema_version
            .clone()
            .unwrap_or_else(|| DEFAULT_SCHEMA_VERSION.to_string()),
        jurisdiction: fields.jurisdiction.clone(),
        program: fields.program.clone(),
        vintage: fields.vintage.clone(),
        vintage_start: fields.vintage_start.clone(),
        vintage_end: fields.vintage_end.clone(),
        facility: Facility {
            name: fields.facility_name.clone(),
            location: fields.facility_location.clone(),
            grid_region: fields.grid_region.clone(),
            technology: fields
                .technology
                .clone()
                .unwrap_or_else(|| "Solar PV".to_string()),
        },
        meter: Meter {
            meter_hash: fields.meter_hash.clone(),
            oracle_reference: fields.oracle_reference.clone(),
        },
        burn_proof: BurnProof {
            tx_hash: burn_tx_hash.to_string(),
            explorer: format!("{EXPLORER_TX_URL}{burn_tx_hash}"),
            amount_burned: BURN_AMOUNT.to_string(),
            currency: currency.to_string(),
        },
        attributes: vec![
            Attribute {
                trait_type: "REC Serial Prefix".to_string(),
                value: fields
                    .rec_serial_prefix
                    .clone()
                    .map(Value::String)
                    .unwrap_or(Value::Null),
            },
            Attribute {
                trait_type: "Transfer Fee (bps)".to_string(),
                value: Value::from(TRANSFER_FEE_BPS),
            },
            Attribute {
                trait_type: "Flags".to_string(),
                value: Value::from(vec!["Transferable", "Burnable"]),
            },
        ],
        image: format!("data:image/jpeg;base64,{image_b64}"),
    }
}

/// Encodes a document as the hex data URI the mint transaction carries.
pub fn encode_document(doc: &RecMetadata) -> String {
    // serde_json::to_string on a struct cannot fail.
    let json = serde_json::to_string(doc).unwrap_or_default();
    let data_uri = format!("data:application/json;base64,{}", BASE64.encode(json));
    hex::encode(data_uri)
}

/// Full pipeline: image read → document → hex data URI.
///
/// The synchronous dependency is structural: the burn hash is a parameter,
/// so metadata can only exist after the burn outcome is known.
pub fn build_metadata(
    fields: &CertificateFields,
    currency: &str,
    burn_tx_hash: &str,
    image_path: &Path,
) -> Result<String, LedgerError> {
    let image_b64 = read_image_base64(image_path)?;
    let doc = build_document(fields, currency, burn_tx_hash, &image_b64);
    Ok(encode_document(&doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fields() -> CertificateFields {
        CertificateFields {
            jurisdiction: Some("US-NJ".into()),
            program: Some("NJ-SREC".into()),
            vintage: Some("2026".into()),
            meter_hash: Some("abc123".into()),
            rec_serial_prefix: Some("VREC-NJ".into()),
            ..Default::default()
        }
    }

    #[test]
    fn encoding_is_deterministic() {
        let a = encode_document(&build_document(&fields(), "WATT", "HASH1", "aW1n"));
        let b = encode_document(&build_document(&fields(), "WATT", "HASH1", "aW1n"));
        assert_eq!(a, b);
    }

    #[test]
    fn hex_round_trips_to_original_json() {
        let doc = build_document(&fields(), "WATT", "HASH1", "aW1n");
        let uri_hex = encode_document(&doc);

        let uri = String::from_utf8(hex::decode(uri_hex).unwrap()).unwrap();
        let b64 = uri
            .strip_prefix("data:application/json;base64,")
            .expect("data URI prefix");
        let json = BASE64.decode(b64).unwrap();
        let decoded: RecMetadata = serde_json::from_slice(&json).unwrap();
        assert_eq!(decoded, doc);
    }

    #[test]
    fn document_embeds_burn_proof_and_fixed_amount() {
        let doc = build_document(&fields(), "WATT", "DEADBEEF", "aW1n");
        assert_eq!(doc.burn_proof.tx_hash, "DEADBEEF");
        assert_eq!(doc.burn_proof.amount_burned, "1000");
        assert!(doc.burn_proof.explorer.ends_with("/DEADBEEF"));
        assert!(doc.image.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn absent_optional_fields_serialize_as_null() {
        let doc = build_document(&CertificateFields::default(), "WATT", "H", "x");
        let v = serde_json::to_value(&doc).unwrap();
        assert!(v["jurisdiction"].is_null());
        assert_eq!(v["facility"]["technology"], "Solar PV");
        assert_eq!(v["$schema"], METADATA_SCHEMA);
    }

    #[test]
    fn missing_image_fails_before_any_submission() {
        let err = build_metadata(&fields(), "WATT", "H", Path::new("/nope/img.jpeg")).unwrap_err();
        assert!(matches!(err, LedgerError::ImageRead { .. }));
    }

    #[test]
    fn image_bytes_reach_the_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"img-bytes").unwrap();
        let uri_hex = build_metadata(&fields(), "WATT", "H", file.path()).unwrap();
        let uri = String::from_utf8(hex::decode(uri_hex).unwrap()).unwrap();
        let json = BASE64
            .decode(uri.strip_prefix("data:application/json;base64,").unwrap())
            .unwrap();
        let doc: RecMetadata = serde_json::from_slice(&json).unwrap();
        let embedded = doc.image.strip_prefix("data:image/jpeg;base64,").unwrap();
        assert_eq!(BASE64.decode(embedded).unwrap(), b"img-bytes");
    }
}
