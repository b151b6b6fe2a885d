//! Integration tests for the nine-step mint flow.
//!
//! A scripted mock gateway stands in for the network. It records every
//! submission and holdings query in one ordered event log, so the tests
//! can assert the pipeline's fixed ordering, its abort-on-failure
//! behavior, and the fixed-amount burn policy without touching a ledger.
//!
//! Each test builds its own config, options, and mock. No shared state.

use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::json;

use voltrec_ledger::config::{CertificateFields, FlowConfig};
use voltrec_ledger::flow::{self, FlowOptions};
use voltrec_ledger::gateway::{Gateway, NftRecord, TxOutcome};
use voltrec_ledger::tx::{Amount, TxEnvelope};
use voltrec_ledger::{LedgerError, Wallet, BLACKHOLE_ADDRESS};

// ---------------------------------------------------------------------------
// Mock gateway
// ---------------------------------------------------------------------------

/// One observed interaction with the ledger, in submission order.
#[derive(Debug, Clone)]
enum Event {
    Tx(TxEnvelope),
    NftQuery(String),
}

#[derive(Default)]
struct MockGateway {
    events: Mutex<Vec<Event>>,
    /// Reject the burn payment (destination = blackhole) when set.
    fail_burn: bool,
    /// Whether the holdings scan should find the minted NFT.
    nft_indexed: bool,
    /// Omit the offer index from offer-creation results when set.
    omit_offer_index: bool,
    /// URI of the most recent mint, echoed back by the holdings scan.
    minted_uri: Mutex<Option<String>>,
}

impl MockGateway {
    fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn submitted(&self) -> Vec<TxEnvelope> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Tx(tx) => Some(tx),
                Event::NftQuery(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn submit_and_wait(
        &self,
        tx: &TxEnvelope,
        _wallet: &Wallet,
    ) -> Result<TxOutcome, LedgerError> {
        let is_burn = matches!(
            tx,
            TxEnvelope::Payment { destination, .. } if destination == BLACKHOLE_ADDRESS
        );
        if self.fail_burn && is_burn {
            return Err(LedgerError::Submission {
                engine_result: "tecPATH_DRY".into(),
                message: "Path could not send partial amount.".into(),
            });
        }

        if let TxEnvelope::NFTokenMint { uri, .. } = tx {
            *self.minted_uri.lock().unwrap() = Some(uri.clone());
        }

        let mut events = self.events.lock().unwrap();
        events.push(Event::Tx(tx.clone()));
        let seq = events.len();

        let offer_with_index =
            matches!(tx, TxEnvelope::NFTokenCreateOffer { .. }) && !self.omit_offer_index;
        let result = if offer_with_index {
            json!({ "validated": true, "offer_id": format!("OFFER-{seq}") })
        } else {
            json!({ "validated": true })
        };

        Ok(TxOutcome {
            hash: format!("HASH-{seq}"),
            engine_result: "tesSUCCESS".into(),
            result,
        })
    }

    async fn account_nfts(&self, account: &str) -> Result<Vec<NftRecord>, LedgerError> {
        self.events
            .lock()
            .unwrap()
            .push(Event::NftQuery(account.to_string()));
        if !self.nft_indexed {
            return Ok(vec![]);
        }
        let uri = self.minted_uri.lock().unwrap().clone();
        Ok(vec![
            // An unrelated holding first, to prove the scan matches on URI.
            serde_json::from_value(json!({"NFTokenID": "000800OTHER", "URI": "6f74686572"}))
                .unwrap(),
            NftRecord {
                nftoken_id: "000813FRESH".into(),
                uri,
            },
        ])
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn wallet(tag: &str) -> Wallet {
    Wallet::new(format!("r{tag}"), format!("s{tag}"))
}

fn config() -> FlowConfig {
    FlowConfig {
        issuer: wallet("Issuer"),
        hot: wallet("Hot"),
        system_owner: wallet("Owner"),
        nft_buyer: wallet("Buyer"),
        nft_minter: wallet("Minter"),
        currency_code: "WATT".into(),
        image_path: None,
        price_usd: None,
        price_xrp_drops: None,
        certificate: CertificateFields {
            jurisdiction: Some("US-NJ".into()),
            program: Some("NJ-SREC".into()),
            vintage: Some("2026".into()),
            ..Default::default()
        },
    }
}

/// Writes a stand-in proof image and returns its path plus the guard
/// keeping it alive.
fn proof_image() -> (tempfile::NamedTempFile, PathBuf) {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"screenshot-bytes").unwrap();
    let path = file.path().to_path_buf();
    (file, path)
}

fn options(image: PathBuf) -> FlowOptions {
    FlowOptions {
        kwh: Decimal::from_str("8.19").unwrap(),
        image: Some(image),
        price_drops: Some("270000000".into()),
        burn_tx_hash: None,
    }
}

/// Shorthand for asserting a submitted transaction's type and account.
fn summary(tx: &TxEnvelope) -> (String, String) {
    (tx.tx_type().to_string(), tx.account().to_string())
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_flow_submits_in_fixed_order() {
    let gw = MockGateway {
        nft_indexed: true,
        ..Default::default()
    };
    let (_guard, image) = proof_image();
    let report = flow::run(&gw, &config(), options(image)).await.unwrap();

    let got: Vec<(String, String)> = gw.submitted().iter().map(summary).collect();
    let expect = vec![
        // 1. issuer configuration: common tf flags, then one tx per asf.
        ("AccountSet", "rIssuer"),
        ("AccountSet", "rIssuer"),
        ("AccountSet", "rIssuer"),
        // 2. holder configuration.
        ("AccountSet", "rHot"),
        ("AccountSet", "rHot"),
        // 3. trust line + issuer authorization.
        ("TrustSet", "rHot"),
        ("TrustSet", "rIssuer"),
        // 4. issue, 5. transfer, 6. burn.
        ("Payment", "rIssuer"),
        ("Payment", "rHot"),
        ("Payment", "rOwner"),
        // 7-8. mint, then custody transfer.
        ("NFTokenMint", "rMinter"),
        ("NFTokenCreateOffer", "rMinter"),
        ("NFTokenAcceptOffer", "rOwner"),
        // 9. buyer settlement.
        ("Payment", "rBuyer"),
    ];
    let expect: Vec<(String, String)> = expect
        .into_iter()
        .map(|(t, a)| (t.to_string(), a.to_string()))
        .collect();
    assert_eq!(got, expect);

    // The holdings scan sits strictly between mint and offer creation.
    let events = gw.events();
    let mint_pos = events
        .iter()
        .position(|e| matches!(e, Event::Tx(TxEnvelope::NFTokenMint { .. })))
        .unwrap();
    let query_pos = events
        .iter()
        .position(|e| matches!(e, Event::NftQuery(_)))
        .unwrap();
    let offer_pos = events
        .iter()
        .position(|e| matches!(e, Event::Tx(TxEnvelope::NFTokenCreateOffer { .. })))
        .unwrap();
    assert!(mint_pos < query_pos && query_pos < offer_pos);

    assert_eq!(report.nft_id.as_deref(), Some("000813FRESH"));
    assert!(report.burn_proof.is_some());
    assert!(report.payment.is_some());
}

#[tokio::test]
async fn offer_is_zero_price_and_restricted_to_owner() {
    let gw = MockGateway {
        nft_indexed: true,
        ..Default::default()
    };
    let (_guard, image) = proof_image();
    flow::run(&gw, &config(), options(image)).await.unwrap();

    let offer = gw
        .submitted()
        .into_iter()
        .find(|tx| matches!(tx, TxEnvelope::NFTokenCreateOffer { .. }))
        .unwrap();
    match offer {
        TxEnvelope::NFTokenCreateOffer {
            amount,
            destination,
            ..
        } => {
            assert_eq!(amount, Amount::Drops("0".into()));
            assert_eq!(destination.as_deref(), Some("rOwner"));
        }
        _ => unreachable!(),
    }
}

// ---------------------------------------------------------------------------
// Failure propagation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn burn_failure_stops_the_pipeline() {
    let gw = MockGateway {
        fail_burn: true,
        nft_indexed: true,
        ..Default::default()
    };
    let (_guard, image) = proof_image();
    let err = flow::run(&gw, &config(), options(image)).await.unwrap_err();

    // The burn failure is reported as itself, not a generic error.
    match err {
        LedgerError::Submission { engine_result, .. } => {
            assert_eq!(engine_result, "tecPATH_DRY")
        }
        other => panic!("expected Submission, got {other:?}"),
    }

    // Nothing after the burn ran: no mint, no scan, no offers, no payment.
    let events = gw.events();
    assert!(!events.iter().any(|e| matches!(
        e,
        Event::Tx(TxEnvelope::NFTokenMint { .. })
            | Event::Tx(TxEnvelope::NFTokenCreateOffer { .. })
            | Event::Tx(TxEnvelope::NFTokenAcceptOffer { .. })
            | Event::NftQuery(_)
    )));
    let buyer_payments = gw
        .submitted()
        .iter()
        .filter(|tx| tx.account() == "rBuyer")
        .count();
    assert_eq!(buyer_payments, 0);
}

#[tokio::test]
async fn missing_image_fails_before_any_network_call() {
    let gw = MockGateway::default();
    let mut opts = options(PathBuf::from("/no/such/image.jpeg"));
    opts.price_drops = None;
    let err = flow::run(&gw, &config(), opts).await.unwrap_err();
    assert!(matches!(err, LedgerError::ImageRead { .. }));
    assert!(gw.events().is_empty());
}

#[tokio::test]
async fn non_file_image_path_fails_before_any_network_call() {
    // A directory satisfies an existence check but can never be read as
    // an image; it must be rejected before the burn is submitted.
    let gw = MockGateway::default();
    let dir = tempfile::tempdir().unwrap();
    let err = flow::run(&gw, &config(), options(dir.path().to_path_buf()))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::ImageRead { .. }));
    assert!(gw.events().is_empty());
}

#[tokio::test]
async fn missing_offer_index_fails_closed() {
    let gw = MockGateway {
        nft_indexed: true,
        omit_offer_index: true,
        ..Default::default()
    };
    let (_guard, image) = proof_image();
    let err = flow::run(&gw, &config(), options(image)).await.unwrap_err();
    assert!(matches!(err, LedgerError::OfferIndexMissing { .. }));

    // The accept must never have been submitted with a guessed index.
    assert!(!gw
        .submitted()
        .iter()
        .any(|tx| matches!(tx, TxEnvelope::NFTokenAcceptOffer { .. })));
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn burn_amount_is_fixed_regardless_of_kwh() {
    let gw = MockGateway {
        nft_indexed: true,
        ..Default::default()
    };
    let (_guard, image) = proof_image();
    let mut opts = options(image);
    opts.kwh = Decimal::from_str("123456.789").unwrap();
    flow::run(&gw, &config(), opts).await.unwrap();

    let burn = gw
        .submitted()
        .into_iter()
        .find_map(|tx| match tx {
            TxEnvelope::Payment {
                amount: Amount::Issued(issued),
                destination,
                ..
            } if destination == BLACKHOLE_ADDRESS => Some(issued),
            _ => None,
        })
        .expect("burn payment submitted");
    assert_eq!(burn.value, "1000");

    // While the issuance carries the full-precision kWh string.
    let issued = gw
        .submitted()
        .into_iter()
        .find_map(|tx| match tx {
            TxEnvelope::Payment {
                account,
                amount: Amount::Issued(issued),
                ..
            } if account == "rIssuer" => Some(issued),
            _ => None,
        })
        .unwrap();
    assert_eq!(issued.value, "123456.789");
}

#[tokio::test]
async fn supplied_burn_hash_skips_the_burn() {
    let gw = MockGateway {
        nft_indexed: true,
        ..Default::default()
    };
    let (_guard, image) = proof_image();
    let mut opts = options(image);
    opts.burn_tx_hash = Some("PRIORBURN".into());
    let report = flow::run(&gw, &config(), opts).await.unwrap();

    assert_eq!(report.burn_proof.as_deref(), Some("PRIORBURN"));
    assert!(!gw.submitted().iter().any(|tx| matches!(
        tx,
        TxEnvelope::Payment { destination, .. } if destination == BLACKHOLE_ADDRESS
    )));
}

// ---------------------------------------------------------------------------
// Optional steps
// ---------------------------------------------------------------------------

#[tokio::test]
async fn locate_miss_skips_custody_transfer_without_error() {
    let gw = MockGateway {
        nft_indexed: false,
        ..Default::default()
    };
    let (_guard, image) = proof_image();
    let report = flow::run(&gw, &config(), options(image)).await.unwrap();

    assert!(report.nft_id.is_none());
    assert!(report.offer_create.is_none());
    assert!(!gw
        .submitted()
        .iter()
        .any(|tx| matches!(tx, TxEnvelope::NFTokenCreateOffer { .. })));
    // Settlement still runs: the price was supplied.
    assert!(report.payment.is_some());
}

#[tokio::test]
async fn absent_price_skips_settlement_without_error() {
    let gw = MockGateway {
        nft_indexed: true,
        ..Default::default()
    };
    let (_guard, image) = proof_image();
    let mut opts = options(image);
    opts.price_drops = None;
    let report = flow::run(&gw, &config(), opts).await.unwrap();

    assert!(report.payment.is_none());
    assert!(!gw.submitted().iter().any(|tx| tx.account() == "rBuyer"));
}

#[tokio::test]
async fn config_price_is_used_when_no_override_given() {
    let gw = MockGateway {
        nft_indexed: true,
        ..Default::default()
    };
    let (_guard, image) = proof_image();
    let mut cfg = config();
    cfg.price_xrp_drops = Some("99000000".into());
    let mut opts = options(image);
    opts.price_drops = None;
    let report = flow::run(&gw, &cfg, opts).await.unwrap();

    assert!(report.payment.is_some());
    let settle = gw
        .submitted()
        .into_iter()
        .find(|tx| tx.account() == "rBuyer")
        .unwrap();
    match settle {
        TxEnvelope::Payment { amount, .. } => assert_eq!(amount, Amount::Drops("99000000".into())),
        _ => unreachable!(),
    }
}
