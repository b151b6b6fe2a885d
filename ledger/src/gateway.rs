//! Ledger gateway: JSON-RPC submission with a blocking wait for finality.
//!
//! The gateway is the single seam between this crate and the network. It is
//! a trait so the flow orchestrator can run against a scripted mock in
//! tests; the real implementation speaks JSON-RPC over HTTPS to the
//! testnet.
//!
//! ## Reliable submission
//!
//! [`JsonRpcGateway::submit_and_wait`] is the only way a transaction leaves
//! this process, and it does not return until the network reports a final
//! outcome:
//!
//! 1. `submit` in sign-and-submit mode (`secret` + `tx_json`). The server
//!    autofills fee/sequence, signs, and returns a preliminary engine
//!    result. Anything other than success-or-queued fails immediately.
//! 2. Poll `tx` by hash until the response carries `"validated": true`,
//!    with a bounded number of attempts. "Not yet returned" and "failed"
//!    are distinct states: exhausting the polling window yields
//!    [`LedgerError::NotValidated`], never a fabricated success.
//! 3. Check the final `meta.TransactionResult` of the validated record.
//!    A transaction can pass the preliminary check and still fail at
//!    ledger close (e.g. `tecPATH_DRY`); only `tesSUCCESS` here counts,
//!    anything else fails with [`LedgerError::Submission`].
//!
//! There is no fire-and-forget path, no parallel submission, and no retry:
//! a failed run is re-run by the operator.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::LedgerError;
use crate::tx::TxEnvelope;
use crate::wallet::Wallet;

/// Poll the `tx` method at most this many times before declaring the
/// outcome unknown.
const VALIDATION_POLL_ATTEMPTS: u32 = 30;

/// Delay between validation polls. Testnet ledgers close every 3-4s, so
/// one second keeps latency low without hammering the public endpoint.
const VALIDATION_POLL_DELAY: Duration = Duration::from_secs(1);

/// Per-request HTTP timeout.
const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// Final, validated outcome of one submitted transaction.
#[derive(Debug, Clone)]
pub struct TxOutcome {
    /// Network-assigned transaction hash. Unique; used downstream as a
    /// proof reference.
    pub hash: String,
    /// Preliminary engine result at submission time (e.g. `tesSUCCESS`).
    pub engine_result: String,
    /// The full validated transaction record, including `meta`.
    pub result: Value,
}

/// One NFT as reported by the `account_nfts` query.
#[derive(Debug, Clone, Deserialize)]
pub struct NftRecord {
    /// Network-assigned token ID.
    #[serde(rename = "NFTokenID", alias = "nft_id")]
    pub nftoken_id: String,
    /// Hex-encoded metadata URI, if one was attached at mint.
    #[serde(rename = "URI", default)]
    pub uri: Option<String>,
}

// ---------------------------------------------------------------------------
// Gateway trait
// ---------------------------------------------------------------------------

/// Submission and query surface of the ledger network.
///
/// Every component in this crate goes through this trait, which is what
/// makes the nine-step flow testable without a network.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Signs and submits `tx` from `wallet`, blocking until the network
    /// reports a final validated outcome.
    async fn submit_and_wait(
        &self,
        tx: &TxEnvelope,
        wallet: &Wallet,
    ) -> Result<TxOutcome, LedgerError>;

    /// Returns the account's current NFT holdings, one page as reported
    /// by the network.
    async fn account_nfts(&self, account: &str) -> Result<Vec<NftRecord>, LedgerError>;
}

// ---------------------------------------------------------------------------
// JSON-RPC implementation
// ---------------------------------------------------------------------------

/// [`Gateway`] implementation over the ledger's public JSON-RPC interface.
pub struct JsonRpcGateway {
    http: reqwest::Client,
    url: String,
}

impl JsonRpcGateway {
    /// Connects to the given JSON-RPC endpoint (see [`crate::TESTNET_URL`]).
    pub fn new(url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            // Builder only fails on TLS backend misconfiguration, which is
            // a build-environment defect, not a runtime input.
            .unwrap_or_default();
        Self {
            http,
            url: url.into(),
        }
    }

    /// Issues one JSON-RPC call and unwraps the `result` object.
    async fn call(&self, method: &str, params: Value) -> Result<Value, LedgerError> {
        let body = json!({ "method": method, "params": [params] });
        let resp = self.http.post(&self.url).json(&body).send().await?;
        let envelope: Value = resp.json().await?;
        let result = envelope
            .get("result")
            .cloned()
            .ok_or_else(|| LedgerError::MalformedResponse {
                context: format!("no 'result' object in '{method}' response"),
            })?;
        if result.get("status").and_then(Value::as_str) == Some("error") {
            let message = result
                .get("error_message")
                .or_else(|| result.get("error"))
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(LedgerError::Rpc {
                method: method.to_string(),
                message,
            });
        }
        Ok(result)
    }

    /// Polls the `tx` method until the transaction is validated.
    async fn wait_validated(&self, hash: &str) -> Result<Value, LedgerError> {
        for _ in 0..VALIDATION_POLL_ATTEMPTS {
            match self
                .call("tx", json!({ "transaction": hash, "binary": false }))
                .await
            {
                Ok(result) if is_validated(&result) => return Ok(result),
                // Not yet in a validated ledger, or not yet indexed at all.
                Ok(_) | Err(LedgerError::Rpc { .. }) => {}
                Err(other) => return Err(other),
            }
            tokio::time::sleep(VALIDATION_POLL_DELAY).await;
        }
        Err(LedgerError::NotValidated {
            hash: hash.to_string(),
            attempts: VALIDATION_POLL_ATTEMPTS,
        })
    }
}

#[async_trait]
impl Gateway for JsonRpcGateway {
    async fn submit_and_wait(
        &self,
        tx: &TxEnvelope,
        wallet: &Wallet,
    ) -> Result<TxOutcome, LedgerError> {
        let tx_json = serde_json::to_value(tx).map_err(|e| LedgerError::MalformedResponse {
            context: format!("failed to serialize {}: {e}", tx.tx_type()),
        })?;
        let submit_result = self
            .call(
                "submit",
                json!({ "secret": wallet.seed, "tx_json": tx_json }),
            )
            .await?;

        let engine_result = check_preliminary(&submit_result)?;
        let hash = preliminary_hash(&submit_result)?;

        tracing::debug!(
            tx_type = tx.tx_type(),
            account = %wallet.address,
            %hash,
            %engine_result,
            "submitted, awaiting validation"
        );

        let validated = self.wait_validated(&hash).await?;
        check_final(&validated)?;
        Ok(TxOutcome {
            hash,
            engine_result,
            result: validated,
        })
    }

    async fn account_nfts(&self, account: &str) -> Result<Vec<NftRecord>, LedgerError> {
        let result = self
            .call("account_nfts", json!({ "account": account }))
            .await?;
        let nfts = result
            .get("account_nfts")
            .cloned()
            .ok_or_else(|| LedgerError::MalformedResponse {
                context: "no 'account_nfts' array in response".into(),
            })?;
        serde_json::from_value(nfts).map_err(|e| LedgerError::MalformedResponse {
            context: format!("unparseable 'account_nfts' entry: {e}"),
        })
    }
}

// ---------------------------------------------------------------------------
// Response inspection helpers
// ---------------------------------------------------------------------------

/// Accepts the submission's preliminary engine result, failing on anything
/// that is neither applied nor queued.
fn check_preliminary(submit_result: &Value) -> Result<String, LedgerError> {
    let engine_result = submit_result
        .get("engine_result")
        .and_then(Value::as_str)
        .ok_or_else(|| LedgerError::MalformedResponse {
            context: "no 'engine_result' in submit response".into(),
        })?
        .to_string();
    if engine_result == "tesSUCCESS" || engine_result == "terQUEUED" {
        Ok(engine_result)
    } else {
        let message = submit_result
            .get("engine_result_message")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        Err(LedgerError::Submission {
            engine_result,
            message,
        })
    }
}

/// Extracts the transaction hash assigned at submission.
fn preliminary_hash(submit_result: &Value) -> Result<String, LedgerError> {
    submit_result
        .pointer("/tx_json/hash")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| LedgerError::MalformedResponse {
            context: "no 'tx_json.hash' in submit response".into(),
        })
}

/// True once the `tx` response refers to a validated ledger.
fn is_validated(tx_result: &Value) -> bool {
    tx_result.get("validated").and_then(Value::as_bool) == Some(true)
}

/// Accepts a validated record only if its on-ledger result is success.
///
/// Validation alone is not an outcome: a transaction that was queued or
/// provisionally applied can still fail at ledger close with a tec-class
/// code, and its record is then validated exactly like a successful one.
/// A validated record without `meta.TransactionResult` is malformed, not
/// assumed successful.
fn check_final(tx_result: &Value) -> Result<(), LedgerError> {
    let final_result = tx_result
        .pointer("/meta/TransactionResult")
        .and_then(Value::as_str)
        .ok_or_else(|| LedgerError::MalformedResponse {
            context: "no 'meta.TransactionResult' in validated tx record".into(),
        })?;
    if final_result == "tesSUCCESS" {
        Ok(())
    } else {
        Err(LedgerError::Submission {
            engine_result: final_result.to_string(),
            message: "transaction failed at ledger close".into(),
        })
    }
}
