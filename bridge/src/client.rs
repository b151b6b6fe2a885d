//! Signing-platform client.
//!
//! Creates sign payloads via the platform's REST API and extracts a
//! human-followable sign URL from the response. Credentials come from the
//! environment (or explicitly); their absence is detected before any
//! request leaves the process.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::BridgeError;
use crate::{API_KEY_ENV, API_SECRET_ENV, PLATFORM_BASE_URL, SIGN_PAGE_URL};

/// Request timeout against the platform.
const PLATFORM_TIMEOUT: Duration = Duration::from_secs(15);

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Sign links offered by the platform, in rough order of usefulness.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NextLinks {
    #[serde(default)]
    pub web: Option<String>,
    #[serde(default)]
    pub always: Option<String>,
    #[serde(default)]
    pub qr_png: Option<String>,
    #[serde(default)]
    pub app: Option<String>,
}

/// The platform's payload-creation response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayloadResponse {
    /// Payload identifier; enough to construct a sign page link.
    #[serde(default)]
    pub uuid: Option<String>,
    /// Pre-built sign links.
    #[serde(default)]
    pub next: Option<NextLinks>,
}

impl PayloadResponse {
    /// Best-effort sign URL: web link first, then the always-valid link,
    /// the QR image, the app deep link, and finally a sign-page URL
    /// constructed from the payload UUID.
    pub fn sign_url(&self) -> Option<String> {
        if let Some(next) = &self.next {
            for candidate in [&next.web, &next.always, &next.qr_png, &next.app] {
                if let Some(url) = candidate {
                    if !url.is_empty() {
                        return Some(url.clone());
                    }
                }
            }
        }
        self.uuid
            .as_ref()
            .map(|uuid| format!("{SIGN_PAGE_URL}/{uuid}"))
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for the signing platform's payload endpoint.
pub struct SignClient {
    base_url: String,
    api_key: Option<String>,
    api_secret: Option<String>,
    http: reqwest::Client,
}

impl SignClient {
    /// Builds a client with explicit credentials.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        api_secret: Option<String>,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(PLATFORM_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.into(),
            api_key,
            api_secret,
            http,
        }
    }

    /// Builds a client from `VOLTREC_SIGN_API_KEY` / `VOLTREC_SIGN_API_SECRET`.
    pub fn from_env() -> Self {
        Self::new(
            PLATFORM_BASE_URL,
            std::env::var(API_KEY_ENV).ok(),
            std::env::var(API_SECRET_ENV).ok(),
        )
    }

    /// Creates a sign payload for `tx_json` on the platform.
    ///
    /// The payload is created with `submit: false` — the wallet signs,
    /// but submission stays under this toolkit's control.
    ///
    /// # Errors
    ///
    /// [`BridgeError::MissingCredentials`] before any network traffic if
    /// either credential is absent; [`BridgeError::Platform`] on non-2xx.
    pub async fn create_payload(&self, tx_json: &Value) -> Result<PayloadResponse, BridgeError> {
        let (key, secret) = match (&self.api_key, &self.api_secret) {
            (Some(k), Some(s)) if !k.is_empty() && !s.is_empty() => (k, s),
            _ => return Err(BridgeError::MissingCredentials),
        };

        let body = json!({
            "txjson": tx_json,
            "options": { "submit": false },
        });
        let resp = self
            .http
            .post(format!("{}/platform/payload", self.base_url))
            .header("x-api-key", key)
            .header("x-api-secret", secret)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BridgeError::Platform {
                status: status.as_u16(),
                body,
            });
        }
        resp.json::<PayloadResponse>()
            .await
            .map_err(|e| BridgeError::InvalidPayload(e.to_string()))
    }

    /// Client-side fallback: the compact transaction JSON percent-encoded
    /// into a sign-page query parameter. Degraded-mode contract only.
    pub fn fallback_link(tx_json: &Value) -> String {
        let compact = tx_json.to_string();
        let encoded = utf8_percent_encode(&compact, NON_ALPHANUMERIC);
        format!("{SIGN_PAGE_URL}?payload={encoded}")
    }

    /// Platform sign URL if possible; otherwise the fallback link.
    pub async fn deeplink_or_fallback(&self, tx_json: &Value) -> String {
        match self.create_payload(tx_json).await {
            Ok(resp) => match resp.sign_url() {
                Some(url) => url,
                None => {
                    tracing::warn!("platform response carried no sign link; using fallback");
                    Self::fallback_link(tx_json)
                }
            },
            Err(err) => {
                tracing::warn!(%err, "payload creation failed; using client-side fallback link");
                Self::fallback_link(tx_json)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(web: Option<&str>, always: Option<&str>, uuid: Option<&str>) -> PayloadResponse {
        PayloadResponse {
            uuid: uuid.map(str::to_string),
            next: Some(NextLinks {
                web: web.map(str::to_string),
                always: always.map(str::to_string),
                qr_png: None,
                app: None,
            }),
        }
    }

    #[test]
    fn sign_url_prefers_web_link() {
        let resp = links(Some("https://w"), Some("https://a"), Some("u-1"));
        assert_eq!(resp.sign_url().unwrap(), "https://w");
    }

    #[test]
    fn sign_url_falls_through_to_always_then_uuid() {
        let resp = links(None, Some("https://a"), Some("u-1"));
        assert_eq!(resp.sign_url().unwrap(), "https://a");

        let resp = links(None, None, Some("u-1"));
        assert_eq!(resp.sign_url().unwrap(), format!("{SIGN_PAGE_URL}/u-1"));
    }

    #[test]
    fn sign_url_none_when_response_is_empty() {
        assert!(PayloadResponse::default().sign_url().is_none());
    }

    #[test]
    fn fallback_link_embeds_encoded_tx() {
        let tx = json!({"TransactionType": "Payment", "Amount": "10"});
        let link = SignClient::fallback_link(&tx);
        assert!(link.starts_with(&format!("{SIGN_PAGE_URL}?payload=")));
        // Braces and quotes must not survive unencoded.
        assert!(!link.contains('{'));
        assert!(!link.contains('"'));
        assert!(link.contains("Payment"));
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_any_request() {
        let client = SignClient::new("http://127.0.0.1:1", None, None);
        let err = client.create_payload(&json!({})).await.unwrap_err();
        assert!(matches!(err, BridgeError::MissingCredentials));
    }

    #[tokio::test]
    async fn fallback_engages_when_platform_unreachable() {
        // Credentials present but the endpoint is unroutable: the helper
        // must degrade to the client-side link instead of erroring.
        let client = SignClient::new(
            "http://127.0.0.1:1",
            Some("key".into()),
            Some("secret".into()),
        );
        let tx = json!({"TransactionType": "Payment"});
        let link = client.deeplink_or_fallback(&tx).await;
        assert!(link.starts_with(SIGN_PAGE_URL));
        assert!(link.contains("payload="));
    }
}
