//! Remote service invocation
//!
//! Issues exactly one request per submission to the background-removal
//! endpoint and maps its outcome onto workflow transitions. The service is
//! an opaque request/response boundary behind [`RemovalService`], so tests
//! and alternative transports plug in without touching the state machine.

use crate::config::ClientConfig;
use crate::error::{BgStripError, Result};
use crate::types::EncodedPayload;
use crate::workflow::Workflow;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Request body sent to the removal endpoint
#[derive(Debug, Serialize)]
struct RemovalRequest<'a> {
    /// Data-URI encoded image payload
    image: &'a str,
}

/// Response shapes the service may return.
///
/// The error shape is tried first: a response carrying both fields is a
/// declared failure.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RemovalResponse {
    /// Service-declared failure
    Failure {
        /// Error message to surface verbatim
        error: String,
    },
    /// Successful removal
    Success {
        /// Reference to the processed output image
        output: String,
    },
}

/// One-shot background removal call against an opaque remote service
#[async_trait]
pub trait RemovalService: Send + Sync {
    /// Submit the encoded payload and await the result reference.
    ///
    /// # Errors
    /// - [`BgStripError::Service`] for a service-declared failure
    /// - [`BgStripError::Transport`] for network failures or responses
    ///   that do not match the expected schema
    async fn remove_background(&self, payload: &EncodedPayload) -> Result<String>;
}

/// HTTP implementation of [`RemovalService`]
#[derive(Debug)]
pub struct HttpRemovalService {
    client: Client,
    endpoint: reqwest::Url,
}

impl HttpRemovalService {
    /// Create a service client from the workflow configuration
    ///
    /// # Errors
    /// - Endpoint does not parse as a URL
    /// - HTTP client construction fails
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let endpoint = reqwest::Url::parse(&config.endpoint).map_err(|e| {
            BgStripError::invalid_config(format!("invalid endpoint '{}': {}", config.endpoint, e))
        })?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BgStripError::network_error("Failed to create HTTP client", &e))?;

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl RemovalService for HttpRemovalService {
    async fn remove_background(&self, payload: &EncodedPayload) -> Result<String> {
        debug!(endpoint = %self.endpoint, "dispatching removal request");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&RemovalRequest {
                image: payload.as_str(),
            })
            .send()
            .await
            .map_err(|e| BgStripError::network_error("Removal request failed", &e))?;

        // The service reports failures in the body, not the status line,
        // so the body is parsed regardless of the status code.
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BgStripError::network_error("Failed to read response body", &e))?;

        match serde_json::from_str::<RemovalResponse>(&body) {
            Ok(RemovalResponse::Success { output }) => {
                debug!("removal request succeeded");
                Ok(output)
            },
            Ok(RemovalResponse::Failure { error }) => {
                warn!(%error, "service declared a failure");
                Err(BgStripError::service(error))
            },
            Err(e) => {
                warn!(%status, %e, "unparseable response from removal service");
                Err(BgStripError::transport(format!(
                    "unexpected response (status {status}): {e}"
                )))
            },
        }
    }
}

/// Drive one full submission: begin, invoke, and record the outcome.
///
/// Errors from the service are folded into the workflow as the user-facing
/// message ([`BgStripError::user_message`]); the in-flight flag is cleared
/// in every terminal case. The returned error mirrors what was recorded so
/// library callers can branch without re-reading the workflow.
///
/// # Errors
/// - [`BgStripError::InvalidState`] when the workflow refuses to submit
/// - The service's error when the request does not succeed
pub async fn submit(workflow: &mut Workflow, service: &dyn RemovalService) -> Result<String> {
    let (id, payload) = workflow.begin_submission()?;
    match service.remove_background(&payload).await {
        Ok(reference) => {
            workflow.complete_submission(id, Ok(reference.clone()));
            Ok(reference)
        },
        Err(err) => {
            workflow.complete_submission(id, Err(err.user_message()));
            Err(err)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_has_single_image_field() {
        let request = RemovalRequest {
            image: "data:image/png;base64,AAAA",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "image": "data:image/png;base64,AAAA" })
        );
    }

    #[test]
    fn parses_success_response() {
        let parsed: RemovalResponse =
            serde_json::from_str(r#"{"output":"https://x.test/result.png"}"#).unwrap();
        assert!(matches!(
            parsed,
            RemovalResponse::Success { output } if output == "https://x.test/result.png"
        ));
    }

    #[test]
    fn parses_declared_failure() {
        let parsed: RemovalResponse =
            serde_json::from_str(r#"{"error":"model overloaded"}"#).unwrap();
        assert!(matches!(
            parsed,
            RemovalResponse::Failure { error } if error == "model overloaded"
        ));
    }

    #[test]
    fn failure_wins_when_both_fields_present() {
        let parsed: RemovalResponse =
            serde_json::from_str(r#"{"error":"broken","output":"ref"}"#).unwrap();
        assert!(matches!(parsed, RemovalResponse::Failure { .. }));
    }

    #[test]
    fn unexpected_shape_does_not_parse() {
        assert!(serde_json::from_str::<RemovalResponse>(r#"{"status":"ok"}"#).is_err());
        assert!(serde_json::from_str::<RemovalResponse>("[1,2,3]").is_err());
    }
}
