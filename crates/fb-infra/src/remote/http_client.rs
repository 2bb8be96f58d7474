//! HTTP adapter for the remote onboarding service.
//!
//! Step payloads go to `POST {base}/onboarding/steps/{step}`, the completion
//! summary to `POST {base}/onboarding/complete`. Response bodies are ignored
//! apart from error text.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use fb_core::onboarding::StepPayload;
use fb_core::ports::{RemoteError, RemoteOnboardingPort};
use reqwest::StatusCode;
use tracing::debug;

/// Longest error body kept in a [`RemoteError::Rejected`] message.
const MAX_ERROR_BODY: usize = 256;

pub struct HttpRemoteOnboardingClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemoteOnboardingClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build onboarding HTTP client failed")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, payload: &StepPayload) -> String {
        if payload.is_completion() {
            format!("{}/onboarding/complete", self.base_url)
        } else {
            format!(
                "{}/onboarding/steps/{}",
                self.base_url,
                payload.step().number()
            )
        }
    }
}

#[async_trait]
impl RemoteOnboardingPort for HttpRemoteOnboardingClient {
    async fn submit(&self, id_token: &str, payload: &StepPayload) -> Result<(), RemoteError> {
        let url = self.endpoint(payload);
        debug!(%url, kind = payload.kind(), "submitting onboarding payload");

        let response = self
            .client
            .post(&url)
            .bearer_auth(id_token)
            .json(payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_status(status, body))
    }
}

fn map_transport_error(error: reqwest::Error) -> RemoteError {
    if error.is_timeout() {
        RemoteError::Timeout
    } else if let Some(status) = error.status() {
        map_status(status, String::new())
    } else {
        RemoteError::Transport(error.to_string())
    }
}

fn map_status(code: StatusCode, body: String) -> RemoteError {
    let status = code.as_u16();
    match code {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::Unauthorized { status },
        _ if code.is_client_error() => RemoteError::Rejected {
            status,
            message: body.chars().take(MAX_ERROR_BODY).collect(),
        },
        _ => RemoteError::Server { status },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use fb_core::onboarding::{OnboardingStep, RankedSport};
    use mockito::{Matcher, Server};

    fn build_client(base_url: String) -> HttpRemoteOnboardingClient {
        HttpRemoteOnboardingClient::new(base_url, Duration::from_secs(5)).unwrap()
    }

    fn sports_payload() -> StepPayload {
        StepPayload::Sports {
            step: OnboardingStep::Sports,
            sports: vec![RankedSport {
                sport_id: "nfl".into(),
                rank: 1,
            }],
        }
    }

    #[tokio::test]
    async fn step_payload_is_posted_with_bearer_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/onboarding/steps/2")
            .match_header("authorization", "Bearer token-123")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "kind": "sports",
                "step": 2,
                "sports": [{"sportId": "nfl", "rank": 1}]
            })))
            .with_status(204)
            .create_async()
            .await;

        let client = build_client(server.url());
        client.submit("token-123", &sports_payload()).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn completion_goes_to_complete_endpoint() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/onboarding/complete")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "kind": "completion",
                "step": 5,
                "sportIds": ["nfl"],
                "teamIds": ["patriots"]
            })))
            .with_status(200)
            .create_async()
            .await;

        let payload = StepPayload::Completion {
            step: OnboardingStep::Completion,
            completed_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            sport_ids: vec!["nfl".into()],
            team_ids: vec!["patriots".into()],
        };
        let client = build_client(format!("{}/", server.url()));
        client.submit("token", &payload).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn auth_failures_map_to_unauthorized() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/onboarding/steps/2")
            .with_status(401)
            .create_async()
            .await;

        let err = build_client(server.url())
            .submit("expired", &sports_payload())
            .await
            .unwrap_err();

        assert_eq!(err, RemoteError::Unauthorized { status: 401 });
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn client_errors_are_rejections_with_body() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/onboarding/steps/2")
            .with_status(422)
            .with_body("rank out of range")
            .create_async()
            .await;

        let err = build_client(server.url())
            .submit("token", &sports_payload())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RemoteError::Rejected {
                status: 422,
                message: "rank out of range".to_string()
            }
        );
    }

    #[tokio::test]
    async fn server_errors_are_transient() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/onboarding/steps/2")
            .with_status(503)
            .create_async()
            .await;

        let err = build_client(server.url())
            .submit("token", &sports_payload())
            .await
            .unwrap_err();

        assert_eq!(err, RemoteError::Server { status: 503 });
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        // Port 9 (discard) is not expected to accept HTTP connections.
        let err = build_client("http://127.0.0.1:9".to_string())
            .submit("token", &sports_payload())
            .await
            .unwrap_err();

        assert!(err.is_transient());
    }
}
