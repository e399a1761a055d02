use std::time::{Duration, Instant};

use anyhow::Context;
use log::{debug, info, warn};
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;

use crate::types::{MessageRequest, MessageResponse};

const SEND_PATH: &str = "sends-message";
const BODY_PREVIEW_CHARS: usize = 512;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("upstream returned {status}: {}", preview(.body))]
    Http { status: StatusCode, body: String },
    #[error("could not decode upstream response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

impl AdapterError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Http { .. } => "http",
            Self::Decode(_) => "decode",
            Self::Transport(_) => "transport",
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(err) if err.is_timeout())
    }
}

/// Forwards one form submission to the upstream message service and hands
/// back the generated text. Holds no per-request state.
#[derive(Clone)]
pub struct ComposerClient {
    client: Client,
    endpoint: Url,
}

impl ComposerClient {
    pub fn new(base_url: &Url, timeout: Duration) -> anyhow::Result<Self> {
        let endpoint = endpoint_url(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn send_message(&self, req: &MessageRequest) -> Result<String, AdapterError> {
        let started = Instant::now();
        let resp = self
            .client
            .post(self.endpoint.clone())
            .json(req)
            .send()
            .await
            .map_err(|err| {
                warn!("Request to {} failed: {}", self.endpoint, err);
                AdapterError::Transport(err)
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(AdapterError::Transport)?;
        debug!(
            "Upstream {} answered {} in {:?}",
            self.endpoint,
            status,
            started.elapsed()
        );

        if !status.is_success() {
            warn!("Upstream {} returned {}", self.endpoint, status);
            return Err(AdapterError::Http { status, body });
        }

        let decoded: MessageResponse =
            serde_json::from_str(&body).map_err(AdapterError::Decode)?;
        info!("Composed message received ({} bytes)", decoded.msg.len());
        Ok(decoded.msg)
    }
}

/// Appends the send path to the base URL's path. Any path prefix and query
/// string on the base are kept.
fn endpoint_url(base: &Url) -> anyhow::Result<Url> {
    let mut endpoint = base.clone();
    endpoint.set_fragment(None);
    endpoint
        .path_segments_mut()
        .map_err(|_| anyhow::anyhow!("upstream URL {base} cannot carry a path"))?
        .pop_if_empty()
        .push(SEND_PATH);
    Ok(endpoint)
}

/// Upstream error bodies can be arbitrarily large; only the head is shown.
fn preview(body: &str) -> String {
    let mut chars = body.chars();
    let head: String = chars.by_ref().take(BODY_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint_for(base: &str) -> String {
        endpoint_url(&Url::parse(base).unwrap()).unwrap().to_string()
    }

    #[test]
    fn endpoint_appends_send_path() {
        assert_eq!(
            endpoint_for("http://localhost:3000"),
            "http://localhost:3000/sends-message"
        );
        assert_eq!(
            endpoint_for("http://localhost:3000/"),
            "http://localhost:3000/sends-message"
        );
    }

    #[test]
    fn endpoint_keeps_path_prefix() {
        assert_eq!(
            endpoint_for("https://example.com/bot/"),
            "https://example.com/bot/sends-message"
        );
    }

    #[test]
    fn endpoint_keeps_query_string() {
        let base = Url::parse("http://localhost:3000/api?key=abc#frag").unwrap();
        let endpoint = endpoint_url(&base).unwrap();
        assert_eq!(endpoint.path(), "/api/sends-message");
        assert_eq!(endpoint.query(), Some("key=abc"));
        assert_eq!(endpoint.fragment(), None);
    }

    #[test]
    fn http_error_display_truncates_body() {
        let body = "x".repeat(BODY_PREVIEW_CHARS * 4);
        let err = AdapterError::Http {
            status: StatusCode::BAD_GATEWAY,
            body: body.clone(),
        };
        let shown = err.to_string();
        assert!(shown.len() < BODY_PREVIEW_CHARS + 64);
        assert!(shown.ends_with("..."));
        match err {
            AdapterError::Http { body: kept, .. } => assert_eq!(kept, body),
            _ => unreachable!(),
        }
    }

    #[test]
    fn error_kinds_are_stable() {
        let http = AdapterError::Http {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".into(),
        };
        assert_eq!(http.kind(), "http");
        assert!(!http.is_timeout());
        assert!(http.to_string().contains("500"));

        let decode = AdapterError::Decode(serde_json::from_str::<MessageResponse>("{}").unwrap_err());
        assert_eq!(decode.kind(), "decode");
    }
}
