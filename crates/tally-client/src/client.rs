//! Typed HTTP client for the judging API.
//!
//! Opens one HTTP/1 connection per request over plain TCP, matching
//! the short-lived fetches the scoring UI performs. Non-2xx responses
//! decode the server's `{"error": ...}` body into `ClientError::Api`.

use std::collections::BTreeMap;

use http_body_util::BodyExt;
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use serde::de::DeserializeOwned;
use tokio::net::TcpStream;
use tracing::debug;

use tally_core::leaderboard::{self, LeaderboardConfig, LeaderboardRow};
use tally_core::{
    Ack, ApiErrorBody, Category, CategoryScores, ContestantTotals, Judge, RawTotals,
    ScoreSubmission,
};

use crate::error::{ClientError, ClientResult};

/// Client for one judging service instance.
#[derive(Debug, Clone)]
pub struct ApiClient {
    authority: String,
}

impl ApiClient {
    /// Build a client from a base URL like `http://localhost:5000`.
    /// Only plain `http` is spoken; a missing port means 80.
    pub fn new(base: &str) -> ClientResult<Self> {
        let uri: http::Uri = base
            .parse()
            .map_err(|_| ClientError::InvalidBase(base.to_string()))?;
        if uri.scheme_str() != Some("http") {
            return Err(ClientError::InvalidBase(base.to_string()));
        }
        let host = uri
            .host()
            .ok_or_else(|| ClientError::InvalidBase(base.to_string()))?;
        let port = uri.port_u16().unwrap_or(80);
        Ok(Self {
            authority: format!("{host}:{port}"),
        })
    }

    /// The `host:port` this client talks to.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    async fn request(
        &self,
        method: http::Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> ClientResult<(http::StatusCode, bytes::Bytes)> {
        let stream =
            TcpStream::connect(&self.authority)
                .await
                .map_err(|e| ClientError::Connect {
                    authority: self.authority.clone(),
                    source: e,
                })?;
        let io = TokioIo::new(stream);
        let (mut sender, conn) = http1::handshake(io)
            .await
            .map_err(|e| ClientError::Http(e.to_string()))?;

        // Drive the connection in the background.
        tokio::spawn(async move {
            let _ = conn.await;
        });

        let payload = match &body {
            Some(value) => bytes::Bytes::from(value.to_string()),
            None => bytes::Bytes::new(),
        };
        let mut builder = http::Request::builder()
            .method(method)
            .uri(path)
            .header("host", &self.authority)
            .header("accept", "application/json");
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let request = builder
            .body(http_body_util::Full::new(payload))
            .map_err(|e| ClientError::Http(e.to_string()))?;

        debug!(%path, "api request");
        let response = sender
            .send_request(request)
            .await
            .map_err(|e| ClientError::Http(e.to_string()))?;
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|e| ClientError::Http(e.to_string()))?
            .to_bytes();
        Ok((status, bytes))
    }

    /// GET /api/judges
    pub async fn judges(&self) -> ClientResult<Vec<Judge>> {
        let (status, bytes) = self.request(http::Method::GET, "/api/judges", None).await?;
        decode(status, &bytes)
    }

    /// POST /api/judges
    pub async fn create_judge(&self, name: &str) -> ClientResult<Judge> {
        let (status, bytes) = self
            .request(
                http::Method::POST,
                "/api/judges",
                Some(serde_json::json!({ "name": name })),
            )
            .await?;
        decode(status, &bytes)
    }

    /// GET /api/scores?category=N
    pub async fn scores(&self, category: Category) -> ClientResult<BTreeMap<i64, CategoryScores>> {
        let path = format!("/api/scores?category={}", category.code());
        let (status, bytes) = self.request(http::Method::GET, &path, None).await?;
        decode(status, &bytes)
    }

    /// POST /api/scores
    pub async fn submit_score(&self, submission: &ScoreSubmission) -> ClientResult<Ack> {
        let body = serde_json::json!({
            "contestant": submission.contestant,
            "category": submission.category,
            "judgeName": submission.judge_name,
            "criteria": submission.criteria,
            "score": submission.score,
        });
        let (status, bytes) = self
            .request(http::Method::POST, "/api/scores", Some(body))
            .await?;
        decode(status, &bytes)
    }

    /// GET /api/raw-scores
    pub async fn raw_totals(&self) -> ClientResult<Vec<RawTotals>> {
        let (status, bytes) = self
            .request(http::Method::GET, "/api/raw-scores", None)
            .await?;
        decode(status, &bytes)
    }

    /// GET /api/contestant-totals
    pub async fn contestant_totals(&self) -> ClientResult<Vec<ContestantTotals>> {
        let (status, bytes) = self
            .request(http::Method::GET, "/api/contestant-totals", None)
            .await?;
        decode(status, &bytes)
    }

    /// Fetch raw totals and compute the ranked leaderboard locally.
    pub async fn leaderboard(
        &self,
        config: &LeaderboardConfig,
    ) -> ClientResult<Vec<LeaderboardRow>> {
        let raw = self.raw_totals().await?;
        Ok(leaderboard::compute(&raw, config))
    }
}

fn decode<T: DeserializeOwned>(status: http::StatusCode, bytes: &[u8]) -> ClientResult<T> {
    if !status.is_success() {
        return Err(api_error(status, bytes));
    }
    serde_json::from_slice(bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

/// A failing endpoint answers `{"error": ...}`; anything else (proxies,
/// panics) is passed through as raw text.
fn api_error(status: http::StatusCode, bytes: &[u8]) -> ClientError {
    let message = serde_json::from_slice::<ApiErrorBody>(bytes)
        .map(|body| body.error)
        .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned());
    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_keeps_host_and_port() {
        let client = ApiClient::new("http://localhost:5000").unwrap();
        assert_eq!(client.authority(), "localhost:5000");
    }

    #[test]
    fn base_url_defaults_to_port_80() {
        let client = ApiClient::new("http://scores.example").unwrap();
        assert_eq!(client.authority(), "scores.example:80");
    }

    #[test]
    fn base_url_rejects_https() {
        assert!(matches!(
            ApiClient::new("https://localhost:5000"),
            Err(ClientError::InvalidBase(_))
        ));
    }

    #[test]
    fn base_url_rejects_garbage() {
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(ClientError::InvalidBase(_))
        ));
    }

    #[test]
    fn api_error_prefers_json_body() {
        let err = api_error(
            http::StatusCode::BAD_REQUEST,
            br#"{"error": "Name required"}"#,
        );
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Name required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn api_error_falls_back_to_raw_text() {
        let err = api_error(http::StatusCode::BAD_GATEWAY, b"upstream down");
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
