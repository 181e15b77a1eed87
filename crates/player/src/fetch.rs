//! Fetching resolved player state from the server.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use ringside_core::player::PlayerState;

/// HTTP request timeout for one poll.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from one fetch attempt.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request never completed (network, DNS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server does not know this display's token.
    #[error("Display is not registered with the server")]
    NotRegistered,

    /// The server answered with an unexpected non-2xx status.
    #[error("Server returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body did not parse as a player state.
    #[error("Malformed player state: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Source of resolved player states.
///
/// The runtime depends on this trait only, so states can come from the HTTP
/// fetcher below or from anything else with an async call.
#[async_trait]
pub trait StateFetcher: Send + Sync {
    async fn fetch(&self) -> Result<PlayerState, FetchError>;
}

/// Fetches state from the server's player endpoint.
pub struct HttpFetcher {
    client: reqwest::Client,
    url: String,
}

/// Success envelope around the state payload.
#[derive(Deserialize)]
struct StateEnvelope {
    data: PlayerState,
}

/// Error envelope the server uses for failures.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
}

impl HttpFetcher {
    /// Create a fetcher for one display.
    ///
    /// * `server_url` - Base HTTP URL, e.g. `http://localhost:3000`.
    /// * `token` - The display's access token.
    pub fn new(server_url: &str, token: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            url: state_url(server_url, token),
        }
    }
}

#[async_trait]
impl StateFetcher for HttpFetcher {
    async fn fetch(&self) -> Result<PlayerState, FetchError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let code = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.code)
                .unwrap_or_default();
            if code == "DISPLAY_NOT_REGISTERED" {
                return Err(FetchError::NotRegistered);
            }
            return Err(FetchError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: StateEnvelope = serde_json::from_str(&body)?;
        Ok(envelope.data)
    }
}

fn state_url(server_url: &str, token: &str) -> String {
    format!(
        "{}/api/v1/player/state/{}",
        server_url.trim_end_matches('/'),
        token
    )
}
