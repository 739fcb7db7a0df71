use std::time::Duration;

use jokebox_core::Joke;
use serde::de::DeserializeOwned;
use serde::Deserialize;

const CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Failure of one outbound call to the joke service. Every variant is a
/// value, never a panic; the gateway turns these into inline payloads.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Upstream answered 404; carries the upstream detail text verbatim.
    #[error("{0}")]
    NotFound(String),
    #[error("joke api returned status {status}: {detail}")]
    Upstream { status: u16, detail: String },
    #[error("joke api unreachable: {0}")]
    Transport(String),
    #[error("joke api response could not be decoded: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone, Deserialize)]
struct MessageBody {
    message: String,
}

/// Blocking HTTP client for the joke service: one agent, one fixed timeout
/// for every call, reads and mutations alike. No retries.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    agent: ureq::Agent,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        let agent = ureq::AgentBuilder::new().timeout(CALL_TIMEOUT).build();
        Self { base_url, agent }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET /status`, forwarded undecoded.
    ///
    /// # Errors
    /// Returns a [`ClientError`] when the call or decoding fails.
    pub fn status(&self) -> Result<serde_json::Value, ClientError> {
        let response = self.agent.get(&self.url("/status")).call().map_err(map_call_error)?;
        decode_json(response)
    }

    /// `GET /joke`.
    ///
    /// # Errors
    /// Returns a [`ClientError`] when the call or decoding fails.
    pub fn random_joke(&self) -> Result<Joke, ClientError> {
        let response = self.agent.get(&self.url("/joke")).call().map_err(map_call_error)?;
        decode_json(response)
    }

    /// `GET /joke/{id}`.
    ///
    /// # Errors
    /// Returns a [`ClientError`] when the call or decoding fails.
    pub fn joke_by_id(&self, id: u64) -> Result<Joke, ClientError> {
        let response =
            self.agent.get(&self.url(&format!("/joke/{id}"))).call().map_err(map_call_error)?;
        decode_json(response)
    }

    /// `GET /joke/search?q=...&count=...`.
    ///
    /// # Errors
    /// Returns a [`ClientError`] when the call or decoding fails.
    pub fn search(&self, query: &str, count: usize) -> Result<Vec<Joke>, ClientError> {
        let response = self
            .agent
            .get(&self.url("/joke/search"))
            .query("q", query)
            .query("count", &count.to_string())
            .call()
            .map_err(map_call_error)?;
        decode_json(response)
    }

    /// `POST /joke` with the create payload.
    ///
    /// # Errors
    /// Returns a [`ClientError`] when the call or decoding fails.
    pub fn add_joke(&self, text: &str, topics: &[String]) -> Result<Joke, ClientError> {
        let response = self
            .agent
            .post(&self.url("/joke"))
            .send_json(serde_json::json!({ "joke": text, "topics": topics }))
            .map_err(map_call_error)?;
        decode_json(response)
    }

    /// `DELETE /joke/{id}`, returning the upstream confirmation message.
    ///
    /// # Errors
    /// Returns a [`ClientError`] when the call or decoding fails.
    pub fn delete_joke(&self, id: u64) -> Result<String, ClientError> {
        let response =
            self.agent.delete(&self.url(&format!("/joke/{id}"))).call().map_err(map_call_error)?;
        let body: MessageBody = decode_json(response)?;
        Ok(body.message)
    }
}

fn map_call_error(err: ureq::Error) -> ClientError {
    match err {
        ureq::Error::Status(status, response) => {
            let detail = response
                .into_json::<ErrorBody>()
                .map_or_else(|_| format!("status {status}"), |body| body.error);
            if status == 404 {
                ClientError::NotFound(detail)
            } else {
                ClientError::Upstream { status, detail }
            }
        }
        ureq::Error::Transport(transport) => ClientError::Transport(transport.to_string()),
    }
}

fn decode_json<T: DeserializeOwned>(response: ureq::Response) -> Result<T, ClientError> {
    response.into_json().map_err(|err| ClientError::Decode(err.to_string()))
}
