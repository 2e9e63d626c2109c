//! HTTP access to the customer entries endpoint

use crate::model::Entry;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Path of the entries resource, appended to the configured base URL
pub const ENTRIES_PATH: &str = "/api/entries";

/// Anything that can go wrong while fetching entries
///
/// All variants look the same to the user; the distinction only reaches the log.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded with {0}")]
    Status(StatusCode),
    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Source of the raw entries payload
///
/// Implementations are called from background threads.
pub trait EntryFetcher: Send + Sync {
    fn fetch(&self) -> Result<Value, FetchError>;
}

impl<F> EntryFetcher for F
where
    F: Fn() -> Result<Value, FetchError> + Send + Sync,
{
    fn fetch(&self) -> Result<Value, FetchError> {
        self()
    }
}

/// Fetcher issuing a plain GET against one endpoint
///
/// No timeout is configured here; the client's defaults apply.
pub struct HttpEntryFetcher {
    client: Client,
    endpoint: String,
}

impl HttpEntryFetcher {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl EntryFetcher for HttpEntryFetcher {
    fn fetch(&self) -> Result<Value, FetchError> {
        tracing::debug!(endpoint = %self.endpoint, "GET entries");
        let response = self.client.get(&self.endpoint).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes()?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Turn a successful payload into entries
///
/// Only a JSON array yields entries; any other value means "no entries".
pub fn interpret_body(body: Value) -> Vec<Entry> {
    match body {
        Value::Array(items) => items.into_iter().map(Entry::from_value).collect(),
        other => {
            tracing::warn!(body = %other, "entries payload is not an array");
            Vec::new()
        }
    }
}
