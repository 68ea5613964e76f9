//! `reqwest`-backed transport

use std::time::Duration;

use log::debug;
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use serde_json::Value;

use super::{JsonTransport, TransportError, TransportFuture};
use crate::error::{PopulationError, Result};

/// HTTP transport with a bounded per-request timeout
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PopulationError::Config(format!("http client init failed: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn request_error(url: &Url, error: &reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else {
        TransportError::Request {
            url: url.to_string(),
            reason: error.to_string(),
        }
    }
}

impl JsonTransport for HttpTransport {
    fn get_json<'a>(&'a self, url: &'a Url) -> TransportFuture<'a> {
        Box::pin(async move {
            debug!("GET {url}");
            let response = self
                .client
                .get(url.clone())
                .header(ACCEPT, "application/json")
                .send()
                .await
                .map_err(|e| request_error(url, &e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(TransportError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }

            response.json::<Value>().await.map_err(|e| {
                if e.is_timeout() {
                    request_error(url, &e)
                } else {
                    TransportError::Body {
                        url: url.to_string(),
                        reason: e.to_string(),
                    }
                }
            })
        })
    }
}
