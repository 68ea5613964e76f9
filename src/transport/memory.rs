//! In-memory transport backed by a route table
//!
//! Every request is recorded so callers can assert how often an endpoint
//! was hit. URLs without a route answer with HTTP 404.

use std::sync::{Mutex, PoisonError};

use log::debug;
use reqwest::Url;
use rustc_hash::FxHashMap;
use serde_json::Value;

use super::{JsonTransport, TransportError, TransportFuture};

#[derive(Debug, Clone)]
enum Route {
    Json(Value),
    Status(u16),
    Failure(String),
}

/// Transport that answers from a fixed table of URL routes
#[derive(Debug, Default)]
pub struct MemoryTransport {
    routes: FxHashMap<String, Route>,
    requests: Mutex<Vec<String>>,
}

impl MemoryTransport {
    /// Create a transport with no routes
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with a JSON body
    #[must_use]
    pub fn with_json(mut self, url: &Url, body: Value) -> Self {
        self.routes.insert(url.to_string(), Route::Json(body));
        self
    }

    /// Answer `url` with a non-success status
    #[must_use]
    pub fn with_status(mut self, url: &Url, status: u16) -> Self {
        self.routes.insert(url.to_string(), Route::Status(status));
        self
    }

    /// Make requests to `url` fail as if the network were down
    #[must_use]
    pub fn with_failure(mut self, url: &Url, reason: &str) -> Self {
        self.routes
            .insert(url.to_string(), Route::Failure(reason.to_string()));
        self
    }

    /// All requested URLs, in request order
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests made to `url`
    pub fn request_count(&self, url: &Url) -> usize {
        let url = url.as_str();
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|requested| requested.as_str() == url)
            .count()
    }

    fn answer(&self, url: &Url) -> std::result::Result<Value, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        match self.routes.get(url.as_str()) {
            Some(Route::Json(body)) => Ok(body.clone()),
            Some(Route::Status(status)) => Err(TransportError::Status {
                url: url.to_string(),
                status: *status,
            }),
            Some(Route::Failure(reason)) => Err(TransportError::Request {
                url: url.to_string(),
                reason: reason.clone(),
            }),
            None => Err(TransportError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

impl JsonTransport for MemoryTransport {
    fn get_json<'a>(&'a self, url: &'a Url) -> TransportFuture<'a> {
        debug!("memory GET {url}");
        let answer = self.answer(url);
        Box::pin(async move { answer })
    }
}
