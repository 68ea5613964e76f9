//! JSON-over-HTTP transport
//!
//! Fetchers talk to the providers through the [`JsonTransport`] trait so the
//! same code runs against the network ([`HttpTransport`]) or a fixed route
//! table ([`MemoryTransport`]).

pub mod http;
pub mod memory;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use reqwest::Url;
use serde_json::Value;

pub use http::HttpTransport;
pub use memory::MemoryTransport;

/// Errors raised by a single GET request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status {
        /// Requested URL
        url: String,
        /// Status code
        status: u16,
    },

    /// The request could not be sent or the connection failed
    #[error("request to {url} failed: {reason}")]
    Request {
        /// Requested URL
        url: String,
        /// Underlying failure
        reason: String,
    },

    /// The request exceeded its time bound
    #[error("request to {url} timed out")]
    Timeout {
        /// Requested URL
        url: String,
    },

    /// The response body was not valid JSON
    #[error("invalid response body from {url}: {reason}")]
    Body {
        /// Requested URL
        url: String,
        /// Decoder message
        reason: String,
    },
}

impl TransportError {
    /// Whether the server reported that the resource does not exist
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

/// Future returned by [`JsonTransport::get_json`]
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = std::result::Result<Value, TransportError>> + Send + 'a>>;

/// A source of JSON documents addressed by URL
pub trait JsonTransport: Send + Sync {
    /// Issue one GET request and decode the body as JSON
    ///
    /// Non-success statuses are reported as [`TransportError::Status`].
    fn get_json<'a>(&'a self, url: &'a Url) -> TransportFuture<'a>;
}

impl<T: JsonTransport + ?Sized> JsonTransport for Arc<T> {
    fn get_json<'a>(&'a self, url: &'a Url) -> TransportFuture<'a> {
        (**self).get_json(url)
    }
}

impl<T: JsonTransport + ?Sized> JsonTransport for &T {
    fn get_json<'a>(&'a self, url: &'a Url) -> TransportFuture<'a> {
        (**self).get_json(url)
    }
}
