//! Cancellable loads tied to a view's lifetime
//!
//! A view starts loads through a [`ViewSession`]. Starting a new load aborts
//! the one in flight, and [`ViewSession::cancel`] aborts whatever is running
//! when the view goes away. A load that finishes after it has been
//! superseded yields [`PopulationError::Cancelled`] instead of its data.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use futures::future::{AbortHandle, Abortable};
use log::debug;

use crate::error::{PopulationError, Result};

/// Tracks the one current load of a view
#[derive(Debug, Default)]
pub struct ViewSession {
    generation: AtomicU64,
    current: Mutex<Option<AbortHandle>>,
}

impl ViewSession {
    /// Create a session with nothing in flight
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `load` as the session's current load
    ///
    /// Any earlier load still in flight is aborted.
    pub async fn run<F>(&self, load: F) -> Result<F::Output>
    where
        F: Future,
    {
        let (handle, registration) = AbortHandle::new_pair();
        let generation = {
            let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(previous) = current.replace(handle) {
                previous.abort();
            }
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };
        debug!("Starting load generation {generation}");

        let output = Abortable::new(load, registration).await;

        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if self.generation.load(Ordering::SeqCst) == generation {
            current.take();
            output.map_err(|_| PopulationError::Cancelled)
        } else {
            debug!("Discarding stale load generation {generation}");
            Err(PopulationError::Cancelled)
        }
    }

    /// Abort the current load, if any
    pub fn cancel(&self) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = current.take() {
            handle.abort();
        }
    }

    /// Whether a load started through this session is still running
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Generation counter; bumps on every load start and cancel
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}
