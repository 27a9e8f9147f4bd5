// SPDX-FileCopyrightText: 2026 Quarry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query dispatcher: runs a resolved filter and contains its failures.
//!
//! Each execution runs on its own tokio task, so a filter that errors,
//! panics, or hangs past the configured timeout is reported as
//! [`QuarryError::FilterExecution`] and never takes the host down with it.
//! The dispatcher holds no mutable state and no lock while a filter runs.
//! Dropping an `execute` future aborts its filter task.

use std::time::{Duration, Instant};

use quarry_config::DispatchConfig;
use quarry_core::{Params, QuarryError};
use quarry_plugin::ResolvedFilter;
use tokio::task::JoinHandle;
use tracing::{debug, warn, Instrument};

/// Executes resolved filters.
#[derive(Debug, Clone, Default)]
pub struct QueryDispatcher {
    timeout: Option<Duration>,
}

impl QueryDispatcher {
    /// A dispatcher with no timeout.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    pub fn from_config(config: &DispatchConfig) -> Self {
        Self {
            timeout: config.timeout(),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run `filter` with the caller's parameters and return its result as-is.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn execute(
        &self,
        filter: &ResolvedFilter,
        params: Params,
    ) -> Result<serde_json::Value, QuarryError> {
        let plugin = filter.plugin_name().to_string();
        let name = filter.filter_name().to_string();
        let span = tracing::info_span!("filter", plugin = %plugin, filter = %name);

        let task_filter = std::sync::Arc::clone(filter.filter());
        let started = Instant::now();
        debug!(parent: &span, params = params.len(), "dispatching filter");

        let mut task = AbortOnDrop(tokio::spawn(
            async move { task_filter.execute(params).await }.instrument(span.clone()),
        ));

        let joined = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, &mut task.0).await {
                Ok(joined) => joined,
                Err(_elapsed) => {
                    task.0.abort();
                    warn!(parent: &span, timeout_ms = limit.as_millis() as u64, "filter timed out");
                    return Err(QuarryError::FilterExecution {
                        plugin,
                        filter: name,
                        source: Box::new(QuarryError::Timeout { duration: limit }),
                    });
                }
            },
            None => (&mut task.0).await,
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match joined {
            Ok(Ok(value)) => {
                debug!(parent: &span, elapsed_ms, "filter completed");
                Ok(value)
            }
            Ok(Err(err)) => {
                warn!(parent: &span, elapsed_ms, error = %err, "filter failed");
                Err(QuarryError::FilterExecution {
                    plugin,
                    filter: name,
                    source: Box::new(err),
                })
            }
            Err(join_err) => {
                let cause = if join_err.is_panic() {
                    format!("filter panicked: {}", panic_message(join_err.into_panic()))
                } else {
                    "filter task was cancelled".to_string()
                };
                warn!(parent: &span, elapsed_ms, cause = %cause, "filter aborted");
                Err(QuarryError::FilterExecution {
                    plugin,
                    filter: name,
                    source: Box::new(QuarryError::Internal(cause)),
                })
            }
        }
    }
}

/// Aborts the filter task if the caller stops waiting for it.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
