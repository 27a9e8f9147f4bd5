// SPDX-FileCopyrightText: 2026 Quarry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock filters with predictable behavior.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use quarry_core::{Filter, Params, QuarryError};

/// Returns `{"filter": <name>, "params": <params>}` and records every call.
pub struct EchoFilter {
    name: String,
    label: String,
    calls: Arc<AtomicUsize>,
    last_params: Arc<Mutex<Option<Params>>>,
}

impl EchoFilter {
    pub fn new(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
            last_params: Arc::new(Mutex::new(None)),
        }
    }

    /// Number of times `execute` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Parameters passed to the most recent call.
    pub async fn last_params(&self) -> Option<Params> {
        self.last_params.lock().await.clone()
    }
}

#[async_trait]
impl Filter for EchoFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> &str {
        &self.label
    }

    async fn execute(&self, params: Params) -> Result<serde_json::Value, QuarryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_params.lock().await = Some(params.clone());
        let params = serde_json::to_value(&params)
            .map_err(|e| QuarryError::Internal(format!("params not serializable: {e}")))?;
        Ok(serde_json::json!({
            "filter": self.name,
            "params": params,
        }))
    }
}

/// Always fails with the configured message, like an unreachable remote.
pub struct FailingFilter {
    name: String,
    message: String,
}

impl FailingFilter {
    pub fn new(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl Filter for FailingFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> &str {
        "Always fails"
    }

    async fn execute(&self, _params: Params) -> Result<serde_json::Value, QuarryError> {
        Err(QuarryError::Internal(self.message.clone()))
    }
}

/// Panics on execution.
pub struct PanickingFilter {
    name: String,
}

impl PanickingFilter {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl Filter for PanickingFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> &str {
        "Panics"
    }

    async fn execute(&self, _params: Params) -> Result<serde_json::Value, QuarryError> {
        panic!("filter {} blew up", self.name);
    }
}

/// Sleeps for `delay`, then returns `{"filter": <name>, "slept_ms": <delay>}`.
pub struct SlowFilter {
    name: String,
    delay: Duration,
    completed: AtomicUsize,
}

impl SlowFilter {
    pub fn new(name: &str, delay: Duration) -> Self {
        Self {
            name: name.to_string(),
            delay,
            completed: AtomicUsize::new(0),
        }
    }

    /// Number of executions that ran to the end of their delay.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Filter for SlowFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> &str {
        "Slow"
    }

    async fn execute(&self, _params: Params) -> Result<serde_json::Value, QuarryError> {
        tokio::time::sleep(self.delay).await;
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(serde_json::json!({
            "filter": self.name,
            "slept_ms": self.delay.as_millis() as u64,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echo_returns_params_and_counts_calls() {
        let filter = EchoFilter::new("by_date", "Import by date");
        let params = Params::new().with("since", "2024-01-01");

        let out = filter.execute(params.clone()).await.unwrap();
        assert_eq!(out["filter"], "by_date");
        assert_eq!(out["params"]["since"], "2024-01-01");
        assert_eq!(filter.calls(), 1);
        assert_eq!(filter.last_params().await, Some(params));
    }

    #[tokio::test]
    async fn failing_filter_returns_message() {
        let filter = FailingFilter::new("down", "remote unreachable");
        let err = filter.execute(Params::new()).await.unwrap_err();
        assert!(err.to_string().contains("remote unreachable"));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_filter_waits() {
        let filter = SlowFilter::new("slow", Duration::from_millis(250));
        let start = tokio::time::Instant::now();
        let out = filter.execute(Params::new()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(250));
        assert_eq!(out["slept_ms"], 250);
        assert_eq!(filter.completed(), 1);
    }
}
