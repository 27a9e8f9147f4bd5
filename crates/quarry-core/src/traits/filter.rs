// SPDX-FileCopyrightText: 2026 Quarry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filter trait: one named, parameterized query an import source exposes.

use async_trait::async_trait;

use crate::error::QuarryError;
use crate::types::Params;

/// A queryable operation exposed by an import plugin.
///
/// Filters own their connection, auth, and query semantics. The dispatcher
/// hands them the caller's parameters untouched and returns whatever
/// structured value they produce.
#[async_trait]
pub trait Filter: Send + Sync + 'static {
    /// Returns the filter's name, unique within its plugin.
    fn name(&self) -> &str;

    /// Returns a human-readable label for listings.
    fn label(&self) -> &str;

    /// Runs the query against the plugin's data source.
    ///
    /// May block on remote I/O. Errors returned here are surfaced to the
    /// caller wrapped as [`QuarryError::FilterExecution`].
    async fn execute(&self, params: Params) -> Result<serde_json::Value, QuarryError>;
}
