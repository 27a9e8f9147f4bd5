// SPDX-FileCopyrightText: 2026 Quarry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for import sources and their filters.
//!
//! Heterogeneous import sources implement [`ImportPlugin`]; each query a
//! source exposes implements [`Filter`], using `#[async_trait]` so filters can
//! be held as `Arc<dyn Filter>` and awaited uniformly.

pub mod filter;
pub mod plugin;

pub use filter::Filter;
pub use plugin::ImportPlugin;
