// SPDX-FileCopyrightText: 2026 Quarry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query dispatch and the host-facing import service.
//!
//! - [`QueryDispatcher`] runs a resolved filter on its own task and converts
//!   errors, panics, and timeouts into `FilterExecution` errors.
//! - [`ImportService`] exposes the three request operations (list plugins,
//!   list filters, search) over a shared registry snapshot.

pub mod dispatcher;
pub mod service;

pub use dispatcher::QueryDispatcher;
pub use service::{registry_builder, ImportService};
