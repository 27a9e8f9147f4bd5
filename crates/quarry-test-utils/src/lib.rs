// SPDX-FileCopyrightText: 2026 Quarry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Quarry integration tests.
//!
//! Provides mock import plugins and filters for fast, deterministic tests
//! without remote data sources.
//!
//! # Components
//!
//! - [`MockPlugin`] - Configurable import plugin
//! - [`EchoFilter`] - Returns its parameters and records invocations
//! - [`FailingFilter`] - Always returns an error
//! - [`PanickingFilter`] - Panics when executed
//! - [`SlowFilter`] - Sleeps before answering

pub mod mock_filter;
pub mod mock_plugin;

pub use mock_filter::{EchoFilter, FailingFilter, PanickingFilter, SlowFilter};
pub use mock_plugin::MockPlugin;
