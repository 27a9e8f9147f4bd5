// SPDX-FileCopyrightText: 2026 Quarry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Quarry import registry.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Quarry workspace. Every import source
//! implements [`ImportPlugin`] and exposes its queries as [`Filter`]s.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ErrorKind, QuarryError};
pub use traits::{Filter, ImportPlugin};
pub use types::{Capability, FilterDescriptor, ParamValue, Params, PluginDescriptor};
