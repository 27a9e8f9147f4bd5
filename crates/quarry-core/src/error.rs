// SPDX-FileCopyrightText: 2026 Quarry Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Quarry import registry.

use strum::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// The primary error type used across the registry, resolver, and dispatcher.
#[derive(Debug, Error)]
pub enum QuarryError {
    /// No plugin with this name is registered.
    #[error("unknown plugin: {name}")]
    UnknownPlugin { name: String },

    /// The caller-supplied scope does not name a registered plugin carrying
    /// the required feature.
    #[error("invalid scope `{scope}` for feature `{feature}`")]
    InvalidScope { scope: String, feature: String },

    /// The plugin's catalog has no filter with this name.
    #[error("unknown filter: {plugin}/{filter}")]
    UnknownFilter { plugin: String, filter: String },

    /// The caller-supplied filter token is not in the resolved plugin's catalog.
    #[error("invalid filter `{filter}` for plugin `{plugin}`")]
    InvalidFilter { plugin: String, filter: String },

    /// The filter's own execution failed (remote error, bad query, panic, timeout).
    #[error("filter {plugin}/{filter} failed: {source}")]
    FilterExecution {
        plugin: String,
        filter: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A plugin with this name was already registered.
    #[error("duplicate plugin: {name}")]
    DuplicatePlugin { name: String },

    /// A plugin declared two filters with the same name.
    #[error("duplicate filter: {plugin}/{filter}")]
    DuplicateFilter { plugin: String, filter: String },

    /// A plugin manifest is malformed or fails validation.
    #[error("invalid plugin manifest: {0}")]
    Manifest(String),

    /// Configuration errors.
    #[error("configuration error: {0}")]
    Config(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Stable, fieldless classification of [`QuarryError`] for hosts that map
/// errors onto their own response shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    UnknownPlugin,
    InvalidScope,
    UnknownFilter,
    InvalidFilter,
    FilterExecution,
    DuplicatePlugin,
    DuplicateFilter,
    Manifest,
    Config,
    Timeout,
    Internal,
}

impl QuarryError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuarryError::UnknownPlugin { .. } => ErrorKind::UnknownPlugin,
            QuarryError::InvalidScope { .. } => ErrorKind::InvalidScope,
            QuarryError::UnknownFilter { .. } => ErrorKind::UnknownFilter,
            QuarryError::InvalidFilter { .. } => ErrorKind::InvalidFilter,
            QuarryError::FilterExecution { .. } => ErrorKind::FilterExecution,
            QuarryError::DuplicatePlugin { .. } => ErrorKind::DuplicatePlugin,
            QuarryError::DuplicateFilter { .. } => ErrorKind::DuplicateFilter,
            QuarryError::Manifest(_) => ErrorKind::Manifest,
            QuarryError::Config(_) => ErrorKind::Config,
            QuarryError::Timeout { .. } => ErrorKind::Timeout,
            QuarryError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// True when the error rejects caller input (unknown or forged identifiers).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::UnknownPlugin
                | ErrorKind::InvalidScope
                | ErrorKind::UnknownFilter
                | ErrorKind::InvalidFilter
        )
    }
}
