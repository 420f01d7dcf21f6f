//! Error types used by the linepool runtime.
//!
//! This module defines two error enums:
//!
//! - [`ConfigError`]: errors raised while loading the startup configuration.
//! - [`RuntimeError`]: errors raised by the running pipeline itself.
//!
//! Both types provide an `as_label` helper producing short stable labels for
//! logs. Every variant here is fatal-at-startup or terminal-for-one-loop;
//! there are no retryable errors in this system.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving the startup configuration.
///
/// All of these abort the process before any worker starts.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required environment variable {name}")]
    MissingVar {
        /// Name of the missing variable.
        name: &'static str,
    },

    /// An optional numeric variable is set but does not parse.
    #[error("invalid value for {name}: {value:?}")]
    InvalidNumber {
        /// Name of the offending variable.
        name: &'static str,
        /// The raw value found in the environment.
        value: String,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::MissingVar { .. } => "config_missing_var",
            ConfigError::InvalidNumber { .. } => "config_invalid_number",
        }
    }
}

/// Errors raised by the running pipeline.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// An I/O operation on one of the configured files failed.
    ///
    /// Covers the uncreatable output/log destinations at startup (fatal) and
    /// input open/read failures in the producer loop (terminal for that loop).
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        /// The file the operation was addressed to.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A record was pushed after the shared queue was closed.
    #[error("record queue closed before input was exhausted")]
    QueueClosed,
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::Io { .. } => "runtime_io",
            RuntimeError::QueueClosed => "runtime_queue_closed",
        }
    }
}
