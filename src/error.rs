//! Error types.
//!
//! Invalid arguments and illegal states surface synchronously to the caller.
//! Renderer and placeholder failures have their own types; the core logs them
//! and carries on.

use crate::panel::ViewerId;
use std::thread::ThreadId;
use thiserror::Error;

/// Errors returned by panel and scheduler operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Row outside 1..=15.
    #[error("row must be between 1 and 15, got {0}")]
    InvalidRow(u8),

    /// A required value was missing or out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Called from a thread other than the update thread.
    #[error("must be called from the update thread {expected:?}, called from {actual:?}")]
    WrongThread {
        /// The captured update thread.
        expected: ThreadId,
        /// The calling thread.
        actual: ThreadId,
    },

    /// `start` while the scheduler is running.
    #[error("scheduler is already running")]
    AlreadyRunning,

    /// `stop` or `tick` while the scheduler is stopped.
    #[error("scheduler is not running")]
    NotRunning,

    /// The panel has been torn down.
    #[error("panel for viewer {0} has been destroyed")]
    PanelDestroyed(ViewerId),
}

impl Error {
    /// Whether this error is an illegal-state failure (as opposed to a bad argument).
    pub const fn is_illegal_state(&self) -> bool {
        matches!(
            self,
            Self::WrongThread { .. } | Self::AlreadyRunning | Self::NotRunning | Self::PanelDestroyed(_)
        )
    }
}

/// Result type for panel and scheduler operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A renderer could not deliver a write.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("render failed: {0}")]
pub struct RenderError(pub String);

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        Self(err.to_string())
    }
}

/// The placeholder service failed to resolve a string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("placeholder resolution failed: {0}")]
pub struct ResolveError(pub String);

/// Configuration could not be loaded.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML was malformed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value was out of range.
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}
