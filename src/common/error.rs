//! Error types for the validation harness
//!
//! Every collaborator failure mode carries a stable [`ErrorCode`] so that
//! must-fail step expectations can match on the *kind* of failure (e.g.
//! "the job pod is absent") instead of on presence-of-any-error.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the validation harness
#[derive(Error, Debug)]
pub enum Error {
    // === Cluster access ===
    #[error("Failed to connect to cluster: {0}")]
    Connection(String),

    #[error("Chaos operator not ready: {0}")]
    NotReady(String),

    // === Resource installation ===
    #[error("Failed to install {resource}: {reason}")]
    Install { resource: String, reason: String },

    // === Waits ===
    #[error("Timed out after {elapsed_secs}s waiting for {what}")]
    Timeout { what: String, elapsed_secs: u64 },

    // === Post-chaos checks ===
    #[error("Failed to retrieve logs: {0}")]
    Retrieval(String),

    #[error("Chaos result verdict check failed: {0}")]
    Verdict(String),

    #[error("{0} not found")]
    NotFound(String),

    // === Cleanup ===
    #[error("Cleanup failed: {0}")]
    Cleanup(String),

    // === Configuration ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === IO / serialization ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // === Runner ===
    #[error("Step assertion failed: {0}")]
    StepAssertion(String),

    #[error("{failed} of {total} scenarios failed")]
    SuiteFailed { failed: usize, total: usize },

    // === Internal ===
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Stable discriminant for matching on a failure kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Connection,
    NotReady,
    Install,
    Timeout,
    Retrieval,
    Verdict,
    NotFound,
    Cleanup,
    Config,
    Io,
    Serde,
    Assertion,
    Internal,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorCode::Connection => "CONNECTION",
            ErrorCode::NotReady => "NOT_READY",
            ErrorCode::Install => "INSTALL",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::Retrieval => "RETRIEVAL",
            ErrorCode::Verdict => "VERDICT",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Cleanup => "CLEANUP",
            ErrorCode::Config => "CONFIG",
            ErrorCode::Io => "IO",
            ErrorCode::Serde => "SERDE",
            ErrorCode::Assertion => "ASSERTION",
            ErrorCode::Internal => "INTERNAL",
        };
        f.write_str(s)
    }
}

impl Error {
    /// The stable code for this error, used by must-fail expectations
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Connection(_) => ErrorCode::Connection,
            Error::NotReady(_) => ErrorCode::NotReady,
            Error::Install { .. } => ErrorCode::Install,
            Error::Timeout { .. } => ErrorCode::Timeout,
            Error::Retrieval(_) => ErrorCode::Retrieval,
            Error::Verdict(_) => ErrorCode::Verdict,
            Error::NotFound(_) => ErrorCode::NotFound,
            Error::Cleanup(_) => ErrorCode::Cleanup,
            Error::Config(_) | Error::ConfigParse(_) | Error::FileRead { .. } => ErrorCode::Config,
            Error::Io(_) => ErrorCode::Io,
            Error::Json(_) | Error::Yaml(_) => ErrorCode::Serde,
            Error::StepAssertion(_) => ErrorCode::Assertion,
            Error::SuiteFailed { .. } | Error::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Create an install error for a named resource
    pub fn install(resource: &str, reason: impl std::fmt::Display) -> Self {
        Self::Install {
            resource: resource.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a timeout error for a named wait
    pub fn timeout(what: &str, elapsed_secs: u64) -> Self {
        Self::Timeout {
            what: what.to_string(),
            elapsed_secs,
        }
    }
}
