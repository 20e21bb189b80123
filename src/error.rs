use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the quantification core.
#[derive(Error, Debug)]
pub enum QuantError {
    /// Upstream handed us data that breaks a guarantee this stage relies on.
    /// Callers usually treat this as fatal.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("unknown library type '{0}'")]
    UnknownLibraryType(String),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {msg}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        msg: String,
    },
}

impl QuantError {
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, QuantError::InvariantViolation(_))
    }
}
