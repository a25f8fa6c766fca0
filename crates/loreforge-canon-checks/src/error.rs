use loreforge_canon_types::CheckName;
use thiserror::Error;

/// Errors from an individual consistency check.
///
/// The battery never lets these abort a run: an erroring check is degraded
/// to a `Partial` result with a soft finding.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("check {check} could not evaluate: {reason}")]
    Evaluation { check: CheckName, reason: String },
}

/// Errors from the pluggable consistency oracle.
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("oracle unavailable: {0}")]
    Unavailable(String),

    #[error("oracle returned a malformed assessment: {0}")]
    Malformed(String),
}
