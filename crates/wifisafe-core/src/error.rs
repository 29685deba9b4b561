// ── Core error types ──
//
// Analysis itself is infallible: invalid observations are values, not
// errors, and admission outcomes are states. What remains are caller
// mistakes in how the pipeline is configured.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfig { field: String, reason: String },
}
