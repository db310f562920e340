use thiserror::Error;

/// Client-side failures: the caller can fix the request and resubmit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("unknown tax regime: {0}")]
    UnknownTaxRegime(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
