use thiserror::Error;

/// Failures an execution can surface. Precondition variants are raised
/// locally before any network attempt; `Transport` carries whatever the
/// transport reported, unnormalized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("method not found in ABI: {0}")]
    NotFound(String),

    #[error("no authenticated account available; connect an account first")]
    NoAuthenticatedUser,

    #[error("no target address selected; the contract must be deployed at an address")]
    NoTargetAddress,

    #[error("invalid value amount: {0:?}")]
    InvalidValue(String),

    #[error("transport error: {0}")]
    Transport(String),
}
