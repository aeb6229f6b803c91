use crate::error::EngineError;
use crate::transport::TxReceipt;
use helix_registry::DeployedContractRecord;
use serde::{Deserialize, Serialize};

/// Lifecycle of an engine instance. `Loading` doubles as the initial
/// placeholder before the first successful resolution and as the in-flight
/// marker during a dispatch; it is the only exclusive state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionState {
    Idle,
    Loading,
    Success,
    Error,
}

impl ExecutionState {
    /// Whether a fresh execute may start from this state
    pub fn accepts_execute(&self) -> bool {
        !matches!(self, ExecutionState::Loading)
    }
}

/// What a completed execution produced. At most one per execution;
/// superseded, not merged, by the next execute.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// Decoded return value of a read-only query
    ReadResult(serde_json::Value),
    /// Confirmation of a mined state-changing transaction
    Receipt(TxReceipt),
    /// A freshly deployed instance, already appended to the registry
    Deployed(DeployedContractRecord),
    /// The typed failure that ended the execution
    Failed(EngineError),
}
