use async_trait::async_trait;
use helix_abi::MethodDescriptor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw failure reported by a transport. Passed through unnormalized; the
/// engine wraps it into its own error taxonomy at the dispatch boundary.
#[derive(Error, Debug, Clone)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Confirmation record of a mined state-changing transaction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub transaction_hash: String,
    pub status: bool,
    #[serde(default)]
    pub gas_used: Option<u64>,
    #[serde(default)]
    pub block_number: Option<u64>,
    #[serde(default)]
    pub contract_address: Option<String>,
    /// The receipt exactly as the transport reported it
    #[serde(default)]
    pub raw: serde_json::Value,
}

/// Result of a successful contract deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployedInstance {
    pub address: String,
    #[serde(default)]
    pub transaction_hash: Option<String>,
}

/// The contract-call transport the engine dispatches through. Argument
/// encoding onto the wire is the implementation's concern; the engine hands
/// over the ordered declared-input values as text.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Read-only query. No transaction is submitted, no receipt produced.
    async fn call(
        &self,
        to: &str,
        method: &MethodDescriptor,
        args: &[String],
    ) -> Result<serde_json::Value, TransportError>;

    /// State-changing transaction from `from` with an attached value.
    /// Resolves once the transaction is confirmed.
    async fn send(
        &self,
        to: &str,
        method: &MethodDescriptor,
        args: &[String],
        from: &str,
        value: u128,
    ) -> Result<TxReceipt, TransportError>;

    /// Deploy `bytecode` with ordered constructor arguments
    async fn deploy(
        &self,
        bytecode: &str,
        constructor: &MethodDescriptor,
        args: &[String],
        from: &str,
        value: u128,
    ) -> Result<DeployedInstance, TransportError>;
}

/// Source of the authenticated account an execution submits from
pub trait AccountProvider: Send + Sync {
    fn current_account(&self) -> Option<String>;
}

/// Fixed account source, for configurations with a single unlocked account
pub struct StaticAccount(pub Option<String>);

impl AccountProvider for StaticAccount {
    fn current_account(&self) -> Option<String> {
        self.0.clone()
    }
}
