use helix_abi::ContractAbi;
use serde::{Deserialize, Serialize};

/// A contract known to the registry: interface, deployable bytecode, and
/// off-chain metadata. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractDescriptor {
    pub name: String,
    pub abi: ContractAbi,
    /// Deployable bytecode, hex without the 0x prefix
    #[serde(default)]
    pub bytecode: String,
    /// Content-addressed pointer to off-chain metadata
    #[serde(default)]
    pub metadata: String,
    #[serde(default)]
    pub notes: String,
}

/// One successful deployment. Appended to the registry and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployedContractRecord {
    pub metadata: String,
    pub name: String,
    pub address: String,
    pub bytecode: String,
    pub abi: ContractAbi,
    pub notes: String,
    /// Unix timestamp stamped by the registry at append time
    #[serde(default)]
    pub deployed_at: u64,
}
