use crate::types::{ContractDescriptor, DeployedContractRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("contract already registered: {0}")]
    DuplicateContract(String),
}

/// On-disk form of the registry
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    contracts: Vec<ContractDescriptor>,
    deployed: Vec<DeployedContractRecord>,
}

/// Shared store of contract descriptors and deployed-contract records.
///
/// Descriptors are immutable once inserted. Deployment records are
/// append-only; duplicate appends create duplicate records, concurrent
/// appends are serialized by the lock.
pub struct ContractRegistry {
    contracts: Arc<RwLock<HashMap<String, ContractDescriptor>>>,
    deployed: Arc<RwLock<Vec<DeployedContractRecord>>>,
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self {
            contracts: Arc::new(RwLock::new(HashMap::new())),
            deployed: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Register a contract descriptor under its name
    pub async fn insert(&self, descriptor: ContractDescriptor) -> Result<(), RegistryError> {
        let mut contracts = self.contracts.write().await;
        if contracts.contains_key(&descriptor.name) {
            return Err(RegistryError::DuplicateContract(descriptor.name));
        }

        info!("Contract registered: {}", descriptor.name);
        contracts.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    /// Look up a descriptor by name
    pub async fn contract(&self, name: &str) -> Option<ContractDescriptor> {
        self.contracts.read().await.get(name).cloned()
    }

    /// Registered contract names, sorted
    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.contracts.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Append a deployment record, returning it with the append time
    /// stamped by the registry.
    pub async fn add_deployed(&self, mut record: DeployedContractRecord) -> DeployedContractRecord {
        record.deployed_at = chrono::Utc::now().timestamp() as u64;

        debug!(
            "Recording deployment of {} at {}",
            record.name, record.address
        );
        self.deployed.write().await.push(record.clone());
        record
    }

    /// All deployment records, in append order
    pub async fn deployed(&self) -> Vec<DeployedContractRecord> {
        self.deployed.read().await.clone()
    }

    /// Most recent deployment record for an address
    pub async fn deployed_at(&self, address: &str) -> Option<DeployedContractRecord> {
        self.deployed
            .read()
            .await
            .iter()
            .rev()
            .find(|r| r.address == address)
            .cloned()
    }

    /// Load a registry from its JSON store file. A missing file yields an
    /// empty registry.
    pub async fn load(path: &Path) -> Result<Self, RegistryError> {
        let registry = Self::new();

        if !path.exists() {
            return Ok(registry);
        }

        let contents = std::fs::read_to_string(path)?;
        let store: StoreFile = serde_json::from_str(&contents)?;

        {
            let mut contracts = registry.contracts.write().await;
            for descriptor in store.contracts {
                contracts.insert(descriptor.name.clone(), descriptor);
            }
        }
        *registry.deployed.write().await = store.deployed;

        Ok(registry)
    }

    /// Persist the registry to its JSON store file
    pub async fn save(&self, path: &Path) -> Result<(), RegistryError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut contracts: Vec<ContractDescriptor> =
            self.contracts.read().await.values().cloned().collect();
        contracts.sort_by(|a, b| a.name.cmp(&b.name));

        let store = StoreFile {
            contracts,
            deployed: self.deployed.read().await.clone(),
        };

        let contents = serde_json::to_string_pretty(&store)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

impl Default for ContractRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_abi::ContractAbi;

    fn descriptor(name: &str) -> ContractDescriptor {
        ContractDescriptor {
            name: name.to_string(),
            abi: ContractAbi::default(),
            bytecode: "6080".to_string(),
            metadata: "QmTest".to_string(),
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let registry = ContractRegistry::new();
        registry.insert(descriptor("Token")).await.unwrap();

        assert!(registry.contract("Token").await.is_some());
        assert!(registry.contract("Missing").await.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let registry = ContractRegistry::new();
        registry.insert(descriptor("Token")).await.unwrap();

        let err = registry.insert(descriptor("Token")).await.unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateContract(_)));
    }

    #[tokio::test]
    async fn test_deployed_records_append_in_order() {
        let registry = ContractRegistry::new();

        for addr in ["0xaaa", "0xbbb", "0xaaa"] {
            registry
                .add_deployed(DeployedContractRecord {
                    metadata: String::new(),
                    name: "Token".to_string(),
                    address: addr.to_string(),
                    bytecode: String::new(),
                    abi: ContractAbi::default(),
                    notes: String::new(),
                    deployed_at: 0,
                })
                .await;
        }

        let records = registry.deployed().await;
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].address, "0xbbb");
        assert!(records[0].deployed_at > 0);

        // Latest record wins for address lookups
        let latest = registry.deployed_at("0xaaa").await.unwrap();
        assert_eq!(latest.address, "0xaaa");
    }

    #[tokio::test]
    async fn test_store_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let registry = ContractRegistry::new();
        registry.insert(descriptor("Token")).await.unwrap();
        registry
            .add_deployed(DeployedContractRecord {
                metadata: "QmTest".to_string(),
                name: "Token".to_string(),
                address: "0xabc".to_string(),
                bytecode: "6080".to_string(),
                abi: ContractAbi::default(),
                notes: "first".to_string(),
                deployed_at: 0,
            })
            .await;
        registry.save(&path).await.unwrap();

        let loaded = ContractRegistry::load(&path).await.unwrap();
        assert!(loaded.contract("Token").await.is_some());
        assert_eq!(loaded.deployed().await.len(), 1);
        assert_eq!(loaded.deployed().await[0].notes, "first");
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let loaded = ContractRegistry::load(&dir.path().join("absent.json"))
            .await
            .unwrap();
        assert!(loaded.names().await.is_empty());
    }
}
