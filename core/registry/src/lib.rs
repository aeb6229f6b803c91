pub mod registry;
pub mod types;

pub use registry::{ContractRegistry, RegistryError};
pub use types::{ContractDescriptor, DeployedContractRecord};
