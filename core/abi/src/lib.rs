pub mod resolver;
pub mod types;

pub use types::{AbiError, AbiParam, ContractAbi, MethodDescriptor, MethodKind, Mutability};
