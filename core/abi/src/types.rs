use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AbiError {
    #[error("invalid ABI JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ABI must be a JSON array of method descriptions")]
    NotAnArray,
}

/// State-mutability classification from the JSON ABI `stateMutability` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mutability {
    Pure,
    View,
    Nonpayable,
    Payable,
}

impl Mutability {
    /// True for methods that cannot change chain state
    pub fn is_readonly(&self) -> bool {
        matches!(self, Mutability::Pure | Mutability::View)
    }

    pub fn is_payable(&self) -> bool {
        matches!(self, Mutability::Payable)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mutability::Pure => "pure",
            Mutability::View => "view",
            Mutability::Nonpayable => "nonpayable",
            Mutability::Payable => "payable",
        }
    }
}

impl Default for Mutability {
    fn default() -> Self {
        Mutability::Nonpayable
    }
}

/// A single named, typed parameter slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl AbiParam {
    pub fn new(name: &str, ty: &str) -> Self {
        Self {
            name: name.to_string(),
            ty: ty.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Constructor,
    Function,
}

/// One callable entry of a contract interface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    #[serde(rename = "type")]
    pub kind: MethodKind,

    /// Method name; empty for constructors
    #[serde(default)]
    pub name: String,

    /// Precomputed canonical signature, when the ABI producer emits one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,

    #[serde(default)]
    pub inputs: Vec<AbiParam>,

    #[serde(default)]
    pub outputs: Vec<AbiParam>,

    #[serde(rename = "stateMutability", default)]
    pub mutability: Mutability,
}

impl MethodDescriptor {
    /// Identity used to compare resolutions: signature, falling back to name
    pub fn identity(&self) -> &str {
        self.signature.as_deref().unwrap_or(&self.name)
    }

    /// Canonical signature rendering, e.g. `transfer(address,uint256)`
    pub fn canonical_signature(&self) -> String {
        let types: Vec<&str> = self.inputs.iter().map(|p| p.ty.as_str()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    /// Human-readable interface line for display:
    /// `transfer(address to, uint256 amount) nonpayable returns (bool)`
    pub fn display(&self) -> String {
        let params: Vec<String> = self
            .inputs
            .iter()
            .map(|p| {
                if p.name.is_empty() {
                    p.ty.clone()
                } else {
                    format!("{} {}", p.ty, p.name)
                }
            })
            .collect();

        let head = if self.name.is_empty() {
            "constructor".to_string()
        } else {
            self.name.clone()
        };

        let mut line = format!("{}({}) {}", head, params.join(", "), self.mutability.as_str());

        if !self.outputs.is_empty() {
            let rets: Vec<String> = self
                .outputs
                .iter()
                .map(|p| {
                    if p.name.is_empty() {
                        p.ty.clone()
                    } else {
                        format!("{} {}", p.ty, p.name)
                    }
                })
                .collect();
            line.push_str(&format!(" returns ({})", rets.join(", ")));
        }

        line
    }
}

/// Ordered contract interface parsed from a JSON ABI array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractAbi(pub Vec<MethodDescriptor>);

impl ContractAbi {
    pub fn new(methods: Vec<MethodDescriptor>) -> Self {
        Self(methods)
    }

    /// Parse a raw ABI JSON array. Entries other than functions and
    /// constructors (events, fallback, receive) are skipped; the order of
    /// the rest is preserved.
    pub fn parse(json: &str) -> Result<Self, AbiError> {
        let raw: serde_json::Value = serde_json::from_str(json)?;
        let entries = raw.as_array().ok_or(AbiError::NotAnArray)?;

        let mut methods = Vec::new();
        for entry in entries {
            match serde_json::from_value::<MethodDescriptor>(entry.clone()) {
                Ok(method) => methods.push(method),
                // Unknown `type` tag: not callable, skip
                Err(_) => continue,
            }
        }

        Ok(Self(methods))
    }

    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_non_callable_entries() {
        let json = r#"[
            {"type": "event", "name": "Transfer", "inputs": []},
            {"type": "function", "name": "totalSupply", "inputs": [],
             "outputs": [{"name": "", "type": "uint256"}], "stateMutability": "view"},
            {"type": "fallback", "stateMutability": "payable"}
        ]"#;

        let abi = ContractAbi::parse(json).unwrap();
        assert_eq!(abi.methods().len(), 1);
        assert_eq!(abi.methods()[0].name, "totalSupply");
        assert!(abi.methods()[0].mutability.is_readonly());
    }

    #[test]
    fn test_parse_defaults_missing_mutability() {
        let json = r#"[{"type": "function", "name": "poke", "inputs": [], "outputs": []}]"#;
        let abi = ContractAbi::parse(json).unwrap();
        assert_eq!(abi.methods()[0].mutability, Mutability::Nonpayable);
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let err = ContractAbi::parse(r#"{"type": "function"}"#).unwrap_err();
        assert!(matches!(err, AbiError::NotAnArray));
    }

    #[test]
    fn test_canonical_signature() {
        let method = MethodDescriptor {
            kind: MethodKind::Function,
            name: "transfer".to_string(),
            signature: None,
            inputs: vec![AbiParam::new("to", "address"), AbiParam::new("amount", "uint256")],
            outputs: vec![AbiParam::new("", "bool")],
            mutability: Mutability::Nonpayable,
        };

        assert_eq!(method.canonical_signature(), "transfer(address,uint256)");
        assert_eq!(
            method.display(),
            "transfer(address to, uint256 amount) nonpayable returns (bool)"
        );
    }

    #[test]
    fn test_identity_prefers_signature() {
        let mut method = MethodDescriptor {
            kind: MethodKind::Function,
            name: "transfer".to_string(),
            signature: Some("transfer(address,uint256)".to_string()),
            inputs: vec![],
            outputs: vec![],
            mutability: Mutability::Nonpayable,
        };
        assert_eq!(method.identity(), "transfer(address,uint256)");

        method.signature = None;
        assert_eq!(method.identity(), "transfer");
    }
}
