use crate::types::{ContractAbi, MethodDescriptor, MethodKind};

impl ContractAbi {
    /// Resolve a method by token: first entry whose signature equals the
    /// token, else the first whose name equals it, in ABI order.
    ///
    /// Name matching is ambiguous for overloaded methods sharing a name;
    /// callers that need to disambiguate must pass the full signature.
    pub fn find_method(&self, token: &str) -> Option<&MethodDescriptor> {
        self.methods()
            .iter()
            .find(|m| {
                m.kind == MethodKind::Function && m.signature.as_deref() == Some(token)
            })
            .or_else(|| {
                self.methods()
                    .iter()
                    .find(|m| m.kind == MethodKind::Function && m.name == token)
            })
    }

    /// First constructor entry, if the contract declares one
    pub fn constructor(&self) -> Option<&MethodDescriptor> {
        self.methods()
            .iter()
            .find(|m| m.kind == MethodKind::Constructor)
    }

    pub fn functions(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods()
            .iter()
            .filter(|m| m.kind == MethodKind::Function)
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{AbiParam, ContractAbi, MethodDescriptor, MethodKind, Mutability};

    fn function(name: &str, signature: Option<&str>) -> MethodDescriptor {
        MethodDescriptor {
            kind: MethodKind::Function,
            name: name.to_string(),
            signature: signature.map(String::from),
            inputs: vec![],
            outputs: vec![],
            mutability: Mutability::Nonpayable,
        }
    }

    #[test]
    fn test_signature_match_beats_name_match() {
        // A later entry with an exact signature match must win over an
        // earlier entry that only matches by name.
        let abi = ContractAbi::new(vec![
            function("transfer(address,uint256)", None),
            function("transfer", Some("transfer(address,uint256)")),
        ]);

        let resolved = abi.find_method("transfer(address,uint256)").unwrap();
        assert_eq!(resolved.name, "transfer");
    }

    #[test]
    fn test_name_fallback_returns_first_in_abi_order() {
        let mut first = function("mint", Some("mint(address)"));
        first.inputs = vec![AbiParam::new("to", "address")];
        let second = function("mint", Some("mint(address,uint256)"));

        let abi = ContractAbi::new(vec![first, second]);
        let resolved = abi.find_method("mint").unwrap();
        assert_eq!(resolved.signature.as_deref(), Some("mint(address)"));
    }

    #[test]
    fn test_unknown_token_is_none() {
        let abi = ContractAbi::new(vec![function("mint", None)]);
        assert!(abi.find_method("burn").is_none());
    }

    #[test]
    fn test_constructor_lookup() {
        let ctor = MethodDescriptor {
            kind: MethodKind::Constructor,
            name: String::new(),
            signature: None,
            inputs: vec![AbiParam::new("supply", "uint256")],
            outputs: vec![],
            mutability: Mutability::Nonpayable,
        };
        let abi = ContractAbi::new(vec![function("mint", None), ctor]);

        let resolved = abi.constructor().unwrap();
        assert_eq!(resolved.inputs.len(), 1);

        let without = ContractAbi::new(vec![function("mint", None)]);
        assert!(without.constructor().is_none());
    }

    #[test]
    fn test_constructor_never_matches_method_token() {
        let ctor = MethodDescriptor {
            kind: MethodKind::Constructor,
            name: "setup".to_string(),
            signature: None,
            inputs: vec![],
            outputs: vec![],
            mutability: Mutability::Nonpayable,
        };
        let abi = ContractAbi::new(vec![ctor]);
        assert!(abi.find_method("setup").is_none());
    }
}
