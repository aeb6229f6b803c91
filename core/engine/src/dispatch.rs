use helix_abi::MethodDescriptor;

/// How an execution reaches the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStrategy {
    /// Query without a transaction; returns a decoded value
    Read,
    /// State-changing transaction; resolves to a receipt
    Write,
    /// Bytecode deployment; always a write
    Deploy,
}

/// Pick the execution strategy for a resolved method. Pure function of the
/// method, the mode, and the attached value; evaluated once per execute.
pub fn select_strategy(
    method: &MethodDescriptor,
    deploying: bool,
    attached_value: u128,
) -> CallStrategy {
    if deploying {
        return CallStrategy::Deploy;
    }

    if attached_value == 0 && (method.inputs.is_empty() || method.mutability.is_readonly()) {
        CallStrategy::Read
    } else {
        CallStrategy::Write
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_abi::{AbiParam, MethodDescriptor, MethodKind, Mutability};

    fn method(inputs: Vec<AbiParam>, mutability: Mutability) -> MethodDescriptor {
        MethodDescriptor {
            kind: MethodKind::Function,
            name: "m".to_string(),
            signature: None,
            inputs,
            outputs: vec![],
            mutability,
        }
    }

    #[test]
    fn test_view_with_inputs_is_read() {
        let m = method(vec![AbiParam::new("who", "address")], Mutability::View);
        assert_eq!(select_strategy(&m, false, 0), CallStrategy::Read);
    }

    #[test]
    fn test_pure_no_inputs_is_read() {
        let m = method(vec![], Mutability::Pure);
        assert_eq!(select_strategy(&m, false, 0), CallStrategy::Read);
    }

    #[test]
    fn test_nonpayable_no_inputs_is_read() {
        // Zero declared inputs alone selects the read path, whatever the
        // declared mutability.
        let m = method(vec![], Mutability::Nonpayable);
        assert_eq!(select_strategy(&m, false, 0), CallStrategy::Read);
    }

    #[test]
    fn test_nonpayable_with_inputs_is_write() {
        let m = method(vec![AbiParam::new("to", "address")], Mutability::Nonpayable);
        assert_eq!(select_strategy(&m, false, 0), CallStrategy::Write);
    }

    #[test]
    fn test_nonzero_value_forces_write() {
        let m = method(vec![], Mutability::Payable);
        assert_eq!(select_strategy(&m, false, 1), CallStrategy::Write);
        assert_eq!(select_strategy(&m, false, 0), CallStrategy::Read);
    }

    #[test]
    fn test_deploying_supersedes_everything() {
        let m = method(vec![], Mutability::View);
        assert_eq!(select_strategy(&m, true, 0), CallStrategy::Deploy);
    }
}
