use crate::error::EngineError;
use helix_abi::MethodDescriptor;
use serde::{Deserialize, Serialize};

/// Synthetic binding carrying the native-currency amount for payable calls
pub const VALUE_BINDING: &str = "Value";

/// Synthetic binding carrying off-chain deployment notes; never sent on-chain
pub const NOTES_BINDING: &str = "Notes";

/// One editable argument slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentBinding {
    pub name: String,
    pub declared_type: String,
    pub value: String,
}

impl ArgumentBinding {
    fn new(name: String, declared_type: &str, value: &str) -> Self {
        Self {
            name,
            declared_type: declared_type.to_string(),
            value: value.to_string(),
        }
    }
}

/// The ordered argument bindings for a resolved method.
///
/// Layout is fixed at construction: an optional `Notes` slot first (deploy
/// only), then one slot per ABI input in ABI order, then an optional
/// `Value` slot (payable only). On-chain arguments are taken by position,
/// so an ABI input that happens to be named `Value` or `Notes` cannot
/// shadow the synthetic slots at dispatch time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    slots: Vec<ArgumentBinding>,
    inputs_start: usize,
    inputs_len: usize,
    has_value: bool,
}

impl Bindings {
    /// Build the binding list for a method. Unnamed ABI inputs are
    /// synthesized as `param<index>` from their zero-based position.
    pub fn for_method(method: &MethodDescriptor, deploying: bool, notes_seed: &str) -> Self {
        let mut slots = Vec::with_capacity(method.inputs.len() + 2);

        if deploying {
            slots.push(ArgumentBinding::new(
                NOTES_BINDING.to_string(),
                "text",
                notes_seed,
            ));
        }

        let inputs_start = slots.len();
        for (index, input) in method.inputs.iter().enumerate() {
            let name = if input.name.is_empty() {
                format!("param{}", index)
            } else {
                input.name.clone()
            };
            slots.push(ArgumentBinding::new(name, &input.ty, ""));
        }

        let has_value = method.mutability.is_payable();
        if has_value {
            slots.push(ArgumentBinding::new(VALUE_BINDING.to_string(), "wei", "0"));
        }

        Self {
            slots,
            inputs_start,
            inputs_len: method.inputs.len(),
            has_value,
        }
    }

    /// Set the value of the first binding matching `name`. Returns false if
    /// no binding matches; unknown names are ignored rather than an error.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        match self.slots.iter_mut().find(|b| b.name == name) {
            Some(binding) => {
                binding.value = value.to_string();
                true
            }
            None => false,
        }
    }

    /// Value of the first binding matching `name`, empty string if none
    pub fn get(&self, name: &str) -> String {
        self.slots
            .iter()
            .find(|b| b.name == name)
            .map(|b| b.value.clone())
            .unwrap_or_default()
    }

    pub fn all(&self) -> &[ArgumentBinding] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The declared-input argument values, in ABI order. Synthetic slots
    /// are excluded by position.
    pub fn call_args(&self) -> Vec<String> {
        self.slots[self.inputs_start..self.inputs_start + self.inputs_len]
            .iter()
            .map(|b| b.value.clone())
            .collect()
    }

    /// Parse the attached native-currency amount. Missing or empty means 0;
    /// anything unparseable fails before a transport is ever contacted.
    pub fn attached_value(&self) -> Result<u128, EngineError> {
        if !self.has_value {
            return Ok(0);
        }

        let text = self
            .slots
            .last()
            .map(|b| b.value.trim())
            .unwrap_or_default();
        if text.is_empty() {
            return Ok(0);
        }

        text.parse::<u128>()
            .map_err(|_| EngineError::InvalidValue(text.to_string()))
    }
}
