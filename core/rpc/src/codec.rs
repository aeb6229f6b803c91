//! Static-type call encoding and heuristic result decoding.
//!
//! Covers the static subset of the ABI encoding: address, bool, bytes32,
//! and uint{8..256}. Dynamic types (string, bytes, arrays) are rejected;
//! callers needing them must pre-encode off-line.

use helix_abi::MethodDescriptor;
use helix_engine::TransportError;
use sha3::{Digest, Keccak256};

/// 4-byte function selector from a canonical signature
pub fn selector(signature: &str) -> [u8; 4] {
    let mut hasher = Keccak256::new();
    hasher.update(signature.as_bytes());
    let hash = hasher.finalize();
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash[..4]);
    out
}

/// Encode a method call: selector + one 32-byte word per argument,
/// 0x-prefixed hex.
pub fn encode_call(method: &MethodDescriptor, args: &[String]) -> Result<String, TransportError> {
    let signature = method.canonical_signature();
    let words = encode_words(method, args)?;

    let mut out = Vec::with_capacity(4 + words.len());
    out.extend_from_slice(&selector(&signature));
    out.extend_from_slice(&words);
    Ok(format!("0x{}", hex::encode(out)))
}

/// Encode constructor arguments for appending after deployment bytecode.
/// No selector; plain hex without the 0x prefix.
pub fn encode_constructor_args(
    constructor: &MethodDescriptor,
    args: &[String],
) -> Result<String, TransportError> {
    Ok(hex::encode(encode_words(constructor, args)?))
}

fn encode_words(method: &MethodDescriptor, args: &[String]) -> Result<Vec<u8>, TransportError> {
    if args.len() != method.inputs.len() {
        return Err(TransportError(format!(
            "argument count mismatch: expected {}, got {}",
            method.inputs.len(),
            args.len()
        )));
    }

    let mut encoded = Vec::with_capacity(args.len() * 32);
    for (input, value) in method.inputs.iter().zip(args.iter()) {
        let word = encode_word(&input.ty.to_lowercase(), value.trim())?;
        encoded.extend_from_slice(&word);
    }
    Ok(encoded)
}

fn encode_word(ty: &str, value: &str) -> Result<[u8; 32], TransportError> {
    let mut word = [0u8; 32];

    match ty {
        // address: 20 bytes, left-padded to 32
        "address" => {
            let bytes = hex::decode(value.trim_start_matches("0x"))
                .map_err(|e| TransportError(format!("invalid address hex: {}", e)))?;
            if bytes.len() != 20 {
                return Err(TransportError(
                    "address must be 20 bytes (40 hex chars)".to_string(),
                ));
            }
            word[12..32].copy_from_slice(&bytes);
        }
        // bool: 0 or 1 in the last byte
        "bool" => match value.to_lowercase().as_str() {
            "true" | "1" => word[31] = 1,
            "false" | "0" | "" => {}
            other => {
                return Err(TransportError(format!(
                    "bool must be true/false or 0/1, got {:?}",
                    other
                )))
            }
        },
        // bytes32: up to 32 bytes, right-padded with zeros
        "bytes32" => {
            let bytes = hex::decode(value.trim_start_matches("0x"))
                .map_err(|e| TransportError(format!("invalid bytes32 hex: {}", e)))?;
            if bytes.len() > 32 {
                return Err(TransportError("bytes32 must be <= 32 bytes".to_string()));
            }
            word[..bytes.len()].copy_from_slice(&bytes);
        }
        ty if ty.starts_with("uint") => {
            let bits: u16 = ty[4..].parse().unwrap_or(256);
            if bits == 0 || bits % 8 != 0 || bits > 256 {
                return Err(TransportError(format!("unsupported uint size: {}", bits)));
            }

            if let Some(stripped) = value.strip_prefix("0x") {
                let bytes = hex::decode(stripped)
                    .map_err(|e| TransportError(format!("invalid uint hex: {}", e)))?;
                if bytes.len() > 32 {
                    return Err(TransportError("uint hex too large (max 32 bytes)".to_string()));
                }
                word[32 - bytes.len()..32].copy_from_slice(&bytes);
            } else {
                let parsed = value
                    .parse::<u128>()
                    .map_err(|e| TransportError(format!("invalid uint decimal {:?}: {}", value, e)))?;
                word[16..32].copy_from_slice(&parsed.to_be_bytes());
            }
        }
        "string" | "bytes" => {
            return Err(TransportError(
                "dynamic types (string, bytes) are not supported by this encoder".to_string(),
            ))
        }
        other => {
            return Err(TransportError(format!(
                "unsupported type in signature: {}",
                other
            )))
        }
    }

    Ok(word)
}

/// Best-effort decoding of an eth_call result. Single-word payloads decode
/// as uint, printable payloads as text; anything else passes through raw.
pub fn decode_result(data: &str) -> serde_json::Value {
    let stripped = data.trim_start_matches("0x");

    // Single 32-byte word: try uint first
    if stripped.len() == 64 {
        let digits = stripped.trim_start_matches('0');
        if digits.is_empty() {
            return serde_json::json!(0);
        }
        if let Ok(value) = u128::from_str_radix(digits, 16) {
            if value <= u64::MAX as u128 {
                return serde_json::json!(value as u64);
            }
            return serde_json::json!(value.to_string());
        }
    }

    if let Ok(bytes) = hex::decode(stripped) {
        if let Ok(text) = String::from_utf8(bytes) {
            let trimmed = text.trim_matches('\0').trim();
            if !trimmed.is_empty()
                && trimmed
                    .chars()
                    .all(|c| c.is_ascii_graphic() || c.is_ascii_whitespace())
            {
                return serde_json::json!(trimmed);
            }
        }
    }

    serde_json::json!(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_abi::{AbiParam, MethodDescriptor, MethodKind, Mutability};

    fn method(name: &str, inputs: Vec<AbiParam>) -> MethodDescriptor {
        MethodDescriptor {
            kind: MethodKind::Function,
            name: name.to_string(),
            signature: None,
            inputs,
            outputs: vec![],
            mutability: Mutability::Nonpayable,
        }
    }

    #[test]
    fn test_encode_transfer_address_uint256() {
        let addr = "0x1111111111111111111111111111111111111111";
        let m = method(
            "transfer",
            vec![AbiParam::new("to", "address"), AbiParam::new("amount", "uint256")],
        );
        let out = encode_call(&m, &[addr.to_string(), "1000".to_string()]).expect("encode");

        // selector correctness
        let expected = hex::encode(selector("transfer(address,uint256)"));
        assert!(out.starts_with(&format!("0x{}", expected)));

        // length = 4 bytes selector + 2 words
        let expected_hex_len = 2 + (4 + 32 + 32) * 2;
        assert_eq!(out.len(), expected_hex_len);

        // address is left-padded into the first word after the selector
        let first_word_hex = &out[10..10 + 64];
        assert_eq!(&first_word_hex[24..], &addr[2..]);

        // 1000 = 0x3e8 right-aligned in the second word
        let second_word_hex = &out[10 + 64..];
        assert!(second_word_hex.ends_with("3e8"));
    }

    #[test]
    fn test_encode_bool_and_bytes32() {
        let bytes32 = format!("0x{}", "aa".repeat(32));
        let m = method(
            "setFlagAndHash",
            vec![AbiParam::new("flag", "bool"), AbiParam::new("hash", "bytes32")],
        );
        let out = encode_call(&m, &["true".to_string(), bytes32]).expect("encode");

        let expected_hex_len = 2 + (4 + 32 + 32) * 2;
        assert_eq!(out.len(), expected_hex_len);

        let bool_word = &out[10..10 + 64];
        assert!(bool_word.ends_with("01"));
    }

    #[test]
    fn test_encode_uint_hex_text() {
        let m = method("set", vec![AbiParam::new("x", "uint256")]);
        let out = encode_call(&m, &["0xff".to_string()]).unwrap();
        assert!(out.ends_with("ff"));
    }

    #[test]
    fn test_encode_rejects_arity_mismatch() {
        let m = method("set", vec![AbiParam::new("x", "uint256")]);
        assert!(encode_call(&m, &[]).is_err());
    }

    #[test]
    fn test_encode_rejects_dynamic_types() {
        let m = method("set", vec![AbiParam::new("s", "string")]);
        assert!(encode_call(&m, &["hello".to_string()]).is_err());
    }

    #[test]
    fn test_constructor_args_have_no_selector() {
        let ctor = MethodDescriptor {
            kind: MethodKind::Constructor,
            name: String::new(),
            signature: None,
            inputs: vec![AbiParam::new("supply", "uint256")],
            outputs: vec![],
            mutability: Mutability::Nonpayable,
        };
        let out = encode_constructor_args(&ctor, &["7".to_string()]).unwrap();
        assert_eq!(out.len(), 64);
        assert!(out.ends_with("07"));
    }

    #[test]
    fn test_decode_uint_word() {
        let word = format!("0x{:064x}", 1_000_000u64);
        assert_eq!(decode_result(&word), serde_json::json!(1_000_000u64));
    }

    #[test]
    fn test_decode_printable_text() {
        let data = format!("0x{}", hex::encode("HelixToken"));
        assert_eq!(decode_result(&data), serde_json::json!("HelixToken"));
    }

    #[test]
    fn test_decode_opaque_passthrough() {
        let data = "0x0102";
        assert_eq!(decode_result(data), serde_json::json!("0x0102"));
    }
}
