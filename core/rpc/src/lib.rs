pub mod client;
pub mod codec;

pub use client::{JsonRpcTransport, RpcConfig};
