pub mod binder;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod transport;

pub use binder::{ArgumentBinding, Bindings, NOTES_BINDING, VALUE_BINDING};
pub use dispatch::{select_strategy, CallStrategy};
pub use engine::{InteractionEngine, MethodSelector};
pub use error::EngineError;
pub use lifecycle::{ExecutionOutcome, ExecutionState};
pub use transport::{
    AccountProvider, DeployedInstance, StaticAccount, Transport, TransportError, TxReceipt,
};
