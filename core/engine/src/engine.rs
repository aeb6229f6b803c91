use crate::binder::{Bindings, NOTES_BINDING};
use crate::dispatch::{select_strategy, CallStrategy};
use crate::error::EngineError;
use crate::lifecycle::{ExecutionOutcome, ExecutionState};
use crate::transport::{AccountProvider, Transport};
use helix_abi::MethodDescriptor;
use helix_registry::{ContractDescriptor, ContractRegistry, DeployedContractRecord};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// What the engine should resolve against the contract's ABI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodSelector {
    /// Deployment mode: the contract's constructor
    Constructor,
    /// Execution mode: a method signature or name
    Token(String),
}

/// Notification fired after a successful deployment, carrying the notes
/// text if non-empty, else the new address.
pub type DeployHook = Box<dyn Fn(&str) + Send + Sync>;

struct Resolved {
    descriptor: ContractDescriptor,
    method: MethodDescriptor,
}

struct EngineState {
    resolved: Option<Resolved>,
    deploying: bool,
    target: Option<String>,
    bindings: Bindings,
    state: ExecutionState,
    outcome: Option<ExecutionOutcome>,
}

/// One contract-interaction session: resolves a method, holds its argument
/// bindings, dispatches executions, and tracks the lifecycle.
///
/// Handles are `Arc`-shared; all mutation goes through the interior lock.
/// At most one dispatch is in flight per engine — `execute` while `Loading`
/// is a no-op. The transport is awaited with no lock held.
pub struct InteractionEngine {
    registry: Arc<ContractRegistry>,
    transport: Arc<dyn Transport>,
    accounts: Arc<dyn AccountProvider>,
    contract: String,
    on_deploy: Option<DeployHook>,
    inner: RwLock<EngineState>,
}

impl InteractionEngine {
    pub fn new(
        registry: Arc<ContractRegistry>,
        transport: Arc<dyn Transport>,
        accounts: Arc<dyn AccountProvider>,
        contract: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            transport,
            accounts,
            contract: contract.into(),
            on_deploy: None,
            inner: RwLock::new(EngineState {
                resolved: None,
                deploying: false,
                target: None,
                bindings: Bindings::default(),
                state: ExecutionState::Loading,
                outcome: None,
            }),
        }
    }

    /// Register the deployment notification hook
    pub fn with_deploy_hook(mut self, hook: DeployHook) -> Self {
        self.on_deploy = Some(hook);
        self
    }

    pub fn contract_name(&self) -> &str {
        &self.contract
    }

    /// Resolve the selector against the registry.
    ///
    /// Returns `Ok(false)` when the descriptor (or, in deployment mode, a
    /// constructor) is not yet available — the engine stays in its current
    /// state and the caller retries on the next update. A token that is
    /// present in the registry but absent from the ABI is a hard failure.
    ///
    /// Re-resolving the currently bound method is a no-op: in-progress
    /// binding edits survive. Resolving a different method replaces it and
    /// resets bindings, outcome, and state.
    pub async fn resolve(&self, selector: &MethodSelector) -> Result<bool, EngineError> {
        let Some(descriptor) = self.registry.contract(&self.contract).await else {
            debug!("Contract {} not in registry yet", self.contract);
            return Ok(false);
        };

        let (method, deploying) = match selector {
            MethodSelector::Constructor => match descriptor.abi.constructor() {
                Some(ctor) => (ctor.clone(), true),
                None => {
                    debug!("Contract {} has no constructor entry", self.contract);
                    return Ok(false);
                }
            },
            MethodSelector::Token(token) => match descriptor.abi.find_method(token) {
                Some(found) => (found.clone(), false),
                None => return Err(EngineError::NotFound(token.clone())),
            },
        };

        let mut inner = self.inner.write().await;

        if let Some(current) = &inner.resolved {
            if current.method.identity() == method.identity() {
                return Ok(true);
            }
        }

        info!(
            "Resolved {} :: {}",
            self.contract,
            if deploying { "constructor" } else { method.identity() }
        );

        inner.bindings = Bindings::for_method(&method, deploying, &descriptor.notes);
        inner.deploying = deploying;
        inner.resolved = Some(Resolved { descriptor, method });
        inner.outcome = None;
        inner.state = ExecutionState::Idle;

        Ok(true)
    }

    /// Run one execution: strategy selection, preconditions, dispatch, and
    /// lifecycle transitions. Returns the state after the attempt.
    ///
    /// Calling while a dispatch is in flight (state `Loading`) is rejected
    /// as a no-op; exactly one dispatch runs at a time. Failures surface as
    /// the `Error` state with the typed error as the outcome — this method
    /// never propagates them.
    pub async fn execute(&self) -> ExecutionState {
        // Claim the single in-flight slot and snapshot everything the
        // dispatch needs, so the transport is awaited lock-free.
        let (descriptor, method, bindings, deploying, target, identity) = {
            let mut inner = self.inner.write().await;

            if !inner.state.accepts_execute() {
                debug!("execute rejected: dispatch already in flight");
                return inner.state;
            }

            let Some(resolved) = &inner.resolved else {
                return inner.state;
            };

            let identity = resolved.method.identity().to_string();
            let snapshot = (
                resolved.descriptor.clone(),
                resolved.method.clone(),
                inner.bindings.clone(),
                inner.deploying,
                inner.target.clone(),
                identity,
            );

            inner.state = ExecutionState::Loading;
            inner.outcome = None;
            snapshot
        };

        let result = self
            .dispatch(&descriptor, &method, &bindings, deploying, target.as_deref())
            .await;

        let mut inner = self.inner.write().await;

        // A resolve may have replaced the method while the dispatch was in
        // flight; its outcome belongs to the old method and must not be
        // committed into the new one's state.
        let still_current = inner
            .resolved
            .as_ref()
            .map(|r| r.method.identity() == identity)
            .unwrap_or(false);
        if !still_current {
            debug!("Discarding outcome of stale dispatch for {}", identity);
            return inner.state;
        }

        match result {
            Ok(outcome) => {
                inner.state = ExecutionState::Success;
                inner.outcome = Some(outcome);
            }
            Err(e) => {
                warn!("Execution of {} failed: {}", identity, e);
                inner.state = ExecutionState::Error;
                inner.outcome = Some(ExecutionOutcome::Failed(e));
            }
        }
        inner.state
    }

    async fn dispatch(
        &self,
        descriptor: &ContractDescriptor,
        method: &MethodDescriptor,
        bindings: &Bindings,
        deploying: bool,
        target: Option<&str>,
    ) -> Result<ExecutionOutcome, EngineError> {
        // Preconditions, in order, before any network interaction
        let from = self
            .accounts
            .current_account()
            .ok_or(EngineError::NoAuthenticatedUser)?;

        let to = if deploying {
            String::new()
        } else {
            target.ok_or(EngineError::NoTargetAddress)?.to_string()
        };

        let value = bindings.attached_value()?;
        let strategy = select_strategy(method, deploying, value);
        let args = bindings.call_args();

        info!(
            "Dispatching {} via {:?} strategy ({} args, value {})",
            method.identity(),
            strategy,
            args.len(),
            value
        );

        match strategy {
            CallStrategy::Read => {
                let result = self
                    .transport
                    .call(&to, method, &args)
                    .await
                    .map_err(|e| EngineError::Transport(e.0))?;
                Ok(ExecutionOutcome::ReadResult(result))
            }
            CallStrategy::Write => {
                let receipt = self
                    .transport
                    .send(&to, method, &args, &from, value)
                    .await
                    .map_err(|e| EngineError::Transport(e.0))?;
                Ok(ExecutionOutcome::Receipt(receipt))
            }
            CallStrategy::Deploy => {
                let instance = self
                    .transport
                    .deploy(&descriptor.bytecode, method, &args, &from, value)
                    .await
                    .map_err(|e| EngineError::Transport(e.0))?;

                let record = self
                    .registry
                    .add_deployed(DeployedContractRecord {
                        metadata: descriptor.metadata.clone(),
                        name: descriptor.name.clone(),
                        address: instance.address.clone(),
                        bytecode: descriptor.bytecode.clone(),
                        abi: descriptor.abi.clone(),
                        notes: bindings.get(NOTES_BINDING),
                        deployed_at: 0,
                    })
                    .await;

                info!("Contract {} deployed at {}", record.name, record.address);

                if let Some(hook) = &self.on_deploy {
                    let label = if record.notes.is_empty() {
                        record.address.as_str()
                    } else {
                        record.notes.as_str()
                    };
                    hook(label);
                }

                Ok(ExecutionOutcome::Deployed(record))
            }
        }
    }

    /// Set an argument binding by name. Rejected (returns false) while a
    /// dispatch is in flight or when no binding matches.
    pub async fn set_binding(&self, name: &str, value: &str) -> bool {
        let mut inner = self.inner.write().await;
        if inner.state == ExecutionState::Loading {
            return false;
        }
        inner.bindings.set(name, value)
    }

    /// Value of a binding by name, empty string if none matches
    pub async fn binding(&self, name: &str) -> String {
        self.inner.read().await.bindings.get(name)
    }

    pub async fn bindings(&self) -> Vec<crate::binder::ArgumentBinding> {
        self.inner.read().await.bindings.all().to_vec()
    }

    /// The currently bound method, if resolution has succeeded
    pub async fn method(&self) -> Option<MethodDescriptor> {
        self.inner
            .read()
            .await
            .resolved
            .as_ref()
            .map(|r| r.method.clone())
    }

    pub async fn state(&self) -> ExecutionState {
        self.inner.read().await.state
    }

    pub async fn outcome(&self) -> Option<ExecutionOutcome> {
        self.inner.read().await.outcome.clone()
    }

    /// Target address for execution mode
    pub async fn set_target(&self, address: Option<String>) {
        self.inner.write().await.target = address;
    }

    pub async fn target(&self) -> Option<String> {
        self.inner.read().await.target.clone()
    }
}
