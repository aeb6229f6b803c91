use anyhow::{bail, Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use helix_abi::ContractAbi;
use helix_engine::{
    ExecutionOutcome, InteractionEngine, MethodSelector, StaticAccount, NOTES_BINDING,
    VALUE_BINDING,
};
use helix_registry::{ContractDescriptor, ContractRegistry};
use helix_rpc::{JsonRpcTransport, RpcConfig};

use crate::config::Config;

#[derive(Subcommand)]
pub enum ContractCommands {
    /// List contracts in the store
    List,

    /// Show a contract's interface
    Show {
        /// Contract name
        name: String,
    },

    /// Import a contract descriptor into the store
    Import {
        /// Contract name
        name: String,

        /// Path to the ABI JSON file
        #[arg(long)]
        abi: PathBuf,

        /// Path to the deployable bytecode (hex)
        #[arg(long)]
        bytecode: Option<PathBuf>,

        /// Content-addressed metadata pointer
        #[arg(long)]
        metadata: Option<String>,

        /// Free-text notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Query a contract without submitting a transaction
    Read {
        /// Contract name
        name: String,

        /// Method signature (e.g., "balanceOf(address)") or name
        method: String,

        /// Deployed contract address
        #[arg(long)]
        at: String,

        /// Method argument as name=value (repeatable)
        #[arg(long = "arg")]
        args: Vec<String>,
    },

    /// Invoke a contract method in a transaction
    Call {
        /// Contract name
        name: String,

        /// Method signature or name
        method: String,

        /// Deployed contract address
        #[arg(long)]
        at: String,

        /// Method argument as name=value (repeatable)
        #[arg(long = "arg")]
        args: Vec<String>,

        /// Value to send in wei (payable methods only)
        #[arg(long)]
        value: Option<String>,
    },

    /// Deploy a new contract instance
    Deploy {
        /// Contract name
        name: String,

        /// Constructor argument as name=value (repeatable)
        #[arg(long = "arg")]
        args: Vec<String>,

        /// Value to send in wei (payable constructors only)
        #[arg(long)]
        value: Option<String>,

        /// Deployment notes recorded off-chain
        #[arg(long)]
        notes: Option<String>,
    },

    /// List deployment records
    Deployed,
}

pub async fn execute(cmd: ContractCommands, config: &Config) -> Result<()> {
    match cmd {
        ContractCommands::List => list_contracts(config).await?,
        ContractCommands::Show { name } => show_contract(config, &name).await?,
        ContractCommands::Import {
            name,
            abi,
            bytecode,
            metadata,
            notes,
        } => import_contract(config, name, abi, bytecode, metadata, notes).await?,
        ContractCommands::Read {
            name,
            method,
            at,
            args,
        } => run_method(config, name, method, at, args, None).await?,
        ContractCommands::Call {
            name,
            method,
            at,
            args,
            value,
        } => run_method(config, name, method, at, args, value).await?,
        ContractCommands::Deploy {
            name,
            args,
            value,
            notes,
        } => deploy_contract(config, name, args, value, notes).await?,
        ContractCommands::Deployed => list_deployed(config).await?,
    }
    Ok(())
}

fn rpc_config(config: &Config) -> RpcConfig {
    RpcConfig {
        endpoint: config.rpc_endpoint.clone(),
        gas_price: config.gas_price,
        gas_limit: config.gas_limit,
        ..RpcConfig::default()
    }
}

async fn open_registry(config: &Config) -> Result<Arc<ContractRegistry>> {
    let registry = ContractRegistry::load(&config.store_path)
        .await
        .with_context(|| format!("Failed to load contract store {:?}", config.store_path))?;
    Ok(Arc::new(registry))
}

fn build_engine(
    config: &Config,
    registry: Arc<ContractRegistry>,
    name: &str,
) -> InteractionEngine {
    InteractionEngine::new(
        registry,
        Arc::new(JsonRpcTransport::new(rpc_config(config))),
        Arc::new(StaticAccount(config.default_account.clone())),
        name,
    )
}

/// Parse repeated `name=value` argument flags
fn parse_kv(args: &[String]) -> Result<Vec<(String, String)>> {
    args.iter()
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) if !name.is_empty() => {
                Ok((name.to_string(), value.to_string()))
            }
            _ => bail!("Invalid argument {:?}, expected name=value", pair),
        })
        .collect()
}

async fn apply_bindings(engine: &InteractionEngine, pairs: &[(String, String)]) -> Result<()> {
    for (name, value) in pairs {
        if !engine.set_binding(name, value).await {
            bail!("Method has no parameter named {:?}", name);
        }
    }
    Ok(())
}

async fn apply_value(engine: &InteractionEngine, value: Option<String>) -> Result<()> {
    if let Some(value) = value {
        if !engine.set_binding(VALUE_BINDING, &value).await {
            bail!("Method is not payable, --value cannot be used");
        }
    }
    Ok(())
}

async fn report_outcome(engine: &InteractionEngine) -> Result<()> {
    match engine.outcome().await {
        Some(ExecutionOutcome::ReadResult(value)) => {
            println!("{}", "✓ Query complete".green());
            println!("Result: {}", value.to_string().cyan());
        }
        Some(ExecutionOutcome::Receipt(receipt)) => {
            println!("{}", "✓ Transaction confirmed".green().bold());
            println!("Transaction: {}", receipt.transaction_hash.cyan());
            if let Some(gas) = receipt.gas_used {
                println!("Gas Used: {}", gas);
            }
            if let Some(block) = receipt.block_number {
                println!("Block: {}", block);
            }
        }
        Some(ExecutionOutcome::Deployed(record)) => {
            println!("{}", "✓ Contract deployed successfully".green().bold());
            println!("Address: {}", record.address.cyan().bold());
            if !record.metadata.is_empty() {
                println!("Metadata: {}", record.metadata);
            }
        }
        Some(ExecutionOutcome::Failed(e)) => bail!("Execution failed: {}", e),
        None => bail!("Execution produced no outcome"),
    }
    Ok(())
}

async fn list_contracts(config: &Config) -> Result<()> {
    let registry = open_registry(config).await?;
    let names = registry.names().await;

    if names.is_empty() {
        println!("{}", "No contracts in store".yellow());
        return Ok(());
    }

    for name in names {
        println!("{}", name);
    }
    Ok(())
}

async fn show_contract(config: &Config, name: &str) -> Result<()> {
    let registry = open_registry(config).await?;
    let descriptor = registry
        .contract(name)
        .await
        .with_context(|| format!("Contract {:?} not in store", name))?;

    println!("{}", descriptor.name.bold());
    if !descriptor.metadata.is_empty() {
        println!("Metadata: {}", descriptor.metadata);
    }
    if !descriptor.notes.is_empty() {
        println!("Notes: {}", descriptor.notes);
    }

    println!("\n{}", "Interface:".bold());
    if let Some(ctor) = descriptor.abi.constructor() {
        println!("  {}", ctor.display());
    }
    for method in descriptor.abi.functions() {
        println!("  {}", method.display());
    }
    Ok(())
}

async fn import_contract(
    config: &Config,
    name: String,
    abi_path: PathBuf,
    bytecode_path: Option<PathBuf>,
    metadata: Option<String>,
    notes: Option<String>,
) -> Result<()> {
    let abi_json = fs::read_to_string(&abi_path)
        .with_context(|| format!("Failed to read ABI file {:?}", abi_path))?;
    let abi = ContractAbi::parse(&abi_json)
        .with_context(|| format!("Failed to parse ABI from {:?}", abi_path))?;

    let bytecode = match bytecode_path {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read bytecode file {:?}", path))?;
            content.trim().trim_start_matches("0x").to_string()
        }
        None => String::new(),
    };

    let registry = open_registry(config).await?;
    registry
        .insert(ContractDescriptor {
            name: name.clone(),
            abi,
            bytecode,
            metadata: metadata.unwrap_or_default(),
            notes: notes.unwrap_or_default(),
        })
        .await?;
    registry.save(&config.store_path).await?;

    println!("{} {}", "✓ Imported".green(), name.cyan());
    Ok(())
}

async fn run_method(
    config: &Config,
    name: String,
    method: String,
    at: String,
    args: Vec<String>,
    value: Option<String>,
) -> Result<()> {
    let pairs = parse_kv(&args)?;
    let registry = open_registry(config).await?;

    let engine = build_engine(config, registry, &name);
    engine.set_target(Some(at)).await;

    let resolved = engine.resolve(&MethodSelector::Token(method.clone())).await?;
    if !resolved {
        bail!("Contract {:?} not in store; import it first", name);
    }

    apply_bindings(&engine, &pairs).await?;
    apply_value(&engine, value).await?;

    println!("{}", format!("Executing {}...", method).cyan());
    engine.execute().await;
    report_outcome(&engine).await
}

async fn deploy_contract(
    config: &Config,
    name: String,
    args: Vec<String>,
    value: Option<String>,
    notes: Option<String>,
) -> Result<()> {
    let pairs = parse_kv(&args)?;
    let registry = open_registry(config).await?;

    if registry.contract(&name).await.is_none() {
        bail!("Contract {:?} not in store; import it first", name);
    }

    let engine = build_engine(config, registry.clone(), &name).with_deploy_hook(Box::new(
        |label| {
            println!("{} {}", "✓ Deployed:".green().bold(), label.cyan());
        },
    ));

    let resolved = engine.resolve(&MethodSelector::Constructor).await?;
    if !resolved {
        bail!("Contract {:?} has no constructor; deployment unsupported", name);
    }

    apply_bindings(&engine, &pairs).await?;
    apply_value(&engine, value).await?;
    if let Some(notes) = notes {
        engine.set_binding(NOTES_BINDING, &notes).await;
    }

    println!("{}", "Deploying contract...".cyan());
    engine.execute().await;
    report_outcome(&engine).await?;

    registry
        .save(&config.store_path)
        .await
        .context("Failed to persist deployment record")?;
    Ok(())
}

async fn list_deployed(config: &Config) -> Result<()> {
    let registry = open_registry(config).await?;
    let records = registry.deployed().await;

    if records.is_empty() {
        println!("{}", "No deployment records".yellow());
        return Ok(());
    }

    println!("{} {}", records.len(), "deployment record(s)".bold());
    for record in records {
        if record.notes.is_empty() {
            println!("- {} @ {}", record.name, record.address.cyan());
        } else {
            println!(
                "- {} @ {} ({})",
                record.name,
                record.address.cyan(),
                record.notes
            );
        }
    }
    Ok(())
}
