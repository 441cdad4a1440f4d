//! MINTGATE command-line client.

mod config;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use mintgate_chains::{ChainError, ChainSessionManager, SwitchOutcome};
use mintgate_client::{HttpMintSubmitter, RpcWalletProvider, WsVerificationProvider};
use mintgate_types::{ChainId, ChainRegistry};
use mintgate_verification::{MintOutcome, ProviderEvent, VerificationPipeline, VerificationStatus};

use config::CliConfig;

#[derive(Parser)]
#[command(name = "mintgate", about = "MINTGATE wallet session and verification client")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "MINTGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Wallet bridge JSON-RPC endpoint.
    #[arg(long, env = "MINTGATE_WALLET_BRIDGE_URL")]
    wallet_bridge_url: Option<String>,

    /// Verification service WebSocket endpoint.
    #[arg(long, env = "MINTGATE_VERIFICATION_URL")]
    verification_url: Option<String>,

    /// Mint relayer HTTP endpoint.
    #[arg(long, env = "MINTGATE_MINT_RELAYER_URL")]
    mint_relayer_url: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "MINTGATE_LOG_LEVEL")]
    log_level: String,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// List the configured chains.
    Chains,
    /// Switch the wallet to another chain.
    Switch {
        /// Target chain id (decimal).
        #[arg(long)]
        chain: u64,
    },
    /// Run a verification session, optionally minting on success.
    Verify {
        /// Recipient address for the mint.
        #[arg(long)]
        recipient: String,

        /// Switch the wallet to this chain first (decimal id).
        #[arg(long)]
        chain: Option<u64>,

        /// Submit the mint once verification succeeds.
        #[arg(long)]
        mint: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    mintgate_utils::init_tracing(&cli.log_level);

    let file_config: Option<CliConfig> = if let Some(ref config_path) = cli.config {
        match CliConfig::from_toml_file(config_path) {
            Ok(cfg) => {
                tracing::info!("Loaded config from {}", config_path.display());
                Some(cfg)
            }
            Err(e) => {
                tracing::warn!("Failed to load config file: {e}, using defaults");
                None
            }
        }
    } else {
        None
    };

    let mut config = file_config.unwrap_or_default();
    if let Some(url) = cli.wallet_bridge_url {
        config.client.wallet_bridge_url = url;
    }
    if let Some(url) = cli.verification_url {
        config.client.verification_url = url;
    }
    if let Some(url) = cli.mint_relayer_url {
        config.client.mint_relayer_url = url;
    }

    let registry = config.registry()?;

    match cli.command {
        Command::Chains => list_chains(&registry),
        Command::Switch { chain } => run_switch(&config, &registry, ChainId::new(chain)).await?,
        Command::Verify {
            recipient,
            chain,
            mint,
        } => run_verify(&config, &registry, recipient, chain.map(ChainId::new), mint).await?,
    }

    Ok(())
}

fn list_chains(registry: &ChainRegistry) {
    for desc in registry.iter() {
        let explorer = desc
            .block_explorer_urls
            .first()
            .map(String::as_str)
            .unwrap_or("-");
        let policy = if desc.add_first { "add-first" } else { "direct" };
        println!(
            "{:>8}  {:>8}  {:<12}  {:<9}  {}",
            desc.id,
            desc.id.as_hex(),
            desc.name,
            policy,
            explorer
        );
    }
}

async fn run_switch(
    config: &CliConfig,
    registry: &ChainRegistry,
    target: ChainId,
) -> anyhow::Result<()> {
    let provider = Arc::new(RpcWalletProvider::from_config(&config.client)?);
    let manager = ChainSessionManager::new(
        registry.clone(),
        provider,
        ChainId::new(config.default_chain),
    )?;

    match manager.request_switch(target).await {
        Ok(SwitchOutcome::Switched) => println!("Switched to chain {target}."),
        Ok(SwitchOutcome::AlreadyActive) => println!("Chain {target} is already active."),
        Ok(SwitchOutcome::Cancelled) => println!("Switch declined in the wallet."),
        Ok(SwitchOutcome::AddedNotSwitched) => {
            println!("Chain {target} was added to the wallet; switch to it there to finish.")
        }
        Ok(SwitchOutcome::Busy) => println!("Another switch is in progress; retry shortly."),
        Err(ChainError::ChainNotConfigured(id)) => {
            anyhow::bail!("chain {id} is not configured; see `mintgate chains`")
        }
        Err(ChainError::Switch(report)) => anyhow::bail!("switch failed: {report}"),
    }
    Ok(())
}

async fn run_verify(
    config: &CliConfig,
    registry: &ChainRegistry,
    recipient: String,
    chain: Option<ChainId>,
    mint: bool,
) -> anyhow::Result<()> {
    if let Some(target) = chain {
        run_switch(config, registry, target).await?;
    }
    let active_chain = chain.unwrap_or(ChainId::new(config.default_chain));

    let provider = Arc::new(WsVerificationProvider::from_config(&config.client));
    let submitter = Arc::new(HttpMintSubmitter::from_config(&config.client)?);
    let pipeline = VerificationPipeline::new(provider, submitter);

    let mut handle = pipeline.start().await?;
    println!("Scan to verify:");
    println!("  {}", handle.scan_payload);

    while let Some(event) = handle.events.recv().await {
        match &event {
            ProviderEvent::RequestReceived => println!("Scan received; generating proofs..."),
            ProviderEvent::ProofProgress { count } => println!("  proofs: {count}"),
            ProviderEvent::Result(_) => {}
        }
        pipeline.handle_event(handle.token, event);
        if !pipeline.status().is_cancellable() {
            break;
        }
    }

    match pipeline.status() {
        VerificationStatus::Verified => println!("Verified."),
        VerificationStatus::Rejected => anyhow::bail!("verification rejected"),
        VerificationStatus::Duplicate => anyhow::bail!("this identity has already been verified"),
        VerificationStatus::Failed => {
            let message = pipeline
                .state()
                .error_message
                .unwrap_or_else(|| "verification failed".to_string());
            anyhow::bail!("{message}");
        }
        other => anyhow::bail!("verification service hung up (cycle left in {other:?})"),
    }

    if !mint {
        return Ok(());
    }

    match pipeline.mint(recipient).await? {
        MintOutcome::Minted(hash) => {
            println!("Minted: {hash}");
            if let Some(url) = registry
                .get(active_chain)
                .and_then(|desc| desc.explorer_tx_url(&hash))
            {
                println!("  {url}");
            }
        }
        MintOutcome::Failed(report) => anyhow::bail!("mint failed: {report}"),
        MintOutcome::Cancelled => println!("Mint declined in the wallet."),
    }

    Ok(())
}
