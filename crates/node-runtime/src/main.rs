//! # DataLog-Chain Node
//!
//! Entry point of the commit node.
//!
//! ## Startup Sequence
//!
//! 1. Parse the command line, initialize logging
//! 2. Load `config.json` (absent is fine, unparsable is fatal), apply flags
//! 3. Optionally save the effective configuration
//! 4. Build the subsystems (ledger adapter, commit pipeline, batcher)
//! 5. Warm up: recipient keys, then the last committed entry
//! 6. Run the selected mode until input ends or Ctrl+C
//!
//! ## Shutdown Sequence
//!
//! 1. Flush the partial batch
//! 2. Give the uploader time to drain the queue
//! 3. Report anything left uncommitted

use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use dl_02_chain_commit::Predecessor;
use dl_03_record_batcher::{BenchmarkConfig, BenchmarkDriver};
use shared_crypto::{RecipientKeyPair, RecipientSecretKey};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use node_runtime::container::SubsystemContainer;
use node_runtime::ingest::ingest_lines;
use node_runtime::{Cli, Command, NodeConfig};

/// Time the uploader gets to drain the queue on shutdown.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);
const DRAIN_POLL: Duration = Duration::from_millis(100);

/// The node runtime driving one configured pipeline.
struct NodeRuntime {
    container: Arc<SubsystemContainer>,
}

impl NodeRuntime {
    fn new(config: NodeConfig) -> Result<Self> {
        info!("Creating DataLog-Chain node runtime");
        Ok(Self {
            container: Arc::new(SubsystemContainer::new(config)?),
        })
    }

    /// Load keys and chain state in the background; producers may enqueue
    /// meanwhile.
    fn start(&self) {
        info!("===========================================");
        info!("  DataLog-Chain Node v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");
        self.container.chain_commit.spawn_warm_up();
    }

    /// Commit records from stdin until end of input or Ctrl+C.
    async fn run_ingest(&self) -> Result<()> {
        let workstation = &self.container.config.workstation;
        info!(
            "Reading records from stdin (device {}, source {}:{})",
            self.container.config.log_options.network_device, workstation.ip, workstation.port
        );

        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        tokio::select! {
            result = ingest_lines(stdin, &self.container.batcher, &workstation.ip, Some(workstation.port)) => {
                result.context("Ingestion failed")?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
            }
        }
        Ok(())
    }

    /// Run the benchmark until Ctrl+C.
    async fn run_benchmark(&self, start_bytes: usize, step: usize) -> Result<()> {
        info!(
            "Starting benchmark at {} bytes, adding {} bytes per round",
            start_bytes, step
        );
        let config = BenchmarkConfig {
            start_bytes,
            step_bytes: step,
            ..BenchmarkConfig::default()
        };
        let driver = BenchmarkDriver::new(config, Arc::new(self.container.chain_commit.clone()));

        tokio::select! {
            _ = driver.run() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
            }
        }
        Ok(())
    }

    /// Print ledger head and chain head.
    async fn info(&self) -> Result<()> {
        let head = self
            .container
            .ledger
            .get_info()
            .await
            .context("Failed to read ledger info")?;
        println!("Chain id:        {}", head.chain_id);
        println!("Head block:      {}", head.head_block_num);
        println!("Irreversible:    {}", head.last_irreversible_block_num);

        let config = &self.container.config.blockchain;
        println!("Chain:           {}/{} on {}", config.scope, config.user, config.contract);
        match self
            .container
            .chain_commit
            .refresh_chain_state()
            .await
            .context("Failed to load the last chain entry")?
        {
            Predecessor::Entry(entry) => {
                if let Some(position) = &entry.this_ref {
                    println!("Last entry:      block {} trx {}", position.block, position.trx);
                }
                println!("Links to:        block {} trx {:?}", entry.ref_block, entry.ref_trx);
            }
            _ => println!("Last entry:      none (chain is empty)"),
        }
        Ok(())
    }

    /// Flush the batch and wait for the queue to drain.
    async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.container.batcher.flush() {
            error!("Failed to flush the last batch: {}", e);
        }

        let pipeline = &self.container.chain_commit;
        pipeline.retrigger();
        let drained = tokio::time::timeout(DRAIN_TIMEOUT, async {
            while pipeline.is_busy() {
                tokio::time::sleep(DRAIN_POLL).await;
            }
        })
        .await;

        match drained {
            Ok(()) => info!("All payloads committed"),
            Err(_) => warn!("{} payloads left uncommitted", pipeline.pending()),
        }
        info!("Shutdown complete");
    }
}

fn init_logging(filter: Option<&str>) -> Result<()> {
    let filter = match filter {
        Some(directives) => EnvFilter::try_new(directives).context("Invalid --log-level")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Load `config.json`, apply flags, save if asked.
fn load_config(cli: &Cli) -> Result<NodeConfig> {
    let mut config = match NodeConfig::load(&cli.config)? {
        Some(config) => {
            info!("Config file {} has been loaded", cli.config.display());
            config
        }
        None => {
            info!("No config file to read, using defaults");
            NodeConfig::default()
        }
    };
    cli.overrides.apply(&mut config);

    if cli.save {
        config.save(&cli.config)?;
        info!("Configuration saved to {}", cli.config.display());
    }
    Ok(config)
}

fn keygen(user_id: &str) -> Result<()> {
    let pair = RecipientKeyPair::generate(user_id).context("Key generation failed")?;
    println!("Secret key (keep private):\n{}", pair.secret_key().to_armored()?);
    println!("Public key (rPubKey of the permission row):\n{}", pair.public_key().to_armored()?);
    Ok(())
}

fn open_payload(key: &std::path::Path, input: Option<&std::path::Path>) -> Result<()> {
    let armored_key = std::fs::read_to_string(key)
        .with_context(|| format!("Can't read {}", key.display()))?;
    let secret = RecipientSecretKey::from_armored(&armored_key).context("Invalid secret key")?;

    let armored = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Can't read {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        }
    };

    let plaintext = shared_crypto::open(&armored, &secret).context("Can't decrypt payload")?;
    println!("{}", String::from_utf8_lossy(&plaintext));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;

    match cli.command.clone().unwrap_or(Command::Run) {
        Command::Keygen { user_id } => keygen(&user_id)?,
        Command::Open { key, input } => open_payload(&key, input.as_deref())?,
        Command::Info => {
            let runtime = NodeRuntime::new(load_config(&cli)?)?;
            runtime.info().await?;
        }
        Command::Benchmark { start_bytes, step } => {
            let runtime = NodeRuntime::new(load_config(&cli)?)?;
            runtime.start();
            runtime.run_benchmark(start_bytes, step).await?;
            runtime.shutdown().await;
        }
        Command::Run => {
            let runtime = NodeRuntime::new(load_config(&cli)?)?;
            runtime.start();
            runtime.run_ingest().await?;
            runtime.shutdown().await;
        }
    }

    Ok(())
}
