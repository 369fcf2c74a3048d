//! # Command Line
//!
//! Flags override `config.json`; `--save` writes the merged result back.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::container::NodeConfig;

/// DataLog-Chain node: commits log records to a ledger as a linked chain.
#[derive(Parser, Debug)]
#[command(name = "datalog-node", version)]
#[command(about = "Commit log records to a ledger as a tamper-evident chain")]
pub struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = "config.json")]
    pub config: PathBuf,

    /// Save the effective configuration to the configuration file
    #[arg(long, global = true)]
    pub save: bool,

    /// Log filter (e.g. `info`, `debug`, `dl_02_chain_commit=debug`); overrides RUST_LOG
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Configuration overrides
    #[command(flatten)]
    pub overrides: ConfigOverrides,

    /// Mode; `run` when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Node modes.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Commit records read line by line from stdin
    Run,
    /// Measure commit throughput with growing synthetic payloads
    Benchmark {
        /// Payload size of the first round in bytes
        #[arg(long, default_value_t = 20_000)]
        start_bytes: usize,
        /// Bytes added after every round
        #[arg(long, default_value_t = 1_000)]
        step: usize,
    },
    /// Show ledger head and the last committed entry
    Info,
    /// Create an OpenPGP reader key pair for the permission table
    Keygen {
        /// User id of the key, e.g. `Reader <reader@hospital1.example>`
        #[arg(long, default_value = "datalog-reader")]
        user_id: String,
    },
    /// Decrypt a committed payload with a reader secret key
    Open {
        /// File holding the reader's armored OpenPGP secret key
        #[arg(long)]
        key: PathBuf,
        /// File holding the armored payload; stdin when omitted
        input: Option<PathBuf>,
    },
}

/// Flags mirroring configuration fields.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// Chain API endpoint (`memory://` for a dry run)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,
    /// Signing relay endpoint for submissions
    #[arg(long, global = true)]
    pub transact_endpoint: Option<String>,
    /// Contract account
    #[arg(long, global = true)]
    pub contract: Option<String>,
    /// Chain scope
    #[arg(long, global = true)]
    pub scope: Option<String>,
    /// Writer account
    #[arg(long, global = true)]
    pub user: Option<String>,
    /// Upper bound of the cold-start block-scan
    #[arg(long, global = true)]
    pub max_scan_blocks: Option<u64>,
    /// Encrypt payloads (true/false)
    #[arg(long, global = true)]
    pub encrypt: Option<bool>,
    /// Records per commit
    #[arg(long, global = true)]
    pub max_records_per_trx: Option<usize>,
    /// Payload bytes per commit
    #[arg(long, global = true)]
    pub max_trx_content_size: Option<usize>,
    /// Capture device label
    #[arg(long, global = true)]
    pub network_device: Option<String>,
    /// Workstation IP
    #[arg(long = "ws-ip", global = true)]
    pub ws_ip: Option<String>,
    /// Workstation port
    #[arg(long = "ws-port", global = true)]
    pub ws_port: Option<u16>,
}

impl ConfigOverrides {
    /// Apply every flag that was given.
    pub fn apply(&self, config: &mut NodeConfig) {
        let chain = &mut config.blockchain;
        set(&mut chain.endpoint, &self.endpoint);
        set(&mut chain.transact_endpoint, &self.transact_endpoint);
        set(&mut chain.contract, &self.contract);
        set(&mut chain.scope, &self.scope);
        set(&mut chain.user, &self.user);
        set(&mut chain.max_scan_blocks, &self.max_scan_blocks);

        let log = &mut config.log_options;
        set(&mut log.should_encrypt, &self.encrypt);
        set(&mut log.max_records_per_trx, &self.max_records_per_trx);
        set(&mut log.max_trx_content_size, &self.max_trx_content_size);
        set(&mut log.network_device, &self.network_device);

        set(&mut config.workstation.ip, &self.ws_ip);
        set(&mut config.workstation.port, &self.ws_port);
    }
}

fn set<T: Clone>(field: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *field = value.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_run() {
        let cli = Cli::try_parse_from(["datalog-node"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.config, PathBuf::from("config.json"));
        assert!(!cli.save);
    }

    #[test]
    fn test_benchmark_flags() {
        let cli = Cli::try_parse_from([
            "datalog-node",
            "benchmark",
            "--start-bytes",
            "500",
            "--step",
            "10",
            "--endpoint",
            "memory://",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Benchmark {
                start_bytes: 500,
                step: 10
            })
        );
        assert_eq!(cli.overrides.endpoint.as_deref(), Some("memory://"));
    }

    #[test]
    fn test_overrides_apply() {
        let cli = Cli::try_parse_from([
            "datalog-node",
            "--encrypt",
            "false",
            "--user",
            "op.room2",
            "--ws-port",
            "7000",
            "run",
        ])
        .unwrap();

        let mut config = NodeConfig::default();
        cli.overrides.apply(&mut config);
        assert!(!config.log_options.should_encrypt);
        assert_eq!(config.blockchain.user, "op.room2");
        assert_eq!(config.workstation.port, 7000);
        assert_eq!(config.blockchain.contract, "datasafe");
    }

    #[test]
    fn test_open_takes_key_file() {
        let cli =
            Cli::try_parse_from(["datalog-node", "open", "--key", "reader.sec.asc", "payload.asc"])
                .unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Open {
                key: PathBuf::from("reader.sec.asc"),
                input: Some(PathBuf::from("payload.asc")),
            })
        );
    }

    #[test]
    fn test_keygen_user_id_default() {
        let cli = Cli::try_parse_from(["datalog-node", "keygen"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Keygen {
                user_id: "datalog-reader".to_string()
            })
        );
    }

    #[test]
    fn test_invalid_bool_rejected() {
        assert!(Cli::try_parse_from(["datalog-node", "--encrypt", "maybe"]).is_err());
    }
}
