//! # Command Line Interface
//!
//! `kolla-vault redact | materialize | verify`, operating on a Kolla
//! passwords file and a HashiCorp Vault KV v2 store.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use crate::config::MigrationConfig;
use crate::flows::{
    run_materializer, run_redactor, run_verifier, FlowOutcome, MaterializeOptions,
    MaterializeOutcome, RedactTarget,
};
use crate::observability::{init_logging, LogFormat};
use crate::secrets::RetryPolicy;
use crate::{APP_NAME, VERSION};

#[derive(Parser, Debug)]
#[command(name = APP_NAME)]
#[command(about = "Move Kolla passwords into HashiCorp Vault and reference them by lookup")]
#[command(version = VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Passwords file to operate on
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    /// Vault server address
    #[arg(long, global = true)]
    pub vault_addr: Option<String>,

    /// Store base path, including the KV v2 `data` segment
    #[arg(long, global = true)]
    pub base_path: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    pub log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replace literal passwords with Vault lookup expressions
    Redact {
        /// Write the redacted document here instead of overwriting the input
        #[arg(long, conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// Print the redacted document to standard output
        #[arg(long)]
        stdout: bool,
    },

    /// Store every literal password in Vault
    Materialize {
        /// List the paths that would be written without contacting Vault
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        store: StoreArgs,

        /// Attempts per secret write (1 disables retries)
        #[arg(long, default_value_t = 1)]
        max_attempts: u32,

        /// Base delay between write attempts, in milliseconds
        #[arg(long, default_value_t = 0)]
        retry_backoff_ms: u64,
    },

    /// Check that Vault holds every password in the file
    Verify {
        #[command(flatten)]
        store: StoreArgs,
    },
}

/// Options shared by the commands that talk to Vault.
#[derive(Args, Debug, Clone, Copy)]
pub struct StoreArgs {
    /// Also handle values that already contain a Vault lookup
    #[arg(long)]
    pub write_lookup_values: bool,

    /// Fail instead of exiting quietly when VAULT_TOKEN is not set
    #[arg(long)]
    pub require_token: bool,
}

/// Run CLI commands
pub async fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load .env before any configuration is read; a missing file is fine.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    init_logging(cli.verbose, cli.log_format)?;
    debug!(app_name = APP_NAME, version = VERSION, "Starting");

    let config = build_config(&cli, MigrationConfig::from_env())?;
    dispatch(cli.command, &config).await
}

/// Apply global and per-command flags on top of `base`, then validate.
pub fn build_config(cli: &Cli, base: MigrationConfig) -> anyhow::Result<MigrationConfig> {
    let mut config = base;

    if let Some(file) = &cli.file {
        config.passwords_file = file.clone();
    }
    if let Some(address) = &cli.vault_addr {
        config.vault_address = address.clone();
    }
    if let Some(base_path) = &cli.base_path {
        config.base_path = base_path.clone();
    }

    match &cli.command {
        Commands::Materialize { store, max_attempts, retry_backoff_ms, .. } => {
            config.write_lookup_values = store.write_lookup_values;
            config.retry =
                RetryPolicy::new(*max_attempts, Duration::from_millis(*retry_backoff_ms));
        }
        Commands::Verify { store } => config.write_lookup_values = store.write_lookup_values,
        Commands::Redact { .. } => {}
    }

    match &cli.command {
        Commands::Redact { .. } => config.validate(),
        Commands::Materialize { .. } | Commands::Verify { .. } => config.validate_for_vault(),
    }
    .context("Invalid configuration")?;
    Ok(config)
}

async fn dispatch(command: Commands, config: &MigrationConfig) -> anyhow::Result<()> {
    match command {
        Commands::Redact { output, stdout } => {
            let target = match (output, stdout) {
                (_, true) => RedactTarget::Stdout,
                (Some(path), false) => RedactTarget::File(path),
                (None, false) => RedactTarget::InPlace,
            };
            run_redactor(config, &target)?;
        }

        Commands::Materialize { dry_run, store, .. } => {
            let options = MaterializeOptions { dry_run, require_token: store.require_token };
            match run_materializer(config, options).await? {
                MaterializeOutcome::DryRun(plan) => {
                    println!("Dry run - {} secrets would be written:", plan.writes.len());
                    for path in plan.paths() {
                        println!("  {}", path);
                    }
                }
                MaterializeOutcome::Completed(summary) => {
                    info!(written = summary.written, "Materialization complete");
                }
                MaterializeOutcome::MissingToken => {}
            }
        }

        Commands::Verify { store } => match run_verifier(config, store.require_token).await? {
            FlowOutcome::Completed(report) if report.is_clean() => {
                println!("All {} secrets match Vault", report.matched);
            }
            FlowOutcome::Completed(report) => {
                for path in &report.missing {
                    println!("missing:    {}", path);
                }
                for path in &report.mismatched {
                    println!("mismatched: {}", path);
                }
                bail!(
                    "Vault is out of sync: {} missing, {} mismatched",
                    report.missing.len(),
                    report.mismatched.len()
                );
            }
            FlowOutcome::MissingToken => {}
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("kolla-vault").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_redact_defaults_to_in_place() {
        let cli = parse(&["redact"]);
        assert!(matches!(cli.command, Commands::Redact { output: None, stdout: false }));
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn test_redact_output_and_stdout_conflict() {
        let result =
            Cli::try_parse_from(["kolla-vault", "redact", "--output", "out.yml", "--stdout"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["verify", "--file", "/tmp/p.yml", "--vault-addr", "https://vault:8200"]);
        let config = build_config(&cli, MigrationConfig::default()).unwrap();
        assert_eq!(config.passwords_file, PathBuf::from("/tmp/p.yml"));
        assert_eq!(config.vault_address, "https://vault:8200");
    }

    #[test]
    fn test_materialize_flags_reach_config() {
        let cli = parse(&[
            "materialize",
            "--write-lookup-values",
            "--max-attempts",
            "3",
            "--retry-backoff-ms",
            "250",
        ]);
        let config = build_config(&cli, MigrationConfig::default()).unwrap();
        assert!(config.write_lookup_values);
        assert_eq!(config.retry, RetryPolicy::new(3, Duration::from_millis(250)));
    }

    #[test]
    fn test_zero_attempts_is_clamped() {
        let cli = parse(&["materialize", "--max-attempts", "0"]);
        let config = build_config(&cli, MigrationConfig::default()).unwrap();
        assert_eq!(config.retry.max_attempts(), 1);
    }

    #[test]
    fn test_invalid_vault_address_is_rejected() {
        let cli = parse(&["--vault-addr", "vault:8200", "redact"]);
        assert!(build_config(&cli, MigrationConfig::default()).is_err());
    }

    #[test]
    fn test_json_log_format() {
        let cli = parse(&["--log-format", "json", "verify", "--require-token"]);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(matches!(cli.command, Commands::Verify { store } if store.require_token));
    }

    #[test]
    fn test_store_commands_require_kv2_base_path() {
        let cli = parse(&["--base-path", "secret/kolla", "materialize", "--dry-run"]);
        let err = build_config(&cli, MigrationConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("'/data' segment"));

        let cli = parse(&["--base-path", "secret/kolla", "verify"]);
        assert!(build_config(&cli, MigrationConfig::default()).is_err());

        let cli = parse(&["--base-path", "secret/kolla", "redact", "--stdout"]);
        assert!(build_config(&cli, MigrationConfig::default()).is_ok());
    }

    #[test]
    fn test_slashed_sub_dir_is_rejected() {
        let base = MigrationConfig { sub_dir: "/prod".to_string(), ..MigrationConfig::default() };
        assert!(build_config(&parse(&["redact"]), base).is_err());
    }
}
