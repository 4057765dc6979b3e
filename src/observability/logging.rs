//! # Structured Logging
//!
//! Installs the global `tracing` subscriber for the CLI. Output goes to
//! stderr so the redacted document printed by `redact --stdout` stays clean.
//!
//! `RUST_LOG` takes precedence over the verbosity flag when it is set.

use std::str::FromStr;

use tracing_subscriber::EnvFilter;

/// Log line format selected on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{}', expected 'text' or 'json'", other)),
        }
    }
}

/// Default filter directive when `RUST_LOG` is absent.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

fn build_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Install the global subscriber.
pub fn init_logging(verbose: bool, format: LogFormat) -> anyhow::Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose))
        .with_writer(std::io::stderr);

    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if installed.is_err() {
        // Subscriber already set elsewhere (e.g. integration tests); ignore.
    }
    Ok(())
}
