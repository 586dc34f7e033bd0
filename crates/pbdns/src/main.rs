// # pbdns - Porkbun DNS record sync
//
// This binary is a THIN integration layer: it parses arguments, sets up
// logging and the runtime, and hands the declaration file to
// `pbdns_core::RecordSynchronizer`. All record logic lives in pbdns-core.
//
// ## Configuration
//
// Every flag can also be given through the environment:
//
// - `-f, --hostfile` / `PBDNS_HOSTFILE`: CSV file with host DNS definitions (host,type,answer)
// - `-d, --definitions` / `PBDNS_DEFINITIONS`: JSON credentials file (default `.env/base.json`)
// - `-a, --action` / `PBDNS_ACTION`: create, update or delete (default `create`)
// - `--log-level` / `PBDNS_LOG_LEVEL`: trace, debug, info, warn, error (default `info`)
// - `--dry-run` / `PBDNS_DRY_RUN`: log the requests instead of sending them
//
// ## Example
//
// ```bash
// pbdns -f hosts.csv -d .env/base.json -a update
// ```

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use pbdns_core::{Action, BatchReport, Credentials, DEFAULT_CREDENTIALS_PATH, RecordSynchronizer};
use pbdns_http::HttpTransport;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the different ways a run can end
///
/// - 0: Every row applied
/// - 1: Configuration error (credentials, action, log level)
/// - 2: Declaration file could not be loaded, or the runtime failed to start
/// - 3: Batch ran, but at least one row failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PbdnsExitCode {
    /// All rows succeeded
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Nothing was processed (declaration file or runtime failure)
    Aborted = 2,
    /// Some rows failed
    PartialFailure = 3,
}

impl From<PbdnsExitCode> for ExitCode {
    fn from(code: PbdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Update DNS records on Porkbun
#[derive(Debug, Parser)]
#[command(name = "pbdns", version, about = "Update DNS records on Porkbun")]
struct Cli {
    /// File with host DNS definitions, CSV format
    #[arg(short = 'f', long = "hostfile", env = "PBDNS_HOSTFILE")]
    host_file: PathBuf,

    /// File with Porkbun credentials, JSON format
    #[arg(
        short = 'd',
        long = "definitions",
        env = "PBDNS_DEFINITIONS",
        default_value = DEFAULT_CREDENTIALS_PATH
    )]
    def_file: PathBuf,

    /// API action: create, update or delete
    #[arg(short = 'a', long = "action", env = "PBDNS_ACTION", default_value = "create")]
    action: String,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, env = "PBDNS_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log the requests that would be sent, without sending them
    #[arg(long, env = "PBDNS_DRY_RUN")]
    dry_run: bool,
}

fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "Log level '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            level
        ),
    }
}

fn exit_code_for(report: &BatchReport) -> PbdnsExitCode {
    if report.all_succeeded() {
        PbdnsExitCode::Success
    } else {
        PbdnsExitCode::PartialFailure
    }
}

fn main() -> ExitCode {
    // No arguments at all: show usage instead of complaining about --hostfile
    if std::env::args_os().len() <= 1 {
        if let Err(e) = Cli::command().print_help() {
            eprintln!("Failed to print help: {}", e);
            return PbdnsExitCode::ConfigError.into();
        }
        return ExitCode::SUCCESS;
    }

    let cli = Cli::parse();

    let log_level = match parse_log_level(&cli.log_level) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return PbdnsExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return PbdnsExitCode::ConfigError.into();
    }

    // Reject an unknown action before touching credentials or rows
    let action: Action = match cli.action.parse() {
        Ok(action) => action,
        Err(e) => {
            error!("{}", e);
            return PbdnsExitCode::ConfigError.into();
        }
    };

    // Rows are processed one at a time; a single thread is all we need
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("{:#}", e);
            return PbdnsExitCode::Aborted.into();
        }
    };

    rt.block_on(run(cli, action)).into()
}

/// Load credentials, build the synchronizer, apply the declaration file
async fn run(cli: Cli, action: Action) -> PbdnsExitCode {
    let credentials = match Credentials::load(&cli.def_file).await {
        Ok(credentials) => credentials,
        Err(e) => {
            error!("{}", e);
            return PbdnsExitCode::ConfigError;
        }
    };

    let transport = match HttpTransport::new(cli.dry_run) {
        Ok(transport) => transport,
        Err(e) => {
            error!("{}", e);
            return PbdnsExitCode::ConfigError;
        }
    };
    if transport.is_dry_run() {
        warn!("Running in DRY-RUN mode - no changes will be made");
    }

    info!(
        "Starting DNS {} for {} using Porkbun API",
        action,
        credentials.domain()
    );
    let synchronizer = RecordSynchronizer::new(credentials, Box::new(transport));

    match synchronizer.apply_file(&cli.host_file, action).await {
        Ok(report) => {
            info!("Done updating records");
            exit_code_for(&report)
        }
        // Already logged by the synchronizer
        Err(_) => PbdnsExitCode::Aborted,
    }
}
