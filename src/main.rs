//! `retrieveit` command-line interface.
//!
//! Submits and inspects reports against a local store. Every command prints
//! JSON on stdout; logs go to stderr.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use retrieveit::{
    BackendConfig, ItemType, Portal, PortalConfig, ReportDraft, ReportFilter, ReportStatus,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "retrieveit", version, about = "Retrieve It lost & found portal")]
struct Cli {
    #[arg(long, global = true, env = "RETRIEVEIT_CONFIG", help = "Portal YAML config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Redb store file, overriding the configured backend")]
    store: Option<PathBuf>,
    #[arg(long, global = true, conflicts_with = "store", help = "Use a throwaway in-memory store")]
    in_memory: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Submit a JSON report draft from a file, or stdin when omitted.
    Submit {
        file: Option<PathBuf>,
        #[arg(long, default_value_t = false, help = "Polish the description first")]
        enhance: bool,
    },
    /// List stored reports.
    List {
        #[arg(long = "type", value_enum)]
        item_type: Option<TypeArg>,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
    /// Show one report.
    Show { id: String },
    /// Compute matches for a stored report.
    Matches { id: String },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TypeArg {
    Lost,
    Found,
}

impl From<TypeArg> for ItemType {
    fn from(value: TypeArg) -> Self {
        match value {
            TypeArg::Lost => ItemType::Lost,
            TypeArg::Found => ItemType::Found,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StatusArg {
    Active,
    Matched,
    Resolved,
    Expired,
}

impl From<StatusArg> for ReportStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Active => ReportStatus::Active,
            StatusArg::Matched => ReportStatus::Matched,
            StatusArg::Resolved => ReportStatus::Resolved,
            StatusArg::Expired => ReportStatus::Expired,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .json()
        .init();

    let cli = Cli::parse();
    let portal = Portal::from_config(&load_config(&cli)?)?;

    match cli.command {
        Commands::Submit { file, enhance } => {
            let raw = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let draft: ReportDraft =
                serde_json::from_str(&raw).context("parsing report draft JSON")?;
            let outcome = if enhance {
                portal.submit_enhanced(draft).await?
            } else {
                portal.submit(draft)?
            };
            print_json(&outcome)?;
        }
        Commands::List { item_type, status } => {
            let filter = ReportFilter {
                item_type: item_type.map(Into::into),
                status: status.map(Into::into),
            };
            print_json(&portal.reports(&filter)?)?;
        }
        Commands::Show { id } => match portal.report(&id)? {
            Some(report) => print_json(&report)?,
            None => bail!("report '{id}' not found"),
        },
        Commands::Matches { id } => match portal.matches_for(&id)? {
            Some(matches) => print_json(&matches)?,
            None => bail!("report '{id}' not found"),
        },
    }

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<PortalConfig> {
    let mut config = match &cli.config {
        Some(path) => PortalConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PortalConfig::default(),
    };
    if let Some(path) = &cli.store {
        config.store.backend = BackendConfig::redb(path.to_string_lossy());
    } else if cli.in_memory {
        config.store.backend = BackendConfig::in_memory();
    }
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
