// src/main.rs

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, Result};

use lantern_rs_auditor::logging;
use lantern_rs_auditor::run_light_audit;
use lantern_rs_auditor::store::{JsonFileStore, ReportStore};

#[derive(Parser)]
#[command(name = "lantern-rs-auditor", version, about = "Lightweight website security auditor")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Audit a target URL and print the report as JSON.
    Scan {
        /// Target URL; `https://` is assumed when no scheme is given.
        url: String,
        /// Directory for persisted reports (defaults to the platform data dir).
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Print a previously persisted report by its slug.
    Report {
        slug: String,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    logging::initialize_logging()?;

    let cli = Cli::parse();
    match cli.command {
        Command::Scan { url, data_dir } => {
            let store = open_store(data_dir)?;
            // The engine never fails; an unreachable target still yields a
            // printable error report.
            let report = run_light_audit(&url, &store).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Report { slug, data_dir } => {
            let store = open_store(data_dir)?;
            match store.get_by_slug(&slug)? {
                Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
                None => bail!("no audit found for slug '{slug}'"),
            }
        }
    }
    Ok(())
}

fn open_store(data_dir: Option<PathBuf>) -> Result<JsonFileStore> {
    let store = match data_dir {
        Some(dir) => JsonFileStore::open(dir)?,
        None => JsonFileStore::open_default()?,
    };
    Ok(store)
}
