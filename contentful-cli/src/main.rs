//! cfm: Contentful content-model normalizer
//!
//! Decodes a role, policy, constraint, content type, validation or editor
//! interface and prints its canonical compact JSON encoding.
//!
//! Usage:
//!   cfm normalize constraint policy.json
//!   cat interface.json | cfm --config cfm.toml normalize editor-interface

use anyhow::Result;
use clap::{Parser, Subcommand};
use contentful_cli::{Config, Kind, normalize, read_input};
use std::path::PathBuf;
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "cfm")]
#[command(about = "Normalizes Contentful content-model documents")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a document and print its canonical encoding
    Normalize {
        /// Kind of document to decode
        #[arg(value_enum)]
        kind: Kind,

        /// Input file; stdin when omitted
        file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = Config::resolve(args.config.as_deref());
    debug!("Decode limits: max_depth={}", config.decode.max_depth);

    match args.command {
        Command::Normalize { kind, file } => {
            let input = read_input(file.as_deref())?;
            println!("{}", normalize(kind, &input, config.decode)?);
        }
    }
    Ok(())
}
