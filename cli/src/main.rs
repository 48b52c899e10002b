//! hexaprofile CLI - JSON in, JSON out.
//!
//! ```text
//! hexaprofile [--config PATH] [REQUEST.json | -]
//! ```
//!
//! Reads one request (see [`request`]) from the file argument or stdin and
//! prints the result as pretty JSON on stdout. Logs go to stderr, filtered by
//! `RUST_LOG` (default `info`).

mod request;

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use hexaprofile_config::HexaConfig;
use hexaprofile_core::ProfileEngine;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::request::Request;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

#[derive(Debug, Parser)]
#[command(name = "hexaprofile")]
#[command(about = "Classify a questionnaire profile and print the JSON result")]
struct Cli {
    /// Config file to use instead of ~/.hexaprofile/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Request file; `-` or no argument reads stdin
    input: Option<PathBuf>,
}

impl Cli {
    fn request_path(&self) -> Option<&Path> {
        self.input
            .as_deref()
            .filter(|path| *path != Path::new(STDIN_ARG))
    }
}

const STDIN_ARG: &str = "-";

/// An explicit path must exist; the default location may be absent.
fn load_config(path: Option<&Path>) -> Result<HexaConfig> {
    let loaded = match path {
        Some(path) => {
            if !path.exists() {
                bail!("config file {} does not exist", path.display());
            }
            HexaConfig::load_from(path)
                .with_context(|| format!("loading config {}", path.display()))?
        }
        None => HexaConfig::load().context("loading config")?,
    };
    Ok(loaded.unwrap_or_default())
}

fn read_request(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading request from stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let engine = ProfileEngine::from_config(&config).context("initializing engine")?;

    let request = Request::parse(&read_request(cli.request_path())?)?;
    let response = request.handle(&engine)?;

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &response)?;
    writeln!(stdout)?;
    Ok(())
}
