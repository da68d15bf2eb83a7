//! Tachys - how fast can this axis move?
//!
//! Deduces the motor model of a positioning stage from its datasheet
//! values, computes the dynamic limits and plans trapezoidal moves.

use clap::Parser;
use colored::Colorize;
use eyre::Context;
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, EnvFilter, Layer, Registry};

use crate::command::{Command, Executable};

mod command;
mod config;
mod record;
mod stage;

#[derive(Debug, clap::Parser)]
#[clap(version, about)]
struct Args {
    #[clap(subcommand)]
    command: Command,
    /// More log output, repeat for more detail
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("\n{}", "[ERROR]".bold().red());
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> eyre::Result<()> {
    set_up_tracing(args.verbose).wrap_err("failed to set up tracing subscriber")?;
    args.command.execute()
}

/// Log to stderr, `RUST_LOG` overrides the verbosity flag
fn set_up_tracing(verbose: u8) -> eyre::Result<()> {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter);
    let subscriber = Registry::default().with(layer);
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing global subscriber")
}
