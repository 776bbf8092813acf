//! anvil command line tool.

use anvil_yaml::ParseOptions;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "anvil")]
#[command(about = "Reads and checks anvil build files", long_about = None)]
struct Cli {
    /// Bytes read from the file at a time
    #[arg(long, global = true, env = "ANVIL_CHUNK_SIZE", default_value_t = anvil_yaml::options::DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Capacity of each value store buffer
    #[arg(long, global = true, env = "ANVIL_STORE_BASELINE", default_value_t = anvil_yaml::options::DEFAULT_STORE_BASELINE)]
    store_baseline: usize,

    /// Log parser activity (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a build file and print its configuration
    Show {
        /// Path to the build file
        #[arg(default_value = "anvil.yaml")]
        path: PathBuf,
    },
    /// Parse a build file and report whether it is valid
    Check {
        /// Path to the build file
        #[arg(default_value = "anvil.yaml")]
        path: PathBuf,
    },
    /// Parse a build file and print it back in normalized form
    Dump {
        /// Path to the build file
        #[arg(default_value = "anvil.yaml")]
        path: PathBuf,
    },
}

impl Cli {
    fn parse_options(&self) -> ParseOptions {
        ParseOptions::default()
            .with_chunk_size(self.chunk_size)
            .with_store_baseline(self.store_baseline)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let options = cli.parse_options();
    match &cli.command {
        Commands::Show { path } => commands::show(path, &options),
        Commands::Check { path } => commands::check(path, &options),
        Commands::Dump { path } => commands::dump(path, &options),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            commands::report(&err);
            ExitCode::FAILURE
        }
    }
}
