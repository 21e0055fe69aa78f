//! sarissa-skos CLI binary.

use clap::Parser;
use sarissa_skos::cli::{args::SkosArgs, commands::execute_command};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args = SkosArgs::parse();

    // RUST_LOG wins over the verbosity flags.
    let default_level = match args.verbosity() {
        0 => "error",
        1 => "warn",
        2 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    execute_command(args)?;
    Ok(())
}
