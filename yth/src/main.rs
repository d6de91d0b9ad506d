//! yth CLI - hosted-video download helper

use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;
use yth::cli::{Cli, run_cli};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let (non_blocking, _guard) = tracing_appender::non_blocking(std::io::stderr());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(cli.global.verbose)));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .init();

    run_cli(cli)
}

/// Log level used when `RUST_LOG` is unset.
fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
