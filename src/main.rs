//! Qtprep CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use console::style;
use qtprep::cli::Cli;
use qtprep::config::{EnvSource, ProcessEnv};
use qtprep::fetch::HttpPackageFetcher;
use qtprep::platform::HostInfo;
use qtprep::provision::QtProvisioner;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("qtprep=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("qtprep=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn provision(cli: &Cli, env: &dyn EnvSource, host: &HostInfo) -> qtprep::Result<()> {
    let provisioner = QtProvisioner::new(&cli.build_root, env, host)?;

    let mut fetcher = HttpPackageFetcher::new();
    if cli.quiet {
        fetcher = fetcher.quiet();
    }

    provisioner.install(&fetcher)?;
    provisioner.write_config()?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("qtprep starting with args: {:?}", cli);

    let host = HostInfo::detect();
    tracing::debug!("Host: {:?}", host);

    match provision(&cli, &ProcessEnv, &host) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("{}", style(format!("Error: {e}")).red());
            if let Some(text) = e.remediation() {
                eprintln!();
                eprintln!("{text}");
            }
            ExitCode::from(e.exit_code())
        }
    }
}
