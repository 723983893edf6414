//! igotifier - run a command whenever a path changes

use anyhow::{Context, Result};
use cli_lib::{args, signal, Cli};
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing::error;
use watcher::{WatchConfig, Watcher};

fn main() -> ExitCode {
    let cli = match Cli::try_parse_normalized(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    if cli.version {
        println!("{}", args::version_line());
        return ExitCode::SUCCESS;
    }

    let Some(config) = cli.into_config() else {
        eprintln!("{}", args::usage());
        return ExitCode::from(1);
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(config: WatchConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let result = runtime.block_on(async {
        let shutdown = signal::shutdown_signal()?;
        let watcher = Watcher::new(config)?;
        watcher.run(shutdown).await;
        Ok::<_, anyhow::Error>(())
    });

    // Commands still running on the blocking pool are not waited for.
    runtime.shutdown_background();
    result
}
