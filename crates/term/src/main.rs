//! Relay binary.
//!
//! Runs a build command, feeds its output through an in-memory editor
//! workspace, and prints the persistent results view that the mirroring
//! engine maintained for it.

mod cli;
mod runner;

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	let config = cli.mirror_config()?;
	if cli.print_config {
		print!("{}", config.to_toml_string());
		return Ok(ExitCode::SUCCESS);
	}

	let output = runner::run(&cli.command, config, cli.pane_count()).await?;
	match &cli.out {
		Some(path) => std::fs::write(path, &output.text)
			.with_context(|| format!("writing {}", path.display()))?,
		None => std::io::stdout()
			.lock()
			.write_all(output.text.as_bytes())
			.context("writing results to stdout")?,
	}

	let code = output.status.code().unwrap_or(1);
	Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env("RELAY_LOG").unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("relay_mirror=trace,debug")
		} else {
			EnvFilter::new("info")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(true)
		.init();
}
