//! CLI schema for the relay binary.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use relay_mirror::MirrorConfig;


#[derive(Parser, Debug)]
#[command(name = "relay")]
#[command(about = "Run a build command and mirror its output into a results view")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// TOML mirror configuration
	#[arg(long, short, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Number of panes in the simulated window
	#[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..))]
	pub panes: u8,

	/// Delay before the results view is created (overrides `creation-delay-ms`)
	#[arg(long, value_name = "MS")]
	pub delay_ms: Option<u64>,

	/// Write the results view to FILE instead of stdout
	#[arg(long, short, value_name = "FILE")]
	pub out: Option<PathBuf>,

	/// Print the effective configuration as TOML and exit
	#[arg(long)]
	pub print_config: bool,

	/// Verbose logging
	#[arg(long, short)]
	pub verbose: bool,

	/// Command to run, after `--`
	#[arg(
		last = true,
		value_name = "COMMAND",
		num_args = 1..,
		required_unless_present = "print_config"
	)]
	pub command: Vec<String>,
}

impl Cli {
	/// Loads the configuration file, if any, and applies command-line overrides.
	pub fn mirror_config(&self) -> anyhow::Result<MirrorConfig> {
		let mut config = match &self.config {
			Some(path) => MirrorConfig::load(path)
				.with_context(|| format!("loading {}", path.display()))?,
			None => MirrorConfig::default(),
		};
		if let Some(ms) = self.delay_ms {
			config.creation_delay_ms = ms;
		}
		Ok(config)
	}

	/// Number of panes, as a count.
	pub fn pane_count(&self) -> usize {
		usize::from(self.panes)
	}
}
