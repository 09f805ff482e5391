use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use xds_app::App;

mod args;
mod logging;

use args::Args;

fn main() {
	if let Err(err) = run() {
		eprintln!("{:#}", err);
		std::process::exit(1);
	}
}

fn run() -> Result<()> {
	let args = Args::parse();
	logging::init_logging(&args.log_level).context("initialize logging failed")?;
	info!("xds {} starting", env!("CARGO_PKG_VERSION"));
	let app = App::new(args.settings);
	app.run(args.path).context("run app failed")
}
