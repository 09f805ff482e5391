use std::path::PathBuf;

use clap::Parser;

/// Workspace session manager of the xds editor, driven from the console.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
	/// Folder to open on start
	pub path: Option<PathBuf>,

	/// Settings file to use instead of the per-user one
	#[arg(long, value_name = "FILE")]
	pub settings: Option<PathBuf>,

	/// Log filter, e.g. `debug` or `xds_kernel=trace`; `RUST_LOG` wins when set
	#[arg(long, value_name = "FILTER", default_value = "info")]
	pub log_level: String,
}
