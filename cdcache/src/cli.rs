/*!
# Cache Money: CLI
*/

use argyle::Argument;
use cdcache_core::{
	CacheError,
	Disc,
	ProbeOptions,
};
use dactyl::traits::BytesToUnsigned;
use std::path::PathBuf;



/// # Log Destination.
pub(super) enum LogTo {
	/// # Nowhere.
	None,

	/// # STDOUT.
	Stdout,

	/// # A File.
	File(PathBuf),
}

/// # Parsed Settings.
pub(super) struct Settings {
	/// # Probe Options.
	pub(super) opts: ProbeOptions,

	/// # Disc.
	pub(super) disc: Disc,

	/// # Log Destination.
	pub(super) log: LogTo,

	/// # Skip the Summary?
	pub(super) no_summary: bool,
}



/// # Parse Options.
pub(super) fn parse() -> Result<Settings, CacheError> {
	let args = argyle::args()
		.with_keywords(include!(concat!(env!("OUT_DIR"), "/argyle.rs")));

	let mut opts = ProbeOptions::default();
	let mut no_summary = false;
	let mut verbose = false;
	let mut dev = None;
	let mut log = None;
	for arg in args {
		match arg {
			Argument::Key("-h" | "--help") => return Err(CacheError::PrintHelp),
			Argument::Key("--no-summary") => { no_summary = true; },
			Argument::Key("--no-sweep") => { opts = opts.with_sweep(false); },
			Argument::Key("-v" | "--verbose") => { verbose = true; },
			Argument::Key("-V" | "--version") => return Err(CacheError::PrintVersion),

			Argument::KeyWithValue("-d" | "--dev", s) => { dev.replace(s); },
			Argument::KeyWithValue("-l" | "--log", s) => {
				let s = s.trim();
				if s.is_empty() { return Err(CacheError::CliParse("-l/--log")); }
				log.replace(PathBuf::from(s));
			},
			Argument::KeyWithValue("--model", s) => {
				let s = u32::btou(s.trim().as_bytes())
					.ok_or(CacheError::CliParse("--model"))?;
				opts = opts.with_model_sectors(s);
			},

			Argument::Other(s) => return Err(CacheError::CliArg(s)),
			_ => {},
		}
	}

	// A log file beats STDOUT.
	let log = match log {
		Some(p) => LogTo::File(p),
		None if verbose => LogTo::Stdout,
		None => LogTo::None,
	};

	// Load the disc.
	let disc = Disc::new(dev)?;

	Ok(Settings { opts, disc, log, no_summary })
}
