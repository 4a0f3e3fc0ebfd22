/*!
# Cache Money
*/

#![forbid(unsafe_code)]

#![deny(
	clippy::allow_attributes_without_reason,
	clippy::correctness,
	unreachable_pub,
)]

#![warn(
	clippy::complexity,
	clippy::nursery,
	clippy::pedantic,
	clippy::perf,
	clippy::style,

	clippy::allow_attributes,
	clippy::clone_on_ref_ptr,
	clippy::create_dir,
	clippy::filetype_is_file,
	clippy::format_push_string,
	clippy::get_unwrap,
	clippy::impl_trait_in_params,
	clippy::lossy_float_literal,
	clippy::missing_assert_message,
	clippy::missing_docs_in_private_items,
	clippy::needless_raw_strings,
	clippy::panic_in_result_fn,
	clippy::pub_without_shorthand,
	clippy::rest_pat_in_fully_bound_structs,
	clippy::semicolon_inside_block,
	clippy::str_to_string,
	clippy::string_to_string,
	clippy::todo,
	clippy::undocumented_unsafe_blocks,
	clippy::unneeded_field_pattern,
	clippy::unseparated_literal_suffix,
	clippy::unwrap_in_result,

	macro_use_extern_crate,
	missing_copy_implementations,
	missing_docs,
	non_ascii_idents,
	trivial_casts,
	trivial_numeric_casts,
	unused_crate_dependencies,
	unused_extern_crates,
	unused_import_braces,
)]



mod cli;

use cdcache_core::{
	CacheError,
	CacheReport,
	Disc,
	ProbeOptions,
};
use cli::{
	LogTo,
	Settings,
};
use dactyl::NiceU32;
use fyi_ansi::ansi;
use fyi_msg::Msg;
use std::{
	fs::File,
	io::{
		BufWriter,
		Write,
	},
	process::ExitCode,
};



/// # A Divider Line.
///
/// This is used to encase the drive vendor/model during summary. We'll slice
/// it to match the length rather than `"-".repeat()` or whatever.
const DIVIDER: &str = "-------------------------";

/// # Exit Code: Warning.
const EXIT_WARNING: u8 = 1;

/// # Exit Code: Error.
///
/// This is `-1` as an unsigned byte.
const EXIT_ERROR: u8 = 255;



/// # Main.
///
/// This lets us bubble up startup errors so they can be pretty-printed.
fn main() -> ExitCode {
	match main__() {
		Ok(code) => code,
		Err(e @ (CacheError::PrintHelp | CacheError::PrintVersion)) => {
			println!("{e}");
			ExitCode::SUCCESS
		},
		Err(e) => {
			Msg::from(e).eprint();
			ExitCode::from(EXIT_ERROR)
		},
	}
}

#[inline]
/// # Actual Main.
///
/// This does all the stuff.
fn main__() -> Result<ExitCode, CacheError> {
	let Settings { opts, mut disc, log, no_summary } = cli::parse()?;

	// Quiet?
	if ! no_summary { summary(&disc); }

	// Progress always goes to STDERR; the log goes wherever it was asked to.
	let mut progress = std::io::stderr();
	let res = match log {
		LogTo::None => cdcache_core::analyze(&mut disc, &opts, Some(&mut progress), None),
		LogTo::Stdout => {
			let mut handle = std::io::stdout().lock();
			log_header(&mut handle, &disc, &opts);
			cdcache_core::analyze(&mut disc, &opts, Some(&mut progress), Some(&mut handle))
		},
		LogTo::File(path) => {
			let file = File::create(&path)
				.map_err(|_| CacheError::Write(path.to_string_lossy().into_owned()))?;
			let mut handle = BufWriter::new(file);
			log_header(&mut handle, &disc, &opts);
			cdcache_core::analyze(&mut disc, &opts, Some(&mut progress), Some(&mut handle))
		},
	};
	eprintln!();

	let report = res?;
	outcome(report, &opts);

	if report.warn() { Ok(ExitCode::from(EXIT_WARNING)) }
	else { Ok(ExitCode::SUCCESS) }
}

/// # Summary.
///
/// Print the drive and disc details.
fn summary(disc: &Disc) {
	if let Some(vm) = disc.drive_vendor_model() {
		let vm = vm.to_string();
		let divider = DIVIDER.get(..vm.len()).unwrap_or(DIVIDER);
		eprintln!(
			concat!(
				ansi!((dim, cyan) "{divider}\n"),
				ansi!((bold, cyan) "{vm}\n"),
				ansi!((dim, cyan) "{divider}"),
			),
			divider=divider,
			vm=vm,
		);
	}

	eprintln!("{disc}");
}

/// # Log Header.
///
/// Print a few basic setup details at the top of the log.
fn log_header(handle: &mut dyn Write, disc: &Disc, opts: &ProbeOptions) {
	// Program version.
	let _res = writeln!(
		handle,
		concat!("#####
## Cache Money v", env!("CARGO_PKG_VERSION"), "
##"),
	);

	// Drive.
	if let Some(v) = disc.drive_vendor_model() {
		let vendor = v.vendor();
		let model = v.model();
		if vendor.is_empty() {
			let _res = writeln!(handle, "## Drive: {model}");
		}
		else {
			let _res = writeln!(handle, "## Drive: [{vendor}] {model}");
		}
	}

	// Disc.
	if let Some(toc) = disc.toc() {
		let _res = writeln!(handle, "## Disc:  {}", toc.cddb_id());
	}

	// Everything else!
	let _res = writeln!(
		handle,
		"## Model: {} sectors
## Sweep: {}
##
## Reads are logged as <SECTORS>:<MILLISECONDS>, with -1 standing in for
## missing timing information. Anything under 9ms came from the cache.
#####",
		NiceU32::from(opts.model_sectors()),
		if opts.sweep() { "Yes" } else { "No" },
	);

	let _res = handle.flush();
}

/// # Outcome.
///
/// Sum up the results in a sentence or two.
fn outcome(report: CacheReport, opts: &ProbeOptions) {
	match report {
		CacheReport::NoCache => {
			Msg::success("The drive does not cache audio data.").eprint();
		},
		CacheReport::Cached { sectors, oversized, contiguous } => {
			let msg = format!(
				"The drive caches roughly {} sectors of audio{}.",
				NiceU32::from(sectors),
				if contiguous { "" } else { ", but not contiguously" },
			);
			if report.warn() { Msg::warning(msg).eprint(); }
			else { Msg::success(msg).eprint(); }

			if oversized {
				Msg::warning(format!(
					"That is more than the {} sectors the extraction engine can handle.",
					NiceU32::from(opts.model_sectors()),
				)).eprint();
			}
		},
		CacheReport::Inconclusive => {
			Msg::warning("Unable to determine the drive's cache size or behavior.").eprint();
		},
	}
}
