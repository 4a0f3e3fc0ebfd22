/*!
# Cache Money: Library

Optical drives will happily tell you how big their buffers are, but not
whether or how they use them to cache _audio_ data. The only way to find out
is to ask for sectors in a deliberate order and time the answers.

This library does exactly that, via [`analyze`], which works with anything
implementing [`Drive`], including the `libcdio`-backed [`Disc`].
*/

#![deny(unsafe_code)]

#![warn(
	clippy::filetype_is_file,
	clippy::integer_division,
	clippy::needless_borrow,
	clippy::nursery,
	clippy::pedantic,
	clippy::perf,
	clippy::suboptimal_flops,
	clippy::unneeded_field_pattern,
	macro_use_extern_crate,
	missing_copy_implementations,
	missing_debug_implementations,
	missing_docs,
	non_ascii_idents,
	trivial_casts,
	trivial_numeric_casts,
	unreachable_pub,
	unused_crate_dependencies,
	unused_extern_crates,
	unused_import_braces,
)]

#![allow(
	clippy::doc_markdown,
	clippy::module_name_repetitions,
	clippy::redundant_pub_crate,
)]

mod cdio;
mod disc;
mod drive;
mod error;
mod opts;
mod probe;
mod report;
#[cfg(test)] mod sim;

pub(crate) use cdio::LibcdioInstance;
pub use disc::Disc;
pub use drive::{
	Drive,
	DriveVendorModel,
	TrackInfo,
};
pub use error::CacheError;
pub use opts::ProbeOptions;
pub use probe::{
	analyze,
	analyze_code,
	CacheReport,
};
pub(crate) use report::Reporter;



/// # Sectors Per Second.
///
/// One sector of audio is 1/75th of a second.
pub const SECTORS_PER_SECOND: u32 = 75;

/// # Bytes Per Sector.
///
/// This is the number of bytes per sector of _audio_ data.
pub const CD_DATA_SIZE: u16 = 2352;

/// # Number of lead-in sectors.
///
/// All discs have a 2-second region at the start before any data. `libcdio`
/// reports LSNs, which exclude it; `cdtoc` wants LBAs, which include it.
pub const CD_LEADIN: u16 = 150;

/// # Maximum Sectors Per Read.
///
/// The most sectors [`Disc`] will request in a single read. Longer requests
/// are satisfied partially, the way the drive layer always has.
pub const CD_READ_CHUNK: u32 = 26;

/// # Cache Model Ceiling.
///
/// The largest read-ahead cache, in sectors, the extraction engine knows how
/// to work around. Drives caching more than this get a warning.
pub const CACHEMODEL_SECTORS: u32 = 1200;

/// # Cache Hit Threshold (ms).
///
/// Reads completing faster than this were served from memory. No CD
/// mechanism can seek this quickly.
pub const CACHE_HIT_MS: u32 = 9;

/// # Maximum Reported Latency (ms).
pub const LATENCY_MAX_MS: u32 = 9999;
