/*!
# Cache Money: Probe

Drives do not report whether they cache audio, so we make them show us:

1. Pick the longest stretch of audio on the disc to play with.
2. Sweep across it, timing seeks and sequential reads, until the drive has
   settled down. (This is mostly for the humans reading the log.)
3. Find the smallest forward read that knocks the starting sector out of the
   cache. Cache hits come back in a few milliseconds; seeks never do.
4. Jump well past the cache and check whether the start _still_ survives.
   If it does, the cache is split into multiple regions.
*/

mod contiguity;
mod region;
mod search;
mod sweep;
mod trial;

use crate::{
	CacheError,
	Drive,
	ProbeOptions,
	Reporter,
};
use region::TestRegion;
use std::io::Write;
use trial::ProbeWindow;
use utc2k::FmtUtc2k;



/// # Sweep Window (Sectors).
const SWEEP_WINDOW: u32 = 1000;

/// # Coarse Sweep Step (Sectors).
///
/// This works out to about ten minutes of audio.
const SWEEP_STEP: u32 = 45_000;

/// # Sweep Penalty Floor.
///
/// Keeps very fast drives from "converging" before they've had a chance to
/// spin up.
const SWEEP_FLOOR: u32 = 2000;

/// # Cache Search Limit (Sectors).
pub(crate) const CACHE_SEARCH_MAX: u32 = 15_000;

/// # Fast Trials Per Candidate.
const FAST_TRIALS: u8 = 5;

/// # Total Trials Per Candidate.
const TOTAL_TRIALS: u8 = 15;

/// # Contiguity Trials.
const CONTIGUITY_TRIALS: u8 = 30;

/// # Read Retries Per Trial.
const READ_RETRIES: u8 = 10;

/// # Retry Jump (Sectors).
///
/// On error, the probe moves forward by the candidate size plus this much.
const RETRY_JUMP: u32 = 100;



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Cache Report.
///
/// The outcome of a completed test.
pub enum CacheReport {
	/// # No Caching.
	///
	/// The drive does not cache non-linear access.
	NoCache,

	/// # Caching.
	Cached {
		/// # Approximate Read-Ahead Size (Sectors).
		sectors: u32,

		/// # Larger Than the Cache Model?
		oversized: bool,

		/// # Contiguous?
		contiguous: bool,
	},

	/// # Inconclusive.
	///
	/// Every size up to the search limit tested as cached, so we have no
	/// idea what the drive is really doing.
	Inconclusive,
}

impl CacheReport {
	#[must_use]
	/// # Status Code.
	///
	/// Reduce the report to the classic integer:
	/// * `0` for no caching, or caching with no warnings;
	/// * `1` for caching with warnings, or an inconclusive search.
	///
	/// Errors, which aren't reports, would be `-1`. See [`analyze_code`].
	pub const fn code(self) -> i8 {
		if self.warn() { 1 }
		else { 0 }
	}

	#[must_use]
	/// # Sectors.
	///
	/// Return the approximate cache size, if known. (Non-caching drives have
	/// a size of zero.)
	pub const fn sectors(self) -> Option<u32> {
		match self {
			Self::NoCache => Some(0),
			Self::Cached { sectors, .. } => Some(sectors),
			Self::Inconclusive => None,
		}
	}

	#[must_use]
	/// # Warning?
	///
	/// Returns `true` if the drive's caching is oversized, non-contiguous,
	/// or couldn't be figured out.
	pub const fn warn(self) -> bool {
		match self {
			Self::NoCache => false,
			Self::Cached { oversized, contiguous, .. } => oversized || ! contiguous,
			Self::Inconclusive => true,
		}
	}
}



/// # Analyze Drive Cache.
///
/// Run the full battery of cache tests on the drive, sending terse progress
/// updates to `progress` and the nitty-gritty details to `log`, if provided.
///
/// The drive must not be used by anything else while this runs, or the
/// timings will be garbage.
///
/// ## Errors
///
/// This returns an error if the disc has no audio, timing information is
/// unavailable, the medium cannot be read, or the test runs out of disc or
/// patience with read errors.
pub fn analyze<'a, D>(
	drive: &mut D,
	opts: &ProbeOptions,
	progress: Option<&'a mut dyn Write>,
	log: Option<&'a mut dyn Write>,
) -> Result<CacheReport, CacheError>
where D: Drive + ?Sized {
	let mut rep = Reporter::new(progress, log);

	rep.report(format_args!("\n=================== Checking drive cache/timing behavior ===================\n"));
	rep.log(format_args!("Started: {}\n", FmtUtc2k::now()));

	// Find the longest stretch of audio.
	let Some(region) = TestRegion::find(drive.tracks()) else {
		rep.report(format_args!("\n\tNo audio on disc; Cannot determine timing behavior...\n"));
		return Err(CacheError::NoAudio);
	};
	rep.log(format_args!(
		"Test region: {}..={} ({} sectors)\n",
		region.first(),
		region.last(),
		region.len(),
	));

	// Give the humans some context.
	if opts.sweep() { sweep::sweep(drive, region, &mut rep)?; }

	rep.report(format_args!("\n\nAnalyzing readahead cache access...\n"));

	// How big is it?
	let mut probe = ProbeWindow::new(region);
	let Some(sectors) = search::cache_size(drive, &mut probe, &mut rep)? else {
		rep.report(format_args!("\tWARNING: Cannot determine drive cache size or behavior!          \n"));
		return Ok(CacheReport::Inconclusive);
	};

	if sectors == 0 {
		rep.report(format_args!("\tDrive does not cache nonlinear access                            \n"));
		return Ok(CacheReport::NoCache);
	}
	rep.report(format_args!("\tApproximate random access cache size: {sectors} sectors                 \n"));

	// Too big?
	let oversized = opts.model_sectors() < sectors;
	if oversized {
		rep.report(format_args!(
			"\nWARNING: This drive appears to be caching more sectors of\n           readahead than the extraction engine can currently handle ({})!\n",
			opts.model_sectors(),
		));
	}

	// All in one piece?
	let contiguous = contiguity::contiguous(drive, &mut probe, &mut rep)?;

	Ok(CacheReport::Cached { sectors, oversized, contiguous })
}

/// # Analyze Drive Cache (Integer).
///
/// This is the same as [`analyze`], but reduces the outcome to a single
/// integer: `-1` for errors, otherwise [`CacheReport::code`].
pub fn analyze_code<'a, D>(
	drive: &mut D,
	opts: &ProbeOptions,
	progress: Option<&'a mut dyn Write>,
	log: Option<&'a mut dyn Write>,
) -> i8
where D: Drive + ?Sized {
	analyze(drive, opts, progress, log).map_or(-1, CacheReport::code)
}
