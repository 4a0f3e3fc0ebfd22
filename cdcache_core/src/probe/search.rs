/*!
# Cache Money: Cache Size Search
*/

use crate::{
	CacheError,
	Drive,
	Reporter,
};
use super::{
	CACHE_SEARCH_MAX,
	FAST_TRIALS,
	TOTAL_TRIALS,
	trial::{
		ProbeWindow,
		Trigger,
		trial,
	},
};



/// # Cache Size.
///
/// Cache hits are fast and seeks are not, so rather than bisect, we walk the
/// candidate size upward until a forward read of that many sectors pushes
/// the probe sector out of the cache.
///
/// Returns the approximate cache size in sectors, zero if the drive doesn't
/// cache at all, or `None` if the search ran out before the cache did.
///
/// The final candidate, one more than the size, is left on the probe for the
/// contiguity check.
///
/// ## Errors
///
/// Read and timing errors are passed through.
pub(super) fn cache_size<D>(
	drive: &mut D,
	probe: &mut ProbeWindow,
	rep: &mut Reporter,
) -> Result<Option<u32>, CacheError>
where D: Drive + ?Sized {
	for candidate in 1..=CACHE_SEARCH_MAX {
		probe.set_candidate(candidate);

		rep.print(format_args!("\r"));
		rep.report(format_args!(
			"\tFast search for approximate cache size... {} sectors            ",
			candidate - 1,
		));
		rep.log(format_args!("\n"));

		if ! holds(drive, probe, rep)? {
			rep.print(format_args!("\r"));
			return Ok(Some(candidate - 1));
		}
	}

	rep.print(format_args!("\r"));
	Ok(None)
}



/// # Holds?
///
/// Returns `true` if any of the trials for the current candidate came back
/// cached.
///
/// The first few trials use a single-sector trigger. The rest slow the drive
/// to 1x and read the whole span sequentially, making it less likely that
/// some transient buffering passes for cache.
fn holds<D>(drive: &mut D, probe: &mut ProbeWindow, rep: &mut Reporter)
-> Result<bool, CacheError>
where D: Drive + ?Sized {
	let candidate = probe.candidate();

	for i in 0..TOTAL_TRIALS {
		let trigger =
			if i < FAST_TRIALS { Trigger::Ahead(candidate - 1) }
			else {
				if i == FAST_TRIALS { slow_down(drive, candidate, rep); }
				rep.print(format_args!("."));
				Trigger::Span(candidate)
			};

		if trial(drive, probe, trigger, rep)? { return Ok(true); }
	}

	Ok(false)
}

/// # Slow Down.
///
/// Announce the slow verification and ask the drive to drop to 1x. It
/// doesn't matter if it refuses.
fn slow_down<D>(drive: &mut D, candidate: u32, rep: &mut Reporter)
where D: Drive + ?Sized {
	rep.print(format_args!("\r"));
	rep.report(format_args!(
		"\tSlow verify for approximate cache size... {} sectors",
		candidate - 1,
	));
	rep.log(format_args!("\n"));

	rep.log(format_args!("\tAttempting to reduce read speed to 1x... "));
	if drive.set_speed(1).is_ok() { rep.log(format_args!("drive said OK\n")); }
	else { rep.log(format_args!("failed.\n")); }
}
