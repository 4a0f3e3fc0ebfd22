/*!
# Cache Money: Cache Trials
*/

use crate::{
	CACHE_HIT_MS,
	CacheError,
	Drive,
	Reporter,
};
use std::fmt;
use super::{
	READ_RETRIES,
	RETRY_JUMP,
	TestRegion,
};



#[derive(Debug, Clone, Copy)]
/// # Probe Window.
///
/// The current candidate cache size and the sector being tested. Read errors
/// push the offset forward; nothing ever pulls it back.
pub(super) struct ProbeWindow {
	/// # Offset.
	offset: u32,

	/// # Candidate Size.
	candidate: u32,

	/// # Last Usable Sector.
	last: u32,
}

impl ProbeWindow {
	/// # New.
	pub(super) const fn new(region: TestRegion) -> Self {
		Self {
			offset: region.first(),
			candidate: 0,
			last: region.last(),
		}
	}

	/// # Candidate.
	pub(super) const fn candidate(&self) -> u32 { self.candidate }

	/// # Set Candidate.
	pub(super) fn set_candidate(&mut self, candidate: u32) { self.candidate = candidate; }

	/// # Offset.
	pub(super) const fn offset(&self) -> u32 { self.offset }

	/// # Bump.
	///
	/// Move past whatever trouble we ran into.
	fn bump(&mut self) {
		self.offset = self.offset.saturating_add(self.candidate + RETRY_JUMP);
	}

	/// # Fits?
	///
	/// Returns `true` if reading `reach` sectors past the offset would
	/// still be on the region.
	const fn fits(&self, reach: u32) -> bool {
		match self.offset.checked_add(reach) {
			Some(end) => end <= self.last,
			None => false,
		}
	}
}



#[derive(Debug, Clone, Copy)]
/// # Trigger.
///
/// The read(s) made before re-reading the probe offset.
pub(super) enum Trigger {
	/// # One Sector, This Far Ahead.
	Ahead(u32),

	/// # Every Sector Up to (Not Including) This Far Ahead.
	Span(u32),

	/// # One Sector, Well Past the Cache.
	///
	/// This reads like [`Trigger::Ahead`], but is logged by its target.
	Jump(u32),
}

impl Trigger {
	/// # Reach.
	///
	/// The furthest sector read, relative to the offset.
	const fn reach(self) -> u32 {
		match self {
			Self::Ahead(n) | Self::Jump(n) => n,
			Self::Span(n) => n.saturating_sub(1),
		}
	}
}



/// # Trial.
///
/// Pull the trigger, then re-read the sector at the probe offset, returning
/// `true` if the re-read came back fast enough to have been cached.
///
/// If either read fails, the probe is moved along and the trial repeated, up
/// to ten times.
///
/// ## Errors
///
/// This will return an error if the medium is unreadable, the errors keep
/// coming, timing information is unavailable, or the probe would wander off
/// the region.
pub(super) fn trial<D>(
	drive: &mut D,
	probe: &mut ProbeWindow,
	trigger: Trigger,
	rep: &mut Reporter,
) -> Result<bool, CacheError>
where D: Drive + ?Sized {
	for attempt in 0..=READ_RETRIES {
		if ! probe.fits(trigger.reach()) {
			rep.report(format_args!(
				"\n\tOut of readable space on CDROM while performing drive checks;\n\t  aborting test.\n\n"
			));
			return Err(CacheError::OutOfSpace);
		}

		let good = pull(drive, probe.offset(), trigger, rep)?;
		let again = read_logged(drive, probe.offset(), 1, "seek_read", rep)?;
		rep.log(format_args!("\n"));

		if good && again != 0 {
			// The elapsed time is for the re-read, which just happened.
			let Some(ms) = drive.elapsed_ms() else {
				rep.report(format_args!(
					"\n\tTiming error while performing drive cache checks; aborting test.\n"
				));
				return Err(CacheError::Timing);
			};
			return Ok(ms < CACHE_HIT_MS);
		}

		probe.bump();
		if attempt == READ_RETRIES { break; }
		rep.report(format_args!(
			"\n\tRead error while performing drive cache checks;\n\t  choosing new offset and trying again.\n"
		));
	}

	rep.report(format_args!(
		"\n\tToo many read errors while performing drive cache checks;\n\t  aborting test.\n\n"
	));
	Err(CacheError::TooManyReadErrors)
}

/// # Soft Read.
///
/// Read from the drive, converting recoverable errors to zero-length reads.
/// Short reads are capped to the amount requested.
///
/// ## Errors
///
/// Only fatal read errors are passed through.
pub(super) fn soft_read<D>(drive: &mut D, lsn: u32, sectors: u32)
-> Result<u32, CacheError>
where D: Drive + ?Sized {
	match drive.read(lsn, sectors) {
		Ok(n) => Ok(n.min(sectors)),
		Err(e) if e.is_fatal_read() => Err(e),
		Err(_) => Ok(0),
	}
}



/// # Pull Trigger.
///
/// Returns `true` if everything was read.
fn pull<D>(drive: &mut D, offset: u32, trigger: Trigger, rep: &mut Reporter)
-> Result<bool, CacheError>
where D: Drive + ?Sized {
	rep.log(format_args!("\t\t>>> "));
	match trigger {
		Trigger::Ahead(n) => {
			let read = read_logged(drive, offset + n, 1, "fast_read", rep)?;
			Ok(read != 0)
		},
		Trigger::Jump(n) => {
			let lsn = offset + n;
			let read = read_logged(drive, lsn, 1, format_args!("jump_read[{lsn}]"), rep)?;
			Ok(read != 0)
		},
		Trigger::Span(n) => {
			let mut sofar = 0;
			while sofar < n {
				let read = read_logged(drive, offset + sofar, n - sofar, "slow_read", rep)?;
				if read == 0 { return Ok(false); }
				sofar += read;
			}
			Ok(true)
		},
	}
}

/// # Read and Log.
///
/// Make a soft read, logging the sector count and elapsed time.
fn read_logged<D, L>(
	drive: &mut D,
	lsn: u32,
	sectors: u32,
	label: L,
	rep: &mut Reporter,
) -> Result<u32, CacheError>
where D: Drive + ?Sized, L: fmt::Display {
	let read = soft_read(drive, lsn, sectors)?;
	if rep.logging() {
		match drive.elapsed_ms() {
			Some(ms) => rep.log(format_args!("{label}={read}:{ms} ")),
			None => rep.log(format_args!("{label}={read}:-1 ")),
		}
	}
	Ok(read)
}
