/*!
# Cache Money: Contiguity
*/

use crate::{
	CacheError,
	Drive,
	Reporter,
};
use super::{
	CONTIGUITY_TRIALS,
	trial::{
		ProbeWindow,
		Trigger,
		trial,
	},
};



/// # Contiguous?
///
/// Some drives track their cache as several separate regions. A read well
/// past the end of the cache will flush a contiguous cache, so if the start
/// sector survives a jump of three times the final search candidate, the
/// cache isn't contiguous.
///
/// ## Errors
///
/// Read and timing errors are passed through, as is running off the end of
/// the region.
pub(super) fn contiguous<D>(
	drive: &mut D,
	probe: &mut ProbeWindow,
	rep: &mut Reporter,
) -> Result<bool, CacheError>
where D: Drive + ?Sized {
	let jump = probe.candidate().saturating_mul(3);
	rep.report(format_args!("\nVerifying that readahead cache is contiguous"));

	for _ in 0..CONTIGUITY_TRIALS {
		rep.print(format_args!("."));
		if trial(drive, probe, Trigger::Jump(jump), rep)? {
			rep.report(format_args!("\nWARNING: Drive cache does not appear to be contiguous!\n"));
			return Ok(false);
		}
	}

	rep.report(format_args!("\n\tdone.  Drive cache tests as contiguous.\n"));
	Ok(true)
}



#[cfg(test)]
mod test {
	use super::*;
	use crate::sim::SimDrive;
	use super::super::TestRegion;

	/// # Check.
	fn check(drive: &mut SimDrive, candidate: u32) -> Result<bool, CacheError> {
		check_probe(drive, candidate).0
	}

	/// # Check (With Probe).
	fn check_probe(drive: &mut SimDrive, candidate: u32)
	-> (Result<bool, CacheError>, ProbeWindow) {
		let region = TestRegion::find(drive.tracks()).expect("Missing region.");
		let mut probe = ProbeWindow::new(region);
		probe.set_candidate(candidate);
		let mut rep = Reporter::new(None, None);
		let res = contiguous(drive, &mut probe, &mut rep);
		(res, probe)
	}

	#[test]
	fn t_contiguous() {
		let mut drive = SimDrive::audio(10_000).with_cache(100);
		assert_eq!(check(&mut drive, 101), Ok(true), "A linear cache is contiguous.");
		assert_eq!(drive.highest(), Some(303), "The trigger should be three candidates out.");

		let mut drive = SimDrive::audio(10_000).with_cache(100).with_split(true);
		assert_eq!(check(&mut drive, 101), Ok(false), "A split cache isn't contiguous.");

		// No caching at all is trivially contiguous.
		let mut drive = SimDrive::audio(10_000);
		assert_eq!(check(&mut drive, 1), Ok(true), "No cache is contiguous.");
	}

	#[test]
	fn t_contiguous_space() {
		let mut drive = SimDrive::audio(300).with_cache(100);
		assert_eq!(check(&mut drive, 101), Err(CacheError::OutOfSpace), "The jump won't fit.");
		assert_eq!(drive.reads(), 0, "Nothing should have been read.");
	}

	#[test]
	fn t_contiguous_errors() {
		// A bad jump target moves the probe along.
		let mut drive = SimDrive::audio(10_000).with_cache(100).with_bad(303..304);
		let (res, probe) = check_probe(&mut drive, 101);
		assert_eq!(res, Ok(true), "The bad sector should have been worked around.");
		assert_eq!(probe.offset(), 201, "The probe should have moved once.");
		assert_eq!(drive.highest(), Some(504), "The jump should follow the probe.");

		// Too many of them kill it.
		let mut drive = SimDrive::audio(10_000).with_cache(100).with_bad(300..10_000);
		let (res, probe) = check_probe(&mut drive, 101);
		assert_eq!(res, Err(CacheError::TooManyReadErrors), "The check should have given up.");
		assert_eq!(probe.offset(), 201 * 11, "The probe should have moved eleven times.");
		assert_eq!(drive.reads(), 22, "Each attempt should make two reads.");
	}

	#[test]
	fn t_contiguous_timing() {
		let mut drive = SimDrive::audio(10_000).with_cache(100).with_timing_failure(303);
		assert_eq!(check(&mut drive, 101), Err(CacheError::Timing), "Timing should have failed.");
		assert_eq!(drive.reads(), 2, "Nothing should be read after the timing failure.");
	}

	#[test]
	fn t_contiguous_late() {
		// From the second trial on, the jump and re-read both hit. Holding
		// off 56 hits pushes the first fast re-read to the thirtieth trial.
		let mut drive = SimDrive::audio(10_000)
			.with_cache(100)
			.with_split(true)
			.with_sluggish(56);
		assert_eq!(check(&mut drive, 101), Ok(false), "The last trial should have caught it.");
		assert_eq!(drive.reads(), 60, "All thirty trials should have run.");

		// Two more and it slips through.
		let mut drive = SimDrive::audio(10_000)
			.with_cache(100)
			.with_split(true)
			.with_sluggish(58);
		assert_eq!(check(&mut drive, 101), Ok(true), "Every trial should have been slow.");
		assert_eq!(drive.reads(), 60, "All thirty trials should have run.");
	}

	#[test]
	fn t_contiguous_log() {
		let mut drive = SimDrive::audio(10_000).with_cache(100);
		let region = TestRegion::find(drive.tracks()).expect("Missing region.");
		let mut probe = ProbeWindow::new(region);
		probe.set_candidate(101);

		let mut log: Vec<u8> = Vec::new();
		{
			let mut rep = Reporter::new(None, Some(&mut log));
			assert_eq!(contiguous(&mut drive, &mut probe, &mut rep), Ok(true));
		}

		let log = String::from_utf8(log).expect("Log is not UTF-8.");
		assert!(log.contains("jump_read[303]=1:"), "The jump should be logged by target.");
		assert!(! log.contains("fast_read="), "Jumps aren't fast-search triggers.");
		assert!(log.contains("seek_read=1:"), "Missing the re-read.");
	}
}
