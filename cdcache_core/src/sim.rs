/*!
# Cache Money: Simulated Drive

A scriptable stand-in for real hardware. It reads nothing, but keeps a
read-ahead buffer and a head position, and times each read the way a
well-behaved drive would: cache hits are near-instant, seeks are not.
*/

use crate::{
	CacheError,
	CD_READ_CHUNK,
	Drive,
	TrackInfo,
};
use std::ops::Range;



/// # Cache Hit (ms).
const HIT_MS: u32 = 1;

/// # Seek (ms).
const SEEK_MS: u32 = 20;

/// # Transfer Per Sector (ms).
const SECTOR_MS: u32 = 2;



#[derive(Debug, Clone, Default)]
/// # Simulated Drive.
pub(crate) struct SimDrive {
	/// # Tracks.
	tracks: Vec<TrackInfo>,

	/// # Read-Ahead Size (Sectors).
	cache: u32,

	/// # Keep Distant Buffers Around?
	split: bool,

	/// # Bad Sectors.
	bad: Vec<Range<u32>>,

	/// # Unreadable Medium (Sector).
	fatal: Option<u32>,

	/// # Timing Dies Here (Sector).
	timing_failure: Option<u32>,

	/// # Timing Dies On This Read (1-Based).
	timing_cutoff: Option<usize>,

	/// # Cache Hits to Report at Seek Speed.
	sluggish: u32,

	/// # Refuse Speed Changes?
	speed_refusal: bool,

	/// # Current Buffer (Half-Open).
	buffer: Option<(u32, u32)>,

	/// # Previous Buffer, For Split Caches.
	stash: Option<(u32, u32)>,

	/// # Head Position.
	head: Option<u32>,

	/// # Last Elapsed.
	elapsed: Option<u32>,

	/// # Timing Dead?
	timing_dead: bool,

	/// # Read Count.
	reads: usize,

	/// # Lowest Sector Requested.
	lowest: Option<u32>,

	/// # Highest Sector Requested.
	highest: Option<u32>,

	/// # Speed Requests.
	speeds: Vec<u8>,
}

impl Drive for SimDrive {
	fn tracks(&self) -> &[TrackInfo] { &self.tracks }

	fn read(&mut self, lsn: u32, sectors: u32) -> Result<u32, CacheError> {
		self.reads += 1;
		let len = sectors.min(CD_READ_CHUNK);
		if len == 0 { return Err(CacheError::CdRead(lsn)); }
		let end = lsn.saturating_add(len);

		self.lowest.replace(self.lowest.map_or(lsn, |v| v.min(lsn)));
		self.highest.replace(self.highest.map_or(end - 1, |v| v.max(end - 1)));

		if
			self.timing_failure.is_some_and(|v| lsn <= v && v < end) ||
			self.timing_cutoff.is_some_and(|v| v <= self.reads)
		{
			self.timing_dead = true;
		}

		// Errors.
		if self.fatal.is_some_and(|v| lsn <= v && v < end) {
			self.elapsed = None;
			return Err(CacheError::CdReadFatal);
		}
		let on_disc = self.tracks.iter().any(|t|
			t.first_sector() <= lsn && end - 1 <= t.last_sector()
		);
		if ! on_disc || self.bad.iter().any(|r| r.start < end && lsn < r.end) {
			self.elapsed = self.timing().map(|()| SEEK_MS);
			self.head = None;
			return Err(CacheError::CdRead(lsn));
		}

		// Hit.
		if self.cached(lsn, end) {
			let ms =
				if self.sluggish == 0 { HIT_MS }
				else {
					self.sluggish -= 1;
					SEEK_MS + len * SECTOR_MS
				};
			self.elapsed = self.timing().map(|()| ms);
			return Ok(len);
		}

		// Miss. Split caches keep the old buffer around when the new one is
		// far enough away.
		let near = self.buffer.map_or(true, |(start, stop)|
			start.saturating_sub(self.cache) <= lsn && lsn < stop.saturating_add(self.cache)
		);
		self.stash = if self.split && ! near { self.buffer } else { None };
		self.buffer =
			if self.cache == 0 { None }
			else if self.cache < len { Some((end - self.cache, end)) }
			else { Some((lsn, lsn.saturating_add(self.cache))) };

		let seek = if self.head == Some(lsn) { 0 } else { SEEK_MS };
		self.head = Some(end);
		self.elapsed = self.timing().map(|()| seek + len * SECTOR_MS);
		Ok(len)
	}

	fn elapsed_ms(&self) -> Option<u32> { self.elapsed }

	fn set_speed(&mut self, speed: u8) -> Result<(), CacheError> {
		self.speeds.push(speed);
		if self.speed_refusal { Err(CacheError::Speed(speed)) }
		else { Ok(()) }
	}
}

impl SimDrive {
	/// # New.
	///
	/// A non-caching drive with the given tracks.
	pub(crate) fn new(tracks: Vec<TrackInfo>) -> Self {
		Self { tracks, ..Self::default() }
	}

	/// # All Audio.
	///
	/// A non-caching drive with a single audio track.
	pub(crate) fn audio(sectors: u32) -> Self {
		Self::new(vec![TrackInfo::new(1, true, 0, sectors.saturating_sub(1))])
	}

	#[must_use]
	/// # With Read-Ahead.
	pub(crate) fn with_cache(self, cache: u32) -> Self { Self { cache, ..self } }

	#[must_use]
	/// # With Split Cache.
	pub(crate) fn with_split(self, split: bool) -> Self { Self { split, ..self } }

	#[must_use]
	/// # With Bad Sectors.
	pub(crate) fn with_bad(mut self, bad: Range<u32>) -> Self {
		self.bad.push(bad);
		self
	}

	#[must_use]
	/// # With Fatal Sector.
	pub(crate) fn with_fatal(self, lsn: u32) -> Self {
		Self { fatal: Some(lsn), ..self }
	}

	#[must_use]
	/// # With Timing Failure.
	///
	/// Timing becomes unavailable once this sector is read.
	pub(crate) fn with_timing_failure(self, lsn: u32) -> Self {
		Self { timing_failure: Some(lsn), ..self }
	}

	#[must_use]
	/// # With Timing Cutoff.
	///
	/// Timing becomes unavailable starting with the nth read (counting from
	/// one), wherever it lands.
	pub(crate) fn with_timing_cutoff(self, read: usize) -> Self {
		Self { timing_cutoff: Some(read), ..self }
	}

	#[must_use]
	/// # With Sluggish Hits.
	///
	/// The next `n` cache hits take as long as a seek would have. The cache
	/// itself is unaffected.
	pub(crate) fn with_sluggish(self, sluggish: u32) -> Self {
		Self { sluggish, ..self }
	}

	#[must_use]
	/// # With Speed Refusal.
	pub(crate) fn with_speed_refusal(self) -> Self {
		Self { speed_refusal: true, ..self }
	}

	/// # Read Count.
	pub(crate) const fn reads(&self) -> usize { self.reads }

	/// # Lowest Sector Requested.
	pub(crate) const fn lowest(&self) -> Option<u32> { self.lowest }

	/// # Highest Sector Requested.
	pub(crate) const fn highest(&self) -> Option<u32> { self.highest }

	/// # Speed Requests.
	pub(crate) fn speeds(&self) -> &[u8] { &self.speeds }

	/// # Cached?
	fn cached(&self, lsn: u32, end: u32) -> bool {
		let within = |b: Option<(u32, u32)>| b.is_some_and(|(start, stop)|
			start <= lsn && end <= stop
		);
		within(self.buffer) || (self.split && within(self.stash))
	}

	/// # Timing.
	///
	/// Returns `Some(())` if timing still works.
	const fn timing(&self) -> Option<()> {
		if self.timing_dead { None }
		else { Some(()) }
	}
}



#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn t_sim() {
		let mut drive = SimDrive::audio(1000).with_cache(100);

		// Cold.
		assert_eq!(drive.read(0, 1), Ok(1));
		assert_eq!(drive.elapsed_ms(), Some(SEEK_MS + SECTOR_MS), "Expected a seek.");

		// Warm.
		assert_eq!(drive.read(50, 50), Ok(26));
		assert_eq!(drive.elapsed_ms(), Some(HIT_MS), "Expected a hit.");
		assert_eq!(drive.read(1, 1), Ok(1));
		assert_eq!(drive.elapsed_ms(), Some(HIT_MS), "Expected a hit.");

		// Past the buffer.
		assert_eq!(drive.read(100, 1), Ok(1));
		assert_eq!(drive.elapsed_ms(), Some(SEEK_MS + SECTOR_MS), "Expected a seek.");
		assert_eq!(drive.read(101, 10), Ok(10));
		assert_eq!(drive.elapsed_ms(), Some(HIT_MS), "Expected a hit.");

		// The first buffer is gone.
		assert_eq!(drive.read(0, 1), Ok(1));
		assert_eq!(drive.elapsed_ms(), Some(SEEK_MS + SECTOR_MS), "Expected a seek.");

		// Off the disc.
		assert_eq!(drive.read(999, 2), Err(CacheError::CdRead(999)));
		assert_eq!((drive.lowest(), drive.highest()), (Some(0), Some(1000)));
		assert_eq!(drive.reads(), 7, "Wrong read count.");
	}

	#[test]
	fn t_sim_sequential() {
		let mut drive = SimDrive::audio(1000);
		assert_eq!(drive.read(0, 26), Ok(26));
		assert_eq!(drive.elapsed_ms(), Some(SEEK_MS + 26 * SECTOR_MS), "Expected a seek.");
		assert_eq!(drive.read(26, 26), Ok(26));
		assert_eq!(drive.elapsed_ms(), Some(26 * SECTOR_MS), "Expected no seek.");
		assert_eq!(drive.read(26, 1), Ok(1));
		assert_eq!(drive.elapsed_ms(), Some(SEEK_MS + SECTOR_MS), "Without a cache, everything is a miss.");
	}

	#[test]
	fn t_sim_split() {
		let mut drive = SimDrive::audio(10_000).with_cache(100).with_split(true);
		assert_eq!(drive.read(0, 1), Ok(1));
		assert_eq!(drive.read(1000, 1), Ok(1));
		assert_eq!(drive.read(0, 1), Ok(1));
		assert_eq!(drive.elapsed_ms(), Some(HIT_MS), "The first buffer should have been kept.");

		// Nearby misses flush it.
		assert_eq!(drive.read(1150, 1), Ok(1));
		assert_eq!(drive.read(0, 1), Ok(1));
		assert_eq!(drive.elapsed_ms(), Some(SEEK_MS + SECTOR_MS), "The stash should be gone.");
	}

	#[test]
	fn t_sim_failures() {
		let mut drive = SimDrive::audio(1000)
			.with_bad(10..20)
			.with_fatal(500)
			.with_timing_failure(700)
			.with_speed_refusal();

		assert_eq!(drive.read(5, 10), Err(CacheError::CdRead(5)));
		assert_eq!(drive.read(20, 5), Ok(5));
		assert_eq!(drive.read(490, 20), Err(CacheError::CdReadFatal));
		assert_eq!(drive.read(690, 20), Ok(20));
		assert_eq!(drive.elapsed_ms(), None, "Timing should be dead.");
		assert_eq!(drive.read(0, 1), Ok(1));
		assert_eq!(drive.elapsed_ms(), None, "Timing should stay dead.");

		assert_eq!(drive.set_speed(1), Err(CacheError::Speed(1)));
		assert_eq!(drive.speeds(), &[1]);

		// Bad reads still have timing until it dies.
		let mut drive = SimDrive::audio(1000).with_bad(10..20).with_timing_cutoff(3);
		assert_eq!(drive.read(10, 1), Err(CacheError::CdRead(10)));
		assert_eq!(drive.elapsed_ms(), Some(SEEK_MS), "Errors should still be timed.");
		assert_eq!(drive.read(0, 1), Ok(1));
		assert!(drive.elapsed_ms().is_some(), "Timing should still work.");
		assert_eq!(drive.read(0, 1), Ok(1));
		assert_eq!(drive.elapsed_ms(), None, "Timing should die on the third read.");
	}

	#[test]
	fn t_sim_sluggish() {
		let mut drive = SimDrive::audio(1000).with_cache(100).with_sluggish(2);
		assert_eq!(drive.read(0, 1), Ok(1));
		assert_eq!(drive.read(5, 1), Ok(1));
		assert_eq!(drive.elapsed_ms(), Some(SEEK_MS + SECTOR_MS), "The first hit should be slow.");
		assert_eq!(drive.read(5, 1), Ok(1));
		assert_eq!(drive.elapsed_ms(), Some(SEEK_MS + SECTOR_MS), "The second hit should be slow.");
		assert_eq!(drive.read(5, 1), Ok(1));
		assert_eq!(drive.elapsed_ms(), Some(HIT_MS), "The third hit should be fast.");
	}
}
