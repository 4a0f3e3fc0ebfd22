/*!
# Cache Money: Timing Sweep

Before getting into the cache, sample seek and sequential read times across
the test region. The results don't feed into anything, but they give whoever
is reading the log a sense of what "normal" looks like for the drive.
*/

use crate::{
	CacheError,
	Drive,
	LATENCY_MAX_MS,
	Reporter,
	SECTORS_PER_SECOND,
};
use std::fmt;
use super::{
	SWEEP_FLOOR,
	SWEEP_STEP,
	SWEEP_WINDOW,
	TestRegion,
	trial::soft_read,
};



/// # Sweep.
///
/// Start one window from the end of the region and walk backward a sector
/// at a time until the timings settle down, then jump the rest of the way in
/// ten-minute strides.
///
/// ## Errors
///
/// Only fatal read errors abort the sweep; anything else just skips the
/// offset.
pub(super) fn sweep<D>(drive: &mut D, region: TestRegion, rep: &mut Reporter)
-> Result<(), CacheError>
where D: Drive + ?Sized {
	rep.report(format_args!("\nSeek/read timing:\n"));

	let first = region.first();
	let Some(mut offset) = region.last().checked_sub(SWEEP_WINDOW + 1) else {
		return Ok(());
	};

	let mut chunks: Vec<Chunk> = Vec::with_capacity(SWEEP_WINDOW as usize);
	let mut conv = Convergence::default();
	while first <= offset {
		if conv.iterating() { rep.report(format_args!("\n")); }
		else {
			rep.print(format_args!("\r"));
			rep.log(format_args!("\n"));
		}
		rep.report(format_args!("\t{}: ", Msf(offset)));

		if let Some(stats) = sample(drive, offset, &mut chunks, rep)? {
			let speed = stats.speed();
			rep.print(format_args!(
				"{:4}ms seek, {:.2}ms/sec read [{speed:.1}x]",
				stats.seek, stats.mean,
			));
			rep.log(format_args!(
				"\n\tInitial seek latency ({SWEEP_WINDOW} sectors): {}ms",
				stats.seek,
			));
			rep.log(format_args!(
				"\n\tAverage read latency: {:.2}ms/sector (raw speed: {speed:.1}x)",
				stats.mean,
			));
			rep.log(format_args!(
				"\n\tRead latency standard deviation: {:.2}ms/sector",
				stats.deviation,
			));

			conv.push(stats.total());
		}

		// Move along.
		let next =
			if conv.iterating() {
				rep.print(format_args!("               "));
				coarse_step(first, offset)
			}
			else {
				rep.print(format_args!(" spinning up..."));
				offset.checked_sub(1)
			};

		match next {
			Some(n) => { offset = n; },
			None => break,
		}
	}

	Ok(())
}



#[derive(Debug, Clone, Copy)]
/// # Chunk.
///
/// A single sequential read made during a sample.
struct Chunk {
	/// # Sectors Read.
	sectors: u32,

	/// # Elapsed Time (ms).
	ms: u32,
}

impl Chunk {
	/// # Per-Sector Latency.
	fn per_sector(self) -> f64 { f64::from(self.ms) / f64::from(self.sectors) }
}



#[derive(Debug, Clone, Copy, PartialEq)]
/// # Sample Statistics.
struct SweepStats {
	/// # Seek Latency (ms).
	seek: u32,

	/// # Mean Per-Sector Read Latency (ms), Outliers Removed.
	mean: f64,

	/// # Standard Deviation (ms).
	deviation: f64,
}

impl SweepStats {
	/// # From Chunks.
	///
	/// The first chunk is the seek; the rest are sequential reads, weighted
	/// by sector count.
	///
	/// Bursts of latency from elsewhere on the system would throw off the
	/// mean, so chunks more than two standard deviations above it (or one
	/// millisecond, whichever is more) are dropped from the final figure.
	fn from_chunks(chunks: &[Chunk]) -> Option<Self> {
		let (seek, rest) = chunks.split_first()?;

		let mut sectors: u32 = 0;
		let mut sum = 0.0_f64;
		let mut sumsq = 0.0_f64;
		for c in rest {
			let ms = f64::from(c.ms);
			sectors += c.sectors;
			sum += ms;
			sumsq += ms * ms / f64::from(c.sectors);
		}
		if sectors == 0 { return None; }

		let n = f64::from(sectors);
		let raw_mean = sum / n;
		let deviation = (sumsq / n - raw_mean * raw_mean).sqrt();
		let upper = raw_mean + (
			if ! deviation.is_finite() || deviation * 2.0 < 1.0 { 1.0 }
			else { deviation * 2.0 }
		);

		let mut kept_ms = 0.0_f64;
		let mut kept_sectors: u32 = 0;
		for c in rest {
			if c.per_sector() <= upper {
				kept_ms += f64::from(c.ms);
				kept_sectors += c.sectors;
			}
		}
		let mean =
			if kept_sectors == 0 { raw_mean }
			else { kept_ms / f64::from(kept_sectors) };

		Some(Self {
			seek: seek.ms,
			mean,
			deviation,
		})
	}

	/// # Raw Speed.
	///
	/// Express the mean as a multiple of realtime playback.
	fn speed(&self) -> f64 {
		1000.0 / f64::from(SECTORS_PER_SECOND) / self.mean
	}

	#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
	/// # Total Window Time (ms).
	///
	/// The time it would take to read a full window at the mean rate.
	fn total(&self) -> u32 {
		(self.mean * f64::from(SWEEP_WINDOW)) as u32
	}
}



#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
/// # Convergence.
///
/// Drives take a while to spin up to speed, so the sweep samples densely
/// until the window times stop improving.
struct Convergence {
	/// # Best (Slowest) Window Time.
	best: u32,

	/// # Accumulated Non-Improving Time.
	penalty: u32,

	/// # Switched to Coarse Sampling?
	iterating: bool,
}

impl Convergence {
	/// # Iterating?
	const fn iterating(&self) -> bool { self.iterating }

	/// # Push Sample.
	fn push(&mut self, total: u32) {
		if self.iterating { return; }

		if self.best < total {
			self.best = total;
			self.penalty = 0;
		}
		else {
			self.penalty = self.penalty.saturating_add(total);
			if self.best < self.penalty && SWEEP_FLOOR < self.penalty {
				self.iterating = true;
			}
		}
	}
}



#[derive(Debug, Clone, Copy)]
/// # Minutes/Seconds/Frames.
///
/// Format a sector offset as a `[mm:ss.ff]` timestamp.
struct Msf(u32);

impl fmt::Display for Msf {
	#[allow(clippy::integer_division)]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let per_minute = SECTORS_PER_SECOND * 60;
		let m = self.0 / per_minute;
		let rest = self.0 - m * per_minute;
		let s = rest / SECTORS_PER_SECOND;
		let ff = rest - s * SECTORS_PER_SECOND;
		write!(f, "[{m:02}:{s:02}.{ff:02}]")
	}
}



/// # Sample.
///
/// Seek to just past the window, then read it from the start, recording the
/// time each chunk took. The first chunk is a single sector so that its time
/// is mostly seek.
///
/// Returns `None` if the offset had to be skipped.
///
/// ## Errors
///
/// Fatal read errors are passed through.
fn sample<D>(
	drive: &mut D,
	offset: u32,
	chunks: &mut Vec<Chunk>,
	rep: &mut Reporter,
) -> Result<Option<SweepStats>, CacheError>
where D: Drive + ?Sized {
	chunks.clear();

	if 0 == soft_read(drive, offset + SWEEP_WINDOW + 1, 1)? {
		rep.report(format_args!("\n\tWARNING: media error during setup; continuing at next offset..."));
		return Ok(None);
	}
	rep.log(format_args!("\n"));

	let mut sofar = 0;
	while sofar < SWEEP_WINDOW {
		let want = if chunks.is_empty() { 1 } else { SWEEP_WINDOW - sofar };
		let sectors = soft_read(drive, offset + sofar, want)?;
		if sectors == 0 {
			rep.report(format_args!("\n\tWARNING: media error during read; continuing at next offset..."));
			return Ok(None);
		}

		let ms = drive.elapsed_ms().unwrap_or(0).min(LATENCY_MAX_MS);
		rep.log(format_args!("{sectors}:{ms} "));

		chunks.push(Chunk { sectors, ms });
		sofar += sectors;
	}

	Ok(SweepStats::from_chunks(chunks))
}

#[allow(clippy::integer_division)]
/// # Coarse Step.
///
/// Round the distance from the start of the region up to the next stride,
/// then back off one. Returns `None` once the start has been sampled.
const fn coarse_step(first: u32, offset: u32) -> Option<u32> {
	let strides = (offset - first).div_ceil(SWEEP_STEP);
	if strides == 0 { None }
	else { Some(first + (strides - 1) * SWEEP_STEP) }
}
