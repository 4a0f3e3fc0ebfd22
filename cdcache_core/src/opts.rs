/*!
# Cache Money: Probe Options
*/

use crate::CACHEMODEL_SECTORS;
use crate::probe::CACHE_SEARCH_MAX;



/// # FLAG: Timing Sweep.
const FLAG_SWEEP: u8 =   0b0000_0001;

/// # FLAG: Default.
const FLAG_DEFAULT: u8 = FLAG_SWEEP;



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Probe Options.
///
/// Options are set using builder-style methods, like:
///
/// ```
/// use cdcache_core::ProbeOptions;
///
/// let opts = ProbeOptions::default()
///     .with_sweep(false)
///     .with_model_sectors(800);
///
/// assert!(! opts.sweep());
/// assert_eq!(opts.model_sectors(), 800);
/// ```
pub struct ProbeOptions {
	/// # Cache Model Ceiling.
	model: u32,

	/// # Flags.
	flags: u8,
}

impl Default for ProbeOptions {
	fn default() -> Self {
		Self {
			model: CACHEMODEL_SECTORS,
			flags: FLAG_DEFAULT,
		}
	}
}

/// ## Setters.
impl ProbeOptions {
	#[must_use]
	/// # Cache Model Ceiling.
	///
	/// Drives found to cache more than this many sectors of read-ahead will
	/// trigger a warning, as the extraction engine can't reliably work
	/// around them.
	///
	/// Values are capped to `1..=15_000`; the default is
	/// [`CACHEMODEL_SECTORS`].
	pub const fn with_model_sectors(self, mut model: u32) -> Self {
		if model == 0 { model = 1; }
		else if CACHE_SEARCH_MAX < model { model = CACHE_SEARCH_MAX; }
		Self {
			model,
			..self
		}
	}

	#[must_use]
	/// # Timing Sweep.
	///
	/// When `true`, seek and read latencies are sampled across the disc
	/// before any cache testing begins. The results are informational only,
	/// but the exercise also gets the drive up to speed.
	///
	/// The default is `true`.
	pub const fn with_sweep(self, v: bool) -> Self {
		let flags =
			if v { self.flags | FLAG_SWEEP }
			else { self.flags & ! FLAG_SWEEP };

		Self {
			flags,
			..self
		}
	}
}

/// ## Getters.
impl ProbeOptions {
	#[must_use]
	/// # Cache Model Ceiling.
	pub const fn model_sectors(&self) -> u32 { self.model }

	#[must_use]
	/// # Timing Sweep?
	pub const fn sweep(&self) -> bool { FLAG_SWEEP == self.flags & FLAG_SWEEP }
}
