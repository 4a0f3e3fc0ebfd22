/*!
# Cache Money: Drive
*/

use crate::CacheError;
use std::fmt;



/// # Drive.
///
/// This is everything the cache probe needs from an optical drive: the track
/// layout, blocking sector reads, the elapsed time of the most recent read,
/// and speed control.
///
/// The probe never looks at the data it reads, so implementations are free
/// to throw it away.
///
/// Timing is only meaningful if nothing else is using the drive at the same
/// time; the probe borrows it mutably for the duration, but cannot stop
/// other programs from getting in the way.
pub trait Drive {
	/// # Tracks.
	///
	/// Return all tracks on the disc in index order.
	fn tracks(&self) -> &[TrackInfo];

	/// # Read.
	///
	/// Read up to `sectors` audio sectors starting at `lsn`, returning the
	/// number actually read. Short reads are fine; `Ok(0)` counts as a
	/// failure.
	///
	/// ## Errors
	///
	/// Return [`CacheError::CdReadFatal`] if the medium cannot be read at all,
	/// or any other error for problems that might go away somewhere else on
	/// the disc.
	fn read(&mut self, lsn: u32, sectors: u32) -> Result<u32, CacheError>;

	/// # Elapsed Time (ms).
	///
	/// Return the number of milliseconds the most recent read took, or `None`
	/// if timing information is unavailable.
	fn elapsed_ms(&self) -> Option<u32>;

	/// # Set Speed.
	///
	/// ## Errors
	///
	/// Return an error if the drive refuses. This is never fatal.
	fn set_speed(&mut self, speed: u8) -> Result<(), CacheError>;
}



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Track Info.
///
/// The position and kind of a single track, using _inclusive_ LSN bounds.
pub struct TrackInfo {
	/// # Track Number.
	number: u8,

	/// # Audio?
	audio: bool,

	/// # First Sector.
	first: u32,

	/// # Last Sector.
	last: u32,
}

impl TrackInfo {
	#[must_use]
	/// # New.
	///
	/// If `last` comes before `first`, the two are swapped.
	pub const fn new(number: u8, audio: bool, first: u32, last: u32) -> Self {
		if last < first {
			Self { number, audio, first: last, last: first }
		}
		else { Self { number, audio, first, last } }
	}

	#[must_use]
	/// # Track Number.
	pub const fn number(&self) -> u8 { self.number }

	#[must_use]
	/// # Audio?
	pub const fn is_audio(&self) -> bool { self.audio }

	#[must_use]
	/// # First Sector.
	pub const fn first_sector(&self) -> u32 { self.first }

	#[must_use]
	/// # Last Sector (Inclusive).
	pub const fn last_sector(&self) -> u32 { self.last }

	#[must_use]
	/// # Length (Sectors).
	pub const fn len(&self) -> u32 { self.last - self.first + 1 }

	#[must_use]
	/// # Is Empty?
	///
	/// Tracks always have at least one sector, so this is always `false`.
	pub const fn is_empty(&self) -> bool { false }
}



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Drive Vendor/Model.
///
/// Vendors are at most eight bytes, models at most sixteen. Both are stored
/// in a single null-padded array.
pub struct DriveVendorModel([u8; 24]);

impl fmt::Display for DriveVendorModel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let vendor = self.vendor();
		if vendor.is_empty() { f.write_str(self.model()) }
		else { write!(f, "{vendor} {}", self.model()) }
	}
}

impl DriveVendorModel {
	/// # New.
	///
	/// ## Errors
	///
	/// Returns an error if the vendor is too long, or the model is empty or
	/// too long.
	pub fn new(vendor: &str, model: &str) -> Result<Self, CacheError> {
		let vendor = vendor.trim();
		let model = model.trim();

		if 8 < vendor.len() || ! vendor.is_ascii() {
			return Err(CacheError::DriveVendor);
		}
		if model.is_empty() || 16 < model.len() || ! model.is_ascii() {
			return Err(CacheError::DriveModel);
		}

		let mut out = [0_u8; 24];
		out[..vendor.len()].copy_from_slice(vendor.as_bytes());
		out[8..8 + model.len()].copy_from_slice(model.as_bytes());
		Ok(Self(out))
	}

	#[must_use]
	/// # Vendor.
	pub fn vendor(&self) -> &str { trim_nul(&self.0[..8]) }

	#[must_use]
	/// # Model.
	pub fn model(&self) -> &str { trim_nul(&self.0[8..]) }
}



/// # Trim Trailing Nulls.
fn trim_nul(src: &[u8]) -> &str {
	let end = src.iter().position(|&b| b == 0).unwrap_or(src.len());
	std::str::from_utf8(&src[..end]).unwrap_or_default()
}
