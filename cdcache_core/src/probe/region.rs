/*!
# Cache Money: Test Region
*/

use crate::TrackInfo;



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Test Region.
///
/// The inclusive sector bounds of the longest unbroken run of audio tracks.
/// Every read the probe makes falls within it.
pub(super) struct TestRegion {
	/// # First Sector.
	first: u32,

	/// # Last Sector.
	last: u32,
}

impl TestRegion {
	/// # Find.
	///
	/// Walk the tracks in order, returning the longest run of consecutive
	/// audio tracks, or `None` if there isn't any audio. Data tracks break
	/// runs; ties go to the earlier run.
	pub(super) fn find(tracks: &[TrackInfo]) -> Option<Self> {
		let mut best: Option<Self> = None;
		let mut run: Option<Self> = None;

		for t in tracks {
			if t.is_audio() {
				let next = run.map_or_else(
					|| Self { first: t.first_sector(), last: t.last_sector() },
					|r| Self { first: r.first, last: r.last.max(t.last_sector()) },
				);
				run.replace(next);
				if best.map_or(true, |b| b.len() < next.len()) { best.replace(next); }
			}
			else { run = None; }
		}

		best
	}

	/// # First Sector.
	pub(super) const fn first(self) -> u32 { self.first }

	/// # Last Sector.
	pub(super) const fn last(self) -> u32 { self.last }

	/// # Length (Sectors).
	pub(super) const fn len(self) -> u32 { self.last - self.first + 1 }
}
