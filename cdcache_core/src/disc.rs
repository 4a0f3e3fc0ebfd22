/*!
# Cache Money: Disc
*/

use cdtoc::Toc;
use crate::{
	CacheError,
	CD_LEADIN,
	Drive,
	DriveVendorModel,
	LibcdioInstance,
	TrackInfo,
};
use dactyl::NiceU32;
use std::{
	fmt,
	path::Path,
	time::Instant,
};



#[derive(Debug)]
/// # Disc.
///
/// A loaded compact disc, and the drive it is sitting in.
///
/// This implements [`Drive`] so can be handed straight to
/// [`analyze`](crate::analyze).
pub struct Disc {
	/// # CDIO Instance.
	cdio: LibcdioInstance,

	/// # Tracks.
	tracks: Vec<TrackInfo>,

	/// # Table of Contents.
	///
	/// This is only used for the summary, and only exists for the kinds of
	/// layouts `cdtoc` understands.
	toc: Option<Toc>,

	/// # Read Buffer.
	buf: Vec<u8>,

	/// # Elapsed Time of Last Read.
	elapsed: Option<u32>,
}

impl fmt::Display for Disc {
	/// # Summarize the Disc.
	///
	/// This prints the disc identifiers and a simple track listing.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		/// # Divider.
		const DIVIDER: &str = "----------------------------------------\n";

		if let Some(toc) = self.toc.as_ref() {
			writeln!(f, "CDTOC: {toc}")?;
			writeln!(f, "CDDB:  {}\n", toc.cddb_id())?;
		}

		f.write_str("##   FIRST    LAST    LENGTH  KIND\n")?;
		f.write_str(DIVIDER)?;
		for t in &self.tracks {
			writeln!(
				f,
				"{:02}  {:>6}  {:>6}  {:>8}  {}",
				t.number(),
				t.first_sector(),
				t.last_sector(),
				NiceU32::from(t.len()),
				if t.is_audio() { "AUDIO" } else { "DATA" },
			)?;
		}
		f.write_str(DIVIDER)
	}
}

impl Disc {
	/// # New.
	///
	/// Connect to the drive and load the track layout.
	///
	/// ## Errors
	///
	/// This will return an error if there's a problem communicating with the
	/// drive, the disc is missing or unsupported, etc.
	pub fn new<P>(dev: Option<P>) -> Result<Self, CacheError>
	where P: AsRef<Path> {
		let cdio = LibcdioInstance::new(dev)?;

		// The inclusive range to search.
		let from = cdio.first_track_num()?;
		let to = cdio.num_tracks()?;
		if to < from { return Err(CacheError::NumTracks); }

		// Grab the starts and kinds first; ends come from the next start.
		let mut starts = Vec::with_capacity(usize::from(to - from) + 1);
		for idx in from..=to {
			starts.push((idx, cdio.track_format(idx)?, cdio.track_lsn_start(idx)?));
		}
		let leadout = cdio.leadout_lsn()?;

		let mut tracks = Vec::with_capacity(starts.len());
		for (pos, &(idx, audio, start)) in starts.iter().enumerate() {
			let next = starts.get(pos + 1).map_or(leadout, |&(_, _, s)| s);
			if next <= start { return Err(CacheError::TrackLba(idx)); }
			tracks.push(TrackInfo::new(idx, audio, start, next - 1));
		}

		let toc = build_toc(&tracks, leadout);

		Ok(Self {
			cdio,
			tracks,
			toc,
			buf: Vec::new(),
			elapsed: None,
		})
	}
}

impl Disc {
	#[must_use]
	#[inline]
	/// # Drive Vendor and Model.
	pub fn drive_vendor_model(&self) -> Option<DriveVendorModel> {
		self.cdio.drive_vendor_model()
	}

	#[must_use]
	/// # Table of Contents.
	pub const fn toc(&self) -> Option<&Toc> { self.toc.as_ref() }
}

impl Drive for Disc {
	fn tracks(&self) -> &[TrackInfo] { &self.tracks }

	fn read(&mut self, lsn: u32, sectors: u32) -> Result<u32, CacheError> {
		self.elapsed = None;
		let now = Instant::now();
		let res = self.cdio.read_audio(&mut self.buf, lsn, sectors);
		self.elapsed = Some(
			u32::try_from(now.elapsed().as_millis()).unwrap_or(u32::MAX)
		);
		res
	}

	fn elapsed_ms(&self) -> Option<u32> { self.elapsed }

	fn set_speed(&mut self, speed: u8) -> Result<(), CacheError> {
		self.cdio.set_speed(speed)
	}
}



/// # Build Table of Contents.
///
/// `cdtoc` only deals with audio tracks plus at most one data session at
/// either end. Anything else is simply left without one.
fn build_toc(tracks: &[TrackInfo], leadout: u32) -> Option<Toc> {
	let lba = |lsn: u32| lsn + u32::from(CD_LEADIN);

	let mut audio = Vec::with_capacity(tracks.len());
	let mut data = None;
	for (pos, t) in tracks.iter().enumerate() {
		if t.is_audio() { audio.push(lba(t.first_sector())); }
		else if data.is_none() && (pos == 0 || pos + 1 == tracks.len()) {
			data.replace(lba(t.first_sector()));
		}
		else { return None; }
	}

	Toc::from_parts(audio, data, lba(leadout)).ok()
}
