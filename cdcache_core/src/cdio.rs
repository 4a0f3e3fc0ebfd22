/*!
# Cache Money: `libcdio` Wrappers
*/

use crate::{
	CacheError,
	CD_DATA_SIZE,
	CD_READ_CHUNK,
	DriveVendorModel,
};
use libcdio_sys::{
	cdio_hwinfo,
	cdio_track_enums_CDIO_CDROM_LEADOUT_TRACK,
	discmode_t_CDIO_DISC_MODE_CD_DA,
	discmode_t_CDIO_DISC_MODE_CD_MIXED,
	driver_id_t_DRIVER_DEVICE,
	driver_return_code_t_DRIVER_OP_NOT_PERMITTED,
	driver_return_code_t_DRIVER_OP_SUCCESS,
	track_format_t_TRACK_FORMAT_AUDIO,
	track_format_t_TRACK_FORMAT_ERROR,
};
use std::{
	ffi::{
		c_char,
		CStr,
		CString,
	},
	os::unix::ffi::OsStrExt,
	path::Path,
	sync::Once,
};



/// # Library Initialization.
static LIBCDIO_INIT: Once = Once::new();



#[derive(Debug)]
/// # CDIO Instance.
///
/// An open connection to an optical drive. The pointer is released on drop.
pub(crate) struct LibcdioInstance {
	/// # Device Path.
	///
	/// `libcdio` holds onto this, so it has to outlive the pointer.
	_dev: Option<CString>,

	/// # Handle.
	ptr: *mut libcdio_sys::CdIo_t,
}

impl Drop for LibcdioInstance {
	#[allow(unsafe_code)]
	fn drop(&mut self) {
		if ! self.ptr.is_null() {
			unsafe { libcdio_sys::cdio_destroy(self.ptr); }
		}
	}
}

impl LibcdioInstance {
	#[allow(unsafe_code)]
	/// # New.
	///
	/// Connect to the drive at `dev`, or whatever `libcdio` thinks is best,
	/// and make sure it holds a disc with audio on it.
	///
	/// ## Errors
	///
	/// This will return an error if the path is bogus, the connection fails,
	/// or the disc is missing or has no audio.
	pub(crate) fn new<P>(dev: Option<P>) -> Result<Self, CacheError>
	where P: AsRef<Path> {
		LIBCDIO_INIT.call_once(|| unsafe { libcdio_sys::cdio_init(); });

		let dev = dev.map(|p| device_path(p.as_ref())).transpose()?;
		let ptr = unsafe {
			libcdio_sys::cdio_open(
				dev.as_ref().map_or_else(std::ptr::null, |v| v.as_ptr()),
				driver_id_t_DRIVER_DEVICE,
			)
		};
		if ptr.is_null() {
			return Err(CacheError::DeviceOpen(
				dev.map(|v| v.to_string_lossy().into_owned())
			));
		}

		let out = Self { _dev: dev, ptr };
		if out.has_audio_mode() { Ok(out) }
		else { Err(CacheError::DiscMode) }
	}

	#[allow(unsafe_code, non_upper_case_globals)]
	/// # Audio Disc Mode?
	///
	/// Returns `true` for pure audio and mixed-mode discs.
	fn has_audio_mode(&self) -> bool {
		let mode = unsafe { libcdio_sys::cdio_get_discmode(self.ptr) };
		matches!(
			mode,
			discmode_t_CDIO_DISC_MODE_CD_DA | discmode_t_CDIO_DISC_MODE_CD_MIXED
		)
	}

	/// # Const Pointer.
	const fn as_ptr(&self) -> *const libcdio_sys::CdIo_t { self.ptr.cast() }
}

/// ## Table of Contents.
impl LibcdioInstance {
	#[allow(unsafe_code)]
	/// # First Track Number.
	pub(crate) fn first_track_num(&self) -> Result<u8, CacheError> {
		match unsafe { libcdio_sys::cdio_get_first_track_num(self.as_ptr()) } {
			0 => Err(CacheError::FirstTrackNum),
			n => Ok(n),
		}
	}

	#[allow(unsafe_code)]
	/// # Number of Tracks.
	pub(crate) fn num_tracks(&self) -> Result<u8, CacheError> {
		match unsafe { libcdio_sys::cdio_get_num_tracks(self.as_ptr()) } {
			0 => Err(CacheError::NumTracks),
			n => Ok(n),
		}
	}

	/// # Leadout LSN.
	pub(crate) fn leadout_lsn(&self) -> Result<u32, CacheError> {
		let idx = u8::try_from(cdio_track_enums_CDIO_CDROM_LEADOUT_TRACK)
			.map_err(|_| CacheError::Leadout)?;
		self.track_lsn_start(idx).map_err(|_| CacheError::Leadout)
	}

	#[allow(unsafe_code, non_upper_case_globals)]
	/// # Audio Track?
	///
	/// Returns `true` for audio, `false` for data of any kind, and an error
	/// if the drive can't say.
	pub(crate) fn track_format(&self, idx: u8) -> Result<bool, CacheError> {
		match unsafe { libcdio_sys::cdio_get_track_format(self.as_ptr(), idx) } {
			track_format_t_TRACK_FORMAT_AUDIO => Ok(true),
			track_format_t_TRACK_FORMAT_ERROR => Err(CacheError::TrackFormat(idx)),
			_ => Ok(false),
		}
	}

	#[allow(unsafe_code)]
	/// # Track LSN Start.
	///
	/// LSNs exclude the 150-sector lead-in, and are what the read commands
	/// expect.
	pub(crate) fn track_lsn_start(&self, idx: u8) -> Result<u32, CacheError> {
		if idx == 0 { return Err(CacheError::TrackNumber(0)); }
		let raw = unsafe { libcdio_sys::cdio_get_track_lsn(self.as_ptr(), idx) };
		u32::try_from(raw).map_err(|_| CacheError::TrackLba(idx))
	}
}

/// ## Drive.
impl LibcdioInstance {
	#[allow(unsafe_code)]
	/// # Drive Vendor/Model.
	pub(crate) fn drive_vendor_model(&self) -> Option<DriveVendorModel> {
		let mut raw = cdio_hwinfo {
			psz_vendor: [0; 9],
			psz_model: [0; 17],
			psz_revision: [0; 5],
		};

		// This one returns true on success.
		if 1 != unsafe { libcdio_sys::cdio_get_hwinfo(self.as_ptr(), &mut raw) } {
			return None;
		}

		let vendor = hw_str(&raw.psz_vendor).unwrap_or_default();
		let model = hw_str(&raw.psz_model)?;
		DriveVendorModel::new(&vendor, &model).ok()
	}

	#[allow(unsafe_code, non_upper_case_globals)]
	/// # Read Audio.
	///
	/// Read up to [`CD_READ_CHUNK`] audio sectors starting at `lsn` into
	/// `buf`, which is grown as needed, returning the number of sectors read.
	///
	/// ## Errors
	///
	/// This will return [`CacheError::CdReadFatal`] if the drive won't read
	/// audio at all, or a regular read error otherwise.
	pub(crate) fn read_audio(&self, buf: &mut Vec<u8>, lsn: u32, sectors: u32)
	-> Result<u32, CacheError> {
		let blocks = sectors.min(CD_READ_CHUNK);
		if blocks == 0 { return Ok(0); }

		let start = i32::try_from(lsn).map_err(|_| CacheError::CdRead(lsn))?;
		let len = usize::from(CD_DATA_SIZE) * blocks as usize;
		if buf.len() < len { buf.resize(len, 0); }

		let res = unsafe {
			libcdio_sys::mmc_read_cd(
				self.as_ptr(),
				buf.as_mut_ptr().cast(),
				start,
				1, // CDDA.
				0, // DAP.
				0, // Sync.
				0, // Headers.
				1, // User data.
				0, // EDC.
				0, // C2.
				0, // Subchannel.
				CD_DATA_SIZE,
				blocks,
			)
		};

		match res {
			driver_return_code_t_DRIVER_OP_SUCCESS => Ok(blocks),
			driver_return_code_t_DRIVER_OP_NOT_PERMITTED => Err(CacheError::CdReadFatal),
			_ => Err(CacheError::CdRead(lsn)),
		}
	}

	#[allow(unsafe_code)]
	/// # Set Speed.
	///
	/// ## Errors
	///
	/// Returns an error if the drive says no.
	pub(crate) fn set_speed(&self, speed: u8) -> Result<(), CacheError> {
		let res = unsafe { libcdio_sys::cdio_set_speed(self.as_ptr(), i32::from(speed)) };
		if res == driver_return_code_t_DRIVER_OP_SUCCESS { Ok(()) }
		else { Err(CacheError::Speed(speed)) }
	}
}



/// # Device Path.
///
/// Make sure the path exists and convert it to something C can use.
fn device_path(dev: &Path) -> Result<CString, CacheError> {
	let lossy = || dev.to_string_lossy().into_owned();
	if ! dev.exists() { return Err(CacheError::Device(lossy())); }
	CString::new(dev.as_os_str().as_bytes()).map_err(|_| CacheError::Device(lossy()))
}

#[allow(clippy::cast_sign_loss)]
/// # Hardware Info String.
///
/// Convert one of the fixed-length, null-terminated `cdio_hwinfo` fields to
/// an owned string, or `None` if it is empty or garbage.
fn hw_str(raw: &[c_char]) -> Option<String> {
	let bytes: Vec<u8> = raw.iter().map(|&b| b as u8).collect();
	let out = CStr::from_bytes_until_nul(&bytes).ok()?.to_str().ok()?.trim();
	if out.is_empty() { None }
	else { Some(out.to_owned()) }
}
