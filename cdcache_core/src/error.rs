/*!
# Cache Money: Errors
*/

use fyi_msg::Msg;
use std::{
	error::Error,
	fmt,
};



#[cfg(feature = "bin")]
/// # Help Text.
const HELP: &str = concat!(r"
    ___________
   |  _______  |   Cache Money v", env!("CARGO_PKG_VERSION"), r"
   | |  ___  | |   Empirical optical drive
   | | (   ) | |   cache detection.
   | |  ---  | |
   |_|_______|_|

USAGE:
    cdcache [OPTIONS]

PROBE SETTINGS:
        --model <NUM> The largest read-ahead cache, in sectors, the
                      extraction engine can work around. Drives caching more
                      than this will trigger a warning.
                      [default: 1200; range: 1..=15,000]
        --no-sweep    Skip the initial seek/read timing sweep. It is purely
                      informational, but also warms the drive up, so results
                      may be a little less reliable without it.

DRIVE SETTINGS:
    -d, --dev <PATH>  The device path for the optical drive containing the CD
                      of interest, like /dev/cdrom. [default: auto]

MISCELLANEOUS:
    -h, --help        Print help information to STDOUT and exit.
    -l, --log <PATH>  Write the detailed read-by-read log to <PATH>.
    -v, --verbose     Write the detailed read-by-read log to STDOUT, so it
                      can e.g. be piped to a file for review, like:
                      cdcache -v > cache.log
    -V, --version     Print version information to STDOUT and exit.
        --no-summary  Skip the drive and disc summary and jump straight to
                      testing.

NOTE:
    The drive must be left alone while the test runs. Any other program
    reading from it will throw off the timings.
");



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Errors.
pub enum CacheError {
	/// # Fatal read error.
	///
	/// The drive cannot read the medium at all; there is no point retrying.
	CdReadFatal,

	/// # Transient read error.
	CdRead(u32),

	/// # Invalid device.
	Device(String),

	/// # Unable to open device.
	DeviceOpen(Option<String>),

	/// # Unsupported Disc.
	DiscMode,

	/// # Invalid drive model.
	DriveModel,

	/// # Invalid drive vendor.
	DriveVendor,

	/// # Unable to get first track number.
	FirstTrackNum,

	/// # Unable to get leadout.
	Leadout,

	/// # No audio on the disc.
	NoAudio,

	/// # Unable to obtain the number of tracks.
	NumTracks,

	/// # Ran out of disc.
	OutOfSpace,

	/// # Speed change refused.
	Speed(u8),

	/// # Timing unavailable.
	Timing,

	/// # Read errors kept piling up.
	TooManyReadErrors,

	/// # Invalid/unsupported track format.
	TrackFormat(u8),

	/// # Invalid track LBA.
	TrackLba(u8),

	/// # Invalid track number.
	TrackNumber(u8),

	/// # Writing to disk.
	Write(String),

	#[cfg(feature = "bin")]
	/// # Invalid CLI arg.
	CliArg(String),

	#[cfg(feature = "bin")]
	/// # CLI Parsing failure.
	CliParse(&'static str),

	#[cfg(feature = "bin")]
	/// # Print Help (Not an Error).
	PrintHelp,

	#[cfg(feature = "bin")]
	/// # Print Version (Not an Error).
	PrintVersion,
}

impl Error for CacheError {}

impl From<CacheError> for Msg {
	#[inline]
	fn from(src: CacheError) -> Self { Self::error(src.to_string()) }
}

impl fmt::Display for CacheError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::CdReadFatal => f.write_str("Unable to read CD; the medium or drive is not cooperating."),
			Self::CdRead(lsn) => write!(f, "Read error at sector {lsn}."),
			Self::Device(s) => write!(f, "Invalid device path {s}."),
			Self::DeviceOpen(s) =>
				if let Some(s) = s { write!(f, "Unable to open connection with {s}.") }
				else {
					f.write_str("Unable to open connection with default optical drive.")
				},
			Self::DiscMode => f.write_str("Missing or unsupported disc type."),
			Self::DriveModel => f.write_str("Invalid drive model."),
			Self::DriveVendor => f.write_str("Invalid drive vendor."),
			Self::FirstTrackNum => f.write_str("Unable to obtain the first track index."),
			Self::Leadout => f.write_str("Unable to obtain leadout."),
			Self::NoAudio => f.write_str("No audio on disc; cannot determine timing behavior."),
			Self::NumTracks => f.write_str("Unable to obtain the track total."),
			Self::OutOfSpace => f.write_str("Out of readable space on the disc while performing drive checks."),
			Self::Speed(n) => write!(f, "The drive refused to change its speed to {n}x."),
			Self::Timing => f.write_str("Timing error while performing drive cache checks."),
			Self::TooManyReadErrors => f.write_str("Too many read errors while performing drive cache checks."),
			Self::TrackFormat(n) => write!(f, "Unsupported track type ({n})."),
			Self::TrackLba(n) => write!(f, "Unable to obtain LBA ({n})."),
			Self::TrackNumber(n) => write!(f, "Invalid track number ({n})."),
			Self::Write(s) => write!(f, "Unable to write to {s}."),

			#[cfg(feature = "bin")]
			Self::CliArg(s) => write!(f, "Invalid CLI option: {s}"),

			#[cfg(feature = "bin")]
			Self::CliParse(s) => write!(f, "Unable to parse {s}."),

			#[cfg(feature = "bin")]
			Self::PrintHelp => f.write_str(HELP),

			#[cfg(feature = "bin")]
			Self::PrintVersion => f.write_str(concat!("Cache Money v", env!("CARGO_PKG_VERSION"))),
		}
	}
}

impl CacheError {
	#[must_use]
	/// # Fatal Read?
	///
	/// Returns `true` for the read error that should end the test outright
	/// rather than send it looking elsewhere on the disc.
	pub const fn is_fatal_read(&self) -> bool { matches!(self, Self::CdReadFatal) }
}
