/*!
# Cache Money: Reporting
*/

use std::{
	fmt,
	io::Write,
};



/// # Reporter.
///
/// The probe talks to two optional sinks: a terse _progress_ stream meant for
/// a terminal (lines get overwritten with carriage returns), and a verbose
/// _log_ meant for post-mortem review.
///
/// Missing sinks are simply skipped, as are any write errors; the test
/// itself matters more than its commentary.
pub(crate) struct Reporter<'a> {
	/// # Progress Sink.
	progress: Option<&'a mut dyn Write>,

	/// # Log Sink.
	log: Option<&'a mut dyn Write>,
}

impl fmt::Debug for Reporter<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Reporter")
			.field("progress", &self.progress.is_some())
			.field("log", &self.log.is_some())
			.finish()
	}
}

impl Drop for Reporter<'_> {
	fn drop(&mut self) {
		if let Some(w) = self.progress.as_mut() { let _res = w.flush(); }
		if let Some(w) = self.log.as_mut() { let _res = w.flush(); }
	}
}

impl<'a> Reporter<'a> {
	/// # New.
	pub(crate) fn new(
		progress: Option<&'a mut dyn Write>,
		log: Option<&'a mut dyn Write>,
	) -> Self {
		Self { progress, log }
	}

	/// # Report.
	///
	/// Write to both sinks.
	pub(crate) fn report(&mut self, args: fmt::Arguments) {
		self.print(args);
		self.log(args);
	}

	/// # Print.
	///
	/// Write to the progress sink only.
	pub(crate) fn print(&mut self, args: fmt::Arguments) {
		if let Some(w) = self.progress.as_mut() {
			let _res = w.write_fmt(args).and_then(|()| w.flush());
		}
	}

	/// # Log.
	///
	/// Write to the log sink only.
	pub(crate) fn log(&mut self, args: fmt::Arguments) {
		if let Some(w) = self.log.as_mut() {
			let _res = w.write_fmt(args);
		}
	}

	/// # Logging?
	///
	/// Some log lines are expensive to build; this lets callers skip the
	/// work when nobody is listening.
	pub(crate) const fn logging(&self) -> bool { self.log.is_some() }
}
