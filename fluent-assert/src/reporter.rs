//! The contract between assertion chains and the test framework hosting them.

use std::fmt;

/// Capabilities an assertion chain requires from its host test framework.
pub trait Reporter {
    /// Returns a human-readable identifier for the current test.
    fn name(&self) -> String;

    /// Marks the calling frame as an internal helper, so that failure locations are attributed
    /// to the code calling into the assertion library.
    fn helper(&mut self);

    /// Reports a fatal failure of the current test.
    ///
    /// Implementations are expected to end or flag the current test; callers do not rely on
    /// this method diverging.
    ///
    /// # Arguments
    ///
    /// * `message` - The fully formatted failure message.
    fn fatal(&mut self, message: fmt::Arguments<'_>);
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn name(&self) -> String {
        (**self).name()
    }

    #[track_caller]
    fn helper(&mut self) {
        (**self).helper();
    }

    #[track_caller]
    fn fatal(&mut self, message: fmt::Arguments<'_>) {
        (**self).fatal(message);
    }
}

/// Reporter that records helper marks and failures instead of acting on them. Useful for
/// testing assertions themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Recorder {
    helper_call_count: usize,
    did_fail: bool,
    fail_message: String,
}

impl Recorder {
    /// Returns a new recorder that has seen no helper marks and no failures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of times [`Reporter::helper`] was called.
    pub const fn helper_call_count(&self) -> usize {
        self.helper_call_count
    }

    /// Returns whether [`Reporter::fatal`] was called.
    pub const fn did_fail(&self) -> bool {
        self.did_fail
    }

    /// Returns the most recently reported failure message, or an empty string.
    pub fn fail_message(&self) -> &str {
        &self.fail_message
    }
}

impl Reporter for Recorder {
    fn name(&self) -> String {
        "Recorder".to_owned()
    }

    fn helper(&mut self) {
        self.helper_call_count += 1;
    }

    fn fatal(&mut self, message: fmt::Arguments<'_>) {
        self.did_fail = true;
        self.fail_message = message.to_string();
    }
}

/// Reporter for the standard test harness: failures panic, which fails the running test.
///
/// Location attribution relies on `#[track_caller]` rather than helper marks, so the reported
/// location is the assertion call in the test body.
#[derive(Clone, Copy, Debug, Default)]
pub struct PanicReporter;

impl Reporter for PanicReporter {
    /// Returns the name of the current thread, which the standard test harness sets to the
    /// name of the running test.
    fn name(&self) -> String {
        std::thread::current()
            .name()
            .unwrap_or("<unnamed>")
            .to_owned()
    }

    fn helper(&mut self) {}

    #[track_caller]
    #[allow(clippy::panic)]
    fn fatal(&mut self, message: fmt::Arguments<'_>) {
        panic!("{message}");
    }
}
