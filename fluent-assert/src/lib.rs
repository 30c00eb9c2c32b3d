//! Fluent, type-aware assertions for test suites.
//!
//! A subject value is captured into a dynamically-typed [`Value`] and bound to a [`Reporter`],
//! yielding an [`Assertions`] chain. Each predicate method evaluates one check from the
//! [`compare`] engine and, on failure, reports a formatted message through the reporter.
//!
//! Two reporters ship with the crate:
//!
//! * [`PanicReporter`] integrates with the standard test harness by panicking on failure. Use
//!   [`check`] to bind it.
//! * [`Recorder`] captures failures instead of aborting, which is useful when testing custom
//!   assertions.
//!
//! # Examples
//!
//! ```
//! use fluent_assert::{Recorder, check, that};
//!
//! check(4).is_equal_to(4);
//! check(5.5).is_greater_than(4.25);
//! check(vec![1u8, 2, 3]).has_equivalent_sequence_to([1u8, 2, 3]);
//!
//! let mut recorder = Recorder::new();
//! that(&mut recorder, 4).is_equal_to(4i16);
//! assert!(recorder.did_fail());
//! assert!(recorder.fail_message().contains("Expected 4 to be equal to 4"));
//! ```

mod assertions;
pub mod compare;
mod config;
mod error;
pub mod normalize;
mod reporter;
mod trace_categories;
mod value;

pub use assertions::Assertions;
pub use config::{Config, Detail};
pub use error::Error;
pub use reporter::{PanicReporter, Recorder, Reporter};
pub use value::{
    FloatKind, Floating, InstantKind, IntKind, Integer, Kind, Opaque, Timestamp, TypeTag, Typed,
    Value,
};

/// Binds the given reporter and subject into a new assertion chain, using the default
/// configuration.
///
/// # Arguments
///
/// * `reporter` - The reporter that receives helper marks and failures. Any `&mut R` where
///   `R: Reporter` is accepted as well.
/// * `subject` - The value under test.
#[track_caller]
pub fn that<R: Reporter>(reporter: R, subject: impl Into<Value>) -> Assertions<R> {
    Assertions::new(reporter, subject)
}

/// Binds the given subject to a [`PanicReporter`], so that failed assertions fail the current
/// test. Configuration is read from the environment (see [`Config::from_env`]); an invalid
/// setting is logged and the default configuration is used instead.
///
/// # Arguments
///
/// * `subject` - The value under test.
#[track_caller]
pub fn check(subject: impl Into<Value>) -> Assertions<PanicReporter> {
    let config = Config::from_env().unwrap_or_else(|err| {
        tracing::warn!(target: trace_categories::CONFIG, "ignoring assertion configuration: {err}");
        Config::default()
    });

    that(PanicReporter, subject).with_config(config)
}
