//! The fluent assertion chain.

use std::fmt::{self, Display, Formatter};

use crate::compare::{self, Outcome, Relation, SequenceOutcome};
use crate::config::Config;
use crate::reporter::Reporter;
use crate::trace_categories;
use crate::value::Value;

/// A subject value bound to a reporter, with one method per predicate.
///
/// Every method marks itself as a helper frame, evaluates its predicate against the subject
/// and, if the predicate fails, reports a formatted failure through the reporter. Methods return
/// normally after reporting, whether or not the reporter ends the test.
pub struct Assertions<R: Reporter> {
    reporter: R,
    subject: Value,
    config: Config,
}

impl<R: Reporter> Assertions<R> {
    /// Binds the given reporter and subject, using the default configuration.
    ///
    /// # Arguments
    ///
    /// * `reporter` - The reporter that receives helper marks and failures.
    /// * `subject` - The value under test.
    #[track_caller]
    pub fn new(mut reporter: R, subject: impl Into<Value>) -> Self {
        reporter.helper();

        Self {
            reporter,
            subject: subject.into(),
            config: Config::default(),
        }
    }

    /// Replaces the configuration of this chain.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration to use for subsequent assertions.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Returns the subject under test.
    pub const fn subject(&self) -> &Value {
        &self.subject
    }

    /// Returns the configuration in effect.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Fails if the subject is not equal to `y`. Values of different types are never equal.
    #[track_caller]
    pub fn is_equal_to(&mut self, y: impl Into<Value>) {
        self.reporter.helper();

        let y = y.into();
        if compare::equality(&self.subject, &y) {
            return;
        }

        formatted_failure(
            &mut self.reporter,
            format_args!(
                "Expected {} to be equal to {}{}",
                self.subject,
                y,
                TypeNames::new(&self.config, &self.subject, Some(&y))
            ),
        );
    }

    /// Fails if the subject is equal to `y`.
    #[track_caller]
    pub fn is_not_equal_to(&mut self, y: impl Into<Value>) {
        self.reporter.helper();

        let y = y.into();
        if !compare::equality(&self.subject, &y) {
            return;
        }

        formatted_failure(
            &mut self.reporter,
            format_args!(
                "Expected {} to not be equal to {}{}",
                self.subject,
                y,
                TypeNames::new(&self.config, &self.subject, Some(&y))
            ),
        );
    }

    /// Fails if the subject is not nil.
    #[track_caller]
    pub fn is_nil(&mut self) {
        self.reporter.helper();

        if compare::is_nil(&self.subject) {
            return;
        }

        formatted_failure(
            &mut self.reporter,
            format_args!(
                "Expected {} to be <nil>{}",
                self.subject,
                TypeNames::new(&self.config, &self.subject, None)
            ),
        );
    }

    /// Fails if the subject is nil.
    #[track_caller]
    pub fn is_not_nil(&mut self) {
        self.reporter.helper();

        if !compare::is_nil(&self.subject) {
            return;
        }

        formatted_failure(
            &mut self.reporter,
            format_args!(
                "Expected subject to not be <nil>, but was{}",
                TypeNames::new(&self.config, &self.subject, None)
            ),
        );
    }

    /// Fails unless the subject and `y` are both sequences with the same element type, the same
    /// length and equal elements in the same order.
    #[track_caller]
    pub fn has_equivalent_sequence_to(&mut self, y: impl Into<Value>) {
        self.reporter.helper();

        let y = y.into();
        match compare::sequence_equivalence(&self.subject, &y) {
            SequenceOutcome::Equivalent => (),
            SequenceOutcome::NotSequences {
                subject,
                comparator,
            } => formatted_failure(
                &mut self.reporter,
                format_args!(
                    "Expected both subject and comparator to be slices, but subject was a {subject} and comparator was a {comparator}"
                ),
            ),
            SequenceOutcome::ElementTypeMismatch {
                subject,
                comparator,
            } => formatted_failure(
                &mut self.reporter,
                format_args!("Expected subject to have type like {comparator} but was {subject}"),
            ),
            SequenceOutcome::LengthMismatch {
                subject,
                comparator,
            } => formatted_failure(
                &mut self.reporter,
                format_args!("Expected subject to have length {comparator} but had length {subject}"),
            ),
            SequenceOutcome::ElementsDiffer => formatted_failure(
                &mut self.reporter,
                format_args!(
                    "Expected sequence of elements in\n\n{}\n\nto be equal to sequence of elements in\n\n{}",
                    self.subject, y
                ),
            ),
        }
    }

    /// Fails if the subject is not a boolean, or is `false`.
    #[track_caller]
    pub fn is_true(&mut self) {
        self.reporter.helper();
        self.check_boolean(true);
    }

    /// Fails if the subject is not a boolean, or is `true`.
    #[track_caller]
    pub fn is_false(&mut self) {
        self.reporter.helper();
        self.check_boolean(false);
    }

    /// Fails unless the subject is greater than `y`.
    #[track_caller]
    pub fn is_greater_than(&mut self, y: impl Into<Value>) {
        self.reporter.helper();
        self.check_ordering(&y.into(), Relation::Greater);
    }

    /// Fails unless the subject is greater than or equal to `y`.
    #[track_caller]
    pub fn is_greater_than_or_equal_to(&mut self, y: impl Into<Value>) {
        self.reporter.helper();
        self.check_ordering(&y.into(), Relation::GreaterOrEqual);
    }

    /// Fails unless the subject is less than `y`.
    #[track_caller]
    pub fn is_less_than(&mut self, y: impl Into<Value>) {
        self.reporter.helper();
        self.check_ordering(&y.into(), Relation::Less);
    }

    /// Fails unless the subject is less than or equal to `y`.
    #[track_caller]
    pub fn is_less_than_or_equal_to(&mut self, y: impl Into<Value>) {
        self.reporter.helper();
        self.check_ordering(&y.into(), Relation::LessOrEqual);
    }

    #[track_caller]
    fn check_boolean(&mut self, expected: bool) {
        match compare::boolean(&self.subject) {
            None => formatted_failure(
                &mut self.reporter,
                format_args!(
                    "Expected <{expected}>, but was not a boolean{}",
                    TypeNames::new(&self.config, &self.subject, None)
                ),
            ),
            Some(actual) if actual != expected => formatted_failure(
                &mut self.reporter,
                format_args!("Expected <{expected}>, but was <{actual}>"),
            ),
            Some(_) => (),
        }
    }

    #[track_caller]
    fn check_ordering(&mut self, y: &Value, relation: Relation) {
        match compare::ordering(&self.subject, y, relation) {
            Outcome::Applicable(true) => (),
            Outcome::Applicable(false) => formatted_failure(
                &mut self.reporter,
                format_args!("Expected {} to be {relation} {y}", self.subject),
            ),
            Outcome::Inapplicable => formatted_failure(
                &mut self.reporter,
                format_args!(
                    "Expected two comparable types{}",
                    TypeNames::new(&self.config, &self.subject, Some(y))
                ),
            ),
        }
    }
}

/// Reports a failure, prefixed with the name of the current test.
#[track_caller]
fn formatted_failure<R: Reporter>(reporter: &mut R, message: fmt::Arguments<'_>) {
    reporter.helper();

    let name = reporter.name();
    tracing::debug!(target: trace_categories::ASSERTIONS, "assertion failed in {name}: {message}");

    reporter.fatal(format_args!("\n\n× {name}\n{message}\n\n"));
}

/// Renders the `x:`/`y:` type lines appended to failure messages, when enabled.
struct TypeNames<'a> {
    enabled: bool,
    x: &'a Value,
    y: Option<&'a Value>,
}

impl<'a> TypeNames<'a> {
    const fn new(config: &Config, x: &'a Value, y: Option<&'a Value>) -> Self {
        Self {
            enabled: config.includes_type_names(),
            x,
            y,
        }
    }
}

impl Display for TypeNames<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if !self.enabled {
            return Ok(());
        }

        write!(f, "\nx: {}", self.x.type_tag())?;
        if let Some(y) = self.y {
            write!(f, "\ny: {}", y.type_tag())?;
        }

        Ok(())
    }
}
