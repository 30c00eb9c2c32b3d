//! The comparison engine behind every assertion.
//!
//! Predicates here are pure functions over captured [`Value`]s. Equality is type-strict, while
//! ordering normalizes operands through [`crate::normalize`] so that, for example, a `u8` can be
//! ordered against an `i64`. Predicates that can be meaningless for a pair of operands report
//! that separately from a false result.

use chrono::TimeDelta;

use crate::normalize::{self, Class};
use crate::trace_categories;
use crate::value::{Kind, Timestamp, TypeTag, Value};

/// An ordering relation between a subject and a comparator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Relation {
    /// Strictly greater.
    #[strum(to_string = "greater than")]
    Greater,
    /// Greater or equal.
    #[strum(to_string = "greater than or equal to")]
    GreaterOrEqual,
    /// Strictly less.
    #[strum(to_string = "less than")]
    Less,
    /// Less or equal.
    #[strum(to_string = "less than or equal to")]
    LessOrEqual,
}

impl Relation {
    /// Returns whether the relation holds for operands with the given ordering. Unordered
    /// operands (`None`, as for NaN) satisfy no relation.
    ///
    /// # Arguments
    ///
    /// * `ordering` - The ordering of the subject relative to the comparator.
    pub fn holds(self, ordering: Option<std::cmp::Ordering>) -> bool {
        ordering.is_some_and(|ordering| match self {
            Self::Greater => ordering.is_gt(),
            Self::GreaterOrEqual => ordering.is_ge(),
            Self::Less => ordering.is_lt(),
            Self::LessOrEqual => ordering.is_le(),
        })
    }
}

/// Outcome of a predicate that may not apply to its operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The operands were comparable; holds the truth of the predicate.
    Applicable(bool),
    /// The operands cannot be compared under the predicate.
    Inapplicable,
}

impl Outcome {
    /// Returns whether the operands were comparable.
    pub const fn is_applicable(self) -> bool {
        matches!(self, Self::Applicable(_))
    }

    /// Returns whether the operands were comparable and the predicate held.
    pub const fn holds(self) -> bool {
        matches!(self, Self::Applicable(true))
    }
}

/// Outcome of a sequence equivalence check. Each failing variant corresponds to one stage of
/// the check, in the order the stages run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SequenceOutcome {
    /// Both operands hold equal elements in the same order.
    Equivalent,
    /// At least one operand is not a sequence.
    NotSequences {
        /// Kind of the subject.
        subject: Kind,
        /// Kind of the comparator.
        comparator: Kind,
    },
    /// The sequences hold elements of different types.
    ElementTypeMismatch {
        /// Type of the subject sequence.
        subject: TypeTag,
        /// Type of the comparator sequence.
        comparator: TypeTag,
    },
    /// The sequences have different lengths.
    LengthMismatch {
        /// Length of the subject.
        subject: usize,
        /// Length of the comparator.
        comparator: usize,
    },
    /// The sequences have the same type and length but differ in at least one element.
    ElementsDiffer,
}

impl SequenceOutcome {
    /// Returns whether the sequences were found equivalent.
    pub const fn is_equivalent(&self) -> bool {
        matches!(self, Self::Equivalent)
    }
}

/// Returns whether the two values have the same dynamic type and the same value. No conversion
/// is attempted between types: `4i32` is equal to neither `4i16` nor `4.0`.
pub fn equality(x: &Value, y: &Value) -> bool {
    x == y
}

/// Returns whether the value is nil: either the "no value" marker itself, or a reference whose
/// target is absent. Only the top-level value is inspected.
pub const fn is_nil(x: &Value) -> bool {
    matches!(x, Value::Nil | Value::Reference { target: None, .. })
}

/// Returns the boolean held by the value, or `None` if the value is not a boolean.
pub const fn boolean(x: &Value) -> Option<bool> {
    match x {
        Value::Bool(b) => Some(*b),
        _ => None,
    }
}

/// Evaluates an ordering relation between two values.
///
/// Both operands are classified; the relation is evaluated within the first class, in the order
/// integer, floating point, instant, to which both belong. Operands of different classes are
/// not promoted: an integer and a float are inapplicable, even where a conversion would be
/// exact. Two system clock readings are ordered directly, whatever their range.
///
/// # Arguments
///
/// * `x` - The subject.
/// * `y` - The comparator.
/// * `relation` - The relation expected to hold from `x` to `y`.
pub fn ordering(x: &Value, y: &Value, relation: Relation) -> Outcome {
    if let (Value::Instant(Timestamp::System(x)), Value::Instant(Timestamp::System(y))) = (x, y) {
        return Outcome::Applicable(relation.holds(Some(x.cmp(y))));
    }

    let ordering = match (normalize::classify(x), normalize::classify(y)) {
        (Class::Integer(x), Class::Integer(y)) => Some(x.cmp(&y)),
        (Class::Floating(x), Class::Floating(y)) => x.partial_cmp(&y),
        (Class::Instant(x), Class::Instant(y)) => {
            Some(x.signed_duration_since(y).cmp(&TimeDelta::zero()))
        }
        _ => {
            tracing::debug!(
                target: trace_categories::COMPARE,
                "no shared ordering class for {} and {}",
                x.type_tag(),
                y.type_tag()
            );
            return Outcome::Inapplicable;
        }
    };

    Outcome::Applicable(relation.holds(ordering))
}

/// Checks whether two values are sequences holding equal elements in the same order.
///
/// The check runs in stages, stopping at the first that fails: both values must be sequences,
/// their element types must match, their lengths must match, and finally their elements must
/// be pairwise equal.
///
/// # Arguments
///
/// * `x` - The subject.
/// * `y` - The comparator.
pub fn sequence_equivalence(x: &Value, y: &Value) -> SequenceOutcome {
    let (
        Value::Sequence {
            element: x_element,
            items: x_items,
        },
        Value::Sequence {
            element: y_element,
            items: y_items,
        },
    ) = (x, y)
    else {
        tracing::debug!(
            target: trace_categories::COMPARE,
            "sequence check on non-sequences: {} and {}",
            x.kind(),
            y.kind()
        );
        return SequenceOutcome::NotSequences {
            subject: x.kind(),
            comparator: y.kind(),
        };
    };

    if x_element != y_element {
        return SequenceOutcome::ElementTypeMismatch {
            subject: x.type_tag(),
            comparator: y.type_tag(),
        };
    }

    if x_items.len() != y_items.len() {
        return SequenceOutcome::LengthMismatch {
            subject: x_items.len(),
            comparator: y_items.len(),
        };
    }

    if x_items != y_items {
        return SequenceOutcome::ElementsDiffer;
    }

    SequenceOutcome::Equivalent
}
