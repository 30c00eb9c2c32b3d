//! Numeric and temporal normalization.
//!
//! Classifies values into the three orderable classes (integer, floating point and instant) and
//! extracts a canonical representation of each, so that values captured from different widths
//! or time representations can be ordered against one another.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};

use crate::value::Value;

/// An integer widened to a representation shared by every integer type.
///
/// Signed values are held as `i128` and unsigned values as `u128`. Ordering is defined across
/// the two representations, so every `u128` value compares correctly against every `i128`
/// value without sign corruption.
#[derive(Clone, Copy, Debug)]
pub enum WideInt {
    /// A value captured from a signed integer type.
    Signed(i128),
    /// A value captured from an unsigned integer type.
    Unsigned(u128),
}

impl Ord for WideInt {
    fn cmp(&self, other: &Self) -> Ordering {
        match (*self, *other) {
            (Self::Signed(left), Self::Signed(right)) => left.cmp(&right),
            (Self::Unsigned(left), Self::Unsigned(right)) => left.cmp(&right),
            (Self::Signed(left), Self::Unsigned(right)) => {
                u128::try_from(left).map_or(Ordering::Less, |left| left.cmp(&right))
            }
            (Self::Unsigned(left), Self::Signed(right)) => {
                u128::try_from(right).map_or(Ordering::Greater, |right| left.cmp(&right))
            }
        }
    }
}

impl PartialOrd for WideInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for WideInt {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for WideInt {}

impl Display for WideInt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signed(value) => value.fmt(f),
            Self::Unsigned(value) => value.fmt(f),
        }
    }
}

/// The orderable class a value belongs to, with its normalized representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Class {
    /// Any fixed-width signed or unsigned integer.
    Integer(WideInt),
    /// Any floating-point number, widened to `f64`.
    Floating(f64),
    /// Any point in time, expressed in UTC.
    Instant(DateTime<Utc>),
    /// Everything else.
    Unclassified,
}

/// Classifies the given value. A value belongs to at most one class. System clock readings
/// outside the range of `DateTime<Utc>` are unclassified.
///
/// # Arguments
///
/// * `value` - The value to classify.
pub fn classify(value: &Value) -> Class {
    match value {
        Value::Integer(integer) => Class::Integer(integer.widened()),
        Value::Floating(floating) => Class::Floating(floating.widened()),
        Value::Instant(timestamp) => timestamp
            .to_utc()
            .map_or(Class::Unclassified, Class::Instant),
        _ => Class::Unclassified,
    }
}

/// Returns the widened integer held by the value, if it is of an integer type.
pub fn integer_value(value: &Value) -> Option<WideInt> {
    match classify(value) {
        Class::Integer(integer) => Some(integer),
        _ => None,
    }
}

/// Returns the value widened to `f64`, if it is of a floating-point type. Integers are not
/// converted.
pub fn floating_value(value: &Value) -> Option<f64> {
    match classify(value) {
        Class::Floating(floating) => Some(floating),
        _ => None,
    }
}

/// Returns the instant held by the value in UTC, if it is of a time type.
pub fn instant_value(value: &Value) -> Option<DateTime<Utc>> {
    match classify(value) {
        Class::Instant(instant) => Some(instant),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn widens_integers_of_every_width() {
        assert_eq!(integer_value(&Value::from(-5i8)), Some(WideInt::Signed(-5)));
        assert_eq!(integer_value(&Value::from(5u16)), Some(WideInt::Unsigned(5)));
        assert_eq!(
            integer_value(&Value::from(u64::MAX)),
            Some(WideInt::Unsigned(u128::from(u64::MAX)))
        );
        assert_eq!(integer_value(&Value::from(5.0)), None);
        assert_eq!(integer_value(&Value::from("5")), None);
    }

    #[test]
    fn orders_across_signedness() {
        assert!(WideInt::Signed(-1) < WideInt::Unsigned(0));
        assert!(WideInt::Unsigned(u128::MAX) > WideInt::Signed(i128::MAX));
        assert!(WideInt::Signed(i128::MIN) < WideInt::Unsigned(u128::MAX));
        assert_eq!(WideInt::Signed(7), WideInt::Unsigned(7));
        assert_eq!(
            WideInt::Signed(7).cmp(&WideInt::Unsigned(8)),
            Ordering::Less
        );
    }

    #[test]
    fn widens_floats() {
        assert_eq!(floating_value(&Value::from(5.5f32)), Some(5.5));
        assert_eq!(floating_value(&Value::from(5.5f64)), Some(5.5));
        assert_eq!(floating_value(&Value::from(5)), None);
    }

    #[test]
    fn extracts_instants() {
        let now = Utc::now();
        assert_eq!(instant_value(&Value::from(now)), Some(now));
        assert_eq!(
            instant_value(&Value::from(std::time::SystemTime::from(now))),
            Some(now)
        );
        assert_eq!(instant_value(&Value::from(5)), None);
        assert_eq!(
            instant_value(&Value::from(
                std::time::UNIX_EPOCH + std::time::Duration::from_secs(1 << 50)
            )),
            None
        );
    }

    #[test]
    fn classification_is_exclusive() {
        assert_eq!(classify(&Value::from(true)), Class::Unclassified);
        assert_eq!(classify(&Value::Nil), Class::Unclassified);
        assert_eq!(classify(&Value::from(Some(5))), Class::Unclassified);
        assert_eq!(classify(&Value::from(vec![5])), Class::Unclassified);
        assert!(matches!(classify(&Value::from(5)), Class::Integer(_)));
        assert!(matches!(classify(&Value::from(5.0)), Class::Floating(_)));
    }
}
