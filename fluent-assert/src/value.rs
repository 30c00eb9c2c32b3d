//! Dynamically-typed values captured from assertion subjects and comparators.

use std::any::{Any, TypeId};
use std::fmt::{self, Display, Formatter};
use std::panic::RefUnwindSafe;
use std::sync::Arc;
use std::time::SystemTime;

use chrono::{DateTime, FixedOffset, Local, Utc};

use crate::normalize::WideInt;

/// Width and signedness of an integer type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum IntKind {
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `i128`
    I128,
    /// `isize`
    Isize,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `u128`
    U128,
    /// `usize`
    Usize,
}

impl IntKind {
    /// Returns whether the integer type can represent negative values.
    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::I128 | Self::Isize
        )
    }
}

/// Width of a floating-point type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum FloatKind {
    /// `f32`
    F32,
    /// `f64`
    F64,
}

/// Representation of a point-in-time value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum InstantKind {
    /// `chrono::DateTime<Utc>`
    #[strum(to_string = "DateTime<Utc>")]
    Utc,
    /// `chrono::DateTime<FixedOffset>`
    #[strum(to_string = "DateTime<FixedOffset>")]
    FixedOffset,
    /// `chrono::DateTime<Local>`
    #[strum(to_string = "DateTime<Local>")]
    Local,
    /// `std::time::SystemTime`
    #[strum(to_string = "SystemTime")]
    System,
}

/// Static type of a [`Value`]. Known without an instance, so empty sequences and absent
/// references still carry the type of what they would hold.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// The type of the universal "no value" marker.
    Nil,
    /// `bool`
    Bool,
    /// An integer type.
    Integer(IntKind),
    /// A floating-point type.
    Floating(FloatKind),
    /// A point-in-time type.
    Instant(InstantKind),
    /// A string type.
    Str,
    /// `char`
    Char,
    /// An optional reference to a value of the inner type.
    Option(Box<TypeTag>),
    /// A sequence of values of the inner type.
    Slice(Box<TypeTag>),
    /// A user-defined type captured with [`Value::opaque`].
    Opaque {
        /// Name of the type, as reported by [`std::any::type_name`].
        name: &'static str,
        /// Identity of the type.
        id: TypeId,
    },
}

impl TypeTag {
    /// Returns the tag for a user-defined type.
    pub fn opaque<T: 'static>() -> Self {
        Self::Opaque {
            name: std::any::type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    /// Returns the coarse kind of this type.
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Nil => Kind::Nil,
            Self::Bool => Kind::Bool,
            Self::Integer(kind) => Kind::Integer(*kind),
            Self::Floating(kind) => Kind::Floating(*kind),
            Self::Instant(_) => Kind::Instant,
            Self::Str => Kind::Str,
            Self::Char => Kind::Char,
            Self::Option(_) => Kind::Option,
            Self::Slice(_) => Kind::Slice,
            Self::Opaque { .. } => Kind::Struct,
        }
    }
}

impl Display for TypeTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("<nil>"),
            Self::Bool => f.write_str("bool"),
            Self::Integer(kind) => kind.fmt(f),
            Self::Floating(kind) => kind.fmt(f),
            Self::Instant(kind) => kind.fmt(f),
            Self::Str => f.write_str("String"),
            Self::Char => f.write_str("char"),
            Self::Option(inner) => write!(f, "Option<{inner}>"),
            Self::Slice(element) => write!(f, "[{element}]"),
            Self::Opaque { name, .. } => f.write_str(name),
        }
    }
}

/// Coarse kind of a value, used when a failure only needs to say what sort of thing an operand
/// was.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    /// The "no value" marker.
    Nil,
    /// A boolean.
    Bool,
    /// An integer of the given width.
    Integer(IntKind),
    /// A floating-point number of the given width.
    Floating(FloatKind),
    /// A point in time.
    Instant,
    /// A string.
    Str,
    /// A character.
    Char,
    /// An optional reference.
    Option,
    /// A sequence.
    Slice,
    /// A user-defined value.
    Struct,
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Bool => f.write_str("bool"),
            Self::Integer(kind) => kind.fmt(f),
            Self::Floating(kind) => kind.fmt(f),
            Self::Instant => f.write_str("instant"),
            Self::Str => f.write_str("string"),
            Self::Char => f.write_str("char"),
            Self::Option => f.write_str("option"),
            Self::Slice => f.write_str("slice"),
            Self::Struct => f.write_str("struct"),
        }
    }
}

/// An integer value, tagged with the width and signedness it was captured from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Integer {
    kind: IntKind,
    value: WideInt,
}

impl Integer {
    /// Returns the integer type the value was captured from.
    pub const fn kind(&self) -> IntKind {
        self.kind
    }

    /// Returns the value widened to a representation shared by all integer types.
    pub const fn widened(&self) -> WideInt {
        self.value
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

/// A floating-point value, kept at the width it was captured from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Floating {
    /// An `f32` value.
    F32(f32),
    /// An `f64` value.
    F64(f64),
}

impl Floating {
    /// Returns the floating-point type the value was captured from.
    pub const fn kind(&self) -> FloatKind {
        match self {
            Self::F32(_) => FloatKind::F32,
            Self::F64(_) => FloatKind::F64,
        }
    }

    /// Returns the value widened to `f64`.
    pub fn widened(&self) -> f64 {
        match self {
            Self::F32(value) => f64::from(*value),
            Self::F64(value) => *value,
        }
    }
}

impl Display for Floating {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::F32(value) => value.fmt(f),
            Self::F64(value) => value.fmt(f),
        }
    }
}

/// A point-in-time value, kept in the representation it was captured from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timestamp {
    /// A UTC date and time.
    Utc(DateTime<Utc>),
    /// A date and time with a fixed offset from UTC.
    FixedOffset(DateTime<FixedOffset>),
    /// A date and time in the local time zone.
    Local(DateTime<Local>),
    /// A system clock reading.
    System(SystemTime),
}

impl Timestamp {
    /// Returns the representation the value was captured from.
    pub const fn kind(&self) -> InstantKind {
        match self {
            Self::Utc(_) => InstantKind::Utc,
            Self::FixedOffset(_) => InstantKind::FixedOffset,
            Self::Local(_) => InstantKind::Local,
            Self::System(_) => InstantKind::System,
        }
    }

    /// Returns the same instant expressed in UTC, or `None` for a system clock reading outside
    /// the range chrono can represent.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Utc(instant) => Some(*instant),
            Self::FixedOffset(instant) => Some(instant.with_timezone(&Utc)),
            Self::Local(instant) => Some(instant.with_timezone(&Utc)),
            Self::System(instant) => system_to_utc(*instant),
        }
    }
}

/// Converts a system clock reading to UTC without panicking on out-of-range readings.
fn system_to_utc(instant: SystemTime) -> Option<DateTime<Utc>> {
    match instant.duration_since(SystemTime::UNIX_EPOCH) {
        Ok(since) => {
            DateTime::from_timestamp(i64::try_from(since.as_secs()).ok()?, since.subsec_nanos())
        }
        Err(err) => {
            let before = err.duration();
            let secs = i64::try_from(before.as_secs()).ok()?.checked_neg()?;
            match before.subsec_nanos() {
                0 => DateTime::from_timestamp(secs, 0),
                nanos => DateTime::from_timestamp(secs.checked_sub(1)?, 1_000_000_000 - nanos),
            }
        }
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utc(instant) => instant.fmt(f),
            Self::FixedOffset(instant) => instant.fmt(f),
            Self::Local(instant) => instant.fmt(f),
            Self::System(instant) => match system_to_utc(*instant) {
                Some(utc) => utc.fmt(f),
                None => fmt::Debug::fmt(instant, f),
            },
        }
    }
}

/// Type-erased equality for user-defined values.
trait DynEq: Send + Sync + RefUnwindSafe {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn Any) -> bool;
}

impl<T> DynEq for T
where
    T: PartialEq + Send + Sync + RefUnwindSafe + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|other| self == other)
    }
}

/// A user-defined value, compared with its own `PartialEq` and printed with its `Debug` form.
///
/// The wrapped value is shared, so captured values stay `Send`, `Sync` and unwind-safe.
#[derive(Clone)]
pub struct Opaque {
    tag: TypeTag,
    rendered: String,
    inner: Arc<dyn DynEq>,
}

impl Opaque {
    /// Returns the static type of the wrapped value.
    pub const fn type_tag(&self) -> &TypeTag {
        &self.tag
    }

    /// Returns a reference to the wrapped value if it is of type `T`.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref()
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.inner.dyn_eq(other.inner.as_any())
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

/// A dynamically-typed value under assertion.
///
/// Values are captured through `From` conversions from the primitive, string, time, `Option`
/// and sequence types; user-defined types can be captured with [`Value::opaque`]. Derived
/// equality is type-strict: values of different integer widths, or an integer and a float, are
/// never equal.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// The universal "no value" marker.
    Nil,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Integer(Integer),
    /// A floating-point number.
    Floating(Floating),
    /// A point in time.
    Instant(Timestamp),
    /// A string.
    Str(String),
    /// A character.
    Char(char),
    /// An optional reference. Absent targets are nil.
    Reference {
        /// Type of the referenced value.
        pointee: TypeTag,
        /// The referenced value, if present.
        target: Option<Box<Value>>,
    },
    /// An ordered, type-homogeneous sequence.
    Sequence {
        /// Type of each element.
        element: TypeTag,
        /// The elements, in order.
        items: Vec<Value>,
    },
    /// A user-defined value.
    Opaque(Opaque),
}

impl Value {
    /// Captures a user-defined value.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to capture. Its `Debug` form is rendered once, up front.
    pub fn opaque<T>(value: T) -> Self
    where
        T: fmt::Debug + PartialEq + Send + Sync + RefUnwindSafe + 'static,
    {
        Self::Opaque(Opaque {
            tag: TypeTag::opaque::<T>(),
            rendered: format!("{value:?}"),
            inner: Arc::new(value),
        })
    }

    /// Returns the dynamic type of the value.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Self::Nil => TypeTag::Nil,
            Self::Bool(_) => TypeTag::Bool,
            Self::Integer(value) => TypeTag::Integer(value.kind()),
            Self::Floating(value) => TypeTag::Floating(value.kind()),
            Self::Instant(value) => TypeTag::Instant(value.kind()),
            Self::Str(_) => TypeTag::Str,
            Self::Char(_) => TypeTag::Char,
            Self::Reference { pointee, .. } => TypeTag::Option(Box::new(pointee.clone())),
            Self::Sequence { element, .. } => TypeTag::Slice(Box::new(element.clone())),
            Self::Opaque(value) => value.type_tag().clone(),
        }
    }

    /// Returns the coarse kind of the value.
    pub fn kind(&self) -> Kind {
        self.type_tag().kind()
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil | Self::Reference { target: None, .. } => f.write_str("<nil>"),
            Self::Bool(value) => value.fmt(f),
            Self::Integer(value) => value.fmt(f),
            Self::Floating(value) => value.fmt(f),
            Self::Instant(value) => value.fmt(f),
            Self::Str(value) => f.write_str(value),
            Self::Char(value) => value.fmt(f),
            Self::Reference {
                target: Some(target),
                ..
            } => target.fmt(f),
            Self::Sequence { items, .. } => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    item.fmt(f)?;
                }
                f.write_str("]")
            }
            Self::Opaque(value) => fmt::Debug::fmt(value, f),
        }
    }
}

/// Types whose [`TypeTag`] is known statically.
///
/// Implement this alongside `From<T> for Value` (typically via [`Value::opaque`]) to capture
/// user-defined types inside `Option`s and sequences.
pub trait Typed {
    /// Returns the static type tag of `Self`.
    fn type_tag() -> TypeTag;
}

macro_rules! impl_integer {
    ($t:ty, $kind:ident, $repr:ident, $wide:ty) => {
        impl Typed for $t {
            fn type_tag() -> TypeTag {
                TypeTag::Integer(IntKind::$kind)
            }
        }

        impl From<$t> for Value {
            fn from(value: $t) -> Self {
                Self::Integer(Integer {
                    kind: IntKind::$kind,
                    value: WideInt::$repr(<$wide>::from(value)),
                })
            }
        }
    };
}

impl_integer!(i8, I8, Signed, i128);
impl_integer!(i16, I16, Signed, i128);
impl_integer!(i32, I32, Signed, i128);
impl_integer!(i64, I64, Signed, i128);
impl_integer!(i128, I128, Signed, i128);
impl_integer!(u8, U8, Unsigned, u128);
impl_integer!(u16, U16, Unsigned, u128);
impl_integer!(u32, U32, Unsigned, u128);
impl_integer!(u64, U64, Unsigned, u128);
impl_integer!(u128, U128, Unsigned, u128);

impl Typed for isize {
    fn type_tag() -> TypeTag {
        TypeTag::Integer(IntKind::Isize)
    }
}

// isize and usize are at most 64 bits wide on every supported target, so widening them to
// 128 bits with `as` is lossless.
impl From<isize> for Value {
    fn from(value: isize) -> Self {
        Self::Integer(Integer {
            kind: IntKind::Isize,
            value: WideInt::Signed(value as i128),
        })
    }
}

impl Typed for usize {
    fn type_tag() -> TypeTag {
        TypeTag::Integer(IntKind::Usize)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Self::Integer(Integer {
            kind: IntKind::Usize,
            value: WideInt::Unsigned(value as u128),
        })
    }
}

macro_rules! impl_scalar {
    ($t:ty, $tag:expr, |$value:ident| $capture:expr) => {
        impl Typed for $t {
            fn type_tag() -> TypeTag {
                $tag
            }
        }

        impl From<$t> for Value {
            fn from($value: $t) -> Self {
                $capture
            }
        }
    };
}

impl_scalar!((), TypeTag::Nil, |_value| Self::Nil);
impl_scalar!(bool, TypeTag::Bool, |value| Self::Bool(value));
impl_scalar!(char, TypeTag::Char, |value| Self::Char(value));
impl_scalar!(f32, TypeTag::Floating(FloatKind::F32), |value| {
    Self::Floating(Floating::F32(value))
});
impl_scalar!(f64, TypeTag::Floating(FloatKind::F64), |value| {
    Self::Floating(Floating::F64(value))
});
impl_scalar!(String, TypeTag::Str, |value| Self::Str(value));
impl_scalar!(&str, TypeTag::Str, |value| Self::Str(value.to_owned()));
impl_scalar!(&String, TypeTag::Str, |value| Self::Str(value.clone()));
impl_scalar!(
    DateTime<Utc>,
    TypeTag::Instant(InstantKind::Utc),
    |value| Self::Instant(Timestamp::Utc(value))
);
impl_scalar!(
    DateTime<FixedOffset>,
    TypeTag::Instant(InstantKind::FixedOffset),
    |value| Self::Instant(Timestamp::FixedOffset(value))
);
impl_scalar!(
    DateTime<Local>,
    TypeTag::Instant(InstantKind::Local),
    |value| Self::Instant(Timestamp::Local(value))
);
impl_scalar!(
    SystemTime,
    TypeTag::Instant(InstantKind::System),
    |value| Self::Instant(Timestamp::System(value))
);

impl<T: Typed> Typed for Option<T> {
    fn type_tag() -> TypeTag {
        TypeTag::Option(Box::new(T::type_tag()))
    }
}

impl<T> From<Option<T>> for Value
where
    T: Typed + Into<Self>,
{
    fn from(value: Option<T>) -> Self {
        Self::Reference {
            pointee: T::type_tag(),
            target: value.map(|target| Box::new(target.into())),
        }
    }
}

impl<T: Typed> Typed for Vec<T> {
    fn type_tag() -> TypeTag {
        TypeTag::Slice(Box::new(T::type_tag()))
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Typed + Into<Self>,
{
    fn from(value: Vec<T>) -> Self {
        Self::Sequence {
            element: T::type_tag(),
            items: value.into_iter().map(Into::into).collect(),
        }
    }
}

impl<T: Typed> Typed for &[T] {
    fn type_tag() -> TypeTag {
        TypeTag::Slice(Box::new(T::type_tag()))
    }
}

impl<T> From<&[T]> for Value
where
    T: Typed + Clone + Into<Self>,
{
    fn from(value: &[T]) -> Self {
        Self::Sequence {
            element: T::type_tag(),
            items: value.iter().cloned().map(Into::into).collect(),
        }
    }
}

impl<T: Typed, const N: usize> Typed for [T; N] {
    fn type_tag() -> TypeTag {
        TypeTag::Slice(Box::new(T::type_tag()))
    }
}

impl<T, const N: usize> From<[T; N]> for Value
where
    T: Typed + Into<Self>,
{
    fn from(value: [T; N]) -> Self {
        Self::Sequence {
            element: T::type_tag(),
            items: value.into_iter().map(Into::into).collect(),
        }
    }
}
