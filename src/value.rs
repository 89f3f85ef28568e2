//! Dynamic values and conversion into them.
//!
//! # Value
//!
//! [`Value`] is the closed, tagged representation that the comparators in
//! [`equality`](crate::equality) operate on.
//! It mirrors the shape of a JSON-like tree, with a few additions:
//! - [`Value::Undefined`], which is distinct from [`Value::Null`] and is what reading an absent key yields.
//! - [`Value::Handle`], an opaque host value (such as a [`Callback`](crate::Callback)) compared by identity.
//! - [`Value::BigInt`], an exact integer too wide for a [`Value::Number`].
//!
//! Integers convert to [`Value::Number`] while their magnitude is at most
//! [`MAX_SAFE_INTEGER`], and to [`Value::BigInt`] beyond it,
//! so distinct integers never convert to equal values.
//!
//! Arrays expose their canonical indices (`"0"`, `"1"`, ...) as keys and nothing else.
//! In particular an array has no `"length"` key, so `{"length": 1}` is never
//! shallow-equal to a one-item array.
//!
//! Arrays and objects are reference-counted.
//! Cloning a [`Value`] keeps its identity, building a new one does not:
//!
//! ```
//! use memokit::prelude::*;
//!
//! let a = Value::array([Value::from(1), Value::from(2)]);
//! let b = a.clone();
//! let c = Value::array([Value::from(1), Value::from(2)]);
//!
//! assert!(strict_equals(&a, &b));
//! assert!(!strict_equals(&a, &c));
//! assert!(shallow_equals(&a, &c));
//! ```
//!
//! # ToValue
//!
//! Typed data enters the comparators through [`ToValue`].
//! The `#[derive(ToValue)]` macro implements it for structs:
//!
//! ```
//! use memokit::prelude::*;
//!
//! #[derive(ToValue)]
//! struct Props {
//!     title: String,
//!     #[memokit(rename = "itemCount")]
//!     item_count: u32,
//!     #[memokit(skip)]
//!     _cache: Vec<u8>,
//! }
//!
//! let value = Props {
//!     title: String::from("Items"),
//!     item_count: 3,
//!     _cache: Vec::new(),
//! }
//! .to_value();
//!
//! assert!(deep_equals(
//!     &value,
//!     &Value::object([("title", Value::from("Items")), ("itemCount", Value::from(3))])
//! ));
//! ```

use crate::HashMap;
use alloc::rc::Rc;
use core::{any::Any, fmt};
use std::collections::BTreeMap;

pub use memokit_macros::ToValue;

/// Dynamically-typed value.
///
/// See the [module-level documentation](crate::value) for more.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// Missing value.
    #[default]
    Undefined,
    /// Null sentinel.
    Null,
    /// Boolean.
    Bool(bool),
    /// Floating-point number.
    Number(f64),
    /// Integer outside the range [`Number`](Value::Number) represents exactly, compared by value.
    BigInt(BigInt),
    /// String, compared by contents.
    String(Rc<str>),
    /// Ordered sequence, compared by identity under strict equality.
    Array(Rc<Vec<Value>>),
    /// Keyed structure, compared by identity under strict equality.
    Object(Rc<Object>),
    /// Opaque host value, always compared by identity.
    Handle(Handle),
}

impl Value {
    /// Create a new array from an iterator of values.
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(Rc::new(items.into_iter().collect()))
    }

    /// Create a new object from an iterator of key-value pairs.
    pub fn object<K>(entries: impl IntoIterator<Item = (K, Value)>) -> Self
    where
        K: Into<Rc<str>>,
    {
        Value::Object(Rc::new(entries.into_iter().collect()))
    }

    /// Returns `true` if this value is an array or an object.
    pub fn is_object_like(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    /// Returns `true` if this value is [`Value::Undefined`].
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Returns `true` if this value is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the items of this value if it's an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries of this value if it's an object.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Read the property `key` of this value.
    ///
    /// Returns [`Value::Undefined`] if the property doesn't exist.
    /// Array items are addressed by their canonical index (`"0"`, `"1"`, ...).
    pub fn get(&self, key: &str) -> Value {
        self.property(key).cloned().unwrap_or_default()
    }

    /// Own property `key` of this value, or `None` if it's absent.
    pub(crate) fn property(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(object) => object.get(key),
            Value::Array(items) => {
                let idx: usize = key.parse().ok()?;
                // `"01"` and `"+1"` parse, but are not index keys.
                if idx.to_string() != key {
                    return None;
                }
                items.get(idx)
            }
            _ => None,
        }
    }

    /// Own keys of this value.
    ///
    /// Arrays have one key per index, primitives have none.
    pub fn keys(&self) -> Vec<Rc<str>> {
        match self {
            Value::Object(object) => object.keys().cloned().collect(),
            Value::Array(items) => (0..items.len()).map(|idx| idx.to_string().into()).collect(),
            _ => Vec::new(),
        }
    }

    /// Copy the top level of this value into a new allocation.
    ///
    /// Nested arrays and objects keep their identity.
    pub fn shallow_copy(&self) -> Self {
        match self {
            Value::Array(items) => Value::Array(Rc::new((**items).clone())),
            Value::Object(object) => Value::Object(Rc::new((**object).clone())),
            other => other.clone(),
        }
    }
}

macro_rules! impl_from_for_value {
    ($($t:ty => $variant:ident),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::$variant(value.into())
                }
            }
        )*
    }
}

impl_from_for_value!(
    bool => Bool,
    f64 => Number,
    f32 => Number,
    i32 => Number,
    u32 => Number,
    &str => String,
    String => String,
    Rc<str> => String,
    Vec<Value> => Array,
    Object => Object,
    Handle => Handle
);

/// Keyed structure of values.
#[derive(Clone, Debug, Default)]
pub struct Object {
    entries: HashMap<Rc<str>, Value>,
}

impl Object {
    /// Create a new empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` at `key`, returning the previous value if present.
    pub fn insert(&mut self, key: impl Into<Rc<str>>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove the value at `key`.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// Get the value at `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns `true` if `key` is present, even if its value is [`Value::Undefined`].
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if this object has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterator over the keys of this object, in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &Rc<str>> {
        self.entries.keys()
    }

    /// Iterator over the entries of this object, in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&Rc<str>, &Value)> {
        self.entries.iter()
    }
}

impl<K: Into<Rc<str>>> FromIterator<(K, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(key, value)| (key.into(), value)).collect(),
        }
    }
}

/// Opaque host value compared by identity.
#[derive(Clone)]
pub struct Handle {
    value: Rc<dyn Any>,
}

impl Handle {
    /// Create a new handle to `value`.
    pub fn new<T: 'static>(value: T) -> Self {
        Self::from_rc(Rc::new(value))
    }

    /// Create a handle sharing the allocation of `value`.
    ///
    /// Handles created from clones of the same [`Rc`] are identical.
    pub fn from_rc<T: 'static>(value: Rc<T>) -> Self {
        Self { value }
    }

    /// Returns `true` if both handles point to the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.as_ptr() == other.as_ptr()
    }

    /// Get a reference to the inner value if it's of type `T`.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }

    fn as_ptr(&self) -> *const () {
        Rc::as_ptr(&self.value) as *const ()
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.as_ptr()).finish()
    }
}

/// Conversion into a [`Value`].
///
/// This can be derived with `#[derive(ToValue)]`.
/// For more information, see the [module-level documentation](crate::value).
pub trait ToValue {
    /// Convert this to a [`Value`].
    fn to_value(&self) -> Value;
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for Object {
    fn to_value(&self) -> Value {
        Value::Object(Rc::new(self.clone()))
    }
}

impl ToValue for Handle {
    fn to_value(&self) -> Value {
        Value::Handle(self.clone())
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

/// Largest integer magnitude a [`Value::Number`] holds without rounding (`2^53 - 1`).
pub const MAX_SAFE_INTEGER: u128 = (1 << 53) - 1;

/// Exact integer of up to 128 bits of magnitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BigInt {
    negative: bool,
    magnitude: u128,
}

impl BigInt {
    /// Returns `true` if this integer is below zero.
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Absolute value of this integer.
    pub fn magnitude(&self) -> u128 {
        self.magnitude
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        write!(f, "{}", self.magnitude)
    }
}

macro_rules! impl_from_signed_for_big_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for BigInt {
                fn from(value: $t) -> Self {
                    Self {
                        negative: value < 0,
                        magnitude: (value as i128).unsigned_abs(),
                    }
                }
            }
        )*
    }
}

impl_from_signed_for_big_int!(i8, i16, i32, i64, i128, isize);

macro_rules! impl_from_unsigned_for_big_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for BigInt {
                fn from(value: $t) -> Self {
                    Self {
                        negative: false,
                        magnitude: value as u128,
                    }
                }
            }
        )*
    }
}

impl_from_unsigned_for_big_int!(u8, u16, u32, u64, u128, usize);

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        if value.magnitude > MAX_SAFE_INTEGER {
            return Value::BigInt(value);
        }

        let n = value.magnitude as f64;
        Value::Number(if value.negative { -n } else { n })
    }
}

impl ToValue for BigInt {
    fn to_value(&self) -> Value {
        Value::from(*self)
    }
}

macro_rules! impl_to_value_for_floats {
    ($($t:ty),*) => {
        $(
            impl ToValue for $t {
                fn to_value(&self) -> Value {
                    Value::Number(*self as f64)
                }
            }
        )*
    }
}

impl_to_value_for_floats!(f32, f64);

macro_rules! impl_to_value_for_integers {
    ($($t:ty),*) => {
        $(
            impl ToValue for $t {
                fn to_value(&self) -> Value {
                    Value::from(BigInt::from(*self))
                }
            }
        )*
    }
}

impl_to_value_for_integers!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl ToValue for char {
    fn to_value(&self) -> Value {
        Value::String(self.to_string().into())
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::String(self.into())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::String(self.as_str().into())
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Rc<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(value) => value.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::array(self.iter().map(ToValue::to_value))
    }
}

impl<T: ToValue, const N: usize> ToValue for [T; N] {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<K, V, S> ToValue for std::collections::HashMap<K, V, S>
where
    K: AsRef<str>,
    V: ToValue,
{
    fn to_value(&self) -> Value {
        Value::object(
            self.iter()
                .map(|(key, value)| (key.as_ref(), value.to_value())),
        )
    }
}

impl<K, V> ToValue for BTreeMap<K, V>
where
    K: AsRef<str>,
    V: ToValue,
{
    fn to_value(&self) -> Value {
        Value::object(
            self.iter()
                .map(|(key, value)| (key.as_ref(), value.to_value())),
        )
    }
}

impl ToValue for () {
    fn to_value(&self) -> Value {
        Value::array([])
    }
}

macro_rules! impl_to_value_for_tuples {
    ($($t:tt : $idx:tt),*) => {
        impl<$($t: ToValue),*> ToValue for ($($t,)*) {
            fn to_value(&self) -> Value {
                Value::array([$(self.$idx.to_value()),*])
            }
        }
    };
}

impl_to_value_for_tuples!(T1:0);
impl_to_value_for_tuples!(T1:0, T2:1);
impl_to_value_for_tuples!(T1:0, T2:1, T3:2);
impl_to_value_for_tuples!(T1:0, T2:1, T3:2, T4:3);
impl_to_value_for_tuples!(T1:0, T2:1, T3:2, T4:3, T5:4);
impl_to_value_for_tuples!(T1:0, T2:1, T3:2, T4:3, T5:4, T6:5);
impl_to_value_for_tuples!(T1:0, T2:1, T3:2, T4:3, T5:4, T6:5, T7:6);
impl_to_value_for_tuples!(T1:0, T2:1, T3:2, T4:3, T5:4, T6:5, T7:6, T8:7);

#[cfg(feature = "serde_json")]
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(n) = n.as_i64() {
                    Value::from(BigInt::from(n))
                } else if let Some(n) = n.as_u64() {
                    Value::from(BigInt::from(n))
                } else {
                    Value::Number(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s.into()),
            serde_json::Value::Array(items) => Value::array(items.into_iter().map(Value::from)),
            serde_json::Value::Object(map) => {
                Value::object(map.into_iter().map(|(key, value)| (key, Value::from(value))))
            }
        }
    }
}

#[cfg(feature = "serde_json")]
impl ToValue for serde_json::Value {
    fn to_value(&self) -> Value {
        Value::from(self.clone())
    }
}
