//! Equality comparators.
//!
//! Three levels of equality are defined over [`Value`]:
//! - [`strict_equals`]: primitives by value, arrays, objects and handles by identity.
//! - [`shallow_equals`]: one level of structure, then strict equality.
//! - [`deep_equals`]: recursive structural equality.
//!
//! Numbers follow IEEE equality under every comparator,
//! so `NaN` is never equal to itself and `0.0` equals `-0.0`.
//!
//! [`Comparator`] lets memoization primitives take any of these as a policy.

use crate::value::{ToValue, Value};
use alloc::rc::Rc;

/// Strict equality of two values.
///
/// Primitives compare by value.
/// Arrays, objects and handles compare by identity.
pub fn strict_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::BigInt(a), Value::BigInt(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
        (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
        (Value::Handle(a), Value::Handle(b)) => a.ptr_eq(b),
        _ => false,
    }
}

/// Shallow equality of two values.
///
/// If either value isn't an array or object, this is [`strict_equals`].
/// Two arrays are equal if they have the same length and strictly-equal items.
/// Otherwise both values must have the same number of keys,
/// and every key of `a` must be present in `b` with a strictly-equal value.
///
/// Nested arrays and objects are compared by identity.
///
/// ```
/// use memokit::prelude::*;
///
/// let nested = Value::object([("c", Value::from(2))]);
/// let a = Value::object([("a", Value::from(1)), ("b", nested.clone())]);
/// let b = Value::object([("a", Value::from(1)), ("b", nested)]);
/// assert!(shallow_equals(&a, &b));
///
/// let c = Value::object([("a", Value::from(1)), ("b", Value::object([("c", Value::from(2))]))]);
/// assert!(!shallow_equals(&a, &c));
/// ```
pub fn shallow_equals(a: &Value, b: &Value) -> bool {
    if !a.is_object_like() || !b.is_object_like() {
        return strict_equals(a, b);
    }

    if let (Value::Array(a), Value::Array(b)) = (a, b) {
        return a.len() == b.len() && a.iter().zip(b.iter()).all(|(a, b)| strict_equals(a, b));
    }

    let keys_a = a.keys();
    if keys_a.len() != b.keys().len() {
        return false;
    }

    keys_a.iter().all(|key| match b.property(key) {
        Some(value_b) => a
            .property(key)
            .is_some_and(|value_a| strict_equals(value_a, value_b)),
        None => false,
    })
}

/// Deep equality of two values.
///
/// If either value isn't an array or object, this is [`strict_equals`].
/// Two arrays are equal if they have the same length and deeply-equal items.
/// Otherwise every key present on either side is compared,
/// reading an absent key as [`Value::Undefined`].
///
/// Because absent keys read as [`Value::Undefined`], a key explicitly set to
/// [`Value::Undefined`] is equal to a missing key:
///
/// ```
/// use memokit::prelude::*;
///
/// let a = Value::object([("a", Value::Undefined)]);
/// let b = Value::from(Object::new());
///
/// assert!(deep_equals(&a, &b));
/// assert!(!shallow_equals(&a, &b));
/// ```
///
/// Recursion is unbounded, so extremely deep trees may exhaust the stack.
pub fn deep_equals(a: &Value, b: &Value) -> bool {
    if !a.is_object_like() || !b.is_object_like() {
        return strict_equals(a, b);
    }

    if let (Value::Array(a), Value::Array(b)) = (a, b) {
        return a.len() == b.len() && a.iter().zip(b.iter()).all(|(a, b)| deep_equals(a, b));
    }

    let undefined = Value::Undefined;

    // Keys of `a`, then keys only present in `b`.
    let keys_a = a.keys();
    let keys_b = b.keys();
    let union = keys_a
        .iter()
        .chain(keys_b.iter().filter(|key| a.property(key).is_none()));

    for key in union {
        let value_a = a.property(key).unwrap_or(&undefined);
        let value_b = b.property(key).unwrap_or(&undefined);

        let is_equal = if value_a.is_object_like() && value_b.is_object_like() {
            deep_equals(value_a, value_b)
        } else {
            strict_equals(value_a, value_b)
        };

        if !is_equal {
            return false;
        }
    }

    true
}

/// Equality policy for memoization.
///
/// This is implemented for [`Shallow`], [`Deep`], [`Strict`],
/// and any `Fn(&T, &T) -> bool`.
pub trait Comparator<T: ?Sized> {
    /// Returns `true` if `a` and `b` are considered equal.
    fn equals(&self, a: &T, b: &T) -> bool;
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    fn equals(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// [`Comparator`] using [`shallow_equals`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Shallow;

impl<T: ToValue + ?Sized> Comparator<T> for Shallow {
    fn equals(&self, a: &T, b: &T) -> bool {
        shallow_equals(&a.to_value(), &b.to_value())
    }
}

/// [`Comparator`] using [`deep_equals`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Deep;

impl<T: ToValue + ?Sized> Comparator<T> for Deep {
    fn equals(&self, a: &T, b: &T) -> bool {
        deep_equals(&a.to_value(), &b.to_value())
    }
}

/// [`Comparator`] using [`strict_equals`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Strict;

impl<T: ToValue + ?Sized> Comparator<T> for Strict {
    fn equals(&self, a: &T, b: &T) -> bool {
        strict_equals(&a.to_value(), &b.to_value())
    }
}
