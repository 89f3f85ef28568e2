use crate::{
    equality::{Comparator, Deep, Shallow},
    use_ref,
    value::{ToValue, Value},
    ScopeData,
};
use alloc::rc::Rc;
use core::cell::RefCell;

struct MemoState<T> {
    dependency: Value,
    value: Rc<T>,
}

/// Use a memoized value of type `T` with a dependency of type `D`.
///
/// `make_value` is called on the first render, and again whenever `dependency`
/// is no longer [shallow-equal](crate::equality::shallow_equals) to the dependency of the last call.
/// Otherwise the cached value is returned without calling `make_value`.
///
/// Dependencies are usually tuples or slices, which are compared item by item:
///
/// ```
/// use memokit::prelude::*;
/// use std::rc::Rc;
///
/// let cx = ScopeData::default();
///
/// let a = use_memo(&cx, (1, 2), || vec![1, 2]);
/// cx.reset();
/// let b = use_memo(&cx, (1, 2), || vec![1, 2]);
/// assert!(Rc::ptr_eq(&a, &b));
///
/// cx.reset();
/// let c = use_memo(&cx, (1, 3), || vec![1, 3]);
/// assert!(!Rc::ptr_eq(&a, &c));
/// ```
pub fn use_memo<D, T>(cx: &ScopeData, dependency: D, make_value: impl FnOnce() -> T) -> Rc<T>
where
    D: ToValue,
    T: 'static,
{
    use_memo_with(cx, dependency, make_value, Shallow)
}

/// Use a memoized value of type `T`, recomputed when `dependency` is no longer
/// [deep-equal](crate::equality::deep_equals) to the last dependency.
///
/// See [`use_memo`] for more.
pub fn use_deep_memo<D, T>(cx: &ScopeData, dependency: D, make_value: impl FnOnce() -> T) -> Rc<T>
where
    D: ToValue,
    T: 'static,
{
    use_memo_with(cx, dependency, make_value, Deep)
}

/// Use a memoized value of type `T`, comparing dependencies with `equals`.
///
/// The dependency is copied before it's stored,
/// so the stored dependency never shares its top-level allocation with the caller.
///
/// If `make_value` panics, the previously cached value is kept.
pub fn use_memo_with<D, T, E>(
    cx: &ScopeData,
    dependency: D,
    make_value: impl FnOnce() -> T,
    equals: E,
) -> Rc<T>
where
    D: ToValue,
    T: 'static,
    E: Comparator<Value>,
{
    let state = use_ref(cx, || RefCell::new(None::<MemoState<T>>));
    let dependency = dependency.to_value();

    if let Some(last) = &*state.borrow() {
        if equals.equals(&last.dependency, &dependency) {
            return last.value.clone();
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("Memoize: {}", core::any::type_name::<T>());

    let value = Rc::new(make_value());
    *state.borrow_mut() = Some(MemoState {
        dependency: dependency.shallow_copy(),
        value: value.clone(),
    });

    value
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use std::{cell::Cell, rc::Rc};

    #[test]
    fn it_memoizes_values() {
        let cx = ScopeData::default();
        let calls = Cell::new(0);

        let make = || {
            calls.set(calls.get() + 1);
            Object::new()
        };

        let a = use_memo(&cx, [1, 2], make);
        cx.reset();
        let b = use_memo(&cx, [1, 2], || {
            calls.set(calls.get() + 1);
            Object::new()
        });
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(calls.get(), 1);

        cx.reset();
        let c = use_memo(&cx, [1, 3], || {
            calls.set(calls.get() + 1);
            Object::new()
        });
        assert!(!Rc::ptr_eq(&a, &c));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn it_memoizes_empty_dependencies_forever() {
        let cx = ScopeData::default();

        let a = use_memo(&cx, (), || 1);
        cx.reset();
        let b = use_memo(&cx, (), || 2);

        assert_eq!(*b, 1);
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn it_compares_nested_dependencies_by_identity() {
        let cx = ScopeData::default();
        let items = Value::array([Value::from(1)]);

        let a = use_memo(&cx, (items.clone(),), || 0);
        cx.reset();
        let b = use_memo(&cx, (items,), || 1);
        assert!(Rc::ptr_eq(&a, &b));

        cx.reset();
        let c = use_memo(&cx, (Value::array([Value::from(1)]),), || 2);
        assert_eq!(*c, 2);
    }

    #[test]
    fn it_memoizes_deep_dependencies() {
        let cx = ScopeData::default();

        let a = use_deep_memo(&cx, (vec!["a", "b"],), || 0);
        cx.reset();
        let b = use_deep_memo(&cx, (vec!["a", "b"],), || 1);
        assert!(Rc::ptr_eq(&a, &b));

        cx.reset();
        let c = use_deep_memo(&cx, (vec!["a", "c"],), || 2);
        assert_eq!(*c, 2);
    }

    #[test]
    fn it_copies_dependencies() {
        let cx = ScopeData::default();
        let dependency = Value::array([Value::from(1)]);

        use_memo(&cx, dependency.clone(), || ());

        // The stored copy is a new array, so strict comparison of the same value misses.
        cx.reset();
        let calls = Cell::new(0);
        use_memo_with(
            &cx,
            dependency,
            || calls.set(calls.get() + 1),
            |a: &Value, b: &Value| strict_equals(a, b),
        );
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn it_keeps_independent_slots() {
        let cx = ScopeData::default();

        let a = use_memo(&cx, 1, || "a");
        let b = use_memo(&cx, 1, || "b");

        cx.reset();
        assert_eq!(*use_memo(&cx, 1, || "c"), "a");
        assert_eq!(*use_memo(&cx, 2, || "d"), "d");
        assert_eq!((*a, *b), ("a", "b"));
    }

    #[test]
    fn it_keeps_value_when_factory_panics() {
        let cx = ScopeData::default();
        let first = use_memo(&cx, [1], || "first");

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            cx.reset();
            use_memo(&cx, [2], || -> &'static str { panic!("factory failed") })
        }));
        assert!(result.is_err());

        cx.reset();
        let second = use_memo(&cx, [1], || "second");
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn it_recomputes_for_distinct_wide_integers() {
        let cx = ScopeData::default();
        let a = use_memo(&cx, (9_007_199_254_740_992u64,), || "first id");

        cx.reset();
        let b = use_memo(&cx, (9_007_199_254_740_993u64,), || "second id");
        assert_eq!(*b, "second id");
        assert!(!Rc::ptr_eq(&a, &b));
    }
}
