use crate::{
    use_memo,
    value::{Handle, ToValue, Value},
    ScopeData,
};
use alloc::rc::Rc;
use core::fmt;

/// Callback function with a stable identity.
///
/// Clones of a callback share the same function, and compare equal under
/// [`Callback::ptr_eq`] and [`strict_equals`](crate::equality::strict_equals).
pub struct Callback<In, Out = ()> {
    f: Rc<Box<dyn Fn(In) -> Out>>,
}

impl<In, Out> Callback<In, Out> {
    /// Create a new callback from `f`.
    pub fn new(f: impl Fn(In) -> Out + 'static) -> Self {
        Self {
            f: Rc::new(Box::new(f)),
        }
    }

    /// Call this callback with `input`.
    pub fn call(&self, input: In) -> Out {
        (self.f)(input)
    }

    /// Returns `true` if both callbacks share the same function.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.f, &other.f)
    }
}

impl<In, Out> Clone for Callback<In, Out> {
    fn clone(&self) -> Self {
        Self { f: self.f.clone() }
    }
}

impl<In, Out> fmt::Debug for Callback<In, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callback").field(&Rc::as_ptr(&self.f)).finish()
    }
}

impl<In: 'static, Out: 'static> ToValue for Callback<In, Out> {
    fn to_value(&self) -> Value {
        Value::Handle(Handle::from_rc(self.f.clone()))
    }
}

/// Use a callback function that keeps its identity until `dependency` changes.
///
/// While `dependency` stays [shallow-equal](crate::equality::shallow_equals),
/// the callback from the first render is returned and `f` is dropped.
/// This keeps props containing the callback equal for [`memo`](crate::component::memo).
///
/// ```
/// use memokit::prelude::*;
///
/// let cx = ScopeData::default();
///
/// let a = use_callback(&cx, (), |x: i32| x + 1);
/// cx.reset();
/// let b = use_callback(&cx, (), |x: i32| x + 2);
///
/// assert!(a.ptr_eq(&b));
/// assert_eq!(b.call(1), 2);
/// ```
pub fn use_callback<D, In, Out>(
    cx: &ScopeData,
    dependency: D,
    f: impl Fn(In) -> Out + 'static,
) -> Callback<In, Out>
where
    D: ToValue,
    In: 'static,
    Out: 'static,
{
    let callback = use_memo(cx, dependency, move || Callback::new(f));
    (*callback).clone()
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn it_replaces_callbacks_when_dependencies_change() {
        let cx = ScopeData::default();

        let a = use_callback(&cx, (1,), |x: i32| x);
        cx.reset();
        let b = use_callback(&cx, (2,), |x: i32| x * 2);

        assert!(!a.ptr_eq(&b));
        assert_eq!(b.call(2), 4);
    }

    #[test]
    fn it_converts_callbacks_to_handles() {
        let a = Callback::new(|_: ()| {});
        let b = a.clone();

        assert!(strict_equals(&a.to_value(), &b.to_value()));
        assert!(!strict_equals(
            &a.to_value(),
            &Callback::new(|_: ()| {}).to_value()
        ));
    }
}
