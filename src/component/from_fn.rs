use crate::{component::Component, Scope, ScopeData};
use core::marker::PhantomData;

/// Create a component from a function.
///
/// The function receives the instance's [`ScopeData`], for use with hooks, and the props.
pub fn from_fn<F, P, V>(f: F) -> FromFn<F, P, V>
where
    F: Fn(&ScopeData, &P) -> V,
    P: 'static,
    V: Clone + 'static,
{
    FromFn {
        f,
        _marker: PhantomData,
    }
}

/// Function component.
///
/// For more see [`from_fn`].
pub struct FromFn<F, P, V> {
    f: F,
    _marker: PhantomData<fn(&P) -> V>,
}

impl<F, P, V> Component for FromFn<F, P, V>
where
    F: Fn(&ScopeData, &P) -> V,
    P: 'static,
    V: Clone + 'static,
{
    type Props = P;

    type View = V;

    fn render(cx: Scope<Self>, props: &Self::Props) -> Self::View {
        (cx.me().f)(cx.state(), props)
    }

    fn name() -> Option<alloc::borrow::Cow<'static, str>> {
        None
    }
}
