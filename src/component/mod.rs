use crate::Scope;
use alloc::borrow::Cow;

mod from_fn;
pub use self::from_fn::{from_fn, FromFn};

mod memo;
pub use self::memo::{deep_memo, memo, memo_with, Memo};

/// A component that renders props into a view.
///
/// Components are the building blocks rendered by a [`Renderer`](crate::Renderer)
/// (or any other host that keeps one [`ScopeData`](crate::ScopeData) per instance).
/// A component is essentially a function that is re-run every time its instance is rendered.
/// Its hooks keep their state between renders of the same instance.
///
/// The view is opaque to Memokit.
/// It only needs to be cheap to clone, so a [`Memo`] can hand out the same view again.
/// Wrapping a view in [`Rc`](alloc::rc::Rc) keeps its identity across clones.
pub trait Component {
    /// Input of this component.
    type Props: 'static;

    /// Output of this component.
    type View: Clone + 'static;

    /// Render this component.
    fn render(cx: Scope<Self>, props: &Self::Props) -> Self::View;

    #[doc(hidden)]
    fn name() -> Option<Cow<'static, str>> {
        let name = core::any::type_name::<Self>();
        Some(
            name.split('<')
                .next()
                .unwrap_or(name)
                .split("::")
                .last()
                .unwrap_or(name)
                .into(),
        )
    }
}

impl<C: Component> Component for Box<C> {
    type Props = C::Props;

    type View = C::View;

    fn render(cx: Scope<Self>, props: &Self::Props) -> Self::View {
        C::render(Scope::new(&**cx.me(), cx.state()), props)
    }

    fn name() -> Option<Cow<'static, str>> {
        C::name()
    }
}
