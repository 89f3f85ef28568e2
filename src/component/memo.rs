use crate::{
    component::Component,
    equality::{Comparator, Deep, Shallow},
    use_ref, Scope, ScopeData,
};
use alloc::borrow::Cow;
use core::cell::RefCell;

/// Create a new memoized component.
///
/// The content is only re-rendered when the props are no longer
/// [shallow-equal](crate::equality::shallow_equals) to the props of the last render.
/// Otherwise the last view is returned again, without running the content (or any of its side effects).
pub fn memo<C>(content: C) -> Memo<C, Shallow>
where
    C: Component,
    C::Props: Clone,
    Shallow: Comparator<C::Props>,
{
    memo_with(content, Shallow)
}

/// Create a new memoized component that compares props with [`deep_equals`](crate::equality::deep_equals).
///
/// See [`memo`] for more.
pub fn deep_memo<C>(content: C) -> Memo<C, Deep>
where
    C: Component,
    C::Props: Clone,
    Deep: Comparator<C::Props>,
{
    memo_with(content, Deep)
}

/// Create a new memoized component that compares props with `equals`.
///
/// See [`memo`] for more.
pub fn memo_with<C, E>(content: C, equals: E) -> Memo<C, E>
where
    C: Component,
    C::Props: Clone,
    E: Comparator<C::Props>,
{
    Memo { content, equals }
}

/// Memoized component.
///
/// See [`memo`] for more.
#[must_use = "Components do nothing unless rendered."]
pub struct Memo<C, E = Shallow> {
    content: C,
    equals: E,
}

impl<C, E> Memo<C, E> {
    /// Get a reference to the wrapped component.
    pub fn content(&self) -> &C {
        &self.content
    }
}

struct LastRender<P, V> {
    props: P,
    view: V,
}

impl<C, E> Component for Memo<C, E>
where
    C: Component,
    C::Props: Clone,
    E: Comparator<C::Props>,
{
    type Props = C::Props;

    type View = C::View;

    fn render(cx: Scope<Self>, props: &Self::Props) -> Self::View {
        // The content keeps its own hooks, which survive skipped renders.
        let content_state = use_ref(&cx, ScopeData::default);
        let last = use_ref(&cx, || RefCell::new(None::<LastRender<C::Props, C::View>>));

        if let Some(last) = &*last.borrow() {
            if cx.me().equals.equals(&last.props, props) {
                #[cfg(feature = "tracing")]
                if let Some(name) = Self::name() {
                    tracing::trace!("Skip: {}", name);
                }

                return last.view.clone();
            }
        }

        #[cfg(feature = "tracing")]
        if let Some(name) = Self::name() {
            tracing::trace!("Render: {}", name);
        }

        content_state.reset();
        let view = C::render(Scope::new(&cx.me().content, &content_state), props);

        *last.borrow_mut() = Some(LastRender {
            props: props.clone(),
            view: view.clone(),
        });

        view
    }

    fn name() -> Option<Cow<'static, str>> {
        Some(
            C::name()
                .map(|name| format!("Memo<{}>", name).into())
                .unwrap_or("Memo".into()),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use std::{
        cell::{Cell, RefCell},
        rc::Rc,
    };

    fn render<C: Component>(component: &C, cx: &ScopeData, props: &C::Props) -> C::View {
        cx.reset();
        C::render(Scope::new(component, cx), props)
    }

    #[test]
    fn it_skips_renders_for_shallow_equal_props() {
        let renders = Rc::new(Cell::new(0));
        let counter = renders.clone();

        let component = memo(from_fn(move |_, props: &Value| {
            counter.set(counter.get() + 1);
            Rc::new(props.get("label"))
        }));
        let cx = ScopeData::default();

        let a = render(&component, &cx, &Value::object([("label", Value::from("a"))]));
        let b = render(&component, &cx, &Value::object([("label", Value::from("a"))]));
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(renders.get(), 1);

        let c = render(&component, &cx, &Value::object([("label", Value::from("c"))]));
        assert!(!Rc::ptr_eq(&a, &c));
        assert_eq!(renders.get(), 2);
    }

    #[test]
    fn it_rerenders_for_new_nested_props() {
        let renders = Rc::new(Cell::new(0));
        let counter = renders.clone();

        let component = memo(from_fn(move |_, _: &Value| {
            counter.set(counter.get() + 1);
            Rc::new(())
        }));
        let cx = ScopeData::default();

        let props = || Value::object([("style", Value::object([("color", Value::from("red"))]))]);
        render(&component, &cx, &props());
        render(&component, &cx, &props());
        assert_eq!(renders.get(), 2);
    }

    #[test]
    fn it_skips_renders_for_deep_equal_props() {
        let renders = Rc::new(Cell::new(0));
        let counter = renders.clone();

        let component = deep_memo(from_fn(move |_, _: &Value| {
            counter.set(counter.get() + 1);
            Rc::new(())
        }));
        let cx = ScopeData::default();

        let props = || Value::object([("style", Value::object([("color", Value::from("red"))]))]);
        let a = render(&component, &cx, &props());
        let b = render(&component, &cx, &props());
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(renders.get(), 1);
    }

    #[test]
    fn it_uses_custom_comparators() {
        let renders = Rc::new(Cell::new(0));
        let counter = renders.clone();

        let component = memo_with(
            from_fn(move |_, props: &(u32, String)| {
                counter.set(counter.get() + 1);
                Rc::new(props.1.clone())
            }),
            |a: &(u32, String), b: &(u32, String)| a.0 == b.0,
        );
        let cx = ScopeData::default();

        let a = render(&component, &cx, &(1, String::from("a")));
        let b = render(&component, &cx, &(1, String::from("b")));
        assert_eq!(*b, "a");
        assert!(Rc::ptr_eq(&a, &b));

        render(&component, &cx, &(2, String::from("c")));
        assert_eq!(renders.get(), 2);
    }

    #[test]
    fn it_keeps_content_hooks_between_renders() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_handle = log.clone();

        let component = memo(from_fn(move |cx, props: &i32| {
            let count = use_ref(cx, || Cell::new(0));
            count.set(count.get() + 1);
            log_handle.borrow_mut().push((*props, count.get()));
        }));
        let cx = ScopeData::default();

        render(&component, &cx, &1);
        render(&component, &cx, &1);
        render(&component, &cx, &2);

        assert_eq!(*log.borrow(), [(1, 1), (2, 2)]);
    }

    #[test]
    fn it_names_memoized_components() {
        struct Header;

        impl Component for Header {
            type Props = ();

            type View = ();

            fn render(_cx: Scope<Self>, _props: &Self::Props) -> Self::View {}
        }

        assert_eq!(Memo::<Header>::name().as_deref(), Some("Memo<Header>"));
    }
}
