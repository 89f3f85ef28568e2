//! # memokit
//! Memokit provides equality comparators and memoization primitives for cooperative, single-threaded view layers.
//!
//! The crate is built around three pieces:
//! - [`Value`](value::Value), a small tagged value type with identity for arrays and objects,
//!   compared by [`strict_equals`](equality::strict_equals), [`shallow_equals`](equality::shallow_equals)
//!   and [`deep_equals`](equality::deep_equals).
//! - Hooks, such as [`use_memo`], that cache values across renders of the same instance.
//! - [`Memo`](component::Memo), a component wrapper that reuses its last view when its props are unchanged.
//!
//! ```
//! use memokit::prelude::*;
//! use std::{cell::Cell, rc::Rc};
//!
//! let renders = Rc::new(Cell::new(0));
//! let counter = renders.clone();
//!
//! let header = memo(from_fn(move |_cx, props: &Value| {
//!     counter.set(counter.get() + 1);
//!     Rc::new(format!("Hello, {:?}", props.get("name")))
//! }));
//!
//! let mut renderer = Renderer::new();
//! let key = renderer.mount(header);
//!
//! let first = renderer.render(key, &Value::object([("name", Value::from("Ada"))])).unwrap();
//! let second = renderer.render(key, &Value::object([("name", Value::from("Ada"))])).unwrap();
//!
//! assert!(Rc::ptr_eq(&first, &second));
//! assert_eq!(renders.get(), 1);
//! ```
//!
//! ## Hooks
//! Functions that begin with `use_` are called `hooks` in Memokit.
//! Hooks store their state in persistent slots owned by the instance being rendered.
//!
//! Hooks must be used in the same order for every render.
//! Don’t use hooks inside loops, conditions, nested functions, or match blocks.
//! Instead, always use hooks at the top level of your component, before any early returns.
//!
//! ## Features
//! - `serde_json`: Conversion from `serde_json::Value`.
//! - `tracing`: Trace cache hits and misses with the `tracing` crate.
//! - `full`: Enables all features above.

#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

use alloc::rc::Rc;
use core::{
    any::{type_name, Any},
    cell::{Cell, RefCell},
    fmt,
    ops::Deref,
};

type HashMap<K, V> = hashbrown::HashMap<K, V, ahash::RandomState>;

/// Prelude of commonly-used hooks, comparators, and components.
///
/// `use memokit::prelude::*;`
pub mod prelude {
    pub use crate::{
        use_callback, use_deep_memo, use_memo, use_memo_with, use_ref, Callback, Scope, ScopeData,
    };

    pub use crate::component::{self, deep_memo, from_fn, memo, memo_with, Component, Memo};

    pub use crate::equality::{
        deep_equals, shallow_equals, strict_equals, Comparator, Deep, Shallow, Strict,
    };

    pub use crate::renderer::{Error, InstanceKey, Renderer};

    pub use crate::value::{BigInt, Handle, Object, ToValue, Value};
}

/// Components and the render-result memoizer.
pub mod component;

pub mod equality;

/// Instance arena for rendering components.
pub mod renderer;
pub use self::renderer::{Error, InstanceKey, Renderer};

pub mod value;

mod use_callback;
pub use self::use_callback::{use_callback, Callback};

mod use_memo;
pub use self::use_memo::{use_deep_memo, use_memo, use_memo_with};

/// State of a component instance.
///
/// Each hook call claims the next persistent slot of this scope.
/// Slots are allocated on the first render and reused by every render after it.
#[derive(Default)]
pub struct ScopeData {
    hooks: RefCell<Vec<Rc<dyn Any>>>,
    hook_idx: Cell<usize>,
}

impl ScopeData {
    /// Rewind the hook cursor so the next render reads slots from the start.
    pub fn reset(&self) {
        self.hook_idx.set(0);
    }

    /// Number of allocated slots.
    pub fn len(&self) -> usize {
        self.hooks.borrow().len()
    }

    /// Returns `true` if no slots have been allocated.
    pub fn is_empty(&self) -> bool {
        self.hooks.borrow().is_empty()
    }
}

impl fmt::Debug for ScopeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeData")
            .field("slots", &self.len())
            .field("hook_idx", &self.hook_idx.get())
            .finish()
    }
}

/// Component scope.
pub struct Scope<'a, C: ?Sized> {
    me: &'a C,
    state: &'a ScopeData,
}

impl<'a, C: ?Sized> Scope<'a, C> {
    /// Create a new scope for `me` backed by `state`.
    pub fn new(me: &'a C, state: &'a ScopeData) -> Self {
        Self { me, state }
    }

    /// Get a reference to this component.
    pub fn me(self) -> &'a C {
        self.me
    }

    /// Get the state of this component.
    pub fn state(self) -> &'a ScopeData {
        self.state
    }
}

impl<C: ?Sized> Clone for Scope<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: ?Sized> Copy for Scope<'_, C> {}

impl<C: ?Sized> Deref for Scope<'_, C> {
    type Target = ScopeData;

    fn deref(&self) -> &Self::Target {
        self.state
    }
}

/// Use a persistent slot holding a value of type `T`.
///
/// `make_value` will only be called once to initialize this value.
/// Every later render returns the same [`Rc`].
///
/// # Panics
/// Panics if hooks were called in a different order than on the first render,
/// so that this slot holds a value of another type.
pub fn use_ref<T: 'static>(cx: &ScopeData, make_value: impl FnOnce() -> T) -> Rc<T> {
    let idx = cx.hook_idx.get();
    cx.hook_idx.set(idx + 1);

    let existing = cx.hooks.borrow().get(idx).cloned();
    let any = match existing {
        Some(any) => any,
        None => {
            let any: Rc<dyn Any> = Rc::new(make_value());
            cx.hooks.borrow_mut().push(any.clone());
            any
        }
    };

    any.downcast().unwrap_or_else(|_| {
        panic!(
            "Hook {} is not of type `{}`: hooks must be called in the same order on every render",
            idx,
            type_name::<T>()
        )
    })
}
