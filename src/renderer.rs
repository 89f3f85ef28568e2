use crate::{component::Component, Scope, ScopeData};
use slotmap::SlotMap;
use thiserror::Error;

slotmap::new_key_type! {
    /// Stable key of a mounted instance.
    pub struct InstanceKey;
}

/// Error while rendering an instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The instance was never mounted, or has been unmounted.
    #[error("instance {0:?} is not mounted")]
    InstanceNotFound(InstanceKey),
}

struct Instance<C> {
    component: C,
    scope: ScopeData,
}

/// Renderer for mounted component instances.
///
/// Each mounted instance owns one [`ScopeData`], so its hooks persist
/// across every [`Renderer::render`] of that instance, and are dropped on [`Renderer::unmount`].
pub struct Renderer<C> {
    instances: SlotMap<InstanceKey, Instance<C>>,
}

impl<C> Default for Renderer<C> {
    fn default() -> Self {
        Self {
            instances: SlotMap::with_key(),
        }
    }
}

impl<C: Component> Renderer<C> {
    /// Create a new empty [`Renderer`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a new instance of `component`.
    pub fn mount(&mut self, component: C) -> InstanceKey {
        let key = self.instances.insert(Instance {
            component,
            scope: ScopeData::default(),
        });

        #[cfg(feature = "tracing")]
        tracing::trace!("Mount: {:?}", key);

        key
    }

    /// Render the instance at `key` with `props`.
    pub fn render(&mut self, key: InstanceKey, props: &C::Props) -> Result<C::View, Error> {
        let instance = self
            .instances
            .get(key)
            .ok_or(Error::InstanceNotFound(key))?;

        #[cfg(feature = "tracing")]
        if let Some(name) = C::name() {
            tracing::trace!("Render: {} ({:?})", name, key);
        }

        instance.scope.reset();
        Ok(C::render(
            Scope::new(&instance.component, &instance.scope),
            props,
        ))
    }

    /// Unmount the instance at `key`, dropping its state and returning its component.
    pub fn unmount(&mut self, key: InstanceKey) -> Result<C, Error> {
        let instance = self
            .instances
            .remove(key)
            .ok_or(Error::InstanceNotFound(key))?;

        #[cfg(feature = "tracing")]
        tracing::trace!("Unmount: {:?}", key);

        Ok(instance.component)
    }

    /// Get the component of the instance at `key`.
    pub fn component(&self, key: InstanceKey) -> Option<&C> {
        self.instances.get(key).map(|instance| &instance.component)
    }

    /// Get the hook state of the instance at `key`.
    pub fn state(&self, key: InstanceKey) -> Option<&ScopeData> {
        self.instances.get(key).map(|instance| &instance.scope)
    }

    /// Returns `true` if an instance is mounted at `key`.
    pub fn contains(&self, key: InstanceKey) -> bool {
        self.instances.contains_key(key)
    }

    /// Number of mounted instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns `true` if no instances are mounted.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
