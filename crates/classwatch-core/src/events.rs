//! Change notification
//!
//! Observers are invoked synchronously, on the owning thread, at the exact
//! point of each mutation. They receive a shared borrow of the registry, so
//! they can query it (the before-add event already sees the new parent edge)
//! but cannot mutate it from inside a callback.

use std::fmt;

use crate::descriptor::DescriptorId;
use crate::registry::MetaRegistry;

/// A registry mutation
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A descriptor is about to be added under its parent
    BeforeDescriptorAdded(DescriptorId),
    /// A descriptor was appended to its parent's children
    DescriptorAdded(DescriptorId),
    /// A counter or the validity of a descriptor changed
    DataChanged(DescriptorId),
}

impl RegistryEvent {
    /// The descriptor the event refers to
    pub fn descriptor(&self) -> DescriptorId {
        match *self {
            RegistryEvent::BeforeDescriptorAdded(d)
            | RegistryEvent::DescriptorAdded(d)
            | RegistryEvent::DataChanged(d) => d,
        }
    }
}

/// Receives registry change notifications
pub trait RegistryObserver: Send {
    /// Called once per mutation
    fn on_event(&mut self, registry: &MetaRegistry, event: RegistryEvent);
}

impl<F> RegistryObserver for F
where
    F: FnMut(&MetaRegistry, RegistryEvent) + Send,
{
    fn on_event(&mut self, registry: &MetaRegistry, event: RegistryEvent) {
        self(registry, event)
    }
}

/// Handle returned when subscribing, used to unsubscribe
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl ObserverId {
    /// Get the numeric ID value
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Ordered call list of subscribed observers
#[derive(Default)]
pub(crate) struct ObserverList {
    next_id: u64,
    observers: Vec<(ObserverId, Box<dyn RegistryObserver>)>,
}

impl ObserverList {
    pub(crate) fn add(&mut self, observer: Box<dyn RegistryObserver>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    pub(crate) fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Deliver in subscription order
    pub(crate) fn dispatch(&mut self, registry: &MetaRegistry, event: RegistryEvent) {
        for (_, observer) in &mut self.observers {
            observer.on_event(registry, event);
        }
    }
}

impl fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverList")
            .field("observers", &self.observers.len())
            .finish()
    }
}
