//! Live meta-type registry
//!
//! Discovers every distinct class descriptor seen at runtime, arranges the
//! canonical ones in a forest mirroring single inheritance, and keeps live
//! per-type instance counters.
//!
//! ## Layout
//!
//! - `ingest`: descriptor registration and the startup catalog scan
//! - `hierarchy`: parent/children lookups
//! - `accounting`: construction/destruction handlers and representatives
//! - `attributes`: per-descriptor attribute queries
//! - `pool`: sorted alive-instance pools for dynamic descriptors
//!
//! All mutation happens on the thread that created the registry.

mod accounting;
mod attributes;
mod hierarchy;
mod ingest;
mod pool;

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::affinity::ThreadAffinity;
use crate::config::RegistryConfig;
use crate::descriptor::{DescriptorId, ObjectId};
use crate::events::{ObserverId, ObserverList, RegistryEvent, RegistryObserver};
use crate::host::TypeSystem;
use crate::RegistryResult;

pub use attributes::{AttributeValue, ClassAttribute};
pub use pool::AlivePool;

/// Bookkeeping for one canonical descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    class_name: String,
    is_static: bool,
    is_dynamic: bool,
    self_count: u64,
    inclusive_count: u64,
    self_alive_count: u64,
    inclusive_alive_count: u64,
    invalid: bool,
}

impl RegistryEntry {
    fn new(class_name: String, is_static: bool, is_dynamic: bool) -> Self {
        Self {
            class_name,
            is_static,
            is_dynamic,
            self_count: 0,
            inclusive_count: 0,
            self_alive_count: 0,
            inclusive_alive_count: 0,
            invalid: false,
        }
    }

    /// Class name captured at registration
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Whether the descriptor resides in immutable storage
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Whether this entry is the canonical representative of a group of
    /// runtime-generated descriptors sharing a class name
    pub fn is_dynamic(&self) -> bool {
        self.is_dynamic
    }

    /// Instances ever constructed with exactly this descriptor
    pub fn self_count(&self) -> u64 {
        self.self_count
    }

    /// Instances ever constructed with this descriptor or a subclass
    pub fn inclusive_count(&self) -> u64 {
        self.inclusive_count
    }

    /// Currently alive instances of exactly this descriptor
    pub fn self_alive_count(&self) -> u64 {
        self.self_alive_count
    }

    /// Currently alive instances of this descriptor or a subclass
    pub fn inclusive_alive_count(&self) -> u64 {
        self.inclusive_alive_count
    }

    /// Set once a non-static descriptor has no alive instances in its subtree
    pub fn is_invalid(&self) -> bool {
        self.invalid
    }
}

/// The meta-descriptor registry
///
/// Construct one per observed process and hand references to the
/// notification sources and query consumers.
pub struct MetaRegistry {
    host: Arc<dyn TypeSystem>,
    config: RegistryConfig,
    affinity: ThreadAffinity,
    /// Universal base descriptor (root of interest)
    root: DescriptorId,

    entries: FxHashMap<DescriptorId, RegistryEntry>,
    /// Canonical descriptors in registration order
    order: Vec<DescriptorId>,
    child_parent: FxHashMap<DescriptorId, Option<DescriptorId>>,
    parent_children: FxHashMap<Option<DescriptorId>, Vec<DescriptorId>>,
    /// Class name to canonical descriptor, dynamic merges only
    by_name: FxHashMap<String, DescriptorId>,

    /// Tracked object to its canonical descriptor
    objects: FxHashMap<ObjectId, DescriptorId>,
    /// Tracked object to the alive descriptor it reported (dynamic only)
    dynamic_objects: FxHashMap<ObjectId, DescriptorId>,
    /// Alive descriptor instance to canonical descriptor
    canonical: FxHashMap<DescriptorId, DescriptorId>,
    alive: FxHashMap<DescriptorId, AlivePool>,

    observers: ObserverList,
}

impl MetaRegistry {
    /// Create a registry bound to the calling thread
    ///
    /// Runs the startup catalog scan unless disabled in `config`.
    pub fn new(host: Arc<dyn TypeSystem>, config: RegistryConfig) -> RegistryResult<Self> {
        let root = host.universal_base();
        let affinity = ThreadAffinity::current(config.check_thread_affinity);
        let scan = config.scan_on_startup;

        let mut registry = Self {
            host,
            config,
            affinity,
            root,
            entries: FxHashMap::default(),
            order: Vec::new(),
            child_parent: FxHashMap::default(),
            parent_children: FxHashMap::default(),
            by_name: FxHashMap::default(),
            objects: FxHashMap::default(),
            dynamic_objects: FxHashMap::default(),
            canonical: FxHashMap::default(),
            alive: FxHashMap::default(),
            observers: ObserverList::default(),
        };

        if scan {
            registry.rescan()?;
        }
        Ok(registry)
    }

    /// Create a registry with the default configuration
    pub fn with_defaults(host: Arc<dyn TypeSystem>) -> RegistryResult<Self> {
        Self::new(host, RegistryConfig::default())
    }

    /// The active configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The universal base descriptor
    pub fn root(&self) -> DescriptorId {
        self.root
    }

    /// Look up the entry of a canonical descriptor
    pub fn entry(&self, descriptor: DescriptorId) -> Option<&RegistryEntry> {
        self.entries.get(&descriptor)
    }

    /// Canonical descriptors in registration order
    ///
    /// Superclasses always precede their subclasses.
    pub fn descriptors(&self) -> impl Iterator<Item = DescriptorId> + '_ {
        self.order.iter().copied()
    }

    /// Number of canonical entries
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if no descriptor has been registered
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of objects currently tracked
    pub fn tracked_objects(&self) -> usize {
        self.objects.len()
    }

    /// Subscribe to change notifications
    pub fn add_observer(&mut self, observer: impl RegistryObserver + 'static) -> ObserverId {
        self.affinity.assert_owner("add_observer");
        self.observers.add(Box::new(observer))
    }

    /// Unsubscribe; returns whether the observer was present
    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.affinity.assert_owner("remove_observer");
        self.observers.remove(id)
    }

    /// Number of subscribed observers
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Deliver `event` synchronously to every observer
    ///
    /// The list is detached for the duration of the call so observers can
    /// borrow the registry immutably.
    fn emit(&mut self, event: RegistryEvent) {
        if self.observers.is_empty() {
            return;
        }
        let mut observers = std::mem::take(&mut self.observers);
        observers.dispatch(self, event);
        self.observers = observers;
    }
}

impl fmt::Debug for MetaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetaRegistry")
            .field("root", &self.root)
            .field("entries", &self.entries.len())
            .field("tracked_objects", &self.objects.len())
            .field("observers", &self.observers)
            .field("owner", &self.affinity.owner())
            .finish()
    }
}
