//! Host type system interface
//!
//! The registry does not own descriptors. Everything it learns about a
//! descriptor beyond its identity comes from a [`TypeSystem`] implementation
//! supplied by the embedding application.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::descriptor::{DescriptorId, DescriptorInfo};

/// One entry of the host's startup type catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredType {
    /// Host-assigned type number
    pub type_id: u32,
    /// Registered type name
    pub name: String,
    /// Class descriptor, if the type has one
    pub descriptor: Option<DescriptorId>,
}

/// Collaborator resolving descriptor metadata and enumerating known types
pub trait TypeSystem: Send + Sync {
    /// Resolve a descriptor's metadata
    ///
    /// Returns `None` when the host does not know the handle.
    fn describe(&self, descriptor: DescriptorId) -> Option<DescriptorInfo>;

    /// All types registered with the host at the time of the call
    fn registered_types(&self) -> Vec<RegisteredType>;

    /// The universal base descriptor every trackable object inherits from
    fn universal_base(&self) -> DescriptorId;

    /// Well-known descriptors that should be present even before any
    /// object is constructed
    fn baseline_descriptors(&self) -> Vec<DescriptorId> {
        Vec::new()
    }
}

struct Arena {
    descriptors: FxHashMap<DescriptorId, DescriptorInfo>,
    types: Vec<RegisteredType>,
    baseline: Vec<DescriptorId>,
    next_handle: u64,
}

impl Arena {
    fn define(&mut self, info: DescriptorInfo) -> DescriptorId {
        let id = DescriptorId::from_u64(self.next_handle);
        self.next_handle += DESCRIPTOR_STRIDE;
        self.descriptors.insert(id, info);
        id
    }
}

/// Spacing between handles so they read like addresses in logs
const DESCRIPTOR_STRIDE: u64 = 0x40;

/// In-process type system backed by a lock-protected descriptor arena
///
/// Definition methods take `&self`, so descriptors can be added while a
/// registry holds the host behind an `Arc`. This is how runtime-regenerated
/// descriptors appear after startup.
pub struct MemoryTypeSystem {
    arena: RwLock<Arena>,
    root: DescriptorId,
}

impl MemoryTypeSystem {
    /// Create a host whose universal base is a static descriptor named `root_name`
    pub fn new(root_name: &str) -> Self {
        let mut arena = Arena {
            descriptors: FxHashMap::default(),
            types: Vec::new(),
            baseline: Vec::new(),
            next_handle: 0x1000,
        };
        let root = arena.define(DescriptorInfo::root(root_name, true));
        Self {
            arena: RwLock::new(arena),
            root,
        }
    }

    /// The universal base descriptor
    pub fn root(&self) -> DescriptorId {
        self.root
    }

    /// Define a descriptor in immutable storage
    pub fn define_static(&self, name: &str, parent: Option<DescriptorId>) -> DescriptorId {
        self.define(name, parent, true)
    }

    /// Define a runtime-generated descriptor
    pub fn define_dynamic(&self, name: &str, parent: Option<DescriptorId>) -> DescriptorId {
        self.define(name, parent, false)
    }

    fn define(&self, name: &str, parent: Option<DescriptorId>, read_only: bool) -> DescriptorId {
        let info = DescriptorInfo {
            class_name: name.to_string(),
            super_class: parent,
            read_only,
        };
        self.arena.write().define(info)
    }

    /// Add a type to the startup catalog, returning its type number
    pub fn register_type(&self, name: &str, descriptor: Option<DescriptorId>) -> u32 {
        let mut arena = self.arena.write();
        let type_id = arena.types.len() as u32;
        arena.types.push(RegisteredType {
            type_id,
            name: name.to_string(),
            descriptor,
        });
        type_id
    }

    /// Mark a descriptor as well-known baseline
    pub fn add_baseline(&self, descriptor: DescriptorId) {
        self.arena.write().baseline.push(descriptor);
    }

    /// Forget a descriptor, as its owner would when freeing it
    ///
    /// Returns whether the descriptor was defined.
    pub fn release(&self, descriptor: DescriptorId) -> bool {
        self.arena.write().descriptors.remove(&descriptor).is_some()
    }

    /// Number of currently defined descriptors
    pub fn descriptor_count(&self) -> usize {
        self.arena.read().descriptors.len()
    }
}

impl TypeSystem for MemoryTypeSystem {
    fn describe(&self, descriptor: DescriptorId) -> Option<DescriptorInfo> {
        self.arena.read().descriptors.get(&descriptor).cloned()
    }

    fn registered_types(&self) -> Vec<RegisteredType> {
        self.arena.read().types.clone()
    }

    fn universal_base(&self) -> DescriptorId {
        self.root
    }

    fn baseline_descriptors(&self) -> Vec<DescriptorId> {
        self.arena.read().baseline.clone()
    }
}

impl std::fmt::Debug for MemoryTypeSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arena = self.arena.read();
        f.debug_struct("MemoryTypeSystem")
            .field("root", &self.root)
            .field("descriptors", &arena.descriptors.len())
            .field("types", &arena.types.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_static() {
        let host = MemoryTypeSystem::new("Object");
        let info = host.describe(host.root()).unwrap();
        assert_eq!(info.class_name, "Object");
        assert!(info.read_only);
        assert_eq!(info.super_class, None);
        assert_eq!(host.universal_base(), host.root());
    }

    #[test]
    fn test_define_links_parent() {
        let host = MemoryTypeSystem::new("Object");
        let widget = host.define_static("Widget", Some(host.root()));
        let item = host.define_dynamic("Item", Some(widget));

        assert_ne!(widget, item);
        let info = host.describe(item).unwrap();
        assert_eq!(info.super_class, Some(widget));
        assert!(!info.read_only);
    }

    #[test]
    fn test_catalog_and_baseline() {
        let host = MemoryTypeSystem::new("Object");
        let timer = host.define_static("Timer", Some(host.root()));
        assert_eq!(host.register_type("int", None), 0);
        assert_eq!(host.register_type("Timer*", Some(timer)), 1);
        host.add_baseline(timer);

        let types = host.registered_types();
        assert_eq!(types.len(), 2);
        assert_eq!(types[1].descriptor, Some(timer));
        assert_eq!(host.baseline_descriptors(), vec![timer]);
    }

    #[test]
    fn test_release() {
        let host = MemoryTypeSystem::new("Object");
        let d = host.define_dynamic("Foo", None);
        assert_eq!(host.descriptor_count(), 2);
        assert!(host.release(d));
        assert!(!host.release(d));
        assert!(host.describe(d).is_none());
    }
}
