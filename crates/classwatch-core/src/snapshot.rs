//! Registry snapshot export
//!
//! Captures every canonical entry at a point in time in a serializable
//! form, for diagnostics dumps and for consumers living outside the owning
//! thread.

use serde::Serialize;

use crate::registry::MetaRegistry;
use crate::{RegistryError, RegistryResult};

/// A captured registry entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySnapshot {
    /// Raw descriptor handle
    pub descriptor: u64,
    /// Class name
    pub class_name: String,
    /// Raw parent handle (None for roots)
    pub parent: Option<u64>,
    /// Immutable storage
    pub is_static: bool,
    /// Canonical entry of a dynamic descriptor group
    pub is_dynamic: bool,
    /// Known and not invalid
    pub valid: bool,
    /// Inherits the universal base
    pub rooted: bool,
    /// Instances ever constructed with exactly this descriptor
    pub self_count: u64,
    /// Instances ever constructed including subclasses
    pub inclusive_count: u64,
    /// Alive instances of exactly this descriptor
    pub self_alive_count: u64,
    /// Alive instances including subclasses
    pub inclusive_alive_count: u64,
    /// Alive descriptor instances backing a dynamic entry
    pub alive_instances: usize,
}

/// Point-in-time export of a registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistrySnapshot {
    /// Number of tracked objects
    pub tracked_objects: usize,
    /// Entries in registration order
    pub entries: Vec<EntrySnapshot>,
}

impl RegistrySnapshot {
    /// Capture the current state of `registry`
    pub fn capture(registry: &MetaRegistry) -> Self {
        let entries = registry
            .descriptors()
            .filter_map(|d| {
                let entry = registry.entry(d)?;
                Some(EntrySnapshot {
                    descriptor: d.as_u64(),
                    class_name: entry.class_name().to_string(),
                    parent: registry.parent_of(d).map(|p| p.as_u64()),
                    is_static: entry.is_static(),
                    is_dynamic: entry.is_dynamic(),
                    valid: !entry.is_invalid(),
                    rooted: registry.inherits_root(d),
                    self_count: entry.self_count(),
                    inclusive_count: entry.inclusive_count(),
                    self_alive_count: entry.self_alive_count(),
                    inclusive_alive_count: entry.inclusive_alive_count(),
                    alive_instances: registry.alive_pool(d).map_or(0, |pool| pool.len()),
                })
            })
            .collect();

        Self {
            tracked_objects: registry.tracked_objects(),
            entries,
        }
    }

    /// Find an entry by class name
    pub fn find(&self, class_name: &str) -> Option<&EntrySnapshot> {
        self.entries.iter().find(|e| e.class_name == class_name)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> RegistryResult<String> {
        serde_json::to_string_pretty(self).map_err(RegistryError::Export)
    }
}

impl MetaRegistry {
    /// Capture a snapshot of the registry
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot::capture(self)
    }
}
