//! Classwatch core: a live meta-type registry
//!
//! This crate tracks, inside a running application, every distinct class
//! descriptor encountered at runtime:
//! - Descriptor ingestion with name-based deduplication of runtime-generated
//!   descriptors
//! - A hierarchy index mirroring single inheritance
//! - Per-type instance accounting (ever-constructed and alive, self and
//!   inclusive of subclasses)
//! - Alive-instance pools for dynamic descriptors
//! - Synchronous change notification
//!
//! The host type system and the source of construction/destruction
//! notifications are external collaborators; see [`TypeSystem`].

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod affinity;
pub mod config;
pub mod defaults;
pub mod descriptor;
pub mod events;
pub mod host;
pub mod registry;
pub mod snapshot;

pub use config::RegistryConfig;
pub use descriptor::{DescriptorId, DescriptorInfo, ObjectId, TrackedObject};
pub use events::{ObserverId, RegistryEvent, RegistryObserver};
pub use host::{MemoryTypeSystem, RegisteredType, TypeSystem};
pub use registry::{AlivePool, AttributeValue, ClassAttribute, MetaRegistry, RegistryEntry};
pub use snapshot::{EntrySnapshot, RegistrySnapshot};

/// Registry errors
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The host could not describe a descriptor ingestion needed
    #[error("Unresolved descriptor: {0}")]
    UnresolvedDescriptor(DescriptorId),

    /// Superclass chain exceeded the configured depth
    #[error("Hierarchy of {descriptor} exceeds depth limit {limit}")]
    HierarchyTooDeep {
        /// Descriptor whose chain was being walked
        descriptor: DescriptorId,
        /// Configured limit
        limit: usize,
    },

    /// Configuration fragment failed to parse
    #[error("Invalid configuration: {0}")]
    Config(#[source] serde_json::Error),

    /// Snapshot serialization failed
    #[error("Snapshot export failed: {0}")]
    Export(#[source] serde_json::Error),
}

/// Registry result
pub type RegistryResult<T> = Result<T, RegistryError>;
