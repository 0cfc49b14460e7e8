//! Descriptor and object handles
//!
//! Descriptors and objects live in memory owned by the host type system.
//! The registry only ever holds their identities as opaque integer handles
//! and never assumes it controls their lifetime.

use std::fmt;

/// Opaque, process-stable identity of a class descriptor
///
/// Ordered so that alive pools can keep their members sorted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DescriptorId(u64);

impl DescriptorId {
    /// Wrap a raw handle value (typically a descriptor address)
    pub const fn from_u64(raw: u64) -> Self {
        DescriptorId(raw)
    }

    /// Get the raw handle value
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DescriptorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "descriptor#{:x}", self.0)
    }
}

/// Opaque identity of a tracked object instance
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Wrap a raw handle value (typically an object address)
    pub const fn from_u64(raw: u64) -> Self {
        ObjectId(raw)
    }

    /// Get the raw handle value
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{:x}", self.0)
    }
}

/// Metadata the host resolves for a descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorInfo {
    /// Class name
    pub class_name: String,
    /// Superclass descriptor (None for root classes)
    pub super_class: Option<DescriptorId>,
    /// Whether the descriptor resides in immutable process storage
    pub read_only: bool,
}

impl DescriptorInfo {
    /// Describe a root descriptor
    pub fn root(class_name: impl Into<String>, read_only: bool) -> Self {
        Self {
            class_name: class_name.into(),
            super_class: None,
            read_only,
        }
    }

    /// Describe a descriptor with a superclass
    pub fn with_super(
        class_name: impl Into<String>,
        super_class: DescriptorId,
        read_only: bool,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            super_class: Some(super_class),
            read_only,
        }
    }
}

/// An object as reported by a construction notification
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TrackedObject {
    /// Object identity
    pub id: ObjectId,
    /// Descriptor the object currently reports
    pub descriptor: DescriptorId,
    /// Whether the object reports a runtime-generated descriptor instead of
    /// its class's static one
    pub has_dynamic_descriptor: bool,
}

impl TrackedObject {
    /// An object whose descriptor is its class's static descriptor
    pub fn new(id: ObjectId, descriptor: DescriptorId) -> Self {
        Self {
            id,
            descriptor,
            has_dynamic_descriptor: false,
        }
    }

    /// An object backed by a runtime-generated descriptor
    pub fn dynamic(id: ObjectId, descriptor: DescriptorId) -> Self {
        Self {
            id,
            descriptor,
            has_dynamic_descriptor: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_ordering_follows_raw_value() {
        let a = DescriptorId::from_u64(0x10);
        let b = DescriptorId::from_u64(0x20);
        assert!(a < b);
        assert_eq!(b.as_u64(), 0x20);
    }

    #[test]
    fn test_display() {
        assert_eq!(DescriptorId::from_u64(255).to_string(), "descriptor#ff");
        assert_eq!(ObjectId::from_u64(16).to_string(), "object#10");
    }

    #[test]
    fn test_tracked_object_constructors() {
        let obj = TrackedObject::new(ObjectId::from_u64(1), DescriptorId::from_u64(2));
        assert!(!obj.has_dynamic_descriptor);

        let dynamic = TrackedObject::dynamic(ObjectId::from_u64(1), DescriptorId::from_u64(2));
        assert!(dynamic.has_dynamic_descriptor);
    }
}
