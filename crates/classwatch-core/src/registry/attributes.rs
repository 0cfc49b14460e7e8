//! Per-descriptor attribute queries

use std::fmt;

use super::MetaRegistry;
use crate::descriptor::DescriptorId;

/// Attribute selector for [`MetaRegistry::class_attribute`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ClassAttribute {
    /// Class name
    ClassName,
    /// Whether the descriptor is known and not invalid
    Valid,
    /// Instances ever constructed with exactly this descriptor
    SelfCount,
    /// Instances ever constructed with this descriptor or a subclass
    InclusiveCount,
    /// Alive instances of exactly this descriptor
    SelfAliveCount,
    /// Alive instances of this descriptor or a subclass
    InclusiveAliveCount,
}

impl ClassAttribute {
    /// All attributes, in column order
    pub const ALL: [ClassAttribute; 6] = [
        ClassAttribute::ClassName,
        ClassAttribute::Valid,
        ClassAttribute::SelfCount,
        ClassAttribute::InclusiveCount,
        ClassAttribute::SelfAliveCount,
        ClassAttribute::InclusiveAliveCount,
    ];

    fn is_count(self) -> bool {
        !matches!(self, ClassAttribute::ClassName | ClassAttribute::Valid)
    }
}

/// Result of an attribute query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// Textual attribute
    Text(String),
    /// Boolean attribute
    Flag(bool),
    /// Counter attribute
    Count(u64),
    /// Counters are not tracked for descriptors outside the universal base's tree
    NotApplicable,
}

impl AttributeValue {
    /// The counter value, if this is one
    pub fn as_count(&self) -> Option<u64> {
        match self {
            AttributeValue::Count(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(s) => f.write_str(s),
            AttributeValue::Flag(b) => write!(f, "{}", b),
            AttributeValue::Count(n) => write!(f, "{}", n),
            AttributeValue::NotApplicable => f.write_str("-"),
        }
    }
}

impl MetaRegistry {
    /// Query one attribute of a descriptor
    ///
    /// Counter attributes of descriptors that do not inherit the universal
    /// base are [`AttributeValue::NotApplicable`]. Unknown descriptors have an
    /// empty class name and are not valid.
    pub fn class_attribute(
        &self,
        descriptor: DescriptorId,
        attribute: ClassAttribute,
    ) -> AttributeValue {
        let entry = self.entries.get(&descriptor);

        if attribute.is_count() && !self.inherits_root(descriptor) {
            return AttributeValue::NotApplicable;
        }

        match attribute {
            ClassAttribute::ClassName => {
                AttributeValue::Text(entry.map(|e| e.class_name.clone()).unwrap_or_default())
            }
            ClassAttribute::Valid => AttributeValue::Flag(self.is_valid(descriptor)),
            ClassAttribute::SelfCount => AttributeValue::Count(entry.map_or(0, |e| e.self_count)),
            ClassAttribute::InclusiveCount => {
                AttributeValue::Count(entry.map_or(0, |e| e.inclusive_count))
            }
            ClassAttribute::SelfAliveCount => {
                AttributeValue::Count(entry.map_or(0, |e| e.self_alive_count))
            }
            ClassAttribute::InclusiveAliveCount => {
                AttributeValue::Count(entry.map_or(0, |e| e.inclusive_alive_count))
            }
        }
    }

    /// Whether the descriptor is known and its metadata may still be trusted
    pub fn is_valid(&self, descriptor: DescriptorId) -> bool {
        self.entries.get(&descriptor).is_some_and(|e| !e.invalid)
    }

    /// Whether the descriptor is known and resides in immutable storage
    pub fn is_static(&self, descriptor: DescriptorId) -> bool {
        self.entries.get(&descriptor).is_some_and(|e| e.is_static)
    }
}
