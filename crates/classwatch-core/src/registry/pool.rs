//! Alive-instance pool
//!
//! For a dynamic canonical entry, holds the live descriptor instances backing
//! it as a sorted multiset. Several objects may report the same descriptor
//! instance, so a descriptor can occupy more than one slot.

use crate::descriptor::DescriptorId;

/// Sorted multiset of alive descriptor instances
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlivePool {
    members: Vec<DescriptorId>,
}

impl AlivePool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert keeping sorted order
    pub fn add(&mut self, descriptor: DescriptorId) {
        let at = self.members.partition_point(|m| *m < descriptor);
        self.members.insert(at, descriptor);
    }

    /// Erase one slot for `descriptor`
    ///
    /// Returns false (and changes nothing) if it is not present.
    pub fn remove(&mut self, descriptor: DescriptorId) -> bool {
        match self.members.binary_search(&descriptor) {
            Ok(at) => {
                self.members.remove(at);
                true
            }
            Err(_) => false,
        }
    }

    /// Whether at least one slot holds `descriptor`
    pub fn contains(&self, descriptor: DescriptorId) -> bool {
        self.members.binary_search(&descriptor).is_ok()
    }

    /// The smallest member, used as the representative live instance
    pub fn first(&self) -> Option<DescriptorId> {
        self.members.first().copied()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterate in sorted order
    pub fn iter(&self) -> impl Iterator<Item = DescriptorId> + '_ {
        self.members.iter().copied()
    }
}
