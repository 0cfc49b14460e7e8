//! Hierarchy index queries

use super::MetaRegistry;
use crate::descriptor::DescriptorId;

impl MetaRegistry {
    /// Parent of a registered descriptor (None for roots and unknown descriptors)
    pub fn parent_of(&self, descriptor: DescriptorId) -> Option<DescriptorId> {
        self.child_parent.get(&descriptor).copied().flatten()
    }

    /// Children of a descriptor in discovery order
    pub fn children_of(&self, descriptor: DescriptorId) -> &[DescriptorId] {
        self.parent_children
            .get(&Some(descriptor))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Descriptors registered without a parent, in discovery order
    pub fn root_descriptors(&self) -> &[DescriptorId] {
        self.parent_children
            .get(&None)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `descriptor` has a canonical entry
    pub fn is_known(&self, descriptor: DescriptorId) -> bool {
        self.child_parent.contains_key(&descriptor)
    }

    /// Whether the parent chain from `descriptor` reaches the universal base
    ///
    /// False for unknown descriptors.
    pub fn inherits_root(&self, descriptor: DescriptorId) -> bool {
        self.inherits(descriptor, self.root)
    }

    /// Whether the parent chain from `descriptor` reaches `ancestor`
    /// (a descriptor inherits itself)
    pub fn inherits(&self, descriptor: DescriptorId, ancestor: DescriptorId) -> bool {
        if !self.is_known(descriptor) {
            return false;
        }
        let mut current = Some(descriptor);
        while let Some(d) = current {
            if d == ancestor {
                return true;
            }
            current = self.parent_of(d);
        }
        false
    }

    /// Ancestors of `descriptor`, nearest first
    pub fn ancestors(&self, descriptor: DescriptorId) -> impl Iterator<Item = DescriptorId> + '_ {
        std::iter::successors(self.parent_of(descriptor), move |d| self.parent_of(*d))
    }
}
