//! Descriptor ingestion and startup scan

use log::{debug, warn};

use super::{AlivePool, MetaRegistry, RegistryEntry};
use crate::descriptor::{DescriptorId, DescriptorInfo};
use crate::events::RegistryEvent;
use crate::{RegistryError, RegistryResult};

impl MetaRegistry {
    /// Make sure `descriptor` and its superclass chain are registered
    ///
    /// Returns the canonical descriptor. With `merge_dynamic`, a
    /// runtime-generated descriptor whose class name already has a canonical
    /// entry resolves to that entry instead of creating a new one.
    /// Calling this again for a canonical descriptor is a no-op.
    pub fn ensure_registered(
        &mut self,
        descriptor: DescriptorId,
        merge_dynamic: bool,
    ) -> RegistryResult<DescriptorId> {
        self.affinity.assert_owner("ensure_registered");

        if self.is_known(descriptor) {
            return Ok(descriptor);
        }

        // Walk up to the first known ancestor, resolving metadata on the way.
        let limit = self.config.max_hierarchy_depth;
        let mut chain: Vec<(DescriptorId, DescriptorInfo)> = Vec::new();
        let mut anchor = None;
        let mut current = Some(descriptor);
        while let Some(d) = current {
            if self.is_known(d) {
                anchor = Some(d);
                break;
            }
            if chain.len() >= limit {
                return Err(RegistryError::HierarchyTooDeep { descriptor, limit });
            }
            let info = self
                .host
                .describe(d)
                .ok_or(RegistryError::UnresolvedDescriptor(d))?;
            current = info.super_class;
            chain.push((d, info));
        }

        // Register top-down so every parent exists before its children.
        let mut parent = anchor;
        let mut canonical = descriptor;
        for (d, info) in chain.into_iter().rev() {
            canonical = self.register_one(d, info, parent, merge_dynamic);
            parent = Some(canonical);
        }
        Ok(canonical)
    }

    fn register_one(
        &mut self,
        descriptor: DescriptorId,
        info: DescriptorInfo,
        parent: Option<DescriptorId>,
        merge_dynamic: bool,
    ) -> DescriptorId {
        let is_static = info.read_only;
        let is_dynamic = !is_static && merge_dynamic;

        if is_dynamic {
            if let Some(&existing) = self.by_name.get(&info.class_name) {
                debug!(
                    "merging {} into canonical {} ({})",
                    descriptor, existing, info.class_name
                );
                return existing;
            }
            self.by_name.insert(info.class_name.clone(), descriptor);
        }

        debug!(
            "registering {} ({}), parent {:?}, static={}, dynamic={}",
            descriptor, info.class_name, parent, is_static, is_dynamic
        );

        self.entries.insert(
            descriptor,
            RegistryEntry::new(info.class_name, is_static, is_dynamic),
        );
        if is_dynamic {
            self.alive.insert(descriptor, AlivePool::new());
        }

        // The parent edge is visible before observers hear about the addition.
        self.child_parent.insert(descriptor, parent);
        self.emit(RegistryEvent::BeforeDescriptorAdded(descriptor));
        self.parent_children
            .entry(parent)
            .or_default()
            .push(descriptor);
        self.order.push(descriptor);
        self.emit(RegistryEvent::DescriptorAdded(descriptor));

        descriptor
    }

    /// Ingest the host's type catalog, the universal base and the baseline
    /// descriptors
    ///
    /// Catalog descriptors are taken as canonical and never merged by name.
    /// Already registered descriptors are skipped, so this can be re-run
    /// after the host registers more types. Returns how many entries were
    /// added.
    pub fn rescan(&mut self) -> RegistryResult<usize> {
        self.affinity.assert_owner("rescan");
        let before = self.len();

        for ty in self.host.registered_types() {
            let Some(descriptor) = ty.descriptor else {
                continue;
            };
            if let Err(err) = self.ensure_registered(descriptor, false) {
                warn!("skipping catalog type {} ({}): {}", ty.type_id, ty.name, err);
            }
        }

        self.ensure_registered(self.root, false)?;

        for descriptor in self.host.baseline_descriptors() {
            if let Err(err) = self.ensure_registered(descriptor, false) {
                warn!("skipping baseline descriptor {}: {}", descriptor, err);
            }
        }

        let added = self.len() - before;
        debug!("scan registered {} descriptors", added);
        Ok(added)
    }
}
