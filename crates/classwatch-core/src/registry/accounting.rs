//! Instance accounting
//!
//! Construction and destruction notifications update the exact descriptor's
//! self counters, then walk the parent chain updating inclusive counters.
//! The walk is bounded by inheritance depth, not by instance count.

use log::{debug, trace, warn};

use super::MetaRegistry;
use crate::descriptor::{DescriptorId, ObjectId, TrackedObject};
use crate::events::RegistryEvent;
use crate::RegistryResult;

impl MetaRegistry {
    /// Account for a newly constructed object
    ///
    /// Returns the canonical descriptor the object was counted under. An
    /// object that is already tracked is not counted twice.
    pub fn object_constructed(&mut self, object: TrackedObject) -> RegistryResult<DescriptorId> {
        self.affinity.assert_owner("object_constructed");

        if let Some(&existing) = self.objects.get(&object.id) {
            warn!("{} constructed twice, keeping first registration", object.id);
            return Ok(existing);
        }

        let canonical = self.ensure_registered(object.descriptor, object.has_dynamic_descriptor)?;
        self.objects.insert(object.id, canonical);

        let mut is_dynamic = false;
        if let Some(entry) = self.entries.get_mut(&canonical) {
            entry.self_count += 1;
            entry.self_alive_count += 1;
            is_dynamic = entry.is_dynamic;
        }
        if is_dynamic {
            self.add_alive_instance(object.id, object.descriptor, canonical);
        }

        let mut current = Some(canonical);
        while let Some(d) = current {
            if let Some(entry) = self.entries.get_mut(&d) {
                entry.inclusive_count += 1;
                entry.inclusive_alive_count += 1;
                entry.invalid = false;
                trace!("{} inclusive alive -> {}", d, entry.inclusive_alive_count);
            }
            self.emit(RegistryEvent::DataChanged(d));
            current = self.parent_of(d);
        }

        Ok(canonical)
    }

    /// Account for a destroyed object
    ///
    /// Returns false when the object was never tracked (or was already
    /// removed), in which case nothing changes.
    pub fn object_destroyed(&mut self, object: ObjectId) -> bool {
        self.affinity.assert_owner("object_destroyed");

        let Some(canonical) = self.objects.remove(&object) else {
            debug!("ignoring destruction of untracked {}", object);
            return false;
        };

        let Some(entry) = self.entries.get_mut(&canonical) else {
            debug_assert!(false, "{} tracked under unregistered {}", object, canonical);
            return false;
        };
        if entry.self_alive_count == 0 {
            debug_assert!(false, "alive count underflow for {}", canonical);
            warn!("alive count underflow for {} ({}), ignoring", canonical, object);
            return false;
        }
        entry.self_alive_count -= 1;
        let is_dynamic = entry.is_dynamic;
        if is_dynamic {
            self.remove_alive_instance(object, canonical);
        }

        let mut current = Some(canonical);
        while let Some(d) = current {
            if let Some(entry) = self.entries.get_mut(&d) {
                entry.inclusive_alive_count = entry.inclusive_alive_count.saturating_sub(1);
                // Descriptor storage may be gone once nothing of this type lives.
                if entry.inclusive_alive_count == 0 && !entry.is_static {
                    entry.invalid = true;
                }
                trace!("{} inclusive alive -> {}", d, entry.inclusive_alive_count);
            }
            self.emit(RegistryEvent::DataChanged(d));
            current = self.parent_of(d);
        }

        true
    }

    fn add_alive_instance(&mut self, object: ObjectId, alive: DescriptorId, canonical: DescriptorId) {
        self.dynamic_objects.insert(object, alive);
        self.canonical.insert(alive, canonical);
        self.alive.entry(canonical).or_default().add(alive);
    }

    fn remove_alive_instance(&mut self, object: ObjectId, canonical: DescriptorId) {
        let Some(alive) = self.dynamic_objects.remove(&object) else {
            return;
        };
        let pool = self.alive.entry(canonical).or_default();
        pool.remove(alive);
        if !pool.contains(alive) {
            self.canonical.remove(&alive);
        }
    }

    /// A live descriptor instance representing `descriptor`
    ///
    /// Non-dynamic descriptors represent themselves. A dynamic canonical
    /// descriptor with no alive instances has no representative.
    pub fn alive_instance(&self, descriptor: DescriptorId) -> Option<DescriptorId> {
        match self.alive.get(&descriptor) {
            Some(pool) => pool.first(),
            None => Some(descriptor),
        }
    }

    /// Map an alive descriptor instance to its canonical descriptor
    ///
    /// Descriptors not currently backing a dynamic entry map to themselves.
    pub fn canonical_descriptor(&self, descriptor: DescriptorId) -> DescriptorId {
        self.canonical.get(&descriptor).copied().unwrap_or(descriptor)
    }

    /// The alive pool of a dynamic canonical descriptor
    pub fn alive_pool(&self, descriptor: DescriptorId) -> Option<&super::AlivePool> {
        self.alive.get(&descriptor)
    }

    /// Canonical descriptor an object is counted under
    pub fn descriptor_of(&self, object: ObjectId) -> Option<DescriptorId> {
        self.objects.get(&object).copied()
    }
}
