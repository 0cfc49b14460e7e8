//! Owning-thread affinity
//!
//! Registry mutation is single-writer: every mutating call must come from
//! the thread that created the registry. This is asserted rather than
//! locked, and the check compiles away in release builds.

use std::thread::{self, ThreadId};

/// Records the owning thread and asserts calls happen on it
#[derive(Debug, Clone)]
pub struct ThreadAffinity {
    owner: ThreadId,
    enabled: bool,
}

impl ThreadAffinity {
    /// Bind to the current thread
    pub fn current(enabled: bool) -> Self {
        Self {
            owner: thread::current().id(),
            enabled,
        }
    }

    /// The owning thread
    pub fn owner(&self) -> ThreadId {
        self.owner
    }

    /// Whether the calling thread is the owner
    pub fn is_owner(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// Panic in debug builds if called off the owning thread
    #[inline]
    pub fn assert_owner(&self, operation: &'static str) {
        if cfg!(debug_assertions) && self.enabled {
            assert!(
                self.is_owner(),
                "{} called from {:?}, registry is owned by {:?}",
                operation,
                thread::current().id(),
                self.owner
            );
        }
    }
}
