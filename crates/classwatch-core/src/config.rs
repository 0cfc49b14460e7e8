//! Registry configuration

use serde::Deserialize;

use crate::defaults::{
    DEFAULT_CHECK_THREAD_AFFINITY, DEFAULT_MAX_HIERARCHY_DEPTH, DEFAULT_SCAN_ON_STARTUP,
};
use crate::{RegistryError, RegistryResult};

/// Configuration for a [`MetaRegistry`](crate::MetaRegistry)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Longest superclass chain accepted during ingestion
    pub max_hierarchy_depth: usize,
    /// Ingest the host's type catalog on construction
    pub scan_on_startup: bool,
    /// Assert owning-thread affinity on mutation (debug builds only)
    pub check_thread_affinity: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_hierarchy_depth: DEFAULT_MAX_HIERARCHY_DEPTH,
            scan_on_startup: DEFAULT_SCAN_ON_STARTUP,
            check_thread_affinity: DEFAULT_CHECK_THREAD_AFFINITY,
        }
    }
}

impl RegistryConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration fragment; missing fields keep their defaults
    pub fn from_json(source: &str) -> RegistryResult<Self> {
        serde_json::from_str(source).map_err(RegistryError::Config)
    }

    /// Set the superclass chain cap
    pub fn with_max_hierarchy_depth(mut self, depth: usize) -> Self {
        self.max_hierarchy_depth = depth;
        self
    }

    /// Enable or disable the startup catalog scan
    pub fn with_startup_scan(mut self, enabled: bool) -> Self {
        self.scan_on_startup = enabled;
        self
    }

    /// Enable or disable the owning-thread assertion
    pub fn with_thread_affinity_check(mut self, enabled: bool) -> Self {
        self.check_thread_affinity = enabled;
        self
    }
}
