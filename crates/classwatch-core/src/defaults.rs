//! Default constants for registry configuration.

/// Default cap on superclass chain length during ingestion.
///
/// Real inheritance depths are small; a chain this long means the host
/// reported a cycle.
pub const DEFAULT_MAX_HIERARCHY_DEPTH: usize = 256;

/// Scan the host catalog when the registry is created.
pub const DEFAULT_SCAN_ON_STARTUP: bool = true;

/// Assert that mutations happen on the owning thread (debug builds).
pub const DEFAULT_CHECK_THREAD_AFFINITY: bool = true;
