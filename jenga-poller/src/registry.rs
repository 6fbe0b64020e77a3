//! Poller registry
//!
//! Tracks which job ids currently have a live poll loop so a double-click or
//! a re-render cannot start a second loop against the same job.
//!
//! The registry is a plain value owned by whoever composes the poller, not a
//! global: tests build one per case. Clones share the same underlying map.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Entries {
    /// job id -> generation of the registration holding it
    live: HashMap<String, u64>,
    next_generation: u64,
}

/// Set of job ids with a live poll loop
#[derive(Debug, Clone, Default)]
pub struct PollerRegistry {
    entries: Arc<Mutex<Entries>>,
}

impl PollerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `id` as tracked; returns false if it already was
    pub fn register(&self, id: &str) -> bool {
        self.insert(id).is_some()
    }

    /// Forgets `id` regardless of which registration holds it
    pub fn unregister(&self, id: &str) {
        self.lock().live.remove(id);
    }

    pub fn is_polling(&self, id: &str) -> bool {
        self.lock().live.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.lock().live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().live.is_empty()
    }

    /// Registers `id` and returns a lease that unregisters it when released
    pub(crate) fn lease(&self, id: &str) -> Option<RegistryLease> {
        let generation = self.insert(id)?;
        Some(RegistryLease {
            registry: self.clone(),
            id: id.to_string(),
            generation,
            released: AtomicBool::new(false),
        })
    }

    fn insert(&self, id: &str) -> Option<u64> {
        let mut entries = self.lock();
        if entries.live.contains_key(id) {
            return None;
        }
        let generation = entries.next_generation;
        entries.next_generation += 1;
        entries.live.insert(id.to_string(), generation);
        Some(generation)
    }

    /// Removes `id` only if it is still held by `generation`
    fn release(&self, id: &str, generation: u64) {
        let mut entries = self.lock();
        if entries.live.get(id) == Some(&generation) {
            entries.live.remove(id);
        }
    }

    // Critical sections never panic, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Ownership of one registry entry by one poll loop
///
/// Released explicitly on resolution or cancellation, and on drop as a
/// backstop. Releasing twice is a no-op, and a stale lease never removes a
/// newer registration of the same id.
#[derive(Debug)]
pub(crate) struct RegistryLease {
    registry: PollerRegistry,
    id: String,
    generation: u64,
    released: AtomicBool,
}

impl RegistryLease {
    pub(crate) fn release(&self) {
        if !self.released.swap(true, Ordering::AcqRel) {
            self.registry.release(&self.id, self.generation);
        }
    }
}

impl Drop for RegistryLease {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_rejects_duplicates() {
        let registry = PollerRegistry::new();
        assert!(registry.register("job-1"));
        assert!(!registry.register("job-1"));
        assert!(registry.register("job-2"));
        assert_eq!(registry.len(), 2);

        registry.unregister("job-1");
        assert!(!registry.is_polling("job-1"));
        assert!(registry.register("job-1"));
    }

    #[test]
    fn test_unregister_unknown_is_noop() {
        let registry = PollerRegistry::new();
        registry.unregister("never-seen");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let registry = PollerRegistry::new();
        let other = registry.clone();
        assert!(registry.register("job-1"));
        assert!(other.is_polling("job-1"));
    }

    #[test]
    fn test_independent_registries() {
        let a = PollerRegistry::new();
        let b = PollerRegistry::new();
        assert!(a.register("job-1"));
        assert!(b.register("job-1"));
    }

    #[test]
    fn test_lease_released_on_drop() {
        let registry = PollerRegistry::new();
        {
            let _lease = registry.lease("job-1").unwrap();
            assert!(registry.is_polling("job-1"));
            assert!(registry.lease("job-1").is_none());
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_stale_lease_keeps_newer_registration() {
        let registry = PollerRegistry::new();
        let old = registry.lease("job-1").unwrap();
        old.release();

        let new = registry.lease("job-1").unwrap();
        drop(old);
        assert!(registry.is_polling("job-1"));

        new.release();
        new.release();
        assert!(registry.is_empty());
    }
}
