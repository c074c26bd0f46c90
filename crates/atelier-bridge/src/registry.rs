//! Ordered handler registry, keyed by event kind.

use std::collections::HashMap;
use std::sync::Arc;

use atelier_protocol::{EventKind, HostEvent};

/// Callback signature for inbound events.
pub type Handler = Arc<dyn Fn(&HostEvent) + Send + Sync + 'static>;

/// Identifies one registration. Unique within a bridge instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(pub u64);

struct Entry {
    id: HandlerId,
    handler: Handler,
}

/// Insertion-ordered handler lists per kind.
///
/// Registration order is dispatch order. The same closure may be registered
/// any number of times; entries are told apart by id, never by comparing
/// closures.
#[derive(Default)]
pub struct Registry {
    entries: HashMap<EventKind, Vec<Entry>>,
    next_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: EventKind, handler: Handler) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.entries
            .entry(kind)
            .or_default()
            .push(Entry { id, handler });
        id
    }

    /// Remove one registration. Absent ids are a no-op.
    pub fn remove(&mut self, kind: EventKind, id: HandlerId) -> bool {
        match self.entries.get_mut(&kind) {
            Some(list) => {
                let before = list.len();
                list.retain(|entry| entry.id != id);
                before != list.len()
            }
            None => false,
        }
    }

    pub fn contains(&self, kind: EventKind, id: HandlerId) -> bool {
        self.entries
            .get(&kind)
            .is_some_and(|list| list.iter().any(|entry| entry.id == id))
    }

    /// The current list for `kind`, cloned out in registration order so the
    /// caller can iterate without holding any lock on the registry.
    pub fn snapshot(&self, kind: EventKind) -> Vec<(HandlerId, Handler)> {
        self.entries
            .get(&kind)
            .map(|list| {
                list.iter()
                    .map(|entry| (entry.id, Arc::clone(&entry.handler)))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn len(&self, kind: EventKind) -> usize {
        self.entries.get(&kind).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn noop() -> Handler {
        Arc::new(|_| {})
    }

    #[test]
    fn snapshot_preserves_registration_order() {
        let mut registry = Registry::new();
        let a = registry.register(EventKind::BuildLog, noop());
        let b = registry.register(EventKind::BuildLog, noop());
        let c = registry.register(EventKind::BuildLog, noop());

        let ids: Vec<HandlerId> = registry
            .snapshot(EventKind::BuildLog)
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec![a, b, c]);
    }

    #[test]
    fn duplicate_registrations_are_independent() {
        let counter = Arc::new(AtomicUsize::new(0));
        let make = |counter: &Arc<AtomicUsize>| -> Handler {
            let counter = Arc::clone(counter);
            Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
        };

        let mut registry = Registry::new();
        let shared: Handler = make(&counter);
        let first = registry.register(EventKind::SystemInfo, Arc::clone(&shared));
        let second = registry.register(EventKind::SystemInfo, shared);
        assert_eq!(registry.len(EventKind::SystemInfo), 2);

        assert!(registry.remove(EventKind::SystemInfo, first));
        assert_eq!(registry.len(EventKind::SystemInfo), 1);
        assert!(registry.contains(EventKind::SystemInfo, second));
    }

    #[test]
    fn removing_an_absent_id_is_a_no_op() {
        let mut registry = Registry::new();
        let id = registry.register(EventKind::RunLog, noop());

        assert!(!registry.remove(EventKind::BuildLog, id));
        assert!(registry.remove(EventKind::RunLog, id));
        assert!(!registry.remove(EventKind::RunLog, id));
    }

    #[test]
    fn snapshot_is_detached_from_later_mutation() {
        let mut registry = Registry::new();
        let id = registry.register(EventKind::FileContent, noop());

        let snapshot = registry.snapshot(EventKind::FileContent);
        registry.remove(EventKind::FileContent, id);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len(EventKind::FileContent), 0);
    }

    #[test]
    fn unknown_kind_snapshot_is_empty() {
        let registry = Registry::new();
        assert!(registry.snapshot(EventKind::InstallComplete).is_empty());
        assert_eq!(registry.len(EventKind::InstallComplete), 0);
    }
}
