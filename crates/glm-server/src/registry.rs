//! Session identity and lifecycle tracking.
//!
//! Every accepted `/stream` request gets the next id from a process-wide
//! counter. The id tags all log lines of that request. A [`SessionGuard`]
//! keeps the session in the active set until the response stream is dropped,
//! whether it finished or the client went away.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use glm_engine::GenerationRequest;

/// One accepted stream request. Immutable once generation starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: u64,
    /// Validated inputs, defaults filled and history already truncated.
    pub request: GenerationRequest,
}

/// Issues session ids and tracks which sessions are still streaming.
pub struct SessionRegistry {
    /// Last issued id. Never decremented.
    counter: AtomicU64,
    /// Open sessions keyed by id.
    active: Mutex<HashMap<u64, SessionEntry>>,
}

/// Metadata for an open session.
struct SessionEntry {
    opened: Instant,
}

/// Removes its session from the active set when dropped.
pub struct SessionGuard {
    session_id: u64,
    registry: Arc<SessionRegistry>,
}

impl SessionGuard {
    pub fn session_id(&self) -> u64 {
        self.session_id
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Some(entry) = self.registry.active().remove(&self.session_id) {
            tracing::debug!(
                session_id = self.session_id,
                elapsed_ms = entry.opened.elapsed().as_millis() as u64,
                "session closed"
            );
        }
    }
}

impl SessionRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            counter: AtomicU64::new(0),
            active: Mutex::new(HashMap::new()),
        })
    }

    /// Atomically allocate the next session id. The first id is 1.
    pub fn next_session_id(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Mark `session_id` as streaming until the returned guard is dropped.
    pub fn open(self: &Arc<Self>, session_id: u64) -> SessionGuard {
        self.active().insert(
            session_id,
            SessionEntry {
                opened: Instant::now(),
            },
        );

        SessionGuard {
            session_id,
            registry: Arc::clone(self),
        }
    }

    /// Number of sessions currently streaming.
    pub fn active_count(&self) -> usize {
        self.active().len()
    }

    /// Number of ids handed out since startup.
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }

    fn active(&self) -> MutexGuard<'_, HashMap<u64, SessionEntry>> {
        self.active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_start_at_one_and_increase() {
        let registry = SessionRegistry::new();
        assert_eq!(registry.next_session_id(), 1);
        assert_eq!(registry.next_session_id(), 2);
        assert_eq!(registry.next_session_id(), 3);
        assert_eq!(registry.issued(), 3);
    }

    #[test]
    fn concurrent_ids_are_distinct_without_gaps() {
        let registry = SessionRegistry::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    (0..250)
                        .map(|_| registry.next_session_id())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let ids: HashSet<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();

        assert_eq!(ids.len(), 2000);
        assert_eq!(ids.iter().min(), Some(&1));
        assert_eq!(ids.iter().max(), Some(&2000));
    }

    #[test]
    fn guard_tracks_active_sessions() {
        let registry = SessionRegistry::new();
        let first = registry.open(registry.next_session_id());
        let second = registry.open(registry.next_session_id());
        assert_eq!(registry.active_count(), 2);
        assert_eq!(second.session_id(), 2);

        drop(first);
        assert_eq!(registry.active_count(), 1);
        drop(second);
        assert_eq!(registry.active_count(), 0);
        assert_eq!(registry.issued(), 2);
    }
}
