use gesture::GestureSession;
use gesture_base::log;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use tokio::sync::RwLock;

use crate::config::DEFAULT_MAX_SESSIONS;

/// A session plus the time it was last used.
#[derive(Debug)]
pub struct SessionSlot {
    session: GestureSession,
    last_used: Instant,
}

impl SessionSlot {
    fn new(history_length: usize) -> Self {
        Self {
            session: GestureSession::new(history_length),
            last_used: Instant::now(),
        }
    }

    /// Borrow the session for processing and mark it used.
    pub fn session_mut(&mut self) -> &mut GestureSession {
        self.last_used = Instant::now();
        &mut self.session
    }

    pub fn session(&self) -> &GestureSession {
        &self.session
    }

    pub fn idle_for(&self) -> Duration {
        self.last_used.elapsed()
    }
}

pub type SharedSlot = Arc<Mutex<SessionSlot>>;

/// Gesture sessions keyed by client-chosen id.
///
/// Slots use a blocking mutex since they are only locked inside
/// `spawn_blocking` while the classifiers run.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SharedSlot>>,
    history_length: usize,
    max_sessions: usize,
}

impl SessionRegistry {
    pub fn new(history_length: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            history_length,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }

    /// Cap on live sessions. Creating one past the cap evicts the least
    /// recently used idle session.
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions.max(1);
        self
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    pub async fn get_or_create(&self, id: &str) -> SharedSlot {
        if let Some(slot) = self.sessions.read().await.get(id) {
            return slot.clone();
        }

        let mut sessions = self.sessions.write().await;
        if let Some(slot) = sessions.get(id) {
            return slot.clone();
        }
        if sessions.len() >= self.max_sessions {
            match evict_least_recent(&mut sessions) {
                Some(evicted) => log::info!("Session '{}' evicted, limit is {}", evicted, self.max_sessions),
                None => log::warn!("All {} sessions busy, exceeding limit", sessions.len()),
            }
        }

        log::info!("New session '{}'", id);
        let slot = Arc::new(Mutex::new(SessionSlot::new(self.history_length)));
        sessions.insert(id.to_string(), slot.clone());
        slot
    }

    pub async fn get(&self, id: &str) -> Option<SharedSlot> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Drop a session. Returns whether it existed.
    pub async fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            log::info!("Removed session '{}'", id);
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop sessions unused for longer than `timeout`. Sessions being
    /// processed right now are kept.
    pub async fn prune_idle(&self, timeout: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, slot| match slot.try_lock() {
            Ok(slot) if slot.idle_for() > timeout => {
                log::info!("Session '{}' expired after {:?} idle", id, slot.idle_for());
                false
            }
            _ => true,
        });
        before - sessions.len()
    }
}

/// Remove the session idle the longest, skipping any that are locked.
fn evict_least_recent(sessions: &mut HashMap<String, SharedSlot>) -> Option<String> {
    let oldest = sessions
        .iter()
        .filter_map(|(id, slot)| slot.try_lock().ok().map(|slot| (id, slot.idle_for())))
        .max_by_key(|(_, idle)| *idle)
        .map(|(id, _)| id.clone())?;
    sessions.remove(&oldest);
    Some(oldest)
}
