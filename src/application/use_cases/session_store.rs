use std::collections::HashMap;

use tracing::{debug, info};

use crate::domain::{ConversationId, DomainError, Session};

struct Entry {
    session: Session,
    last_touched: u64,
}

/// Map of live conversations, owned by the dispatcher.
///
/// Unbounded unless built with [`SessionStore::with_capacity`], in which case
/// creating a session beyond the cap evicts the least recently touched one.
pub struct SessionStore {
    sessions: HashMap<ConversationId, Entry>,
    capacity: Option<usize>,
    clock: u64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
            capacity: None,
            clock: 0,
        }
    }

    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            capacity: capacity.filter(|c| *c > 0),
            ..Self::new()
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn contains(&self, id: ConversationId) -> bool {
        self.sessions.contains_key(&id)
    }

    /// Creates a session seeded with `seed`. Fails if `id` is already live.
    pub fn create(
        &mut self,
        id: ConversationId,
        seed: impl Into<String>,
    ) -> Result<&Session, DomainError> {
        if self.sessions.contains_key(&id) {
            return Err(DomainError::already_exists(format!(
                "Conversation already exists: {}",
                id
            )));
        }

        if let Some(cap) = self.capacity {
            while self.sessions.len() >= cap {
                self.evict_oldest();
            }
        }

        let tick = self.tick();
        let entry = self.sessions.entry(id).or_insert(Entry {
            session: Session::new(id, seed),
            last_touched: tick,
        });
        debug!("Created conversation {}", id);
        Ok(&entry.session)
    }

    pub fn get(&self, id: ConversationId) -> Option<&Session> {
        self.sessions.get(&id).map(|e| &e.session)
    }

    /// Mutable access; counts as a touch for eviction purposes.
    pub fn get_mut(&mut self, id: ConversationId) -> Option<&mut Session> {
        let tick = self.tick();
        self.sessions.get_mut(&id).map(|e| {
            e.last_touched = tick;
            &mut e.session
        })
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .sessions
            .iter()
            .min_by_key(|(_, e)| e.last_touched)
            .map(|(id, _)| *id);

        if let Some(id) = oldest {
            self.sessions.remove(&id);
            info!("Evicted conversation {} (session cap reached)", id);
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
