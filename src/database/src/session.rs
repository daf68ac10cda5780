use core::{PendingAction, SessionStore};
use std::collections::HashMap;

/// Per-user pending-action storage for a single process.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    pending: HashMap<u64, PendingAction>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        InMemorySessionStore {
            pending: HashMap::new(),
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn pending(&self, user_id: u64) -> Option<PendingAction> {
        self.pending.get(&user_id).copied()
    }

    fn set_pending(&mut self, user_id: u64, action: Option<PendingAction>) {
        match action {
            Some(action) => {
                self.pending.insert(user_id, action);
            }
            None => {
                self.pending.remove(&user_id);
            }
        }
    }
}
