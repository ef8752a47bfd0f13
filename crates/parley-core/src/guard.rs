use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use parley_types::MessageId;

/// Set of message ids with a translation attempt in flight
#[derive(Default)]
pub struct ConcurrencyGuard {
    held: Mutex<HashSet<MessageId>>,
}

impl ConcurrencyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as held. `false` when another attempt already holds it.
    pub fn try_acquire(&self, id: &MessageId) -> bool {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        held.insert(id.clone())
    }

    pub fn release(&self, id: &MessageId) {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        held.remove(id);
    }

    /// Scoped acquisition; the id is released when the returned value drops
    pub fn acquire(&self, id: &MessageId) -> Option<InFlight<'_>> {
        self.try_acquire(id).then(|| InFlight {
            guard: self,
            id: id.clone(),
        })
    }

    pub fn is_held(&self, id: &MessageId) -> bool {
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }

    pub fn len(&self) -> usize {
        self.held.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Held message id. Releases exactly once, on drop.
pub struct InFlight<'a> {
    guard: &'a ConcurrencyGuard,
    id: MessageId,
}

impl InFlight<'_> {
    pub fn id(&self) -> &MessageId {
        &self.id
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.guard.release(&self.id);
    }
}
