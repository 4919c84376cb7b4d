//! Subscriber identifiers.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SubscriberId(pub u32);

/// Monotonic allocator for SubscriberId. The counter wraps after `u32::MAX`, so an id
/// repeats only after 2^32 subscriptions on one store; until then a stale unsubscribe
/// handle cannot remove a newer registration.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_subscriber: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_subscriber(&mut self) -> SubscriberId {
        let id = SubscriberId(self.next_subscriber);
        self.next_subscriber = self.next_subscriber.wrapping_add(1);
        id
    }
}
