//! Subscription handles with exactly-once release.

use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use super::types::SubscriptionId;

type Teardown = Box<dyn FnOnce() + Send>;

/// Counter for generating subscription IDs.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

struct Inner {
    id: SubscriptionId,
    closed: AtomicBool,
    teardowns: Mutex<Vec<Teardown>>,
}

/// Handle to an active subscription.
///
/// Clones share the same state. `unsubscribe` is idempotent: the first call
/// runs every registered teardown once, later calls do nothing. Every stage in
/// a pipeline shares the subscription created at the sink, so unsubscribing the
/// result releases whatever the source acquired.
#[derive(Clone)]
pub struct Subscription {
    inner: Arc<Inner>,
}

impl Subscription {
    /// Create a new open subscription.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                id: SubscriptionId(NEXT_ID.fetch_add(1, Ordering::SeqCst)),
                closed: AtomicBool::new(false),
                teardowns: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.inner.id
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// Register a release action. Runs immediately if already closed.
    pub fn add_teardown<F>(&self, teardown: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut teardowns = self.inner.teardowns.lock();
        if self.is_closed() {
            drop(teardowns);
            teardown();
            return;
        }
        teardowns.push(Box::new(teardown));
    }

    /// Close `child` when this subscription closes.
    pub fn add(&self, child: &Subscription) {
        let child = child.clone();
        self.add_teardown(move || child.unsubscribe());
    }

    /// Close the subscription and release everything registered on it.
    pub fn unsubscribe(&self) {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        let teardowns = std::mem::take(&mut *self.inner.teardowns.lock());
        tracing::trace!(
            subscription = %self.inner.id,
            teardowns = teardowns.len(),
            "releasing subscription"
        );
        for teardown in teardowns {
            teardown();
        }
    }
}

impl Default for Subscription {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.inner.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let hit = count.clone();
        (count, move || {
            hit.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_unsubscribe_runs_teardown_once() {
        let subscription = Subscription::new();
        let (count, teardown) = counter();
        subscription.add_teardown(teardown);

        subscription.unsubscribe();
        subscription.unsubscribe();
        subscription.clone().unsubscribe();

        assert!(subscription.is_closed());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_teardown_after_close_runs_immediately() {
        let subscription = Subscription::new();
        subscription.unsubscribe();

        let (count, teardown) = counter();
        subscription.add_teardown(teardown);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_child_closes_with_parent() {
        let parent = Subscription::new();
        let child = Subscription::new();
        parent.add(&child);

        assert!(!child.is_closed());
        parent.unsubscribe();
        assert!(child.is_closed());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Subscription::new();
        let b = Subscription::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_concurrent_unsubscribe_releases_once() {
        let subscription = Subscription::new();
        let (count, teardown) = counter();
        subscription.add_teardown(teardown);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let subscription = subscription.clone();
                std::thread::spawn(move || subscription.unsubscribe())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
