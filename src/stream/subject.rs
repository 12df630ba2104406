//! Hot, multicast push source.

use crate::error::{Result, StreamError};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Weak};

use super::observable::Observable;
use super::observer::Subscriber;
use super::types::SubscriptionId;

/// How the subject ended.
enum Terminal<E> {
    Completed,
    Failed(E),
}

/// A signal waiting to be delivered.
enum Pending<T, E> {
    Value(T),
    End(Terminal<E>),
}

/// Delivery queue. `active` is set while some caller is flushing it.
struct Delivery<T, E> {
    queue: VecDeque<Pending<T, E>>,
    active: bool,
}

type SharedSubscriber<T, E> = Arc<Mutex<Subscriber<T, E>>>;

struct SubjectInner<T, E> {
    /// Active subscribers by subscription ID.
    subscribers: RwLock<HashMap<SubscriptionId, SharedSubscriber<T, E>>>,
    /// Set once by `error` or `complete`.
    terminal: Mutex<Option<Terminal<E>>>,
    delivery: Mutex<Delivery<T, E>>,
}

/// A push handle that broadcasts to every current subscriber.
///
/// Values pushed before a subscription starts are not replayed. After a
/// terminal signal, pushes fail with [`StreamError::Closed`] and late
/// subscribers receive the terminal signal immediately.
///
/// Delivery is serialized. A push made while another one is being delivered,
/// from an observer callback or from another thread, is queued and delivered
/// after it in push order by the caller already delivering. Observers may
/// therefore push back into the subject they observe.
pub struct Subject<T, E> {
    inner: Arc<SubjectInner<T, E>>,
}

impl<T, E> Clone for Subject<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, E> Subject<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SubjectInner {
                subscribers: RwLock::new(HashMap::new()),
                terminal: Mutex::new(None),
                delivery: Mutex::new(Delivery {
                    queue: VecDeque::new(),
                    active: false,
                }),
            }),
        }
    }

    /// Subscribable view of this subject.
    pub fn observable(&self) -> SubjectObservable<T, E> {
        SubjectObservable {
            inner: self.inner.clone(),
        }
    }

    /// Get subscriber count.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().len()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.terminal.lock().is_some()
    }

    /// Push a value to every current subscriber.
    pub fn next(&self, value: T) -> Result<()> {
        {
            // Enqueue under the terminal lock so a value never lands after
            // the terminal signal.
            let terminal = self.inner.terminal.lock();
            if terminal.is_some() {
                return Err(StreamError::Closed);
            }
            if !self.enqueue(Pending::Value(value)) {
                return Ok(());
            }
        }
        self.flush();
        Ok(())
    }

    /// Fail every current and future subscriber with `error`.
    pub fn error(&self, error: E) -> Result<()> {
        let error_copy = error.clone();
        self.terminate(Terminal::Failed(error), Terminal::Failed(error_copy))
    }

    /// Complete every current and future subscriber.
    pub fn complete(&self) -> Result<()> {
        self.terminate(Terminal::Completed, Terminal::Completed)
    }

    fn terminate(&self, stored: Terminal<E>, pending: Terminal<E>) -> Result<()> {
        {
            let mut slot = self.inner.terminal.lock();
            if slot.is_some() {
                return Err(StreamError::Closed);
            }
            *slot = Some(stored);
            if !self.enqueue(Pending::End(pending)) {
                return Ok(());
            }
        }
        self.flush();
        Ok(())
    }

    /// Queue a signal. Returns true when the caller must flush the queue.
    fn enqueue(&self, pending: Pending<T, E>) -> bool {
        let mut delivery = self.inner.delivery.lock();
        delivery.queue.push_back(pending);
        if delivery.active {
            return false;
        }
        delivery.active = true;
        true
    }

    /// Deliver queued signals until the queue is empty. No lock other than
    /// the receiving subscriber's own is held while an observer runs.
    fn flush(&self) {
        let _reset = ResetOnPanic(&self.inner.delivery);
        loop {
            let pending = {
                let mut delivery = self.inner.delivery.lock();
                match delivery.queue.pop_front() {
                    Some(pending) => pending,
                    None => {
                        delivery.active = false;
                        return;
                    }
                }
            };
            self.deliver(pending);
        }
    }

    fn deliver(&self, pending: Pending<T, E>) {
        match pending {
            Pending::Value(value) => {
                for subscriber in self.snapshot() {
                    subscriber.lock().next(value.clone());
                }
            }
            Pending::End(Terminal::Completed) => {
                tracing::debug!("subject completed");
                for subscriber in self.drain() {
                    subscriber.lock().complete();
                }
            }
            Pending::End(Terminal::Failed(error)) => {
                tracing::debug!("subject failed");
                for subscriber in self.drain() {
                    subscriber.lock().error(error.clone());
                }
            }
        }
    }

    fn snapshot(&self) -> Vec<SharedSubscriber<T, E>> {
        self.inner.subscribers.read().values().cloned().collect()
    }

    fn drain(&self) -> Vec<SharedSubscriber<T, E>> {
        self.inner
            .subscribers
            .write()
            .drain()
            .map(|(_, subscriber)| subscriber)
            .collect()
    }
}

/// Releases the delivery queue if an observer panics mid-flush.
struct ResetOnPanic<'a, T, E>(&'a Mutex<Delivery<T, E>>);

impl<T, E> Drop for ResetOnPanic<'_, T, E> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            let mut delivery = self.0.lock();
            delivery.queue.clear();
            delivery.active = false;
        }
    }
}

impl<T, E> Default for Subject<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Subscribable view of a [`Subject`].
pub struct SubjectObservable<T, E> {
    inner: Arc<SubjectInner<T, E>>,
}

impl<T, E> Clone for SubjectObservable<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, E> Observable for SubjectObservable<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    type Item = T;
    type Error = E;

    fn subscribe_with(self, mut subscriber: Subscriber<T, E>) {
        // Holding the terminal lock while inserting keeps `error` and
        // `complete` from draining between the check and the insert.
        let terminal = self.inner.terminal.lock();
        if let Some(ended) = terminal.as_ref() {
            let error = match ended {
                Terminal::Completed => None,
                Terminal::Failed(error) => Some(error.clone()),
            };
            drop(terminal);
            match error {
                Some(error) => subscriber.error(error),
                None => subscriber.complete(),
            }
            return;
        }

        let subscription = subscriber.subscription().clone();
        let id = subscription.id();
        self.inner
            .subscribers
            .write()
            .insert(id, Arc::new(Mutex::new(subscriber)));
        drop(terminal);

        tracing::debug!(subscription = %id, "subject subscribed");

        let weak: Weak<SubjectInner<T, E>> = Arc::downgrade(&self.inner);
        subscription.add_teardown(move || {
            if let Some(inner) = weak.upgrade() {
                if inner.subscribers.write().remove(&id).is_some() {
                    tracing::trace!(subscription = %id, "subject unsubscribed");
                }
            }
        });
    }
}
