//! Channel-backed sink for consuming a stream from another thread.

use crate::error::{Result, StreamError};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::observable::Observable;
use super::observer::{Observer, Subscriber};
use super::subscription::Subscription;
use super::types::{DropReason, Notification, SubscriptionId};

/// Configuration for a collector.
#[derive(Clone, Debug)]
pub struct CollectorConfig {
    /// Max buffered notifications before dropping the subscription.
    /// Default: 1000
    pub buffer_size: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self { buffer_size: 1000 }
    }
}

/// Observer half: forwards every signal into the channel.
///
/// The channel holds one slot more than `capacity`. Values never take that
/// slot, so the final terminal or `Dropped` notification always fits.
struct ChannelObserver<T, E> {
    sender: Sender<Notification<T, E>>,
    capacity: usize,
    subscription: Subscription,
    /// Set once a terminal notification was forwarded or the buffer overflowed.
    finished: Arc<AtomicBool>,
}

impl<T, E> ChannelObserver<T, E> {
    fn forward_value(&self, value: T) {
        if self.sender.len() >= self.capacity {
            self.overflow();
            return;
        }
        self.forward(Notification::Value(value));
    }

    /// Try to send a notification. Drops the subscription if the receiving
    /// side is gone.
    fn forward(&self, notification: Notification<T, E>) {
        match self.sender.try_send(notification) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => self.overflow(),
            Err(TrySendError::Disconnected(_)) => {
                tracing::debug!(
                    subscription = %self.subscription.id(),
                    "collector receiver gone, dropping subscription"
                );
                self.subscription.unsubscribe();
            }
        }
    }

    fn overflow(&self) {
        tracing::warn!(
            subscription = %self.subscription.id(),
            capacity = self.capacity,
            "collector buffer full, dropping subscription"
        );
        self.finished.store(true, Ordering::Release);
        let _ = self.sender.try_send(Notification::Dropped {
            reason: DropReason::BufferOverflow,
        });
        self.subscription.unsubscribe();
    }
}

impl<T, E> Observer<T, E> for ChannelObserver<T, E>
where
    T: Send,
    E: Send,
{
    fn on_value(&mut self, value: T) {
        self.forward_value(value);
    }

    fn on_error(&mut self, error: E) {
        self.finished.store(true, Ordering::Release);
        self.forward(Notification::Error(error));
    }

    fn on_complete(&mut self) {
        self.finished.store(true, Ordering::Release);
        self.forward(Notification::Complete);
    }
}

/// Handle that receives a stream's signals through a bounded channel.
///
/// Up to `buffer_size` values are held. When a value arrives with the buffer
/// full, the collector unsubscribes and the receiver sees
/// `Dropped { reason: BufferOverflow }` as its last notification. A terminal
/// `Error` or `Complete` is always delivered, even with a full buffer.
///
/// Dropping the collector unsubscribes from the source.
pub struct Collector<T, E> {
    subscription: Subscription,
    receiver: Receiver<Notification<T, E>>,
}

impl<T, E> Collector<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Subscribe to `source` and buffer its signals.
    pub fn subscribe<S>(source: S, config: CollectorConfig) -> Self
    where
        S: Observable<Item = T, Error = E>,
    {
        // At least one slot for values.
        let capacity = config.buffer_size.max(1);
        let (sender, receiver) = bounded(capacity + 1);
        let subscription = Subscription::new();
        let finished = Arc::new(AtomicBool::new(false));

        // Tell the receiver when it is cut off before the stream ended.
        let notify = sender.clone();
        let cut_off = finished.clone();
        subscription.add_teardown(move || {
            if !cut_off.load(Ordering::Acquire) {
                let _ = notify.try_send(Notification::Dropped {
                    reason: DropReason::Unsubscribed,
                });
            }
        });

        let observer = ChannelObserver {
            sender,
            capacity,
            subscription: subscription.clone(),
            finished,
        };
        source.subscribe_with(Subscriber::new(Box::new(observer), subscription.clone()));

        Self {
            subscription,
            receiver,
        }
    }
}

impl<T, E> Collector<T, E> {
    pub fn id(&self) -> SubscriptionId {
        self.subscription.id()
    }

    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    /// Stop receiving and release the source.
    pub fn unsubscribe(&self) {
        self.subscription.unsubscribe();
    }

    /// Receive the next notification (blocking).
    pub fn recv(&self) -> Result<Notification<T, E>> {
        self.receiver.recv().map_err(|_| StreamError::Disconnected)
    }

    /// Receive a notification if one is buffered (non-blocking).
    pub fn try_recv(&self) -> Result<Option<Notification<T, E>>> {
        match self.receiver.try_recv() {
            Ok(notification) => Ok(Some(notification)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(StreamError::Disconnected),
        }
    }

    /// Receive with timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Notification<T, E>> {
        self.receiver.recv_timeout(timeout).map_err(|err| match err {
            RecvTimeoutError::Timeout => StreamError::Timeout {
                duration_ms: timeout.as_millis().min(u128::from(u64::MAX)) as u64,
            },
            RecvTimeoutError::Disconnected => StreamError::Disconnected,
        })
    }

    /// Everything buffered right now, without blocking.
    pub fn drain(&self) -> Vec<Notification<T, E>> {
        self.receiver.try_iter().collect()
    }
}

impl<T, E> Drop for Collector<T, E> {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{from_iter, Subject};

    #[test]
    fn test_drop_slow_collector() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        // Small buffer
        let subject: Subject<u32, ()> = Subject::new();
        let collector = Collector::subscribe(
            subject.observable(),
            CollectorConfig { buffer_size: 2 },
        );

        // Flood with values
        for i in 0..10 {
            subject.next(i).unwrap();
        }

        // Collector should be dropped
        assert_eq!(subject.subscriber_count(), 0);
        assert!(collector.subscription().is_closed());
        assert_eq!(
            collector.drain(),
            vec![
                Notification::Value(0),
                Notification::Value(1),
                Notification::Dropped {
                    reason: DropReason::BufferOverflow
                },
            ]
        );
    }

    #[test]
    fn test_terminal_fits_in_full_buffer() {
        let subject: Subject<u32, String> = Subject::new();
        let completed = Collector::subscribe(subject.observable(), CollectorConfig { buffer_size: 2 });
        subject.next(0).unwrap();
        subject.next(1).unwrap();
        subject.complete().unwrap();

        assert_eq!(
            completed.drain(),
            vec![Notification::Value(0), Notification::Value(1), Notification::Complete]
        );

        let failing: Subject<u32, String> = Subject::new();
        let failed = Collector::subscribe(failing.observable(), CollectorConfig { buffer_size: 1 });
        failing.next(0).unwrap();
        failing.error("down".to_string()).unwrap();

        assert_eq!(
            failed.drain(),
            vec![Notification::Value(0), Notification::Error("down".to_string())]
        );
    }

    #[test]
    fn test_overflow_stops_cold_source() {
        let collector = Collector::subscribe(
            from_iter::<_, ()>(0..1_000_000u32),
            CollectorConfig { buffer_size: 4 },
        );
        assert!(collector.subscription().is_closed());

        let notifications = collector.drain();
        assert_eq!(notifications.len(), 5);
        assert_eq!(
            notifications.last(),
            Some(&Notification::Dropped {
                reason: DropReason::BufferOverflow
            })
        );
    }

    #[test]
    fn test_recv_timeout_without_values() {
        let subject: Subject<u32, ()> = Subject::new();
        let collector = Collector::subscribe(subject.observable(), CollectorConfig::default());

        let result = collector.recv_timeout(Duration::from_millis(20));
        assert!(matches!(result, Err(StreamError::Timeout { duration_ms: 20 })));
        assert!(matches!(collector.try_recv(), Ok(None)));
    }

    #[test]
    fn test_receives_across_threads() {
        let subject: Subject<u32, ()> = Subject::new();
        let collector = Collector::subscribe(subject.observable(), CollectorConfig::default());

        let producer = subject.clone();
        let handle = std::thread::spawn(move || {
            for i in 0..3 {
                producer.next(i).unwrap();
            }
            producer.complete().unwrap();
        });

        let mut received = Vec::new();
        loop {
            match collector.recv_timeout(Duration::from_secs(5)).unwrap() {
                Notification::Value(v) => received.push(v),
                Notification::Complete => break,
                other => panic!("Expected value or completion, got {:?}", other),
            }
        }
        handle.join().unwrap();

        assert_eq!(received, vec![0, 1, 2]);
    }

    #[test]
    fn test_unsubscribe_sends_dropped() {
        let subject: Subject<u32, ()> = Subject::new();
        let collector = Collector::subscribe(subject.observable(), CollectorConfig::default());

        subject.next(7).unwrap();
        collector.unsubscribe();
        collector.unsubscribe();
        assert!(matches!(subject.next(8), Ok(())));

        assert_eq!(
            collector.drain(),
            vec![
                Notification::Value(7),
                Notification::Dropped {
                    reason: DropReason::Unsubscribed
                },
            ]
        );
    }

    #[test]
    fn test_no_dropped_after_completion() {
        let collector = Collector::subscribe(from_iter::<_, ()>(vec![1u32]), CollectorConfig::default());
        collector.unsubscribe();
        assert_eq!(
            collector.drain(),
            vec![Notification::Value(1), Notification::Complete]
        );
    }

    #[test]
    fn test_dropping_collector_unsubscribes() {
        let subject: Subject<u32, ()> = Subject::new();
        let collector = Collector::subscribe(subject.observable(), CollectorConfig::default());
        assert_eq!(subject.subscriber_count(), 1);

        drop(collector);
        assert_eq!(subject.subscriber_count(), 0);
    }
}
