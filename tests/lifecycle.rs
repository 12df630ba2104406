//! Identity, cancellation and resource release through filter stages.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tagstream::{
    from_iter, of_type, tagged_union, Collector, CollectorConfig, Notification, Observable,
    OneOf2, Subject, Subscriber,
};

// Payloads that cannot be cloned: anything reaching the sink was moved there.

#[derive(Debug)]
pub struct Deposit {
    pub cents: Box<u64>,
}

#[derive(Debug)]
pub struct Withdrawal {
    pub cents: Box<u64>,
}

#[derive(Debug)]
pub struct Audit {
    pub note: String,
}

tagged_union! {
    #[derive(Debug)]
    pub enum Ledger: LedgerKind {
        Deposit = "deposit",
        Withdrawal = "withdrawal",
        Audit = "audit",
    }
}

/// Source that counts how often its resources were acquired and released.
struct CountingSource {
    events: Vec<Ledger>,
    acquired: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

impl Observable for CountingSource {
    type Item = Ledger;
    type Error = String;

    fn subscribe_with(self, mut subscriber: Subscriber<Ledger, String>) {
        self.acquired.fetch_add(1, Ordering::SeqCst);
        let released = self.released.clone();
        subscriber
            .subscription()
            .add_teardown(move || {
                released.fetch_add(1, Ordering::SeqCst);
            });

        for event in self.events {
            if subscriber.is_closed() {
                return;
            }
            subscriber.next(event);
        }
        subscriber.complete();
    }
}

fn counting(events: Vec<Ledger>) -> (CountingSource, Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let acquired = Arc::new(AtomicUsize::new(0));
    let released = Arc::new(AtomicUsize::new(0));
    let source = CountingSource {
        events,
        acquired: acquired.clone(),
        released: released.clone(),
    };
    (source, acquired, released)
}

#[test]
fn test_events_are_moved_not_copied() {
    let deposit = Deposit { cents: Box::new(500) };
    let withdrawal = Withdrawal { cents: Box::new(200) };
    let deposit_addr = &*deposit.cents as *const u64;
    let withdrawal_addr = &*withdrawal.cents as *const u64;

    let events = vec![
        Ledger::Audit(Audit { note: "open".to_string() }),
        Ledger::Deposit(deposit),
        Ledger::Withdrawal(withdrawal),
    ];

    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    from_iter::<_, String>(events)
        .pipe(&of_type!(Deposit, Withdrawal))
        .subscribe_fn(move |event| sink.lock().push(event), |_| {}, || {});

    let received = received.lock();
    assert_eq!(received.len(), 2);
    match &received[0] {
        OneOf2::First(deposit) => assert_eq!(&*deposit.cents as *const u64, deposit_addr),
        other => panic!("Expected deposit, got {:?}", other),
    }
    match &received[1] {
        OneOf2::Second(withdrawal) => {
            assert_eq!(&*withdrawal.cents as *const u64, withdrawal_addr)
        }
        other => panic!("Expected withdrawal, got {:?}", other),
    }
}

#[test]
fn test_completion_releases_source_once() {
    let (source, acquired, released) = counting(vec![
        Ledger::Audit(Audit { note: "a".to_string() }),
        Ledger::Deposit(Deposit { cents: Box::new(1) }),
    ]);

    let subscription = source
        .pipe(&of_type!(Deposit))
        .subscribe_fn(|_| {}, |_| {}, || {});

    assert!(subscription.is_closed());
    subscription.unsubscribe();

    assert_eq!(acquired.load(Ordering::SeqCst), 1);
    assert_eq!(released.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unsubscribe_from_sink_stops_source() {
    let events = (0..100)
        .map(|i| Ledger::Deposit(Deposit { cents: Box::new(i) }))
        .collect();
    let (source, _acquired, released) = counting(events);

    let seen = Arc::new(AtomicUsize::new(0));
    let slot: Arc<Mutex<Option<tagstream::Subscription>>> = Arc::new(Mutex::new(None));

    // Unsubscribe from inside the observer after the third deposit.
    let (count, handle) = (seen.clone(), slot.clone());
    let stage = of_type!(Deposit);
    let subscription = tagstream::Subscription::new();
    *slot.lock() = Some(subscription.clone());
    source.pipe(&stage).subscribe_with(Subscriber::new(
        Box::new(tagstream::FnObserver::new(
            move |_deposit: Deposit| {
                if count.fetch_add(1, Ordering::SeqCst) + 1 == 3 {
                    if let Some(subscription) = handle.lock().as_ref() {
                        subscription.unsubscribe();
                    }
                }
            },
            |_: String| {},
            || {},
        )),
        subscription.clone(),
    ));

    assert_eq!(seen.load(Ordering::SeqCst), 3);
    assert_eq!(released.load(Ordering::SeqCst), 1);
    assert!(subscription.is_closed());
}

#[test]
fn test_unsubscribing_result_releases_subject_slot() {
    let subject: Subject<Arc<Ledger>, String> = Subject::new();
    let stage = tagstream::of_tags([LedgerKind::Audit]).unwrap();

    let collector = Collector::subscribe(subject.observable().pipe(&stage), CollectorConfig::default());
    assert_eq!(subject.subscriber_count(), 1);

    subject
        .next(Arc::new(Ledger::Audit(Audit { note: "x".to_string() })))
        .unwrap();
    collector.unsubscribe();
    collector.unsubscribe();
    assert_eq!(subject.subscriber_count(), 0);

    subject
        .next(Arc::new(Ledger::Audit(Audit { note: "y".to_string() })))
        .unwrap();

    let received: Vec<_> = collector
        .drain()
        .into_iter()
        .filter_map(Notification::into_value)
        .collect();
    assert_eq!(received.len(), 1);
}

#[test]
fn test_filtering_across_threads() {
    let subject: Subject<Arc<Ledger>, String> = Subject::new();
    let stage = tagstream::of_tags([LedgerKind::Withdrawal]).unwrap();
    let collector = Collector::subscribe(subject.observable().pipe(&stage), CollectorConfig::default());

    let events: Vec<Arc<Ledger>> = (0..10u64)
        .map(|i| {
            Arc::new(if i % 2 == 0 {
                Ledger::Deposit(Deposit { cents: Box::new(i) })
            } else {
                Ledger::Withdrawal(Withdrawal { cents: Box::new(i) })
            })
        })
        .collect();
    let expected: Vec<Arc<Ledger>> = events.iter().skip(1).step_by(2).cloned().collect();

    let producer = subject.clone();
    let handle = std::thread::spawn(move || {
        for event in events {
            producer.next(event).unwrap();
        }
        producer.complete().unwrap();
    });

    let mut received = Vec::new();
    loop {
        match collector.recv_timeout(Duration::from_secs(5)).unwrap() {
            Notification::Value(event) => received.push(event),
            Notification::Complete => break,
            other => panic!("Expected value or completion, got {:?}", other),
        }
    }
    handle.join().unwrap();

    assert_eq!(received.len(), expected.len());
    for (got, want) in received.iter().zip(&expected) {
        assert!(Arc::ptr_eq(got, want));
    }
}
