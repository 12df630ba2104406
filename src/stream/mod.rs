//! Minimal push-stream plumbing the filter stages plug into.
//!
//! A stream pushes values to an [`Observer`] and ends with at most one
//! terminal signal (error or completion). This module provides:
//! - [`Observable`] with `subscribe`/`subscribe_fn` and the `pipe` composition
//!   operator, plus the [`Operator`] trait stages implement
//! - [`Subscription`] handles with idempotent, exactly-once release
//! - Cold sources ([`from_iter`], [`from_results`], [`empty`], [`never`],
//!   [`throw`]) and the hot, multicast [`Subject`]
//! - A bounded, channel-backed [`Collector`] sink
//! - The generic [`filter`] stage
//!
//! # Example
//!
//! ```ignore
//! let subject: Subject<u32, String> = Subject::new();
//! let collector = Collector::subscribe(
//!     subject.observable().pipe(&filter(|v: &u32| *v > 10)),
//!     CollectorConfig::default(),
//! );
//!
//! subject.next(5)?;
//! subject.next(50)?;
//! subject.complete()?;
//!
//! loop {
//!     match collector.recv()? {
//!         Notification::Value(v) => println!("Got {}", v),
//!         Notification::Complete => break,
//!         Notification::Error(e) => return Err(e.into()),
//!         Notification::Dropped { reason } => break,
//!     }
//! }
//! ```

mod collector;
mod filter;
mod observable;
mod observer;
mod sources;
mod subject;
mod subscription;
mod types;

pub use collector::{Collector, CollectorConfig};
pub use filter::{filter, Filter, Filtered, Predicate};
pub use observable::{Observable, Operator};
pub use observer::{FnObserver, Observer, Subscriber};
pub use sources::{
    empty, from_iter, from_results, never, throw, Empty, FromIter, FromResults, Never, Throw,
};
pub use subject::{Subject, SubjectObservable};
pub use subscription::Subscription;
pub use types::{DropReason, Notification, SubscriptionId};
