//! Cold sources that push synchronously on subscribe.

use std::marker::PhantomData;

use super::observable::Observable;
use super::observer::Subscriber;

/// Pushes every item of an iterator, then completes.
pub struct FromIter<I, E> {
    iter: I,
    _error: PhantomData<fn() -> E>,
}

/// Stream over the items of `iter`.
pub fn from_iter<I, E>(iter: I) -> FromIter<I::IntoIter, E>
where
    I: IntoIterator,
{
    FromIter {
        iter: iter.into_iter(),
        _error: PhantomData,
    }
}

impl<I, E> Observable for FromIter<I, E>
where
    I: Iterator,
    I::Item: Send + 'static,
    E: Send + 'static,
{
    type Item = I::Item;
    type Error = E;

    fn subscribe_with(self, mut subscriber: Subscriber<I::Item, E>) {
        for value in self.iter {
            if subscriber.is_closed() {
                tracing::trace!(
                    subscription = %subscriber.subscription().id(),
                    "source stopped early"
                );
                return;
            }
            subscriber.next(value);
        }
        subscriber.complete();
    }
}

/// Pushes `Ok` items as values; the first `Err` ends the stream with an error.
pub struct FromResults<I> {
    iter: I,
}

/// Stream over `Result` items, failing on the first error.
pub fn from_results<I, T, E>(iter: I) -> FromResults<I::IntoIter>
where
    I: IntoIterator<Item = std::result::Result<T, E>>,
{
    FromResults {
        iter: iter.into_iter(),
    }
}

impl<I, T, E> Observable for FromResults<I>
where
    I: Iterator<Item = std::result::Result<T, E>>,
    T: Send + 'static,
    E: Send + 'static,
{
    type Item = T;
    type Error = E;

    fn subscribe_with(self, mut subscriber: Subscriber<T, E>) {
        for item in self.iter {
            if subscriber.is_closed() {
                return;
            }
            match item {
                Ok(value) => subscriber.next(value),
                Err(error) => {
                    subscriber.error(error);
                    return;
                }
            }
        }
        subscriber.complete();
    }
}

/// Completes immediately.
pub struct Empty<T, E> {
    _types: PhantomData<fn() -> (T, E)>,
}

pub fn empty<T, E>() -> Empty<T, E> {
    Empty {
        _types: PhantomData,
    }
}

impl<T, E> Observable for Empty<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    type Item = T;
    type Error = E;

    fn subscribe_with(self, mut subscriber: Subscriber<T, E>) {
        subscriber.complete();
    }
}

/// Never emits and never terminates.
pub struct Never<T, E> {
    _types: PhantomData<fn() -> (T, E)>,
}

pub fn never<T, E>() -> Never<T, E> {
    Never {
        _types: PhantomData,
    }
}

impl<T, E> Observable for Never<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    type Item = T;
    type Error = E;

    fn subscribe_with(self, _subscriber: Subscriber<T, E>) {}
}

/// Fails immediately with the given error.
pub struct Throw<T, E> {
    error: E,
    _item: PhantomData<fn() -> T>,
}

pub fn throw<T, E>(error: E) -> Throw<T, E> {
    Throw {
        error,
        _item: PhantomData,
    }
}

impl<T, E> Observable for Throw<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    type Item = T;
    type Error = E;

    fn subscribe_with(self, mut subscriber: Subscriber<T, E>) {
        subscriber.error(self.error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{Collector, CollectorConfig, Notification};

    #[test]
    fn test_from_iter_pushes_then_completes() {
        let collector = Collector::subscribe(
            from_iter::<_, ()>(vec![1, 2, 3]),
            CollectorConfig::default(),
        );
        assert_eq!(
            collector.drain(),
            vec![
                Notification::Value(1),
                Notification::Value(2),
                Notification::Value(3),
                Notification::Complete,
            ]
        );
    }

    #[test]
    fn test_from_results_stops_at_first_error() {
        let items: Vec<Result<u8, &'static str>> = vec![Ok(1), Err("bad"), Ok(2)];
        let collector = Collector::subscribe(from_results(items), CollectorConfig::default());
        assert_eq!(
            collector.drain(),
            vec![Notification::Value(1), Notification::Error("bad")]
        );
    }

    #[test]
    fn test_empty_never_throw() {
        let collector = Collector::subscribe(empty::<u8, ()>(), CollectorConfig::default());
        assert_eq!(collector.drain(), vec![Notification::Complete]);

        let collector = Collector::subscribe(never::<u8, ()>(), CollectorConfig::default());
        assert!(collector.drain().is_empty());
        assert!(!collector.subscription().is_closed());

        let collector = Collector::subscribe(throw::<u8, _>("nope"), CollectorConfig::default());
        assert_eq!(collector.drain(), vec![Notification::Error("nope")]);
    }
}
