//! Generic predicate stage.

use super::observable::{Observable, Operator};
use super::observer::{Observer, Subscriber};

/// A side-effect-free test over stream values.
pub trait Predicate<T>: Clone + Send + 'static {
    fn test(&self, value: &T) -> bool;
}

impl<T, F> Predicate<T> for F
where
    F: Fn(&T) -> bool + Clone + Send + 'static,
{
    fn test(&self, value: &T) -> bool {
        self(value)
    }
}

/// Stage that forwards only values accepted by its predicate.
///
/// Values are moved through unchanged and in order. Errors and completion pass
/// through untouched.
#[derive(Clone, Debug)]
pub struct Filter<P> {
    predicate: P,
}

/// Build a [`Filter`] stage.
pub fn filter<P>(predicate: P) -> Filter<P> {
    Filter { predicate }
}

impl<S, P> Operator<S> for Filter<P>
where
    S: Observable,
    P: Predicate<S::Item>,
{
    type Output = Filtered<S, P>;

    fn apply(&self, source: S) -> Filtered<S, P> {
        Filtered::new(source, self.predicate.clone())
    }
}

/// Result stream of a [`Filter`] stage.
pub struct Filtered<S, P> {
    source: S,
    predicate: P,
}

impl<S, P> Filtered<S, P> {
    pub(crate) fn new(source: S, predicate: P) -> Self {
        Self { source, predicate }
    }
}

impl<S, P> Observable for Filtered<S, P>
where
    S: Observable,
    P: Predicate<S::Item>,
{
    type Item = S::Item;
    type Error = S::Error;

    fn subscribe_with(self, subscriber: Subscriber<S::Item, S::Error>) {
        let (downstream, subscription) = subscriber.into_parts();
        let observer = FilterObserver {
            downstream,
            predicate: self.predicate,
        };
        self.source
            .subscribe_with(Subscriber::new(Box::new(observer), subscription));
    }
}

struct FilterObserver<T, E, P> {
    downstream: Box<dyn Observer<T, E>>,
    predicate: P,
}

impl<T, E, P> Observer<T, E> for FilterObserver<T, E, P>
where
    P: Predicate<T>,
{
    fn on_value(&mut self, value: T) {
        if self.predicate.test(&value) {
            self.downstream.on_value(value);
        }
    }

    fn on_error(&mut self, error: E) {
        self.downstream.on_error(error);
    }

    fn on_complete(&mut self) {
        self.downstream.on_complete();
    }
}
