//! The push-stream abstraction and stage composition.

use super::observer::{FnObserver, Observer, Subscriber};
use super::subscription::Subscription;

/// A push-based stream of values that ends with at most one terminal signal.
///
/// Observables are consumed by `subscribe`; sources that can be subscribed to
/// more than once (such as [`SubjectObservable`](super::SubjectObservable))
/// are cheap to clone.
pub trait Observable: Sized {
    type Item: Send + 'static;
    type Error: Send + 'static;

    /// Start pushing into `subscriber`.
    ///
    /// Anything the source acquires for this subscription must be released
    /// through `subscriber.subscription().add_teardown`.
    fn subscribe_with(self, subscriber: Subscriber<Self::Item, Self::Error>);

    /// Subscribe an observer and return the handle that cancels it.
    fn subscribe<O>(self, observer: O) -> Subscription
    where
        O: Observer<Self::Item, Self::Error> + 'static,
    {
        let subscription = Subscription::new();
        self.subscribe_with(Subscriber::new(Box::new(observer), subscription.clone()));
        subscription
    }

    /// Subscribe with one closure per signal.
    fn subscribe_fn<V, Er, C>(self, on_value: V, on_error: Er, on_complete: C) -> Subscription
    where
        V: FnMut(Self::Item) + Send + 'static,
        Er: FnMut(Self::Error) + Send + 'static,
        C: FnMut() + Send + 'static,
    {
        self.subscribe(FnObserver::new(on_value, on_error, on_complete))
    }

    /// Chain a stage onto this stream.
    fn pipe<Op>(self, stage: &Op) -> Op::Output
    where
        Op: Operator<Self>,
    {
        stage.apply(self)
    }
}

/// A reusable transformation from one stream to another.
///
/// Stages hold only their configuration. `apply` takes `&self` so one stage can
/// be applied to any number of sources; each application is independent.
pub trait Operator<S: Observable> {
    type Output: Observable;

    fn apply(&self, source: S) -> Self::Output;
}
