//! Observers and the subscriber wrapper sources push into.

use super::subscription::Subscription;

/// Receiver of the three stream signals.
pub trait Observer<T, E>: Send {
    fn on_value(&mut self, value: T);
    fn on_error(&mut self, error: E);
    fn on_complete(&mut self);
}

impl<T, E, O> Observer<T, E> for Box<O>
where
    O: Observer<T, E> + ?Sized,
{
    fn on_value(&mut self, value: T) {
        (**self).on_value(value)
    }

    fn on_error(&mut self, error: E) {
        (**self).on_error(error)
    }

    fn on_complete(&mut self) {
        (**self).on_complete()
    }
}

/// Observer built from three closures.
pub struct FnObserver<V, Er, C> {
    on_value: V,
    on_error: Er,
    on_complete: C,
}

impl<V, Er, C> FnObserver<V, Er, C> {
    pub fn new(on_value: V, on_error: Er, on_complete: C) -> Self {
        Self {
            on_value,
            on_error,
            on_complete,
        }
    }
}

impl<T, E, V, Er, C> Observer<T, E> for FnObserver<V, Er, C>
where
    V: FnMut(T) + Send,
    Er: FnMut(E) + Send,
    C: FnMut() + Send,
{
    fn on_value(&mut self, value: T) {
        (self.on_value)(value)
    }

    fn on_error(&mut self, error: E) {
        (self.on_error)(error)
    }

    fn on_complete(&mut self) {
        (self.on_complete)()
    }
}

/// The sink end of a subscription, handed to a source.
///
/// Enforces the signal grammar: values only while open, at most one terminal
/// signal, and the subscription is released right after the terminal signal.
pub struct Subscriber<T, E> {
    observer: Box<dyn Observer<T, E>>,
    subscription: Subscription,
    stopped: bool,
}

impl<T, E> Subscriber<T, E> {
    pub fn new(observer: Box<dyn Observer<T, E>>, subscription: Subscription) -> Self {
        Self {
            observer,
            subscription,
            stopped: false,
        }
    }

    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    /// True once a terminal signal was delivered or the subscription closed.
    pub fn is_closed(&self) -> bool {
        self.stopped || self.subscription.is_closed()
    }

    /// Split into the raw observer and the shared subscription.
    ///
    /// Stages use this to wrap the observer and rebuild a subscriber around the
    /// same subscription for their source.
    pub fn into_parts(self) -> (Box<dyn Observer<T, E>>, Subscription) {
        (self.observer, self.subscription)
    }

    pub fn next(&mut self, value: T) {
        if self.is_closed() {
            return;
        }
        self.observer.on_value(value);
    }

    pub fn error(&mut self, error: E) {
        if self.is_closed() {
            return;
        }
        self.stopped = true;
        self.observer.on_error(error);
        self.subscription.unsubscribe();
    }

    pub fn complete(&mut self) {
        if self.is_closed() {
            return;
        }
        self.stopped = true;
        self.observer.on_complete();
        self.subscription.unsubscribe();
    }
}
