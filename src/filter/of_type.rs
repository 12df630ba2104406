//! Narrowing tag filter for 1 to 4 statically known variants.

use std::fmt;
use std::marker::PhantomData;

use crate::stream::{Observable, Observer, Operator, Subscriber};
use crate::tag::{TagOf, VariantSet};

/// Stage that keeps events whose tag belongs to `S` and retypes them as
/// `S::Narrowed`.
///
/// The stage carries no data: the tag set lives in the type. It is `Copy` and
/// can be applied to any number of sources.
pub struct OfType<S> {
    _set: PhantomData<fn() -> S>,
}

/// Build an [`OfType`] stage for a tuple of variants, e.g.
/// `of_type::<(Add, Subtract)>()`. See also [`of_type!`](crate::of_type).
///
/// ```
/// use tagstream::{of_type, tagged_union};
///
/// pub struct Add;
/// pub struct Subtract;
///
/// tagged_union! {
///     pub enum Action: ActionType {
///         Add = "add",
///         Subtract = "subtract",
///     }
/// }
///
/// let stage = of_type::<(Add, Subtract)>();
/// assert_eq!(stage.tags(), vec![ActionType::Add, ActionType::Subtract]);
/// ```
///
/// Every member must belong to the same union:
///
/// ```compile_fail
/// use tagstream::{of_type, tagged_union};
///
/// pub struct Add;
/// pub struct Ping;
///
/// tagged_union! {
///     pub enum Action: ActionType {
///         Add = "add",
///     }
/// }
///
/// tagged_union! {
///     pub enum Signal: SignalType {
///         Ping = "ping",
///     }
/// }
///
/// let stage = of_type::<(Add, Ping)>();
/// ```
///
/// The set is never empty:
///
/// ```compile_fail
/// use tagstream::of_type;
///
/// let stage = of_type::<()>();
/// ```
///
/// ```compile_fail
/// use tagstream::of_type;
///
/// let stage = of_type!();
/// ```
///
/// Narrowing stops at four members; larger sets go through
/// [`of_tags`](crate::filter::of_tags):
///
/// ```compile_fail
/// use tagstream::{of_type, tagged_union};
///
/// pub struct A;
/// pub struct B;
/// pub struct C;
/// pub struct D;
/// pub struct E;
///
/// tagged_union! {
///     pub enum Letter: LetterType {
///         A = "a",
///         B = "b",
///         C = "c",
///         D = "d",
///         E = "e",
///     }
/// }
///
/// let stage = of_type!(A, B, C, D, E);
/// ```
pub fn of_type<S: VariantSet>() -> OfType<S> {
    OfType { _set: PhantomData }
}

impl<S: VariantSet> OfType<S> {
    /// Tags this stage accepts, in declaration order.
    pub fn tags(&self) -> Vec<TagOf<S::Union>> {
        S::tags()
    }

    pub fn accepts(&self, tag: TagOf<S::Union>) -> bool {
        S::contains(tag)
    }
}

impl<S> Clone for OfType<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for OfType<S> {}

impl<S: VariantSet> fmt::Debug for OfType<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OfType").field("tags", &S::tags()).finish()
    }
}

impl<Src, S> Operator<Src> for OfType<S>
where
    Src: Observable<Item = S::Union>,
    S: VariantSet + 'static,
    S::Narrowed: Send + 'static,
{
    type Output = OfTypeStream<Src, S>;

    fn apply(&self, source: Src) -> OfTypeStream<Src, S> {
        OfTypeStream {
            source,
            _set: PhantomData,
        }
    }
}

/// Result stream of an [`OfType`] stage.
pub struct OfTypeStream<Src, S> {
    source: Src,
    _set: PhantomData<fn() -> S>,
}

impl<Src, S> Observable for OfTypeStream<Src, S>
where
    Src: Observable<Item = S::Union>,
    S: VariantSet + 'static,
    S::Narrowed: Send + 'static,
{
    type Item = S::Narrowed;
    type Error = Src::Error;

    fn subscribe_with(self, subscriber: Subscriber<S::Narrowed, Src::Error>) {
        let (downstream, subscription) = subscriber.into_parts();
        tracing::trace!(
            subscription = %subscription.id(),
            tags = ?S::tags(),
            "narrowing subscription"
        );

        let observer = NarrowObserver::<S, Src::Error> {
            downstream,
            _set: PhantomData,
        };
        self.source
            .subscribe_with(Subscriber::new(Box::new(observer), subscription));
    }
}

struct NarrowObserver<S: VariantSet, E> {
    downstream: Box<dyn Observer<S::Narrowed, E>>,
    _set: PhantomData<fn() -> S>,
}

impl<S, E> Observer<S::Union, E> for NarrowObserver<S, E>
where
    S: VariantSet + 'static,
    S::Narrowed: 'static,
{
    fn on_value(&mut self, event: S::Union) {
        // Out-of-set events come back as `Err` and are dropped here.
        if let Ok(narrowed) = S::narrow(event) {
            self.downstream.on_value(narrowed);
        }
    }

    fn on_error(&mut self, error: E) {
        self.downstream.on_error(error);
    }

    fn on_complete(&mut self) {
        self.downstream.on_complete();
    }
}
