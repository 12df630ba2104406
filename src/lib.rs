//! # Tag Stream
//!
//! Tag-discriminated filtering for push-based event streams, with the element
//! type of the filtered stream narrowed to exactly the variants that pass.
//!
//! ## Core Concepts
//!
//! - **Event unions**: Rust enums whose variants each wrap a payload struct,
//!   declared with [`tagged_union!`]
//! - **Streams**: push-based [`Observable`]s with value, error and completion
//!   signals, composed with `pipe`
//! - **Stages**: reusable, stateless stream transformations ([`Operator`])
//! - **Narrowing**: [`of_type!`] keeps 1 to 4 variants and retypes the result;
//!   [`of_tags`] keeps any runtime set without retyping
//!
//! ## Example
//!
//! ```ignore
//! use tagstream::actions::{Action, Add, Subtract};
//! use tagstream::{from_iter, of_type, Observable};
//!
//! let events = vec![
//!     Action::Add(Add { amount: 1 }),
//!     Action::Subtract(Subtract { amount: 2 }),
//!     Action::Add(Add { amount: 3 }),
//! ];
//!
//! // Item type is `Add`: only the add actions arrive.
//! from_iter::<_, ()>(events)
//!     .pipe(&of_type!(Add))
//!     .subscribe_fn(|add: Add| println!("+{}", add.amount), |_| {}, || {});
//! ```

#[macro_use]
mod macros;

pub mod actions;
pub mod error;
pub mod filter;
pub mod stream;
pub mod tag;

// Re-exports
pub use error::{Result, StreamError};
pub use filter::{
    of_tags, of_type, OfTags, OfTagsStream, OfType, OfTypeStream, TagFilterConfig,
    UnknownTagPolicy,
};
pub use stream::{
    empty, from_iter, from_results, never, throw, Collector, CollectorConfig, DropReason,
    FnObserver, Notification, Observable, Observer, Operator, Subject, SubjectObservable,
    Subscriber, Subscription, SubscriptionId,
};
pub use tag::{Narrowed, OneOf2, OneOf3, OneOf4, TagOf, Tagged, Variant, VariantSet};

#[doc(hidden)]
pub mod __private {
    pub use serde;
}
