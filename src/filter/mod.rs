//! Tag filter stages.
//!
//! Two ways to keep only some variants of an event union:
//! - [`OfType`]: the tag set is a tuple of 1 to 4 variant types. The result
//!   stream's element type is narrowed to exactly those variants
//!   (`Add`, `OneOf2<Add, Subtract>`, ...). Built with [`of_type`] or the
//!   [`of_type!`](crate::of_type) macro.
//! - [`OfTags`]: the tag set is a runtime collection of any size. The result
//!   keeps the source's element type. Built with [`of_tags`] or from a
//!   [`TagFilterConfig`].
//!
//! Both stages are stateless once built, move events through without cloning,
//! preserve order, and pass errors and completion through unchanged.
//!
//! Passing a tag the union does not define is a compile error for `OfType`.
//! For `OfTags` built from configuration, an unknown tag name is rejected by
//! default or, with [`UnknownTagPolicy::Ignore`], never matches.
//!
//! # Example
//!
//! ```ignore
//! let adds = actions.pipe(&of_type!(Add));            // Observable<Item = Add>
//! let math = actions.pipe(&of_type!(Add, Multiply));  // Item = OneOf2<Add, Multiply>
//!
//! let config = TagFilterConfig::from_json(r#"{"tags": ["add", "subtract"]}"#)?;
//! let dynamic = actions.pipe(&config.build::<ActionType>()?); // Item = Action
//! ```

mod config;
mod of_tags;
mod of_type;

pub use config::{TagFilterConfig, UnknownTagPolicy};
pub use of_tags::{of_tags, OfTags, OfTagsStream, TagPredicate};
pub use of_type::{of_type, OfType, OfTypeStream};
