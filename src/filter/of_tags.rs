//! Runtime tag filter for tag sets of any size.
//!
//! Unlike [`OfType`](super::OfType), this stage does not narrow: its result
//! carries the same element type as its source. Use it when the set has more
//! than four members, is only known at runtime, or when the stream carries
//! shared events (`Arc<U>`, `&U`) that must keep their identity.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::error::{Result, StreamError};
use crate::stream::{Filtered, Observable, Operator, Predicate};
use crate::tag::Tagged;

/// Membership test over an event's tag.
pub struct TagPredicate<K> {
    tags: Arc<HashSet<K>>,
}

impl<K> Clone for TagPredicate<K> {
    fn clone(&self) -> Self {
        Self {
            tags: self.tags.clone(),
        }
    }
}

impl<T, K> Predicate<T> for TagPredicate<K>
where
    T: Tagged<Tag = K>,
    K: Eq + Hash + Send + Sync + 'static,
{
    fn test(&self, value: &T) -> bool {
        self.tags.contains(&value.tag())
    }
}

/// Stage that keeps events whose tag is in a runtime set.
#[derive(Clone)]
pub struct OfTags<K> {
    predicate: TagPredicate<K>,
}

/// Result stream of an [`OfTags`] stage.
pub type OfTagsStream<S, K> = Filtered<S, TagPredicate<K>>;

/// Build an [`OfTags`] stage. Fails with [`StreamError::EmptyTagSet`] when
/// `tags` is empty.
pub fn of_tags<K, I>(tags: I) -> Result<OfTags<K>>
where
    K: Eq + Hash,
    I: IntoIterator<Item = K>,
{
    OfTags::new(tags)
}

impl<K: Eq + Hash> OfTags<K> {
    pub fn new<I>(tags: I) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
    {
        let tags: HashSet<K> = tags.into_iter().collect();
        if tags.is_empty() {
            return Err(StreamError::EmptyTagSet);
        }
        Ok(Self::from_set(tags))
    }

    /// Build without the non-empty check. An empty set never matches.
    pub(crate) fn from_set(tags: HashSet<K>) -> Self {
        Self {
            predicate: TagPredicate {
                tags: Arc::new(tags),
            },
        }
    }

    pub fn accepts(&self, tag: &K) -> bool {
        self.predicate.tags.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.predicate.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicate.tags.is_empty()
    }
}

impl<K: fmt::Debug> fmt::Debug for OfTags<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OfTags")
            .field("tags", &self.predicate.tags)
            .finish()
    }
}

impl<S, K> Operator<S> for OfTags<K>
where
    S: Observable,
    S::Item: Tagged<Tag = K>,
    K: Eq + Hash + Send + Sync + 'static,
{
    type Output = OfTagsStream<S, K>;

    fn apply(&self, source: S) -> OfTagsStream<S, K> {
        Filtered::new(source, self.predicate.clone())
    }
}
