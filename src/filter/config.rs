//! Tag filters built from configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use crate::error::{Result, StreamError};

use super::of_tags::OfTags;

/// What to do with a configured tag that the union does not define.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownTagPolicy {
    /// Fail the build with [`StreamError::UnknownTag`].
    #[default]
    Reject,
    /// Log a warning and treat the tag as never matching.
    Ignore,
}

/// Configuration for a runtime tag filter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagFilterConfig {
    /// Tag names to accept. Must not be empty.
    pub tags: Vec<String>,

    /// Handling of names that do not parse as a tag.
    /// Default: reject
    pub unknown_tags: UnknownTagPolicy,
}

impl TagFilterConfig {
    pub fn new<I, T>(tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            unknown_tags: UnknownTagPolicy::default(),
        }
    }

    /// Parse a config from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the stage for tag type `K`.
    ///
    /// With [`UnknownTagPolicy::Ignore`] the stage may end up accepting
    /// nothing; its result stream then never emits a value.
    pub fn build<K>(&self) -> Result<OfTags<K>>
    where
        K: FromStr + Eq + Hash + fmt::Debug,
    {
        if self.tags.is_empty() {
            return Err(StreamError::EmptyTagSet);
        }

        let mut tags = HashSet::with_capacity(self.tags.len());
        for name in &self.tags {
            match name.parse::<K>() {
                Ok(tag) => {
                    tags.insert(tag);
                }
                Err(_) => match self.unknown_tags {
                    UnknownTagPolicy::Reject => return Err(StreamError::UnknownTag(name.clone())),
                    UnknownTagPolicy::Ignore => {
                        tracing::warn!(tag = %name, "ignoring unknown tag, it will never match");
                    }
                },
            }
        }

        if tags.is_empty() {
            tracing::warn!(configured = ?self.tags, "no configured tag is known, filter accepts nothing");
        }
        tracing::debug!(tags = ?tags, "built tag filter");

        Ok(OfTags::from_set(tags))
    }
}
