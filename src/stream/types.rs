//! Shared types for subscriptions and channel-backed sinks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a channel-backed subscription was dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// One signal observed on a stream, as delivered through a channel.
#[derive(Clone, Debug, PartialEq)]
pub enum Notification<T, E> {
    /// A value was pushed.
    Value(T),
    /// The stream failed.
    Error(E),
    /// The stream completed.
    Complete,
    /// The channel subscription was dropped before the stream ended.
    Dropped { reason: DropReason },
}

impl<T, E> Notification<T, E> {
    /// True for every signal after which nothing else arrives.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Notification::Value(_))
    }

    /// The pushed value, if this is a value notification.
    pub fn into_value(self) -> Option<T> {
        match self {
            Notification::Value(value) => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_notifications() {
        assert!(!Notification::<u8, ()>::Value(1).is_terminal());
        assert!(Notification::<u8, ()>::Complete.is_terminal());
        assert!(Notification::<u8, ()>::Error(()).is_terminal());
        assert!(Notification::<u8, ()>::Dropped {
            reason: DropReason::BufferOverflow
        }
        .is_terminal());
    }

    #[test]
    fn test_drop_reason_serializes_snake_case() {
        let json = serde_json::to_string(&DropReason::BufferOverflow).unwrap();
        assert_eq!(json, "\"buffer_overflow\"");
    }
}
