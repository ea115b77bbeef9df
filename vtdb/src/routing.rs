//! Shard routing hints carried alongside a statement

use crate::value::Value;

/// Which shard(s) a statement should target.
///
/// `key` names a single shard, `keys` several. Either, both, or neither may
/// be set; the connection decides what a combination means.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoutingHints {
    pub key: Option<Value>,
    pub keys: Option<Vec<Value>>,
}

impl RoutingHints {
    /// No routing information.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(key: Option<Value>, keys: Option<Vec<Value>>) -> Self {
        Self { key, keys }
    }

    /// Target the shard owning `key`.
    pub fn key(key: impl Into<Value>) -> Self {
        Self {
            key: Some(key.into()),
            keys: None,
        }
    }

    /// Target the shards owning `keys`.
    pub fn keys<I, V>(keys: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            key: None,
            keys: Some(keys.into_iter().map(Into::into).collect()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_none() && self.keys.is_none()
    }
}
