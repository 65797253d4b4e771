//! Geotagged posts, the items held by a geospatial store.

use crate::geo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hexadecimal post identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    /// Accepts a non-empty string of ASCII hex digits.
    ///
    /// ```
    /// use geosample_types::post::PostId;
    ///
    /// assert!(PostId::parse("deadbeef").is_some());
    /// assert!(PostId::parse("valid_ids_may_only_be_hex_numbers").is_none());
    /// assert!(PostId::parse("").is_none());
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self(raw.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to the user owning a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

/// Descriptive fields of a post.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PostProperties {
    pub message: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub relevance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRef>,
}

impl PostProperties {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_relevance(mut self, relevance: f64) -> Self {
        self.relevance = relevance;
        self
    }

    pub fn with_user(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.user = Some(UserRef {
            id: id.into(),
            name: name.into(),
        });
        self
    }
}

/// A stored post.
///
/// `sequence` is assigned by the store on insertion and only ever grows, so
/// a larger value means a more recent post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub geometry: Point,
    pub properties: PostProperties,
    pub sequence: u64,
}
