//! Strongly-typed identifiers for Quizbank entities.
//!
//! All identifiers are store-assigned integers. The value `0` is the sentinel
//! for "not yet persisted": a submission carrying id 0 (or omitting the id
//! field) asks the store to create the record and assign a real identity at
//! commit time.
//!
//! Identifiers are strongly typed so that a question id can never be passed
//! where an answer id is expected.
//!
//! # Example
//!
//! ```rust
//! use quizbank_core::id::{AnswerId, QuestionId};
//!
//! let q = QuestionId::new(7);
//! assert!(q.is_persisted());
//!
//! // IDs are different types - this won't compile:
//! // let wrong: AnswerId = q;
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A unique identifier for a topic.
///
/// Topics are the top-level unit of quiz content, each owning a set of
/// questions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TopicId(i64);

impl TopicId {
    /// The sentinel for a record that has not been persisted yet.
    pub const UNSAVED: Self = Self(0);

    /// Creates a topic ID from a raw integer.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns true when this ID refers to a persisted record.
    ///
    /// Store-assigned identities are strictly positive; `0` means unsaved and
    /// negative values never occur.
    #[must_use]
    pub const fn is_persisted(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TopicId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.parse::<i64>().map(Self).map_err(|e| Error::InvalidId {
            message: format!("invalid topic ID '{s}': {e}"),
        })
    }
}

/// A unique identifier for a question within a topic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct QuestionId(i64);

impl QuestionId {
    /// The sentinel for a record that has not been persisted yet.
    pub const UNSAVED: Self = Self(0);

    /// Creates a question ID from a raw integer.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns true when this ID refers to a persisted record.
    #[must_use]
    pub const fn is_persisted(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QuestionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.parse::<i64>().map(Self).map_err(|e| Error::InvalidId {
            message: format!("invalid question ID '{s}': {e}"),
        })
    }
}

/// A unique identifier for an answer within a question.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AnswerId(i64);

impl AnswerId {
    /// The sentinel for a record that has not been persisted yet.
    pub const UNSAVED: Self = Self(0);

    /// Creates an answer ID from a raw integer.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns true when this ID refers to a persisted record.
    #[must_use]
    pub const fn is_persisted(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for AnswerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AnswerId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.parse::<i64>().map(Self).map_err(|e| Error::InvalidId {
            message: format!("invalid answer ID '{s}': {e}"),
        })
    }
}
