//! Error types for quizbank-content operations.
//!
//! Every variant in this taxonomy is detected before any store mutation; a
//! failed validation or reconciliation never leaves a partially committed
//! tree behind.

use thiserror::Error;

use quizbank_core::{AnswerId, QuestionId};

/// Result type alias for content operations.
pub type Result<T> = std::result::Result<T, ContentError>;

/// Errors that can occur during content operations.
#[derive(Debug, Error)]
pub enum ContentError {
    /// A submitted tree failed shape or length checks.
    #[error("malformed input: {message}")]
    MalformedInput {
        /// Description of the offending field.
        message: String,
    },

    /// A topic with the submitted name already exists.
    #[error("topic name already in use: {name}")]
    DuplicateName {
        /// The colliding name.
        name: String,
    },

    /// A question in the submitted tree has no correct answer.
    #[error("question '{question}' must have at least one correct answer")]
    MissingCorrectAnswer {
        /// Text of the offending question.
        question: String,
    },

    /// An update referenced a question id not present in the persisted topic.
    #[error("question ID {id} not found in topic")]
    UnknownQuestion {
        /// The unresolvable question id.
        id: QuestionId,
    },

    /// An update referenced an answer id not present under the matched question.
    #[error("answer ID {id} not found under question ID {question}")]
    UnknownAnswer {
        /// The unresolvable answer id.
        id: AnswerId,
        /// The question the answer was submitted under.
        question: QuestionId,
    },

    /// The selector matched nothing.
    #[error("not found: {message}")]
    NotFound {
        /// Description of what was looked up.
        message: String,
    },

    /// Listing all topics returned none.
    #[error("no topics available")]
    EmptyCollection,

    /// The topic was modified concurrently between load and commit.
    ///
    /// Retryable: reload the topic and resubmit.
    #[error("conflict: {message}")]
    Conflict {
        /// Description of the conflicting commit.
        message: String,
    },

    /// A store operation failed.
    #[error("storage error: {message}")]
    Storage {
        /// Description of the storage failure (opaque to clients).
        message: String,
    },
}

impl ContentError {
    /// Creates a malformed-input error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }

    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }
}
