//! Quiz content data model.
//!
//! Content is a two-level tree: a [`Topic`] exclusively owns its
//! [`Question`]s, and each question exclusively owns its [`Answer`]s.
//! Ownership flows strictly parent→child through the containment vectors;
//! the `topic_id` / `question_id` back-references are navigation-only lookup
//! keys, assigned by the store at commit time and never serialized outward.
//!
//! Incoming trees deserialize into the `*Submission` types: the same shape
//! with ids defaulting to the unsaved sentinel (`0`) when absent. Keeping the
//! submitted tree a distinct type makes the reconciliation contract explicit:
//! persisted state on one side, the client's full representation on the
//! other.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quizbank_core::{AnswerId, QuestionId, TopicId};

/// A top-level quiz subject containing questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    /// Store-assigned identity.
    pub topic_id: TopicId,
    /// Unique, non-empty display name.
    pub name: String,
    /// Owned questions. Order is preserved but carries no meaning.
    pub questions: Vec<Question>,
    /// Row stamp, bumped by the store on every committed mutation.
    ///
    /// A commit whose loaded stamp no longer matches the persisted one fails
    /// with a retryable conflict instead of silently overwriting.
    pub version: u64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A quiz prompt belonging to exactly one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Store-assigned identity.
    pub question_id: QuestionId,
    /// Owning topic. Navigation-only; never serialized.
    #[serde(skip)]
    pub topic_id: TopicId,
    /// The prompt text.
    pub text: String,
    /// Owned candidate answers.
    pub answers: Vec<Answer>,
}

/// A candidate response to a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    /// Store-assigned identity.
    pub answer_id: AnswerId,
    /// Owning question. Navigation-only; never serialized.
    #[serde(skip)]
    pub question_id: QuestionId,
    /// The answer text.
    pub text: String,
    /// Whether this answer is correct.
    pub is_correct: bool,
}

impl Topic {
    /// Looks up an owned question by id.
    #[must_use]
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.question_id == id)
    }
}

impl Question {
    /// Returns true when at least one owned answer is marked correct.
    #[must_use]
    pub fn has_correct_answer(&self) -> bool {
        self.answers.iter().any(|a| a.is_correct)
    }

    /// Looks up an owned answer by id.
    #[must_use]
    pub fn answer(&self, id: AnswerId) -> Option<&Answer> {
        self.answers.iter().find(|a| a.answer_id == id)
    }
}

// ============================================================================
// Submissions
// ============================================================================

/// A client-submitted full representation of a topic tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicSubmission {
    /// Submitted topic id; `0`/absent for a brand-new topic.
    #[serde(default)]
    pub topic_id: TopicId,
    /// Submitted name.
    pub name: String,
    /// Submitted questions.
    #[serde(default)]
    pub questions: Vec<QuestionSubmission>,
}

/// A submitted question within a [`TopicSubmission`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSubmission {
    /// Submitted question id; `0`/absent marks the question as new.
    #[serde(default)]
    pub question_id: QuestionId,
    /// Submitted prompt text.
    pub text: String,
    /// Submitted answers.
    #[serde(default)]
    pub answers: Vec<AnswerSubmission>,
}

/// A submitted answer within a [`QuestionSubmission`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSubmission {
    /// Submitted answer id; `0`/absent marks the answer as new.
    #[serde(default)]
    pub answer_id: AnswerId,
    /// Submitted answer text.
    pub text: String,
    /// Submitted correctness flag.
    #[serde(default)]
    pub is_correct: bool,
}

impl QuestionSubmission {
    /// Returns true when at least one submitted answer is marked correct.
    #[must_use]
    pub fn has_correct_answer(&self) -> bool {
        self.answers.iter().any(|a| a.is_correct)
    }
}
