//! Identity-based reconciliation of a submitted topic tree against persisted
//! state.
//!
//! Given the persisted tree and a client's full representation of the same
//! topic, [`reconcile`] computes a [`MutationPlan`]: the updated tree ready to
//! persist plus an explicit enumeration of every record to remove. Matching
//! is purely by identity at both nesting levels:
//!
//! - id `0` → the record is new and will receive a store-assigned identity
//! - a non-zero id must resolve inside the persisted parent, or the whole
//!   operation aborts with an unknown-reference error
//! - a resolved record is updated in place, keeping its identity
//! - a persisted record whose id the submission never references is
//!   enumerated for deletion (removing a question cascades to its answers)
//!
//! The engine is a pure function: no store access, no reordering, and no
//! back-reference mutation (those are assigned by the store at commit time).

use std::collections::HashSet;

use quizbank_core::{AnswerId, QuestionId};

use crate::error::{ContentError, Result};
use crate::model::{Answer, Question, QuestionSubmission, Topic, TopicSubmission};

// ============================================================================
// Mutation Plan
// ============================================================================

/// The set of create/update/delete operations computed by reconciliation,
/// applied by the store as a single atomic commit.
#[derive(Debug, Clone)]
pub struct MutationPlan {
    /// The updated tree ready to persist. Records created by this plan carry
    /// the unsaved sentinel id until the store assigns real identities.
    pub topic: Topic,

    /// Persisted questions to remove, together with all their answers.
    pub deleted_questions: Vec<QuestionId>,

    /// Persisted answers to remove from surviving questions, plus the
    /// answers cascaded from `deleted_questions`. Fully enumerated so the
    /// plan is inspectable independent of any store cascade rules.
    pub deleted_answers: Vec<AnswerId>,

    /// Number of new questions the plan creates.
    pub created_questions: usize,

    /// Number of new answers the plan creates (including those nested under
    /// new questions).
    pub created_answers: usize,

    /// Number of persisted records whose content actually changed.
    pub updated_records: usize,
}

impl MutationPlan {
    /// Returns true when applying this plan would change nothing.
    ///
    /// Reconciling a tree with its own current serialization yields a no-op
    /// plan: no creates, no updates, no deletes.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.created_questions == 0
            && self.created_answers == 0
            && self.updated_records == 0
            && self.deleted_questions.is_empty()
            && self.deleted_answers.is_empty()
    }
}

// ============================================================================
// Reconciliation
// ============================================================================

/// Merges `incoming` into a copy of `existing`, computing the mutation plan.
///
/// The caller has already resolved `existing` from the store via the request
/// selector; this function never performs I/O.
///
/// # Errors
///
/// Returns [`ContentError::UnknownQuestion`] or [`ContentError::UnknownAnswer`]
/// when the submission references an id not present in the persisted tree.
/// No partial plan is produced on error.
pub fn reconcile(existing: &Topic, incoming: &TopicSubmission) -> Result<MutationPlan> {
    let mut topic = existing.clone();
    let mut deleted_questions = Vec::new();
    let mut deleted_answers = Vec::new();
    let mut created_questions = 0;
    let mut created_answers = 0;
    let mut updated_records = 0;

    if topic.name != incoming.name {
        topic.name = incoming.name.clone();
        updated_records += 1;
    }

    for submitted in &incoming.questions {
        if submitted.question_id.is_persisted() {
            let question = topic
                .questions
                .iter_mut()
                .find(|q| q.question_id == submitted.question_id)
                .ok_or(ContentError::UnknownQuestion {
                    id: submitted.question_id,
                })?;

            if question.text != submitted.text {
                question.text = submitted.text.clone();
                updated_records += 1;
            }

            merge_answers(
                question,
                submitted,
                &mut deleted_answers,
                &mut created_answers,
                &mut updated_records,
            )?;
        } else {
            // Brand-new question: every nested answer is new as well,
            // regardless of any submitted answer id.
            topic.questions.push(Question {
                question_id: QuestionId::UNSAVED,
                topic_id: existing.topic_id,
                text: submitted.text.clone(),
                answers: submitted
                    .answers
                    .iter()
                    .map(|a| Answer {
                        answer_id: AnswerId::UNSAVED,
                        question_id: QuestionId::UNSAVED,
                        text: a.text.clone(),
                        is_correct: a.is_correct,
                    })
                    .collect(),
            });
            created_questions += 1;
            created_answers += submitted.answers.len();
        }
    }

    // Deletion pass: persisted questions the submission never referenced are
    // removed, cascading to their answers.
    let referenced: HashSet<QuestionId> =
        incoming.questions.iter().map(|q| q.question_id).collect();

    let mut surviving = Vec::with_capacity(topic.questions.len());
    for question in std::mem::take(&mut topic.questions) {
        if question.question_id.is_persisted() && !referenced.contains(&question.question_id) {
            deleted_questions.push(question.question_id);
            deleted_answers.extend(question.answers.iter().map(|a| a.answer_id));
        } else {
            surviving.push(question);
        }
    }
    topic.questions = surviving;

    Ok(MutationPlan {
        topic,
        deleted_questions,
        deleted_answers,
        created_questions,
        created_answers,
        updated_records,
    })
}

/// Merges a submitted question's answers into the matched persisted question.
fn merge_answers(
    question: &mut Question,
    submitted: &QuestionSubmission,
    deleted_answers: &mut Vec<AnswerId>,
    created_answers: &mut usize,
    updated_records: &mut usize,
) -> Result<()> {
    for answer in &submitted.answers {
        if answer.answer_id.is_persisted() {
            let target = question
                .answers
                .iter_mut()
                .find(|a| a.answer_id == answer.answer_id)
                .ok_or(ContentError::UnknownAnswer {
                    id: answer.answer_id,
                    question: submitted.question_id,
                })?;

            if target.text != answer.text || target.is_correct != answer.is_correct {
                target.text = answer.text.clone();
                target.is_correct = answer.is_correct;
                *updated_records += 1;
            }
        } else {
            question.answers.push(Answer {
                answer_id: AnswerId::UNSAVED,
                question_id: question.question_id,
                text: answer.text.clone(),
                is_correct: answer.is_correct,
            });
            *created_answers += 1;
        }
    }

    // Deletion pass: persisted answers the submission never referenced.
    let referenced: HashSet<AnswerId> = submitted.answers.iter().map(|a| a.answer_id).collect();
    let mut surviving = Vec::with_capacity(question.answers.len());
    for answer in std::mem::take(&mut question.answers) {
        if answer.answer_id.is_persisted() && !referenced.contains(&answer.answer_id) {
            deleted_answers.push(answer.answer_id);
        } else {
            surviving.push(answer);
        }
    }
    question.answers = surviving;

    Ok(())
}

/// Checks that every question in the merged tree still has a correct answer.
///
/// Run after [`reconcile`] and before commit so the persisted-state invariant
/// holds at all times.
///
/// # Errors
///
/// Returns [`ContentError::MissingCorrectAnswer`] naming the offending
/// question's text.
pub fn ensure_correct_answers(topic: &Topic) -> Result<()> {
    for question in &topic.questions {
        if !question.has_correct_answer() {
            return Err(ContentError::MissingCorrectAnswer {
                question: question.text.clone(),
            });
        }
    }
    Ok(())
}
