//! Admin write operations over quiz content.
//!
//! The writer orchestrates validation → reconciliation → commit. Every
//! successful operation touches the store exactly once; every failure aborts
//! before any mutation. Role gating happens in the transport layer before a
//! writer method is ever invoked — the writer itself knows nothing about
//! principals.

use std::sync::Arc;

use quizbank_core::observability::content_span;
use quizbank_core::TopicId;

use crate::error::{ContentError, Result};
use crate::model::{Topic, TopicSubmission};
use crate::reconcile::{ensure_correct_answers, reconcile};
use crate::store::ContentStore;
use crate::validate::{validate_correct_answers, validate_structure, validate_unique_name};

/// Writer for quiz content.
#[derive(Clone)]
pub struct ContentWriter {
    store: Arc<dyn ContentStore>,
}

impl std::fmt::Debug for ContentWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentWriter")
            .field("store", &"<ContentStore>")
            .finish()
    }
}

impl ContentWriter {
    /// Creates a new writer over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Creates a brand-new topic from a submitted tree.
    ///
    /// Validates structure, the correct-answer invariant, and name
    /// uniqueness, then inserts the whole tree as new records with
    /// store-assigned identities.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::MalformedInput`],
    /// [`ContentError::MissingCorrectAnswer`], or
    /// [`ContentError::DuplicateName`]; nothing is persisted on failure.
    pub async fn create_topic(&self, submission: &TopicSubmission) -> Result<Topic> {
        validate_structure(submission)?;
        validate_correct_answers(submission)?;

        let collision = self.store.find_by_name(&submission.name).await?;
        validate_unique_name(&submission.name, collision.as_ref().map(|t| t.name.as_str()))?;

        let topic = self.store.insert_topic(submission).await?;

        tracing::info!(
            topic_id = topic.topic_id.get(),
            name = %topic.name,
            questions = topic.questions.len(),
            "Created topic"
        );
        Ok(topic)
    }

    /// Reconciles a submitted tree into the persisted topic addressed by id.
    ///
    /// Loads the existing tree, computes the mutation plan, re-checks the
    /// correct-answer invariant on the merged result, and commits the plan
    /// atomically under the version stamp observed at load time.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::MalformedInput`] for a non-positive id or a
    /// selector/body mismatch, [`ContentError::NotFound`] for an unknown
    /// topic, [`ContentError::DuplicateName`] for a rename collision,
    /// [`ContentError::UnknownQuestion`] / [`ContentError::UnknownAnswer`]
    /// for unresolvable child ids, and [`ContentError::Conflict`] when the
    /// topic was modified concurrently. The persisted tree is untouched on
    /// every error path.
    pub async fn update_topic(&self, id: TopicId, submission: &TopicSubmission) -> Result<Topic> {
        if !id.is_persisted() {
            return Err(ContentError::malformed(format!("invalid topic ID {id}")));
        }
        if submission.topic_id.is_persisted() && submission.topic_id != id {
            return Err(ContentError::malformed(format!(
                "submitted topic ID {} does not match selector {id}",
                submission.topic_id
            )));
        }
        validate_structure(submission)?;

        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ContentError::not_found(format!("topic with ID {id} not found")))?;

        if submission.name != existing.name {
            let collision = self.store.find_by_name(&submission.name).await?;
            validate_unique_name(
                &submission.name,
                collision.as_ref().map(|t| t.name.as_str()),
            )?;
        }

        // Scoped so the span guard never lives across an await point.
        let plan = {
            let span = content_span("update_topic", id.get());
            let _guard = span.enter();

            let plan = reconcile(&existing, submission)?;
            ensure_correct_answers(&plan.topic)?;
            plan
        };

        if plan.is_noop() {
            tracing::debug!(topic_id = id.get(), "Submission matches persisted state; nothing to commit");
            return Ok(existing);
        }

        let committed = self.store.apply_plan(plan, existing.version).await?;
        tracing::info!(
            version = committed.version,
            questions = committed.questions.len(),
            "Reconciled topic"
        );
        Ok(committed)
    }

    /// Deletes a topic and its whole subtree.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::MalformedInput`] for a non-positive id and
    /// [`ContentError::NotFound`] when the topic does not exist.
    pub async fn delete_topic(&self, id: TopicId) -> Result<()> {
        if !id.is_persisted() {
            return Err(ContentError::malformed(format!("invalid topic ID {id}")));
        }

        self.store.remove_topic(id).await?;
        tracing::info!(topic_id = id.get(), "Deleted topic");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerSubmission, QuestionSubmission};
    use crate::store::MemoryStore;
    use quizbank_core::{AnswerId, QuestionId};

    fn writer() -> ContentWriter {
        ContentWriter::new(Arc::new(MemoryStore::new()))
    }

    fn trees_submission() -> TopicSubmission {
        TopicSubmission {
            name: "Trees".to_string(),
            questions: vec![QuestionSubmission {
                text: "What is a BST?".to_string(),
                answers: vec![
                    AnswerSubmission {
                        text: "A binary search tree".to_string(),
                        is_correct: true,
                        ..AnswerSubmission::default()
                    },
                    AnswerSubmission {
                        text: "A shrub".to_string(),
                        ..AnswerSubmission::default()
                    },
                ],
                ..QuestionSubmission::default()
            }],
            ..TopicSubmission::default()
        }
    }

    fn echo(topic: &Topic) -> TopicSubmission {
        TopicSubmission {
            topic_id: topic.topic_id,
            name: topic.name.clone(),
            questions: topic
                .questions
                .iter()
                .map(|q| QuestionSubmission {
                    question_id: q.question_id,
                    text: q.text.clone(),
                    answers: q
                        .answers
                        .iter()
                        .map(|a| AnswerSubmission {
                            answer_id: a.answer_id,
                            text: a.text.clone(),
                            is_correct: a.is_correct,
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_identities() {
        let writer = writer();
        let topic = writer
            .create_topic(&trees_submission())
            .await
            .expect("create");
        assert!(topic.topic_id.is_persisted());
        assert!(topic.questions[0].question_id.is_persisted());
    }

    #[tokio::test]
    async fn test_create_rejects_missing_correct_answer() {
        let writer = writer();
        let mut submission = trees_submission();
        submission.questions[0].answers[0].is_correct = false;

        let err = writer
            .create_topic(&submission)
            .await
            .expect_err("must fail");
        assert!(
            matches!(err, ContentError::MissingCorrectAnswer { question } if question == "What is a BST?")
        );
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name() {
        let writer = writer();
        writer
            .create_topic(&trees_submission())
            .await
            .expect("create");

        let err = writer
            .create_topic(&trees_submission())
            .await
            .expect_err("must fail");
        assert!(matches!(err, ContentError::DuplicateName { name } if name == "Trees"));
    }

    #[tokio::test]
    async fn test_update_applies_trees_scenario() {
        let writer = writer();
        let topic = writer
            .create_topic(&trees_submission())
            .await
            .expect("create");

        let question = &topic.questions[0];
        let submission = TopicSubmission {
            topic_id: topic.topic_id,
            name: "Trees".to_string(),
            questions: vec![QuestionSubmission {
                question_id: question.question_id,
                text: "What is a self-balancing BST?".to_string(),
                answers: vec![
                    AnswerSubmission {
                        answer_id: question.answers[0].answer_id,
                        text: question.answers[0].text.clone(),
                        is_correct: true,
                    },
                    AnswerSubmission {
                        text: "Balanced search tree".to_string(),
                        is_correct: true,
                        ..AnswerSubmission::default()
                    },
                ],
            }],
        };

        let updated = writer
            .update_topic(topic.topic_id, &submission)
            .await
            .expect("update");

        let merged = &updated.questions[0];
        assert_eq!(merged.question_id, question.question_id);
        assert_eq!(merged.text, "What is a self-balancing BST?");
        assert_eq!(merged.answers.len(), 2);
        assert_eq!(merged.answers[0].answer_id, question.answers[0].answer_id);
        assert!(!merged
            .answers
            .iter()
            .any(|a| a.answer_id == question.answers[1].answer_id));
        assert_eq!(updated.version, 2);
    }

    #[tokio::test]
    async fn test_update_unknown_child_leaves_tree_untouched() {
        let writer = writer();
        let topic = writer
            .create_topic(&trees_submission())
            .await
            .expect("create");

        let mut submission = echo(&topic);
        submission.questions[0].answers[0].answer_id = AnswerId::new(999);

        let err = writer
            .update_topic(topic.topic_id, &submission)
            .await
            .expect_err("must fail");
        assert!(matches!(err, ContentError::UnknownAnswer { .. }));

        // Nothing moved: same content, same version.
        let persisted = writer
            .store
            .find_by_id(topic.topic_id)
            .await
            .expect("find")
            .expect("present");
        assert_eq!(persisted, topic);
    }

    #[tokio::test]
    async fn test_update_rejects_selector_mismatch() {
        let writer = writer();
        let topic = writer
            .create_topic(&trees_submission())
            .await
            .expect("create");

        let mut submission = echo(&topic);
        submission.topic_id = TopicId::new(topic.topic_id.get() + 1);

        let err = writer
            .update_topic(topic.topic_id, &submission)
            .await
            .expect_err("must fail");
        assert!(matches!(err, ContentError::MalformedInput { .. }));
    }

    #[tokio::test]
    async fn test_update_rejects_demoting_last_correct_answer() {
        let writer = writer();
        let topic = writer
            .create_topic(&trees_submission())
            .await
            .expect("create");

        let mut submission = echo(&topic);
        for answer in &mut submission.questions[0].answers {
            answer.is_correct = false;
        }

        let err = writer
            .update_topic(topic.topic_id, &submission)
            .await
            .expect_err("must fail");
        assert!(matches!(err, ContentError::MissingCorrectAnswer { .. }));
    }

    #[tokio::test]
    async fn test_update_echo_is_noop_and_keeps_version() {
        let writer = writer();
        let topic = writer
            .create_topic(&trees_submission())
            .await
            .expect("create");

        let updated = writer
            .update_topic(topic.topic_id, &echo(&topic))
            .await
            .expect("update");
        assert_eq!(updated.version, topic.version);
    }

    #[tokio::test]
    async fn test_update_rename_collision_rejected() {
        let writer = writer();
        let trees = writer
            .create_topic(&trees_submission())
            .await
            .expect("create");
        let mut graphs = trees_submission();
        graphs.name = "Graphs".to_string();
        writer.create_topic(&graphs).await.expect("create");

        let mut submission = echo(&trees);
        submission.name = "Graphs".to_string();

        let err = writer
            .update_topic(trees.topic_id, &submission)
            .await
            .expect_err("must fail");
        assert!(matches!(err, ContentError::DuplicateName { .. }));
    }

    #[tokio::test]
    async fn test_delete_validates_selector() {
        let writer = writer();
        let err = writer
            .delete_topic(TopicId::new(0))
            .await
            .expect_err("must fail");
        assert!(matches!(err, ContentError::MalformedInput { .. }));

        let err = writer
            .delete_topic(TopicId::new(7))
            .await
            .expect_err("must fail");
        assert!(matches!(err, ContentError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_unknown_question_error_names_the_id() {
        let writer = writer();
        let topic = writer
            .create_topic(&trees_submission())
            .await
            .expect("create");

        let mut submission = echo(&topic);
        submission.questions[0].question_id = QuestionId::new(404);

        let err = writer
            .update_topic(topic.topic_id, &submission)
            .await
            .expect_err("must fail");
        assert_eq!(err.to_string(), "question ID 404 not found in topic");
    }
}
