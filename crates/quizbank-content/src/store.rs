//! Content store abstraction for persisted topic trees.
//!
//! The store is the transactional collaborator of the domain: it assigns
//! identities at commit time, keeps the topic `version` row stamp, and
//! applies a whole [`MutationPlan`] as a single atomic commit. Everything the
//! reconciliation engine decides is carried in the plan — the store never
//! cascades implicitly.
//!
//! ## Versioning
//!
//! Every committed mutation bumps the topic's `version`. Commits carry the
//! version observed at load time; a mismatch means another admin committed in
//! between, and the commit fails with `Conflict` without touching anything.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use quizbank_core::{AnswerId, QuestionId, TopicId};

use crate::error::{ContentError, Result};
use crate::model::{Answer, Question, Topic, TopicSubmission};
use crate::reconcile::MutationPlan;

/// Content store trait for persisted topic trees.
///
/// All backends implement load-modify-save semantics keyed by topic id.
/// Loads return deep copies; mutations only land through [`insert_topic`],
/// [`apply_plan`], and [`remove_topic`].
///
/// [`insert_topic`]: ContentStore::insert_topic
/// [`apply_plan`]: ContentStore::apply_plan
/// [`remove_topic`]: ContentStore::remove_topic
#[async_trait]
pub trait ContentStore: Send + Sync + 'static {
    /// Lists all topics with their full subtrees.
    async fn list_topics(&self) -> Result<Vec<Topic>>;

    /// Loads one topic (with its full subtree) by id.
    async fn find_by_id(&self, id: TopicId) -> Result<Option<Topic>>;

    /// Loads one topic (with its full subtree) by its unique name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Topic>>;

    /// Inserts a whole submitted tree as new records.
    ///
    /// Every record receives a store-assigned identity regardless of any
    /// submitted id; back-references are wired parent→child. The new topic
    /// starts at version 1.
    async fn insert_topic(&self, submission: &TopicSubmission) -> Result<Topic>;

    /// Applies a mutation plan as a single atomic commit.
    ///
    /// `expected_version` is the row stamp observed when the existing tree
    /// was loaded. A mismatch fails with [`ContentError::Conflict`] and no
    /// mutation happens. On success, created records receive identities, the
    /// stamp is bumped, and the persisted tree is returned.
    async fn apply_plan(&self, plan: MutationPlan, expected_version: u64) -> Result<Topic>;

    /// Removes a topic and its whole subtree.
    ///
    /// Fails with [`ContentError::NotFound`] when no such topic exists.
    async fn remove_topic(&self, id: TopicId) -> Result<()>;
}

// ============================================================================
// In-Memory Store
// ============================================================================

/// In-memory content store for development and tests.
///
/// Thread-safe via `RwLock`; commits are atomic under the write lock. Not
/// suitable for production durability.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Debug)]
struct MemoryInner {
    topics: BTreeMap<TopicId, Topic>,
    next_topic: i64,
    next_question: i64,
    next_answer: i64,
}

impl Default for MemoryInner {
    fn default() -> Self {
        Self {
            topics: BTreeMap::new(),
            next_topic: 1,
            next_question: 1,
            next_answer: 1,
        }
    }
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryInner {
    fn allocate_topic_id(&mut self) -> TopicId {
        let id = TopicId::new(self.next_topic);
        self.next_topic += 1;
        id
    }

    fn allocate_question_id(&mut self) -> QuestionId {
        let id = QuestionId::new(self.next_question);
        self.next_question += 1;
        id
    }

    fn allocate_answer_id(&mut self) -> AnswerId {
        let id = AnswerId::new(self.next_answer);
        self.next_answer += 1;
        id
    }

    /// Assigns identities to every unsaved record in the tree and wires
    /// back-references parent→child.
    fn assign_identities(&mut self, topic: &mut Topic) {
        for question in &mut topic.questions {
            if !question.question_id.is_persisted() {
                question.question_id = self.allocate_question_id();
            }
            question.topic_id = topic.topic_id;
            for answer in &mut question.answers {
                if !answer.answer_id.is_persisted() {
                    answer.answer_id = self.allocate_answer_id();
                }
                answer.question_id = question.question_id;
            }
        }
    }
}

fn poisoned() -> ContentError {
    ContentError::Storage {
        message: "lock poisoned".to_string(),
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn list_topics(&self) -> Result<Vec<Topic>> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.topics.values().cloned().collect())
    }

    async fn find_by_id(&self, id: TopicId) -> Result<Option<Topic>> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.topics.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Topic>> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.topics.values().find(|t| t.name == name).cloned())
    }

    async fn insert_topic(&self, submission: &TopicSubmission) -> Result<Topic> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;

        let now = Utc::now();
        let mut topic = Topic {
            topic_id: inner.allocate_topic_id(),
            name: submission.name.clone(),
            questions: submission
                .questions
                .iter()
                .map(|q| Question {
                    question_id: QuestionId::UNSAVED,
                    topic_id: TopicId::UNSAVED,
                    text: q.text.clone(),
                    answers: q
                        .answers
                        .iter()
                        .map(|a| Answer {
                            answer_id: AnswerId::UNSAVED,
                            question_id: QuestionId::UNSAVED,
                            text: a.text.clone(),
                            is_correct: a.is_correct,
                        })
                        .collect(),
                })
                .collect(),
            version: 1,
            created_at: now,
            updated_at: now,
        };
        inner.assign_identities(&mut topic);

        inner.topics.insert(topic.topic_id, topic.clone());
        drop(inner);

        Ok(topic)
    }

    async fn apply_plan(&self, plan: MutationPlan, expected_version: u64) -> Result<Topic> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;

        let id = plan.topic.topic_id;
        let current = inner
            .topics
            .get(&id)
            .ok_or_else(|| ContentError::not_found(format!("topic with ID {id} not found")))?;

        if current.version != expected_version {
            return Err(ContentError::conflict(format!(
                "topic {id} was modified concurrently (version {} != expected {expected_version})",
                current.version
            )));
        }

        tracing::debug!(
            topic_id = id.get(),
            created_questions = plan.created_questions,
            created_answers = plan.created_answers,
            updated_records = plan.updated_records,
            deleted_questions = plan.deleted_questions.len(),
            deleted_answers = plan.deleted_answers.len(),
            "Committing mutation plan"
        );

        let mut topic = plan.topic;
        inner.assign_identities(&mut topic);
        topic.version = expected_version + 1;
        topic.updated_at = Utc::now();

        inner.topics.insert(id, topic.clone());
        drop(inner);

        Ok(topic)
    }

    async fn remove_topic(&self, id: TopicId) -> Result<()> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        if inner.topics.remove(&id).is_none() {
            return Err(ContentError::not_found(format!(
                "topic with ID {id} not found"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerSubmission, QuestionSubmission};
    use crate::reconcile;

    fn submission() -> TopicSubmission {
        TopicSubmission {
            topic_id: TopicId::UNSAVED,
            name: "Trees".to_string(),
            questions: vec![QuestionSubmission {
                question_id: QuestionId::UNSAVED,
                text: "What is a BST?".to_string(),
                answers: vec![
                    AnswerSubmission {
                        answer_id: AnswerId::UNSAVED,
                        text: "A binary search tree".to_string(),
                        is_correct: true,
                    },
                    AnswerSubmission {
                        answer_id: AnswerId::UNSAVED,
                        text: "A shrub".to_string(),
                        is_correct: false,
                    },
                ],
            }],
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_identities_and_back_references() {
        let store = MemoryStore::new();
        let topic = store.insert_topic(&submission()).await.expect("insert");

        assert!(topic.topic_id.is_persisted());
        assert_eq!(topic.version, 1);
        let question = &topic.questions[0];
        assert!(question.question_id.is_persisted());
        assert_eq!(question.topic_id, topic.topic_id);
        for answer in &question.answers {
            assert!(answer.answer_id.is_persisted());
            assert_eq!(answer.question_id, question.question_id);
        }
    }

    #[tokio::test]
    async fn test_find_by_name_and_id_agree() {
        let store = MemoryStore::new();
        let topic = store.insert_topic(&submission()).await.expect("insert");

        let by_name = store.find_by_name("Trees").await.expect("find");
        let by_id = store.find_by_id(topic.topic_id).await.expect("find");
        assert_eq!(by_name, by_id);
        assert!(store.find_by_name("Graphs").await.expect("find").is_none());
    }

    #[tokio::test]
    async fn test_apply_plan_bumps_version_and_assigns_new_ids() {
        let store = MemoryStore::new();
        let topic = store.insert_topic(&submission()).await.expect("insert");

        let incoming = TopicSubmission {
            topic_id: topic.topic_id,
            name: topic.name.clone(),
            questions: vec![QuestionSubmission {
                question_id: topic.questions[0].question_id,
                text: topic.questions[0].text.clone(),
                answers: vec![
                    AnswerSubmission {
                        answer_id: topic.questions[0].answers[0].answer_id,
                        text: "A binary search tree".to_string(),
                        is_correct: true,
                    },
                    AnswerSubmission {
                        answer_id: AnswerId::UNSAVED,
                        text: "Balanced search tree".to_string(),
                        is_correct: true,
                    },
                ],
            }],
        };

        let plan = reconcile::reconcile(&topic, &incoming).expect("reconcile");
        let committed = store.apply_plan(plan, topic.version).await.expect("commit");

        assert_eq!(committed.version, 2);
        let answers = &committed.questions[0].answers;
        assert_eq!(answers.len(), 2);
        assert!(answers.iter().all(|a| a.answer_id.is_persisted()));
        // The retained answer keeps its identity; the removed one is gone.
        assert_eq!(answers[0].answer_id, topic.questions[0].answers[0].answer_id);
        assert!(!answers
            .iter()
            .any(|a| a.answer_id == topic.questions[0].answers[1].answer_id));
    }

    #[tokio::test]
    async fn test_apply_plan_rejects_stale_version() {
        let store = MemoryStore::new();
        let topic = store.insert_topic(&submission()).await.expect("insert");

        let incoming = TopicSubmission {
            topic_id: topic.topic_id,
            name: "Renamed".to_string(),
            questions: vec![QuestionSubmission {
                question_id: topic.questions[0].question_id,
                text: topic.questions[0].text.clone(),
                answers: topic.questions[0]
                    .answers
                    .iter()
                    .map(|a| AnswerSubmission {
                        answer_id: a.answer_id,
                        text: a.text.clone(),
                        is_correct: a.is_correct,
                    })
                    .collect(),
            }],
        };

        // First commit wins and bumps the stamp.
        let plan = reconcile::reconcile(&topic, &incoming).expect("reconcile");
        store.apply_plan(plan, topic.version).await.expect("commit");

        // Second commit still carries the stale stamp and must fail.
        let stale_plan = reconcile::reconcile(&topic, &incoming).expect("reconcile");
        let err = store
            .apply_plan(stale_plan, topic.version)
            .await
            .expect_err("must conflict");
        assert!(matches!(err, ContentError::Conflict { .. }));

        // The winning commit is still intact.
        let persisted = store
            .find_by_id(topic.topic_id)
            .await
            .expect("find")
            .expect("present");
        assert_eq!(persisted.name, "Renamed");
        assert_eq!(persisted.version, 2);
    }

    #[tokio::test]
    async fn test_remove_topic_cascades() {
        let store = MemoryStore::new();
        let topic = store.insert_topic(&submission()).await.expect("insert");

        store.remove_topic(topic.topic_id).await.expect("remove");
        assert!(store
            .find_by_id(topic.topic_id)
            .await
            .expect("find")
            .is_none());

        let err = store
            .remove_topic(topic.topic_id)
            .await
            .expect_err("must fail");
        assert!(matches!(err, ContentError::NotFound { .. }));
    }
}
