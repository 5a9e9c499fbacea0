//! Content read operations.
//!
//! The reader is a stateless projection over the store: it serves full or
//! filtered topic trees for anonymous consumption. No reconciliation, no
//! mutation; reads are reentrant and safely concurrent.

use std::sync::Arc;

use quizbank_core::observability::content_span;

use crate::error::{ContentError, Result};
use crate::model::{Question, Topic};
use crate::store::ContentStore;

/// Reader for quiz content.
#[derive(Clone)]
pub struct ContentReader {
    store: Arc<dyn ContentStore>,
}

impl std::fmt::Debug for ContentReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentReader")
            .field("store", &"<ContentStore>")
            .finish()
    }
}

impl ContentReader {
    /// Creates a new reader over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Lists all topics with nested questions and answers.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::EmptyCollection`] when no topics exist.
    pub async fn list_topics(&self) -> Result<Vec<Topic>> {
        let topics = self.store.list_topics().await?;
        if topics.is_empty() {
            return Err(ContentError::EmptyCollection);
        }
        Ok(topics)
    }

    /// Returns the questions (with answers) of the named topic.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::NotFound`] when no topic holds the name.
    pub async fn questions_for_topic(&self, name: &str) -> Result<Vec<Question>> {
        let topic = self
            .store
            .find_by_name(name)
            .await?
            .ok_or_else(|| ContentError::not_found(format!("topic with name '{name}' not found")))?;

        let span = content_span("questions_for_topic", topic.topic_id.get());
        let _guard = span.enter();
        tracing::debug!(questions = topic.questions.len(), "Serving topic questions");

        Ok(topic.questions)
    }
}
