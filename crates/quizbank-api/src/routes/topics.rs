//! Topic API routes.
//!
//! Anonymous readers get the full trees; administrators curate them.
//!
//! ## Routes
//!
//! - `GET    /topics` - List all topics (anonymous)
//! - `GET    /topics/{name}/questions` - Questions of the named topic (anonymous)
//! - `POST   /topics` - Create a topic tree (admin)
//! - `PUT    /topics/{id}` - Reconcile-update a topic tree (admin)
//! - `DELETE /topics/{id}` - Cascade-delete a topic (admin)

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use quizbank_content::{
    Answer, AnswerSubmission, Question, QuestionSubmission, Topic, TopicSubmission,
};
use quizbank_core::{AnswerId, QuestionId, TopicId};

use crate::context::RequestContext;
use crate::error::{ApiError, ApiErrorBody};
use crate::server::AppState;

// ============================================================================
// Request / Response Bodies
// ============================================================================

/// A submitted topic tree.
///
/// All ids default to `0`, which marks the record as new; a non-zero id must
/// reference a record already persisted under the addressed parent.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopicPayload {
    /// Submitted topic id (`0`/absent for create).
    #[serde(default)]
    pub topic_id: i64,
    /// Topic name (unique).
    pub name: String,
    /// Submitted questions.
    #[serde(default)]
    pub questions: Vec<QuestionPayload>,
}

/// A submitted question.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPayload {
    /// Submitted question id (`0`/absent marks the question as new).
    #[serde(default)]
    pub question_id: i64,
    /// The prompt text.
    pub text: String,
    /// Submitted answers.
    #[serde(default)]
    pub answers: Vec<AnswerPayload>,
}

/// A submitted answer.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerPayload {
    /// Submitted answer id (`0`/absent marks the answer as new).
    #[serde(default)]
    pub answer_id: i64,
    /// The answer text.
    pub text: String,
    /// Whether this answer is correct.
    #[serde(default)]
    pub is_correct: bool,
}

impl TopicPayload {
    fn into_submission(self) -> TopicSubmission {
        TopicSubmission {
            topic_id: TopicId::new(self.topic_id),
            name: self.name,
            questions: self
                .questions
                .into_iter()
                .map(|q| QuestionSubmission {
                    question_id: QuestionId::new(q.question_id),
                    text: q.text,
                    answers: q
                        .answers
                        .into_iter()
                        .map(|a| AnswerSubmission {
                            answer_id: AnswerId::new(a.answer_id),
                            text: a.text,
                            is_correct: a.is_correct,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Topic response with its full subtree.
///
/// Parent back-references are never serialized; ownership is expressed by
/// nesting alone.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopicResponse {
    /// Store-assigned topic id.
    pub topic_id: i64,
    /// Topic name.
    pub name: String,
    /// Row stamp of the returned tree.
    pub version: u64,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
    /// Last mutation timestamp (ISO 8601).
    pub updated_at: String,
    /// Owned questions.
    pub questions: Vec<QuestionResponse>,
}

/// Question response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    /// Store-assigned question id.
    pub question_id: i64,
    /// The prompt text.
    pub text: String,
    /// Owned answers.
    pub answers: Vec<AnswerResponse>,
}

/// Answer response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    /// Store-assigned answer id.
    pub answer_id: i64,
    /// The answer text.
    pub text: String,
    /// Whether this answer is correct.
    pub is_correct: bool,
}

/// List topics response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListTopicsResponse {
    /// All topics with their full subtrees.
    pub topics: Vec<TopicResponse>,
}

/// Questions of one topic.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopicQuestionsResponse {
    /// Questions with their answers.
    pub questions: Vec<QuestionResponse>,
}

impl From<&Topic> for TopicResponse {
    fn from(topic: &Topic) -> Self {
        Self {
            topic_id: topic.topic_id.get(),
            name: topic.name.clone(),
            version: topic.version,
            created_at: topic.created_at.to_rfc3339(),
            updated_at: topic.updated_at.to_rfc3339(),
            questions: topic.questions.iter().map(QuestionResponse::from).collect(),
        }
    }
}

impl From<&Question> for QuestionResponse {
    fn from(question: &Question) -> Self {
        Self {
            question_id: question.question_id.get(),
            text: question.text.clone(),
            answers: question.answers.iter().map(AnswerResponse::from).collect(),
        }
    }
}

impl From<&Answer> for AnswerResponse {
    fn from(answer: &Answer) -> Self {
        Self {
            answer_id: answer.answer_id.get(),
            text: answer.text.clone(),
            is_correct: answer.is_correct,
        }
    }
}

// ============================================================================
// Routes
// ============================================================================

/// Creates topic routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/topics", get(list_topics).post(create_topic))
        .route("/topics/:selector", put(update_topic).delete(delete_topic))
        .route("/topics/:selector/questions", get(topic_questions))
}

/// List all topics.
///
/// GET /api/topics
#[utoipa::path(
    get,
    path = "/api/topics",
    tag = "topics",
    responses(
        (status = 200, description = "Topics listed", body = ListTopicsResponse),
        (status = 404, description = "No topics available", body = ApiErrorBody),
        (status = 500, description = "Internal error", body = ApiErrorBody),
    )
)]
pub(crate) async fn list_topics(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::debug!("Listing topics");

    let topics = state.reader().list_topics().await.map_err(ApiError::from)?;

    Ok(Json(ListTopicsResponse {
        topics: topics.iter().map(TopicResponse::from).collect(),
    }))
}

/// Get the questions (with answers) of the named topic.
///
/// GET /api/topics/{name}/questions
#[utoipa::path(
    get,
    path = "/api/topics/{name}/questions",
    tag = "topics",
    params(
        ("name" = String, Path, description = "Topic name")
    ),
    responses(
        (status = 200, description = "Questions listed", body = TopicQuestionsResponse),
        (status = 404, description = "No such topic", body = ApiErrorBody),
        (status = 500, description = "Internal error", body = ApiErrorBody),
    )
)]
pub(crate) async fn topic_questions(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::debug!(topic = %name, "Listing topic questions");

    let questions = state
        .reader()
        .questions_for_topic(&name)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(TopicQuestionsResponse {
        questions: questions.iter().map(QuestionResponse::from).collect(),
    }))
}

/// Create a topic from a full submitted tree.
///
/// POST /api/topics
#[utoipa::path(
    post,
    path = "/api/topics",
    tag = "topics",
    request_body = TopicPayload,
    responses(
        (status = 201, description = "Topic created", body = TopicResponse),
        (status = 400, description = "Bad request", body = ApiErrorBody),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
        (status = 403, description = "Forbidden", body = ApiErrorBody),
        (status = 409, description = "Duplicate name", body = ApiErrorBody),
        (status = 500, description = "Internal error", body = ApiErrorBody),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub(crate) async fn create_topic(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TopicPayload>,
) -> Result<impl IntoResponse, ApiError> {
    ctx.require_admin()?;

    tracing::info!(
        user = %ctx.user_id,
        topic = %payload.name,
        "Creating topic"
    );

    let submission = payload.into_submission();
    let topic = state
        .writer()
        .create_topic(&submission)
        .await
        .map_err(|e| ApiError::from(e).with_request_id(ctx.request_id.clone()))?;

    Ok((StatusCode::CREATED, Json(TopicResponse::from(&topic))))
}

/// Reconcile a submitted tree into the topic addressed by id.
///
/// PUT /api/topics/{id}
#[utoipa::path(
    put,
    path = "/api/topics/{id}",
    tag = "topics",
    params(
        ("id" = i64, Path, description = "Topic id")
    ),
    request_body = TopicPayload,
    responses(
        (status = 204, description = "Topic reconciled"),
        (status = 400, description = "Bad request", body = ApiErrorBody),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
        (status = 403, description = "Forbidden", body = ApiErrorBody),
        (status = 404, description = "No such topic", body = ApiErrorBody),
        (status = 409, description = "Concurrent modification or name collision", body = ApiErrorBody),
        (status = 500, description = "Internal error", body = ApiErrorBody),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub(crate) async fn update_topic(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path(selector): Path<String>,
    Json(payload): Json<TopicPayload>,
) -> Result<impl IntoResponse, ApiError> {
    ctx.require_admin()?;

    let id: TopicId = selector
        .parse()
        .map_err(|e| ApiError::from(e).with_request_id(ctx.request_id.clone()))?;

    tracing::info!(
        user = %ctx.user_id,
        topic_id = id.get(),
        "Updating topic"
    );

    let submission = payload.into_submission();
    state
        .writer()
        .update_topic(id, &submission)
        .await
        .map_err(|e| ApiError::from(e).with_request_id(ctx.request_id.clone()))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a topic and its whole subtree.
///
/// DELETE /api/topics/{id}
#[utoipa::path(
    delete,
    path = "/api/topics/{id}",
    tag = "topics",
    params(
        ("id" = i64, Path, description = "Topic id")
    ),
    responses(
        (status = 204, description = "Topic deleted"),
        (status = 400, description = "Invalid topic id", body = ApiErrorBody),
        (status = 401, description = "Unauthorized", body = ApiErrorBody),
        (status = 403, description = "Forbidden", body = ApiErrorBody),
        (status = 404, description = "No such topic", body = ApiErrorBody),
        (status = 500, description = "Internal error", body = ApiErrorBody),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub(crate) async fn delete_topic(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path(selector): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    ctx.require_admin()?;

    let id: TopicId = selector
        .parse()
        .map_err(|e| ApiError::from(e).with_request_id(ctx.request_id.clone()))?;

    tracing::info!(
        user = %ctx.user_id,
        topic_id = id.get(),
        "Deleting topic"
    );

    state
        .writer()
        .delete_topic(id)
        .await
        .map_err(|e| ApiError::from(e).with_request_id(ctx.request_id.clone()))?;

    Ok(StatusCode::NO_CONTENT)
}
