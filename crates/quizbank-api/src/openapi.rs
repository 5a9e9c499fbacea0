//! `OpenAPI` (3.1) specification generation for `quizbank-api`.
//!
//! The generated spec is served at `/api/openapi.json` and is used to
//! generate external clients and to detect breaking API changes.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// `OpenAPI` documentation for the Quizbank REST API (`/api/*`).
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Quizbank API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Hierarchical quiz content API with reconciling updates"
    ),
    paths(
        crate::routes::auth::login,
        crate::routes::topics::list_topics,
        crate::routes::topics::topic_questions,
        crate::routes::topics::create_topic,
        crate::routes::topics::update_topic,
        crate::routes::topics::delete_topic,
    ),
    components(
        schemas(
            crate::error::ApiErrorBody,
            crate::routes::auth::LoginRequest,
            crate::routes::auth::LoginResponse,
            crate::routes::topics::TopicPayload,
            crate::routes::topics::QuestionPayload,
            crate::routes::topics::AnswerPayload,
            crate::routes::topics::TopicResponse,
            crate::routes::topics::QuestionResponse,
            crate::routes::topics::AnswerResponse,
            crate::routes::topics::ListTopicsResponse,
            crate::routes::topics::TopicQuestionsResponse,
        )
    ),
    tags(
        (name = "auth", description = "Credential exchange"),
        (name = "topics", description = "Topic tree operations"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Returns the generated `OpenAPI` spec.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Returns the generated `OpenAPI` spec serialized as pretty JSON.
///
/// # Errors
///
/// Returns an error if JSON serialization fails (should not happen).
pub fn openapi_json() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&openapi())
}
