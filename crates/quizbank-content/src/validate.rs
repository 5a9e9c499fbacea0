//! Validation rules for submitted topic trees.
//!
//! All checks here are pure and side-effect-free; nothing in this module
//! touches the store. The one check that needs store knowledge (name
//! uniqueness) takes the already-loaded collision candidate as an argument so
//! the rule itself stays pure.

use crate::error::{ContentError, Result};
use crate::model::TopicSubmission;

/// Maximum length of a topic name, in characters.
pub const MAX_NAME_LEN: usize = 120;

/// Maximum length of a question prompt, in characters.
pub const MAX_QUESTION_TEXT_LEN: usize = 500;

/// Maximum length of an answer text, in characters.
pub const MAX_ANSWER_TEXT_LEN: usize = 300;

/// Checks shape and length bounds of every field in a submitted tree.
///
/// # Errors
///
/// Returns [`ContentError::MalformedInput`] naming the first offending field.
pub fn validate_structure(submission: &TopicSubmission) -> Result<()> {
    check_text(&submission.name, "topic name", MAX_NAME_LEN)?;

    for question in &submission.questions {
        check_text(&question.text, "question text", MAX_QUESTION_TEXT_LEN)?;
        for answer in &question.answers {
            check_text(&answer.text, "answer text", MAX_ANSWER_TEXT_LEN)?;
        }
    }

    Ok(())
}

/// Checks that every submitted question has at least one correct answer.
///
/// # Errors
///
/// Returns [`ContentError::MissingCorrectAnswer`] naming the offending
/// question's text.
pub fn validate_correct_answers(submission: &TopicSubmission) -> Result<()> {
    for question in &submission.questions {
        if !question.has_correct_answer() {
            return Err(ContentError::MissingCorrectAnswer {
                question: question.text.clone(),
            });
        }
    }
    Ok(())
}

/// Checks a candidate name against an already-loaded collision.
///
/// The caller performs the store lookup; `collision` is `Some` when another
/// topic already holds the name.
///
/// # Errors
///
/// Returns [`ContentError::DuplicateName`] when the name is taken.
pub fn validate_unique_name(name: &str, collision: Option<&str>) -> Result<()> {
    if collision.is_some() {
        return Err(ContentError::DuplicateName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn check_text(value: &str, field: &str, max_len: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ContentError::malformed(format!("{field} must not be empty")));
    }
    if value.chars().count() > max_len {
        return Err(ContentError::malformed(format!(
            "{field} exceeds {max_len} characters"
        )));
    }
    Ok(())
}
