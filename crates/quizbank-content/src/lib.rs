//! # quizbank-content
//!
//! Content domain for the Quizbank service.
//!
//! This crate implements the quiz content domain, providing:
//!
//! - **Data Model**: Topic → Question → Answer trees with strict
//!   parent→child ownership
//! - **Validation Engine**: pure structural and invariant checks on
//!   submitted trees
//! - **Reconciliation Engine**: identity-based merge of a submitted tree
//!   into persisted state, emitting an inspectable mutation plan
//! - **Read/Write Services**: stateless projection for readers, and a
//!   validate → reconcile → commit orchestration for administrators
//! - **Content Store**: the transactional persistence seam, with an
//!   in-memory reference backend
//!
//! ## Commit discipline
//!
//! Every error is detected before any store mutation; a mutation plan is
//! applied as a single atomic commit guarded by the topic's version stamp.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod model;
pub mod reader;
pub mod reconcile;
pub mod store;
pub mod validate;
pub mod writer;

pub use error::{ContentError, Result};
pub use model::{Answer, AnswerSubmission, Question, QuestionSubmission, Topic, TopicSubmission};
pub use reader::ContentReader;
pub use reconcile::{reconcile, MutationPlan};
pub use store::{ContentStore, MemoryStore};
pub use writer::ContentWriter;
