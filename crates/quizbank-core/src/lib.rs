//! # quizbank-core
//!
//! Core abstractions for the Quizbank content service.
//!
//! This crate provides the foundational types used across all Quizbank
//! components:
//!
//! - **Identifiers**: Strongly-typed integer IDs for topics, questions, and
//!   answers, with an explicit "not yet persisted" sentinel
//! - **Error Types**: Shared error definitions and result types
//! - **Observability**: Logging initialization helpers
//!
//! ## Crate Boundary
//!
//! `quizbank-core` is the only crate allowed to define shared primitives.
//! Domain logic lives in `quizbank-content`; HTTP composition lives in
//! `quizbank-api`.
//!
//! ## Example
//!
//! ```rust
//! use quizbank_core::id::TopicId;
//!
//! let unsaved = TopicId::UNSAVED;
//! assert!(!unsaved.is_persisted());
//!
//! let saved = TopicId::new(42);
//! assert!(saved.is_persisted());
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod id;
pub mod observability;

pub use error::{Error, Result};
pub use id::{AnswerId, QuestionId, TopicId};
