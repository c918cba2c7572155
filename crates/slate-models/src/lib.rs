//! # Slate Models
//!
//! Domain models and DTOs for the Slate API.
//!
//! This crate provides the data structures shared across the application:
//! database entities, request/response DTOs, and the access-scope types that
//! bound every role-scoped query.
//!
//! # Modules
//!
//! - [`ids`]: Strongly-typed ID newtypes
//! - [`roles`]: The system role enum
//! - [`scope`]: Resolved identities and per-role query scopes
//! - [`grading`]: The letter-grade scale
//! - [`grades`]: Grade (cohort level) models
//! - [`classes`]: Class models
//! - [`students`]: Student enrollment models
//! - [`users`]: User models
//! - [`exams`]: Exam, result, and summary models
//! - [`report_cards`]: Report card and generation-batch models

pub mod classes;
pub mod exams;
pub mod grades;
pub mod grading;
pub mod ids;
pub mod report_cards;
pub mod roles;
pub mod scope;
pub mod students;
pub mod users;

// Re-export commonly used types at crate root for convenience
pub use roles::Role;
pub use scope::{ExamScope, Identity, ReportCardScope};
