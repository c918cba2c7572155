//! Exam data models.
//!
//! Re-exports the exam models from the `slate-models` crate.

pub use slate_models::exams::*;
