//! Student data models.
//!
//! Re-exports the enrollment models from the `slate-models` crate.

pub use slate_models::students::*;
