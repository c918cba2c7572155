//! Report card data models.
//!
//! Re-exports the report-card models from the `slate-models` crate.

pub use slate_models::report_cards::*;
