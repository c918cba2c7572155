//! Middleware and extractors for request processing.
//!
//! Authentication happens once per request: the [`auth::AuthUser`] extractor
//! validates the bearer token, and [`auth::AuthUser::identity`] turns the
//! claims into a typed [`slate_models::Identity`]. Role dispatch after that
//! point goes through the scope planner in `slate-models`, not through
//! string comparisons in handlers.

pub mod auth;
