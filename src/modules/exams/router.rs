use crate::modules::exams::controller::my_exams;
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn init_exams_router() -> Router<AppState> {
    Router::new().route("/my-exams", get(my_exams))
}
