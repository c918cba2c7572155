use crate::modules::report_cards::controller::{
    create_generation, delete_generation, list_generations, parent_report_cards,
    publish_generation, student_report_cards,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

pub fn init_report_cards_router() -> Router<AppState> {
    Router::new()
        .route("/student", get(student_report_cards))
        .route("/parent", get(parent_report_cards))
        .route(
            "/generations",
            get(list_generations).post(create_generation),
        )
        .route("/generations/{id}", delete(delete_generation))
        .route("/generations/{id}/publish", post(publish_generation))
}
