use crate::modules::auth::controller::{login, me};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
}
