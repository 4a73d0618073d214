use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

use super::controller::{delete_user, get_users, update_user};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users))
        .route("/{id}", patch(update_user).delete(delete_user))
}
