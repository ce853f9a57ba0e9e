use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{patch, post},
};

/// Protected Router Module
///
/// Every mutating route for the four nested entities. The whole module is
/// wrapped by `auth_middleware` in `create_router`, so a request only reaches
/// these handlers after its bearer token has been validated. Read routes stay
/// public and live in the sibling module.
pub fn protected_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // POST /curriculum — create a top-level curriculum.
        .route("/curriculum", post(handlers::create_curriculum))
        // PATCH/DELETE /curriculum/{id} — partial update / cascading delete.
        .route(
            "/curriculum/{id}",
            patch(handlers::update_curriculum).delete(handlers::delete_curriculum),
        )
        // POST /project — create under an existing curriculum.
        .route("/project", post(handlers::create_project))
        .route(
            "/project/{id}",
            patch(handlers::update_project).delete(handlers::delete_project),
        )
        // POST /sprint — create under an existing project.
        .route("/sprint", post(handlers::create_sprint))
        .route(
            "/sprint/{id}",
            patch(handlers::update_sprint).delete(handlers::delete_sprint),
        )
        // POST /resource — attach a link to an existing sprint.
        .route("/resource", post(handlers::create_resource))
        .route(
            "/resource/{id}",
            patch(handlers::update_resource).delete(handlers::delete_resource),
        )
}
