use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any client
/// (anonymous or logged-in): every read route, the timeline view, and the
/// login gateway. All writes live in the protected module.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load balancer checks.
        .route("/health", get(|| async { "ok" }))
        // POST /auth/login
        // Exchanges admin credentials for a signed bearer token.
        .route("/auth/login", post(handlers::login))
        // GET /curriculum
        // Lists all curricula, newest first.
        .route("/curriculum", get(handlers::list_curricula))
        // GET /curriculum/{id}/full
        // The deep read: a curriculum with projects -> sprints -> resources nested.
        .route("/curriculum/{id}/full", get(handlers::get_curriculum_full))
        // GET /project/curriculum/{curriculum_id}
        // Lists the projects owned by a curriculum.
        .route(
            "/project/curriculum/{curriculum_id}",
            get(handlers::list_projects_by_curriculum),
        )
        // GET /sprint/project/{project_id}
        // Lists a project's sprints ordered by sprint number.
        .route(
            "/sprint/project/{project_id}",
            get(handlers::list_sprints_by_project),
        )
        // GET /resource/sprint/{sprint_id}
        // Lists a sprint's resources in insertion order.
        .route(
            "/resource/sprint/{sprint_id}",
            get(handlers::list_resources_by_sprint),
        )
        // GET /timeline
        // The flattened cross-curriculum sprint view.
        .route("/timeline", get(handlers::get_timeline))
}
