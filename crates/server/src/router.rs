use super::{handlers, state::AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Creates the Axum router with all the application routes.
///
/// Every route is wrapped in a permissive CORS layer (the fragments are
/// embedded from third-party pages) which also answers pre-flight OPTIONS
/// requests.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/lesson/personalize", post(handlers::personalize_handler))
        .route("/survey", post(handlers::survey_handler))
        .route(
            "/personalizations",
            post(handlers::upsert_personalization_handler),
        )
        .route(
            "/personalizations/{profile_id}/{lesson_id}",
            get(handlers::get_personalization_handler)
                .delete(handlers::delete_personalization_handler),
        )
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
