use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::error::{Error, Result};
use crate::middleware::{auth, cors, rate_limit};
use crate::models::subject::Subject;
use crate::AppState;

pub mod admin;
pub mod auth_routes;
pub mod health;
pub mod quiz;
pub mod result;

pub(crate) fn parse_subject(raw: &str) -> Result<Subject> {
    Subject::parse(raw).ok_or_else(|| Error::NotFound(format!("unknown subject '{}'", raw)))
}

pub fn create_router(state: AppState) -> Router {
    let config = crate::config::get_config();

    // Login and registration are the only unauthenticated writes, so they
    // get their own rate limit window.
    let auth_api = Router::new()
        .route("/api/auth/register", post(auth_routes::register))
        .route("/api/auth/login", post(auth_routes::login))
        .layer(from_fn_with_state(
            rate_limit::new_rps_state(config.auth_rps),
            rate_limit::rps_middleware,
        ));

    let quiz_api = Router::new()
        .route("/api/auth/logout", post(auth_routes::logout))
        .route("/api/subjects", get(quiz::list_subjects))
        .route("/api/quizzes/:subject", get(quiz::list_quizzes))
        .route("/api/quiz/:subject/:quiz_id", get(quiz::get_quiz))
        .route(
            "/api/quiz/:subject/:quiz_id/questions",
            get(quiz::get_questions),
        )
        .route(
            "/api/quiz/:subject/:quiz_id/submit",
            post(quiz::submit_quiz),
        )
        .route("/api/review/:subject/:quiz_id", get(result::review_quiz))
        .route("/api/results", get(result::my_results))
        .layer(from_fn(auth::require_session));

    let admin_api = Router::new()
        .route("/api/admin/quizzes", get(admin::list_quizzes))
        .route("/api/admin/quizzes/bulk-upload", post(admin::bulk_upload))
        .route("/api/admin/quizzes/upload-excel", post(admin::upload_excel))
        .route(
            "/api/admin/quizzes/update-time",
            post(admin::update_time_limit),
        )
        .route(
            "/api/admin/quizzes/:subject/:quiz_id",
            delete(admin::delete_quiz),
        )
        .layer(from_fn(auth::require_admin));

    Router::new()
        .route("/health", get(health::health))
        .merge(auth_api)
        .merge(quiz_api)
        .merge(admin_api)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors::permissive_cors())
        .with_state(state)
}
