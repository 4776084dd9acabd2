use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
    Extension,
};

use crate::{
    dto::quiz_dto::ReviewResponse,
    error::{Error, Result},
    middleware::auth::Claims,
    routes::parse_subject,
    AppState,
};

#[axum::debug_handler]
pub async fn my_results(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let results = state.result_service.results_for_user(&claims.sub).await?;
    Ok(Json(results))
}

/// Review joins the latest result with the authoritative questions so the
/// front end can show the chosen and correct letters side by side.
#[axum::debug_handler]
pub async fn review_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((subject, quiz_id)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let subject = parse_subject(&subject)?;
    let result = state
        .result_service
        .latest_for(&claims.sub, subject, &quiz_id)
        .await?
        .ok_or_else(|| {
            Error::NotFound(format!(
                "no submission for quiz '{}' in subject '{}'",
                quiz_id,
                subject.slug()
            ))
        })?;
    let questions = state.quiz_service.questions_for(subject, &quiz_id).await?;
    Ok(Json(ReviewResponse {
        quiz_id: result.quiz_id.clone(),
        quiz_name: result.quiz_name.clone(),
        questions,
        answers: result.parsed_answers(),
        score: result.score,
        total: result.total,
        submitted_at: result.created_at,
    }))
}
