use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
    Extension,
};

use crate::{
    dto::quiz_dto::{QuestionView, QuizPageResponse, SubjectView, SubmitPayload, SubmitResponse},
    error::{Error, Result},
    middleware::auth::Claims,
    models::subject::Subject,
    routes::parse_subject,
    AppState,
};

#[axum::debug_handler]
pub async fn list_subjects() -> impl IntoResponse {
    let subjects: Vec<SubjectView> = Subject::ALL
        .iter()
        .map(|subject| SubjectView {
            slug: subject.slug(),
            label: subject.label(),
        })
        .collect();
    Json(subjects)
}

#[axum::debug_handler]
pub async fn list_quizzes(
    State(state): State<AppState>,
    Path(subject): Path<String>,
) -> Result<impl IntoResponse> {
    let subject = parse_subject(&subject)?;
    let listings = state.quiz_service.listings_for(subject).await?;
    Ok(Json(listings))
}

#[axum::debug_handler]
pub async fn get_quiz(
    State(state): State<AppState>,
    Path((subject, quiz_id)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let subject = parse_subject(&subject)?;
    let listing = state
        .quiz_service
        .find_listing(subject, &quiz_id)
        .await?
        .ok_or_else(|| {
            Error::NotFound(format!(
                "quiz '{}' not found for subject '{}'",
                quiz_id,
                subject.slug()
            ))
        })?;
    let question_count = state
        .quiz_service
        .questions_for(subject, &quiz_id)
        .await?
        .len();
    Ok(Json(QuizPageResponse {
        listing,
        question_count,
    }))
}

/// Question fetch for the quiz-taking page. Correct letters are withheld;
/// an unknown quiz id is an empty list, not a 404.
#[axum::debug_handler]
pub async fn get_questions(
    State(state): State<AppState>,
    Path((subject, quiz_id)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let subject = parse_subject(&subject)?;
    let questions = state.quiz_service.questions_for(subject, &quiz_id).await?;
    let views: Vec<QuestionView> = questions.iter().map(QuestionView::from_question).collect();
    Ok(Json(views))
}

#[utoipa::path(
    post,
    path = "/api/quiz/{subject}/{quiz_id}/submit",
    request_body = SubmitPayload,
    responses(
        (status = 200, description = "Submission scored", body = SubmitResponse),
        (status = 401, description = "No session"),
        (status = 404, description = "Unknown subject")
    )
)]
#[axum::debug_handler]
pub async fn submit_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((subject, quiz_id)): Path<(String, String)>,
    Json(payload): Json<SubmitPayload>,
) -> Result<impl IntoResponse> {
    let subject = parse_subject(&subject)?;
    let (score, total) = state
        .scoring_service
        .score_and_record(&claims.sub, subject, &quiz_id, &payload.answers)
        .await?;
    Ok(Json(SubmitResponse { score, total }))
}
