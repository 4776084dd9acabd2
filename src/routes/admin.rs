use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use bytes::Bytes;
use validator::Validate;

use crate::{
    dto::admin_dto::{AdminQuizQuery, BulkUploadPayload, UpdateTimePayload, UploadResponse},
    error::{Error, Result},
    routes::parse_subject,
    AppState,
};

#[axum::debug_handler]
pub async fn list_quizzes(
    State(state): State<AppState>,
    Query(query): Query<AdminQuizQuery>,
) -> Result<impl IntoResponse> {
    let listings = state.ingest_service.admin_listings(&query).await?;
    Ok(Json(listings))
}

#[utoipa::path(
    post,
    path = "/api/admin/quizzes/bulk-upload",
    request_body = BulkUploadPayload,
    responses(
        (status = 201, description = "Batch accepted", body = UploadResponse),
        (status = 400, description = "Malformed batch, nothing written"),
        (status = 403, description = "Not an admin")
    )
)]
#[axum::debug_handler]
pub async fn bulk_upload(
    State(state): State<AppState>,
    Json(payload): Json<BulkUploadPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let (quiz_id, added) = state.ingest_service.bulk_upload(&payload).await?;
    Ok((StatusCode::CREATED, Json(UploadResponse { quiz_id, added })))
}

/// Excel upload: metadata fields plus one workbook file in a multipart
/// form. The workbook's first sheet is parsed the same way as bulk text.
#[axum::debug_handler]
pub async fn upload_excel(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut subject = String::new();
    let mut class = String::new();
    let mut quiz_name = String::new();
    let mut time_limit: Option<u32> = None;
    let mut file: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "subject" => subject = field.text().await?,
            "class" => class = field.text().await?,
            "quiz_name" => quiz_name = field.text().await?,
            "time_limit" => {
                let raw = field.text().await?;
                let raw = raw.trim();
                if !raw.is_empty() {
                    time_limit = Some(raw.parse().map_err(|_| {
                        Error::BadRequest(format!("invalid time_limit '{}'", raw))
                    })?);
                }
            }
            "file" => {
                let filename = field.file_name().unwrap_or("questions.xlsx").to_string();
                let extension = std::path::Path::new(&filename)
                    .extension()
                    .and_then(|s| s.to_str())
                    .map(|s| s.to_lowercase())
                    .unwrap_or_default();
                if !matches!(extension.as_str(), "xlsx" | "xls") {
                    return Err(Error::BadRequest(format!(
                        "unsupported workbook type '{}'; use .xlsx or .xls",
                        filename
                    )));
                }
                let data = field.bytes().await?;
                if !data.is_empty() {
                    file = Some(data);
                }
            }
            _ => {}
        }
    }

    if subject.trim().is_empty() || class.trim().is_empty() || quiz_name.trim().is_empty() {
        return Err(Error::BadRequest(
            "subject, class and quiz_name fields are required".to_string(),
        ));
    }
    let file = file.ok_or_else(|| Error::BadRequest("no workbook uploaded".to_string()))?;

    let (quiz_id, added) = state
        .ingest_service
        .excel_upload(&subject, &class, &quiz_name, time_limit, &file)
        .await?;
    Ok((StatusCode::CREATED, Json(UploadResponse { quiz_id, added })))
}

#[axum::debug_handler]
pub async fn update_time_limit(
    State(state): State<AppState>,
    Json(payload): Json<UpdateTimePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let listing = state.ingest_service.update_time_limit(&payload).await?;
    Ok(Json(listing))
}

#[axum::debug_handler]
pub async fn delete_quiz(
    State(state): State<AppState>,
    Path((subject, quiz_id)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let subject = parse_subject(&subject)?;
    state.ingest_service.delete_quiz(subject, &quiz_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
