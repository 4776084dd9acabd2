use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BulkUploadPayload {
    #[validate(length(min = 1, message = "subject is required"))]
    pub subject: String,
    #[validate(length(min = 1, message = "class is required"))]
    pub class: String,
    #[validate(length(min = 1, message = "quiz_name is required"))]
    pub quiz_name: String,
    /// One question per line: question|A|B|C|D|letter.
    #[validate(length(min = 1, message = "questions text is required"))]
    pub questions: String,
    pub time_limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploadResponse {
    pub quiz_id: String,
    pub added: usize,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateTimePayload {
    #[validate(length(min = 1, message = "subject is required"))]
    pub subject: String,
    #[validate(length(min = 1, message = "quiz_id is required"))]
    pub quiz_id: String,
    #[validate(range(min = 1, max = 600, message = "time_limit must be 1 to 600 minutes"))]
    pub time_limit: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminQuizQuery {
    pub subject: Option<String>,
    pub class: Option<String>,
    pub quiz_id: Option<String>,
}
