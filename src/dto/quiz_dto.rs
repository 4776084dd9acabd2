use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::question::Question;
use crate::models::quiz::QuizListing;

#[derive(Debug, Clone, Serialize)]
pub struct SubjectView {
    pub slug: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizPageResponse {
    pub listing: QuizListing,
    pub question_count: usize,
}

/// Question as shown while taking a quiz. The correct letter stays server
/// side until review.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
}

impl QuestionView {
    pub fn from_question(q: &Question) -> QuestionView {
        QuestionView {
            question: q.question.clone(),
            option_a: q.option_a.clone(),
            option_b: q.option_b.clone(),
            option_c: q.option_c.clone(),
            option_d: q.option_d.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubmitPayload {
    /// Question ordinal (as a decimal string) to chosen option letter.
    #[serde(default)]
    pub answers: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubmitResponse {
    pub score: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub quiz_id: String,
    pub quiz_name: String,
    pub questions: Vec<Question>,
    pub answers: HashMap<String, String>,
    pub score: u32,
    pub total: u32,
    pub submitted_at: String,
}
