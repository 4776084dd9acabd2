use std::collections::HashMap;

use serde::Serialize;

use super::field;
use crate::store::Record;

#[derive(Debug, Clone, Serialize)]
pub struct QuizResult {
    pub username: String,
    pub subject: String,
    pub quiz_id: String,
    pub quiz_name: String,
    pub answers: String,
    pub score: u32,
    pub total: u32,
    pub created_at: String,
}

impl QuizResult {
    pub const HEADER: [&'static str; 8] = [
        "username",
        "subject",
        "quiz_id",
        "quiz_name",
        "answers",
        "score",
        "total",
        "created_at",
    ];

    pub fn from_record(record: &Record) -> QuizResult {
        QuizResult {
            username: field(record, "username"),
            subject: field(record, "subject"),
            quiz_id: field(record, "quiz_id"),
            quiz_name: field(record, "quiz_name"),
            answers: field(record, "answers"),
            score: field(record, "score").parse().unwrap_or(0),
            total: field(record, "total").parse().unwrap_or(0),
            created_at: field(record, "created_at"),
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.username.clone(),
            self.subject.clone(),
            self.quiz_id.clone(),
            self.quiz_name.clone(),
            self.answers.clone(),
            self.score.to_string(),
            self.total.to_string(),
            self.created_at.clone(),
        ]
    }

    /// The answer column holds the submission's position-to-letter map as
    /// serialized JSON. Unparseable history rows read as no answers.
    pub fn parsed_answers(&self) -> HashMap<String, String> {
        serde_json::from_str(&self.answers).unwrap_or_default()
    }
}
