use serde::Serialize;

use super::field;
use crate::store::Record;

#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub quiz_id: String,
    pub quiz_name: String,
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: String,
}

impl Question {
    pub const HEADER: [&'static str; 8] = [
        "quiz_id",
        "quiz_name",
        "question",
        "option_a",
        "option_b",
        "option_c",
        "option_d",
        "correct_answer",
    ];

    pub fn from_record(record: &Record) -> Question {
        Question {
            quiz_id: field(record, "quiz_id"),
            quiz_name: field(record, "quiz_name"),
            question: field(record, "question"),
            option_a: field(record, "option_a"),
            option_b: field(record, "option_b"),
            option_c: field(record, "option_c"),
            option_d: field(record, "option_d"),
            correct_answer: field(record, "correct_answer"),
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.quiz_id.clone(),
            self.quiz_name.clone(),
            self.question.clone(),
            self.option_a.clone(),
            self.option_b.clone(),
            self.option_c.clone(),
            self.option_d.clone(),
            self.correct_answer.clone(),
        ]
    }
}
