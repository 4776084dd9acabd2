use serde::Serialize;

use super::field;
use crate::store::Record;

pub const DEFAULT_TIME_LIMIT_MINUTES: u32 = 15;

#[derive(Debug, Clone, Serialize)]
pub struct QuizListing {
    pub subject: String,
    pub class: String,
    pub quiz_id: String,
    pub quiz_name: String,
    pub time_limit: u32,
}

impl QuizListing {
    pub const HEADER: [&'static str; 5] =
        ["subject", "class", "quiz_id", "quiz_name", "time_limit"];

    pub fn from_record(record: &Record) -> QuizListing {
        QuizListing {
            subject: field(record, "subject"),
            class: field(record, "class"),
            quiz_id: field(record, "quiz_id"),
            quiz_name: field(record, "quiz_name"),
            time_limit: field(record, "time_limit")
                .parse()
                .unwrap_or(DEFAULT_TIME_LIMIT_MINUTES),
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.subject.clone(),
            self.class.clone(),
            self.quiz_id.clone(),
            self.quiz_name.clone(),
            self.time_limit.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn unparseable_time_limit_falls_back_to_default() {
        let mut record: HashMap<String, String> = HashMap::new();
        record.insert("subject".into(), "hoa".into());
        record.insert("quiz_id".into(), "h8-hhcb".into());
        record.insert("time_limit".into(), "soon".into());
        let listing = QuizListing::from_record(&record);
        assert_eq!(listing.time_limit, DEFAULT_TIME_LIMIT_MINUTES);
    }

    #[test]
    fn to_row_matches_header_order() {
        let listing = QuizListing {
            subject: "hoa".into(),
            class: "lop 8".into(),
            quiz_id: "h8-hhcb".into(),
            quiz_name: "Hóa học Cơ bản".into(),
            time_limit: 20,
        };
        let row = listing.to_row();
        assert_eq!(row.len(), QuizListing::HEADER.len());
        assert_eq!(row[2], "h8-hhcb");
        assert_eq!(row[4], "20");
    }
}
