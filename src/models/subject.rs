use serde::{Deserialize, Serialize};

use crate::utils::normalize::canon;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Toan,
    Ly,
    Hoa,
    Trung,
}

impl Subject {
    pub const ALL: [Subject; 4] = [Subject::Toan, Subject::Ly, Subject::Hoa, Subject::Trung];

    pub fn parse(raw: &str) -> Option<Subject> {
        match canon(raw).as_str() {
            "toan" => Some(Subject::Toan),
            "ly" => Some(Subject::Ly),
            "hoa" => Some(Subject::Hoa),
            "trung" => Some(Subject::Trung),
            _ => None,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Subject::Toan => "toan",
            Subject::Ly => "ly",
            Subject::Hoa => "hoa",
            Subject::Trung => "trung",
        }
    }

    /// Sheet holding this subject's question bank. The Chinese course
    /// predates the slug and kept its original tab name.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            Subject::Toan => "TOAN",
            Subject::Ly => "LY",
            Subject::Hoa => "HOA",
            Subject::Trung => "CHINA",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Subject::Toan => "Toán",
            Subject::Ly => "Lý",
            Subject::Hoa => "Hóa",
            Subject::Trung => "Tiếng Trung",
        }
    }
}
