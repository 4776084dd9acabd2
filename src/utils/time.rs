use chrono::{DateTime, Utc};

/// Timestamp layout used in the USERS and RESULT sheets.
pub const SHEET_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn sheet_timestamp() -> String {
    now().format(SHEET_TIMESTAMP_FORMAT).to_string()
}
