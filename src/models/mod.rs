pub mod question;
pub mod quiz;
pub mod result;
pub mod subject;
pub mod user;

use crate::store::Record;

pub(crate) fn field(record: &Record, name: &str) -> String {
    record
        .get(name)
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}
