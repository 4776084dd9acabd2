use serde::{Deserialize, Serialize};

use super::field;
use crate::store::Record;
use crate::utils::normalize::canon;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn parse(raw: &str) -> Role {
        if canon(raw) == "admin" {
            Role::Admin
        } else {
            Role::User
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub fullname: String,
    pub phone: String,
    pub role: Role,
    pub created_at: String,
}

impl User {
    pub const HEADER: [&'static str; 6] = [
        "username",
        "password",
        "fullname",
        "phone",
        "role",
        "created_at",
    ];

    pub fn from_record(record: &Record) -> User {
        User {
            username: field(record, "username"),
            password: field(record, "password"),
            fullname: field(record, "fullname"),
            phone: field(record, "phone"),
            role: Role::parse(&field(record, "role")),
            created_at: field(record, "created_at"),
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.username.clone(),
            self.password.clone(),
            self.fullname.clone(),
            self.phone.clone(),
            self.role.as_str().to_string(),
            self.created_at.clone(),
        ]
    }
}
