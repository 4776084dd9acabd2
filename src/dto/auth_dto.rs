use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::user::Role;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterPayload {
    #[validate(length(min = 3, max = 30, message = "username must be 3 to 30 characters"))]
    pub username: String,
    #[validate(length(min = 6, max = 128, message = "password must be at least 6 characters"))]
    pub password: String,
    pub confirm_password: String,
    #[validate(length(min = 1, message = "fullname is required"))]
    pub fullname: String,
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionResponse {
    pub username: String,
    pub fullname: String,
    pub role: Role,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub username: String,
    pub fullname: String,
}
