use serde::Deserialize;
use validator::Validate;

/// Registration payload. Bounds mirror the public form: usernames are 3 to
/// 100 characters, passwords at least 6.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(length(min = 3, max = 100, message = "full name must be 3 to 100 characters"))]
    pub full_name: String,

    #[validate(length(min = 3, max = 100, message = "username must be 3 to 100 characters"))]
    pub username: String,

    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(length(min = 3, max = 100, message = "username must be 3 to 100 characters"))]
    pub username: String,

    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}
