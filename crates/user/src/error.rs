use thiserror::Error;

pub type UserResult<T> = Result<T, UserError>;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("username already in use")]
    UsernameTaken,

    #[error("hashing error: {0}")]
    Hashing(String),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for UserError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = err {
            // Unique index on users.username; a losing racer surfaces here.
            if db.is_unique_violation() {
                return UserError::UsernameTaken;
            }
        }
        UserError::Database(err)
    }
}
