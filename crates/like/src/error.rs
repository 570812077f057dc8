use thiserror::Error;

pub type LikeResult<T> = Result<T, LikeError>;

#[derive(Error, Debug)]
pub enum LikeError {
    #[error("postId must not be empty")]
    EmptyPostId,

    #[error("userId must not be empty")]
    EmptyUserId,

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}
