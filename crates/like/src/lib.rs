//! Like-toggle domain: server-side like state and the client-side
//! synchronization controller that keeps a displayed counter in step with it.

pub mod error;
pub mod service;
pub mod state;
pub mod sync;

pub use error::LikeError;
pub use service::LikeService;
pub use state::{LikeCountUpdate, LikeRecord, LikeState};
pub use sync::{ClientError, LikeClient, LikeSync, Poller, ToggleOutcome};
