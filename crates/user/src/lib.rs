//! User domain: credentials, JWT session resolution, and user storage.

pub mod error;
pub mod input;
pub mod jwt;
pub mod password;
pub mod query;

pub use error::{UserError, UserResult};
pub use input::{LoginInput, RegisterInput};
pub use jwt::{AuthUser, Claims, Identity, generate_token, resolve_token};
pub use query::User;
