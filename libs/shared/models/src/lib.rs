pub mod auth;
pub mod error;

pub use auth::{AuthContext, JwtClaims, User};
pub use error::AppError;
