use crate::state::AppState;
use axum::Router;

mod claims;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod service;

pub use claims::Claims;
pub use extractors::AuthUser;
pub use jwt::{JwtKeys, TokenError};
pub use service::{AuthService, AuthSession, ProfileUpdate};

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
