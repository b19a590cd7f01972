mod dto;
mod handlers;
pub mod jwt;
pub mod password;
pub(crate) mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
