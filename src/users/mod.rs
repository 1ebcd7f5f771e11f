use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
mod password;
pub mod repo;
pub mod services;

pub use services::{UserRules, UserService};

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
