//! API Module
//!
//! HTTP handlers, bearer-token extractors and routing for the gateway REST API.

pub mod auth;
pub mod catalog;
pub mod extract;
pub mod health;
pub mod orders;
mod routes;
mod state;
pub mod users;

pub use extract::{AdminUser, AuthUser};
pub use routes::create_router;
pub use state::AppState;
