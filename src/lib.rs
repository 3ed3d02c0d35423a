//! Fruit Gateway - REST API for a fruit catalog and ordering service
//!
//! Serves catalog reads through a read-through TTL cache, validates and
//! stores orders, and manages user profiles behind bearer-token auth.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod identity;
pub mod models;
pub mod services;
pub mod store;

pub use api::{create_router, AppState};
pub use config::{Collections, Config};
