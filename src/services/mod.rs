//! Services Module
//!
//! Catalog reads, order listing and lifecycle, and user profiles. Each
//! service receives its store and identity capabilities at construction.

mod catalog;
mod order_query;
mod orders;
mod users;


pub use catalog::CatalogService;
pub use order_query::{sort_orders, OrderQueryEngine};
pub use orders::{CreateOrderOutcome, OrderService, Rejection};
pub use users::UserService;
