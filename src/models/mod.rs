//! Domain models and request/response DTOs for the gateway API

pub mod item;
pub mod order;
pub mod requests;
pub mod responses;
pub mod timestamp;
pub mod user;

// Re-export commonly used types
pub use item::{CatalogKind, Item};
pub use order::{Order, OrderStatus, OrderType, QueryFilter, SortOption};
pub use requests::{
    CreateOrderRequest, CustomTokenRequest, ExchangeTokenRequest, LoginRequest, OrderListQuery,
    SearchQuery, UpdateStatusRequest,
};
pub use responses::{
    ApiResponse, CacheStatsResponse, CreatedOrder, CustomToken, HealthResponse, IdToken, SignInHint,
    TokenInfo,
};
pub use user::{User, UserProfile};
