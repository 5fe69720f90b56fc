pub mod auth;
pub mod error;
pub mod router;
pub mod types;
pub mod handlers {
    pub mod auth;
    pub mod common;
    pub mod health;
    pub mod meme_coins;
    pub mod networks;
    pub mod payments;
    pub mod tokens;
    pub mod transactions;
    pub mod wallets;
}

pub use error::{ApiError, ApiResult};
pub use router::{create_router, ApiDoc};
pub use types::{ApiResponse, AppState};
