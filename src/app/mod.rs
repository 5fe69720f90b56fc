//! Application services. Each one owns a slice of the domain and talks to storage
//! through the [`crate::storage::Storage`] trait object.

pub mod auth_service;
pub mod chain_service;
pub mod error;
pub mod meme_coin_service;
pub mod payment_service;
pub mod token_service;

pub use auth_service::AuthService;
pub use chain_service::ChainService;
pub use error::{ServiceError, ServiceResult};
pub use meme_coin_service::MemeCoinService;
pub use payment_service::PaymentService;
pub use token_service::TokenService;
