pub mod app;
pub mod crypto;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{AuthService, ChainService, MemeCoinService, PaymentService, TokenService};
pub use infra::config::Config;
pub use storage::{MemoryStore, PgStore, Storage};
pub use transport::http::{create_router, ApiDoc, AppState};
