use crate::app::auth_service::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, Session, UpdateProfileRequest,
};
use crate::app::chain_service::{Balance, ConnectWalletRequest, GasPrice, NetworkDetails};
use crate::app::meme_coin_service::{CreateMemeCoinRequest, UpdateMemeCoinRequest};
use crate::app::payment_service::{CreatePaymentRequest, ProcessPaymentRequest};
use crate::app::token_service::{CreateTokenRequest, DeployTokenRequest, UpdateTokenRequest};
use crate::domain::model::{
    DeploymentTransaction, MemeCoin, MemeCoinStatus, Network, Payment, PaymentStatus, Token,
    TokenAnalytics, TokenContract, TokenFeatures, TokenStatus, Transaction, TransactionStatus,
    TransactionType, User, Wallet, WalletType,
};
use crate::transport::http::handlers::{
    auth, health, meme_coins, networks, payments, tokens, transactions, wallets,
};
use crate::transport::http::types::{ApiResponse, AppState, HealthStatus};
use axum::routing::{delete, get, post, put};
use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        auth::register_handler,
        auth::login_handler,
        auth::profile_handler,
        auth::update_profile_handler,
        auth::change_password_handler,
        meme_coins::create_meme_coin_handler,
        meme_coins::list_meme_coins_handler,
        meme_coins::search_meme_coins_handler,
        meme_coins::meme_coin_by_symbol_handler,
        meme_coins::get_meme_coin_handler,
        meme_coins::update_meme_coin_handler,
        meme_coins::delete_meme_coin_handler,
        meme_coins::deploy_meme_coin_handler,
        meme_coins::meme_coin_contract_handler,
        meme_coins::meme_coin_deployments_handler,
        meme_coins::user_meme_coins_handler,
        tokens::create_token_handler,
        tokens::list_tokens_handler,
        tokens::get_token_handler,
        tokens::token_by_address_handler,
        tokens::update_token_handler,
        tokens::delete_token_handler,
        tokens::deploy_token_handler,
        tokens::token_features_handler,
        tokens::token_analytics_handler,
        tokens::token_contract_handler,
        tokens::token_transactions_handler,
        tokens::user_tokens_handler,
        networks::list_networks_handler,
        networks::network_info_handler,
        networks::gas_price_handler,
        networks::balance_handler,
        wallets::connect_wallet_handler,
        wallets::list_wallets_handler,
        wallets::disconnect_wallet_handler,
        transactions::transaction_by_hash_handler,
        transactions::user_transactions_handler,
        payments::create_payment_handler,
        payments::get_payment_handler,
        payments::process_payment_handler,
        payments::refund_payment_handler,
        payments::user_payments_handler
    ),
    components(schemas(
        ApiResponse,
        HealthStatus,
        RegisterRequest,
        LoginRequest,
        ChangePasswordRequest,
        UpdateProfileRequest,
        Session,
        User,
        CreateMemeCoinRequest,
        UpdateMemeCoinRequest,
        MemeCoin,
        MemeCoinStatus,
        TokenContract,
        DeploymentTransaction,
        CreateTokenRequest,
        UpdateTokenRequest,
        DeployTokenRequest,
        Token,
        TokenStatus,
        TokenFeatures,
        TokenAnalytics,
        Network,
        NetworkDetails,
        GasPrice,
        Balance,
        ConnectWalletRequest,
        Wallet,
        WalletType,
        Transaction,
        TransactionType,
        TransactionStatus,
        CreatePaymentRequest,
        ProcessPaymentRequest,
        Payment,
        PaymentStatus
    )),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route(
            "/api/profile",
            get(auth::profile_handler).put(auth::update_profile_handler),
        )
        .route("/api/user/password", put(auth::change_password_handler))
        .route("/api/user/meme-coins", get(meme_coins::user_meme_coins_handler))
        .route("/api/user/tokens", get(tokens::user_tokens_handler))
        .route("/api/user/transactions", get(transactions::user_transactions_handler))
        .route("/api/user/payments", get(payments::user_payments_handler))
        .route(
            "/api/meme-coins",
            get(meme_coins::list_meme_coins_handler).post(meme_coins::create_meme_coin_handler),
        )
        .route("/api/meme-coins/search", get(meme_coins::search_meme_coins_handler))
        .route(
            "/api/meme-coins/symbol/:symbol",
            get(meme_coins::meme_coin_by_symbol_handler),
        )
        .route(
            "/api/meme-coins/:id",
            get(meme_coins::get_meme_coin_handler)
                .put(meme_coins::update_meme_coin_handler)
                .delete(meme_coins::delete_meme_coin_handler),
        )
        .route("/api/meme-coins/:id/deploy", post(meme_coins::deploy_meme_coin_handler))
        .route("/api/meme-coins/:id/contract", get(meme_coins::meme_coin_contract_handler))
        .route(
            "/api/meme-coins/:id/deployments",
            get(meme_coins::meme_coin_deployments_handler),
        )
        .route(
            "/api/tokens",
            get(tokens::list_tokens_handler).post(tokens::create_token_handler),
        )
        .route("/api/tokens/deploy", post(tokens::deploy_token_handler))
        .route("/api/tokens/address/:address", get(tokens::token_by_address_handler))
        .route(
            "/api/tokens/:id",
            get(tokens::get_token_handler)
                .put(tokens::update_token_handler)
                .delete(tokens::delete_token_handler),
        )
        .route("/api/tokens/:id/features", get(tokens::token_features_handler))
        .route("/api/tokens/:id/analytics", get(tokens::token_analytics_handler))
        .route("/api/tokens/:id/contract", get(tokens::token_contract_handler))
        .route("/api/tokens/:id/transactions", get(tokens::token_transactions_handler))
        .route("/api/networks", get(networks::list_networks_handler))
        .route("/api/networks/:name", get(networks::network_info_handler))
        .route("/api/networks/:name/gas-price", get(networks::gas_price_handler))
        .route(
            "/api/networks/:name/balance/:address",
            get(networks::balance_handler),
        )
        .route(
            "/api/wallets",
            get(wallets::list_wallets_handler).post(wallets::connect_wallet_handler),
        )
        .route("/api/wallets/:id", delete(wallets::disconnect_wallet_handler))
        .route("/api/transactions/:hash", get(transactions::transaction_by_hash_handler))
        .route("/api/payments", post(payments::create_payment_handler))
        .route("/api/payments/:id", get(payments::get_payment_handler))
        .route("/api/payments/:id/process", post(payments::process_payment_handler))
        .route("/api/payments/:id/refund", post(payments::refund_payment_handler))
        .with_state(app_state)
}
