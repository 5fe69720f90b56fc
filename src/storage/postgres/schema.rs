/// Idempotent DDL, applied in order at startup.
pub const STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        email TEXT UNIQUE,
        first_name TEXT,
        last_name TEXT,
        avatar TEXT,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        last_login_at TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS networks (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        display_name TEXT NOT NULL,
        chain_id BIGINT NOT NULL UNIQUE,
        rpc_url TEXT NOT NULL,
        explorer_url TEXT,
        currency TEXT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        gas_price TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS meme_coins (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        symbol TEXT NOT NULL UNIQUE,
        description TEXT NOT NULL DEFAULT '',
        total_supply TEXT NOT NULL,
        decimals SMALLINT NOT NULL,
        image_url TEXT,
        website TEXT,
        twitter TEXT,
        telegram TEXT,
        discord TEXT,
        contract_address TEXT,
        network TEXT NOT NULL,
        status TEXT NOT NULL,
        deployment_hash TEXT,
        deployed_at TIMESTAMPTZ,
        creator_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        price DOUBLE PRECISION NOT NULL,
        is_verified BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS meme_coins_creator_idx ON meme_coins (creator_id)",
    "CREATE INDEX IF NOT EXISTS meme_coins_status_idx ON meme_coins (status)",
    "CREATE TABLE IF NOT EXISTS token_contracts (
        id UUID PRIMARY KEY,
        meme_coin_id UUID NOT NULL UNIQUE REFERENCES meme_coins(id) ON DELETE CASCADE,
        contract_code TEXT NOT NULL,
        abi TEXT NOT NULL,
        bytecode TEXT NOT NULL,
        constructor_args TEXT NOT NULL,
        network TEXT NOT NULL,
        gas_limit BIGINT NOT NULL,
        gas_price TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS deployment_transactions (
        id UUID PRIMARY KEY,
        meme_coin_id UUID NOT NULL REFERENCES meme_coins(id) ON DELETE CASCADE,
        transaction_hash TEXT NOT NULL UNIQUE,
        block_number BIGINT NOT NULL,
        gas_used BIGINT NOT NULL,
        gas_price TEXT NOT NULL,
        status TEXT NOT NULL,
        deployed_at TIMESTAMPTZ NOT NULL,
        network TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS tokens (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        symbol TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        total_supply TEXT NOT NULL,
        decimals SMALLINT NOT NULL,
        contract_address TEXT,
        network TEXT NOT NULL,
        image_url TEXT,
        website TEXT,
        twitter TEXT,
        telegram TEXT,
        discord TEXT,
        status TEXT NOT NULL,
        deployment_tx_hash TEXT,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS tokens_user_idx ON tokens (user_id)",
    "CREATE TABLE IF NOT EXISTS token_features (
        token_id UUID PRIMARY KEY REFERENCES tokens(id) ON DELETE CASCADE,
        is_mintable BOOLEAN NOT NULL,
        is_burnable BOOLEAN NOT NULL,
        is_pausable BOOLEAN NOT NULL,
        has_max_supply BOOLEAN NOT NULL,
        has_taxes BOOLEAN NOT NULL,
        buy_tax_percentage SMALLINT NOT NULL,
        sell_tax_percentage SMALLINT NOT NULL,
        is_anti_whale BOOLEAN NOT NULL,
        max_tx_amount TEXT,
        max_wallet_amount TEXT
    )",
    "CREATE TABLE IF NOT EXISTS token_analytics (
        token_id UUID PRIMARY KEY REFERENCES tokens(id) ON DELETE CASCADE,
        holders BIGINT NOT NULL,
        transactions BIGINT NOT NULL,
        volume_24h TEXT NOT NULL,
        market_cap TEXT NOT NULL,
        price TEXT NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS wallets (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        address TEXT NOT NULL,
        wallet_type TEXT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS wallets_address_lower_idx ON wallets (LOWER(address))",
    "CREATE TABLE IF NOT EXISTS transactions (
        id UUID PRIMARY KEY,
        token_id UUID REFERENCES tokens(id) ON DELETE SET NULL,
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        hash TEXT NOT NULL UNIQUE,
        tx_type TEXT NOT NULL,
        status TEXT NOT NULL,
        gas_used BIGINT,
        gas_price TEXT,
        block_number BIGINT,
        network_id UUID NOT NULL REFERENCES networks(id),
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS transactions_user_idx ON transactions (user_id)",
    "CREATE TABLE IF NOT EXISTS payments (
        id UUID PRIMARY KEY,
        meme_coin_id UUID NOT NULL REFERENCES meme_coins(id) ON DELETE CASCADE,
        amount DOUBLE PRECISION NOT NULL,
        currency TEXT NOT NULL,
        payment_method TEXT NOT NULL,
        transaction_hash TEXT,
        status TEXT NOT NULL,
        paid_at TIMESTAMPTZ,
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )",
];
