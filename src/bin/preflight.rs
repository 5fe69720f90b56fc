use memecoin_creator::domain::networks::CATALOGUE;
use memecoin_creator::infra::chain::{ChainRpc, EvmRpcClient};
use memecoin_creator::infra::config::StorageBackend;
use memecoin_creator::infra::logging::init_logging;
use memecoin_creator::storage;
use memecoin_creator::Config;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--check-rpc]\n\
         \n\
         Requires env vars:\n\
           JWT_SECRET, and DATABASE_URL unless STORAGE_BACKEND=memory\n\
         Optional:\n\
           --check-rpc   query eth_chainId on every active network\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let check_rpc = args.iter().any(|a| a == "--check-rpc");

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    let _ = init_logging();

    println!("> Preflight:");
    println!("  BIND_ADDR={}", config.bind_addr);
    println!("  STORAGE_BACKEND={:?}", config.storage);
    println!("  DEPLOY_DELAY_MS={}", config.deploy_delay.as_millis());
    println!("  JWT_TTL_HOURS={}", config.jwt_ttl.num_hours());

    if config.storage == StorageBackend::Memory {
        eprintln!("  Warning: in-memory storage selected; nothing survives a restart.");
    }

    let store = storage::open(&config).await?;
    store
        .ping()
        .await
        .map_err(|e| anyhow::anyhow!("Storage is unreachable: {e}"))?;
    println!("  Storage ({}) reachable, schema ensured.", store.backend_name());

    // Catalogue sanity: unique names and chain ids.
    for (i, info) in CATALOGUE.iter().enumerate() {
        if CATALOGUE[..i]
            .iter()
            .any(|other| other.name == info.name || other.chain_id == info.chain_id)
        {
            return Err(anyhow::anyhow!(
                "Network catalogue has a duplicate entry for {} (chain id {})",
                info.name,
                info.chain_id
            ));
        }
    }
    println!("  Network catalogue: {} entries.", CATALOGUE.len());

    let networks = store.active_networks().await?;
    if networks.is_empty() {
        eprintln!("  Warning: no active networks stored; start the server with SEED_NETWORKS=true.");
    } else {
        println!("  Active networks stored: {}", networks.len());
    }

    if check_rpc {
        let rpc = EvmRpcClient::new(config.rpc_timeout)?;
        let mut failures = 0;
        for network in &networks {
            match rpc.chain_id(&network.rpc_url).await {
                Ok(id) if id as i64 == network.chain_id => {
                    println!("  {}: RPC ok (chain id {}).", network.name, id);
                }
                Ok(id) => {
                    failures += 1;
                    eprintln!(
                        "  {}: RPC reports chain id {} but {} is configured.",
                        network.name, id, network.chain_id
                    );
                    if let Some(owner) = store.network_by_chain_id(id as i64).await? {
                        eprintln!("    (chain id {} belongs to stored network {})", id, owner.name);
                    }
                }
                Err(e) => {
                    failures += 1;
                    eprintln!("  {}: RPC unreachable: {}", network.name, e);
                }
            }
        }
        if failures > 0 {
            return Err(anyhow::anyhow!("{failures} network(s) failed the RPC check"));
        }
    }

    println!("> Preflight OK.");
    Ok(())
}
