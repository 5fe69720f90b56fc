pub mod rpc;
pub mod simulator;

pub use crate::crypto::address::{is_valid_address, random_address, random_tx_hash, to_checksum_address};
pub use rpc::{ChainRpc, EvmRpcClient, RpcError};
pub use simulator::{DeploymentReceipt, DeploymentRequest, SimulatedDeployer};
