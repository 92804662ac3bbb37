//! Contract Deployer Library
//!
//! 生成并编译示例合约，通过 JSON-RPC 部署、发送交易并调用合约方法

pub mod call;
pub mod client;
pub mod contract;
pub mod error;
pub mod flow;
pub mod logs;
pub mod receipt;
pub mod wallet;

pub use call::CallOutput;
pub use client::{DeployClient, TxParams, DEFAULT_GAS_PRICE, DEFAULT_RPC_URL};
pub use contract::{sample_contract, CompiledContract, ContractSource, EventDef, Solc};
pub use error::DeployerError;
pub use flow::FlowSummary;
pub use logs::DecodedLog;
pub use receipt::{wait_for_receipt, ReceiptPolicy};
