//! 部署器错误类型

use alloy::primitives::B256;
use alloy::signers::local::LocalSignerError;
use alloy::transports::TransportError;
use thiserror::Error;

/// 部署器错误类型
///
/// 所有错误都直接向上传播，由调用方决定是否终止进程
#[derive(Debug, Error)]
pub enum DeployerError {
    #[error("RPC error: {0}")]
    Rpc(#[from] TransportError),

    #[error("Signer error: {0}")]
    Signer(#[from] alloy::signers::Error),

    #[error("Invalid private key: {0}")]
    InvalidKey(#[from] LocalSignerError),

    #[error("Invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("ABI error: {0}")]
    Abi(#[from] alloy::dyn_abi::Error),

    #[error("Solc error: {0}")]
    Solc(#[from] foundry_compilers::error::SolcError),

    #[error("Compile error: {0}")]
    Compile(String),

    #[error("Method {0} not found")]
    MethodNotFound(String),

    #[error("Receipt of {0} has no contract address")]
    MissingContractAddress(B256),

    #[error("Timed out waiting for receipt after {attempts} attempts")]
    ReceiptTimeout { attempts: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
