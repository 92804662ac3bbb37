//! 钱包模块
//!
//! 提供预充值的开发账户私钥，以及从十六进制私钥加载签名器的工具函数。

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use tracing::debug;

use crate::error::DeployerError;

/// 开发链上预充值账户的私钥
///
/// 对应地址: 0xdf7fd4830f4cc1440b469615e9996e9fde92608f
pub const DEV_PRIVATE_KEY: &str =
    "0x4b2216c76f1b4c60c44d41986863e7337bc1a317d6a9366adfd8966fe2ac05f6";

/// 将十六进制字符串（可带 0x 前缀）解码为字节数组
pub fn decode_hex(s: &str) -> Result<Vec<u8>, DeployerError> {
    let hex_part = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    Ok(hex::decode(hex_part)?)
}

/// 从十六进制私钥加载签名器
pub fn load_signer(private_key: &str) -> Result<PrivateKeySigner, DeployerError> {
    let signer = private_key.trim().parse::<PrivateKeySigner>()?;
    debug!("已加载签名器: {}", signer.address());
    Ok(signer)
}

/// 开发账户地址
pub fn dev_address() -> Result<Address, DeployerError> {
    Ok(load_signer(DEV_PRIVATE_KEY)?.address())
}
