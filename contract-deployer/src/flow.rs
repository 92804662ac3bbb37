//! 部署与调用流程
//!
//! 编译示例合约 → 部署 → 调用 `setA1` 触发事件 → 只读调用 `setA` 并解码

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, U256};
use tracing::{info, warn};

use crate::call::CallOutput;
use crate::client::{DeployClient, TxParams};
use crate::contract::{method_sig, sample_contract, Solc, ONE_ADDRESS};
use crate::error::DeployerError;
use crate::logs::{decode_logs, DecodedLog};

/// 流程执行结果
#[derive(Debug, Clone)]
pub struct FlowSummary {
    pub balance: U256,
    pub contract: Address,
    pub events: Vec<DecodedLog>,
    pub output: CallOutput,
}

/// 执行完整流程，任何一步失败立即返回
pub async fn run(client: &DeployClient, solc: &Solc) -> Result<FlowSummary, DeployerError> {
    // 1. 检查余额
    let balance = client.balance().await?;
    info!("账户 {} 余额: {} wei", client.address(), balance);
    if balance.is_zero() {
        warn!("账户余额为 0，交易可能无法上链");
    }

    // 2. 编译并部署合约
    let compiled = sample_contract().compile(solc).await?;
    let (contract, _) = client.deploy(&compiled).await?;

    // 3. 调用 setA1 触发事件 A
    let receipt = client
        .send_transaction(TxParams::call(contract, method_sig("setA1").to_vec().into()))
        .await?;
    let events = decode_logs(&compiled.abi, receipt.inner.logs())?;
    info!("setA1 收据包含 {} 条日志", receipt.inner.logs().len());
    for event in &events {
        info!("事件: {}", event);
    }

    // 4. 只读调用 setA 并解码返回值
    let output = client
        .send_call(
            &compiled.abi,
            contract,
            "setA",
            &[
                DynSolValue::Address(ONE_ADDRESS),
                DynSolValue::Uint(U256::from(1), 256),
            ],
        )
        .await?;
    info!("setA 返回: {}", output);

    Ok(FlowSummary {
        balance,
        contract,
        events,
        output,
    })
}
