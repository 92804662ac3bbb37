//! 部署客户端
//!
//! 封装交易生命周期（nonce、gas、签名、广播、等待收据）与只读合约调用。

use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::dyn_abi::DynSolValue;
use alloy::eips::eip2718::Encodable2718;
use alloy::eips::BlockId;
use alloy::json_abi::JsonAbi;
use alloy::network::TxSigner;
use alloy::primitives::{Address, Bytes, TxKind, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionInput, TransactionReceipt, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use tracing::{debug, info, warn};

use crate::call::{decode_output, encode_call, find_method, CallOutput};
use crate::contract::CompiledContract;
use crate::error::DeployerError;
use crate::receipt::{wait_for_receipt, ReceiptPolicy};

/// 默认 RPC 节点地址
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// 固定的 gas price (wei)
pub const DEFAULT_GAS_PRICE: u128 = 1000;

/// 估算前使用的 gas 上限
pub const PLACEHOLDER_GAS_LIMIT: u64 = 10_000_000;

/// 交易参数，其余字段由客户端填充
#[derive(Debug, Clone, Default)]
pub struct TxParams {
    /// 接收地址，`None` 表示部署合约
    pub to: Option<Address>,
    /// 调用数据或部署字节码
    pub input: Bytes,
}

impl TxParams {
    pub fn deploy(bytecode: Bytes) -> Self {
        Self {
            to: None,
            input: bytecode,
        }
    }

    pub fn call(to: Address, input: Bytes) -> Self {
        Self {
            to: Some(to),
            input,
        }
    }

    fn kind(&self) -> TxKind {
        self.to.map_or(TxKind::Create, TxKind::Call)
    }
}

/// 部署客户端
pub struct DeployClient {
    provider: DynProvider,
    signer: PrivateKeySigner,
    chain_id: u64,
    gas_price: u128,
    policy: ReceiptPolicy,
}

impl DeployClient {
    /// 连接 RPC 节点并读取 chain id
    pub async fn connect(
        rpc_url: &str,
        signer: PrivateKeySigner,
        policy: ReceiptPolicy,
    ) -> Result<Self, DeployerError> {
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect(rpc_url)
            .await?
            .erased();

        let chain_id = provider.get_chain_id().await?;
        info!("已连接 RPC 节点: {}, chain id: {}", rpc_url, chain_id);

        Ok(Self::new(provider, signer, chain_id, policy))
    }

    pub fn new(
        provider: DynProvider,
        signer: PrivateKeySigner,
        chain_id: u64,
        policy: ReceiptPolicy,
    ) -> Self {
        Self {
            provider,
            signer,
            chain_id,
            gas_price: DEFAULT_GAS_PRICE,
            policy,
        }
    }

    pub fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = gas_price;
        self
    }

    /// 发送方地址
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// 查询发送方最新余额
    pub async fn balance(&self) -> Result<U256, DeployerError> {
        Ok(self
            .provider
            .get_balance(self.address())
            .block_id(BlockId::latest())
            .await?)
    }

    /// 构建估算 gas / eth_call 使用的请求
    fn request(&self, kind: TxKind, input: Bytes) -> TransactionRequest {
        TransactionRequest {
            from: Some(self.address()),
            to: Some(kind),
            input: TransactionInput::new(input),
            ..Default::default()
        }
    }

    /// 创建交易：nonce 取最新值，gas price 固定，gas 上限由节点估算
    async fn create_transaction(&self, params: &TxParams) -> Result<TxLegacy, DeployerError> {
        let nonce = self
            .provider
            .get_transaction_count(self.address())
            .block_id(BlockId::latest())
            .await?;

        let mut tx = TxLegacy {
            chain_id: Some(self.chain_id),
            nonce,
            gas_price: self.gas_price,
            gas_limit: PLACEHOLDER_GAS_LIMIT,
            to: params.kind(),
            value: U256::ZERO,
            input: params.input.clone(),
        };

        tx.gas_limit = self
            .provider
            .estimate_gas(self.request(params.kind(), params.input.clone()))
            .await?;

        debug!("交易已创建: nonce={}, gas={}", tx.nonce, tx.gas_limit);
        Ok(tx)
    }

    /// 签名交易（EIP-155 legacy），返回 2718 编码的原始交易
    async fn sign_transaction(&self, mut tx: TxLegacy) -> Result<Vec<u8>, DeployerError> {
        let signature = self.signer.sign_transaction(&mut tx).await?;
        let envelope = TxEnvelope::Legacy(tx.into_signed(signature));
        Ok(envelope.encoded_2718())
    }

    /// 发送交易并等待收据
    pub async fn send_transaction(
        &self,
        params: TxParams,
    ) -> Result<TransactionReceipt, DeployerError> {
        let tx = self.create_transaction(&params).await?;
        let raw_tx = self.sign_transaction(tx).await?;

        let pending = self.provider.send_raw_transaction(&raw_tx).await?;
        let tx_hash = *pending.tx_hash();
        info!("交易已发送, 哈希: {}", tx_hash);

        let provider = &self.provider;
        let receipt = wait_for_receipt(&self.policy, || async move {
            Ok::<_, DeployerError>(provider.get_transaction_receipt(tx_hash).await?)
        })
        .await?;

        if !receipt.inner.status() {
            warn!("交易 {} 执行失败 (status = 0)", tx_hash);
        }
        Ok(receipt)
    }

    /// 部署合约，返回合约地址与收据
    pub async fn deploy(
        &self,
        contract: &CompiledContract,
    ) -> Result<(Address, TransactionReceipt), DeployerError> {
        let receipt = self
            .send_transaction(TxParams::deploy(contract.bytecode.clone()))
            .await?;
        let address = receipt
            .contract_address
            .ok_or(DeployerError::MissingContractAddress(receipt.transaction_hash))?;

        info!("合约 {} 已部署: {}", contract.name, address);
        Ok((address, receipt))
    }

    /// 只读调用合约方法并解码返回值
    pub async fn send_call(
        &self,
        abi: &JsonAbi,
        contract: Address,
        method: &str,
        args: &[DynSolValue],
    ) -> Result<CallOutput, DeployerError> {
        let function = find_method(abi, method)?;
        let data = encode_call(function, args)?;

        let raw = self
            .provider
            .call(self.request(TxKind::Call(contract), data))
            .block(BlockId::latest())
            .await?;
        debug!("{} 返回 {} bytes", method, raw.len());

        decode_output(function, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{method_sig, ONE_ADDRESS};
    use crate::test_utils::{mocked_client, receipt_json, sample_abi, sample_contract_compiled};
    use alloy::primitives::{address, B256};
    use serde_json::Value;

    const DEPLOYED: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");

    #[test]
    fn test_tx_params_kind() {
        assert_eq!(TxParams::deploy(Bytes::new()).kind(), TxKind::Create);
        assert_eq!(
            TxParams::call(ONE_ADDRESS, Bytes::new()).kind(),
            TxKind::Call(ONE_ADDRESS)
        );
    }

    #[tokio::test]
    async fn test_send_call_decodes_output() {
        let (client, asserter) = mocked_client(ReceiptPolicy::default());
        let returned = DynSolValue::Tuple(vec![
            DynSolValue::Address(ONE_ADDRESS),
            DynSolValue::Uint(U256::from(1), 256),
        ])
        .abi_encode_params();
        asserter.push_success(&Bytes::from(returned));

        let output = client
            .send_call(
                &sample_abi(),
                DEPLOYED,
                "setA",
                &[
                    DynSolValue::Address(ONE_ADDRESS),
                    DynSolValue::Uint(U256::from(1), 256),
                ],
            )
            .await
            .unwrap();

        assert_eq!(output.address("0"), Some(ONE_ADDRESS));
        assert_eq!(output.uint("1"), Some(U256::from(1)));
    }

    #[tokio::test]
    async fn test_balance_returns_latest() {
        let (client, asserter) = mocked_client(ReceiptPolicy::default());
        // 1 ether
        asserter.push_success(&"0xde0b6b3a7640000");

        let balance = client.balance().await.unwrap();
        assert_eq!(balance, U256::from(1_000_000_000_000_000_000u64));
    }

    #[tokio::test]
    async fn test_balance_rpc_error() {
        let (client, asserter) = mocked_client(ReceiptPolicy::default());
        asserter.push_failure_msg("header not found");

        let err = client.balance().await.unwrap_err();
        assert!(matches!(err, DeployerError::Rpc(_)));
    }

    #[tokio::test]
    async fn test_send_call_unknown_method() {
        let (client, _asserter) = mocked_client(ReceiptPolicy::default());
        let err = client
            .send_call(&sample_abi(), DEPLOYED, "missing", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, DeployerError::MethodNotFound(_)));
    }

    #[tokio::test]
    async fn test_create_transaction_fills_fields() {
        let (client, asserter) = mocked_client(ReceiptPolicy::default());
        asserter.push_success(&"0x7");
        asserter.push_success(&"0x5a3c");

        let input = Bytes::from(method_sig("setA1").to_vec());
        let tx = client
            .create_transaction(&TxParams::call(DEPLOYED, input.clone()))
            .await
            .unwrap();

        assert_eq!(tx.nonce, 7);
        assert_eq!(tx.gas_limit, 0x5a3c);
        assert_eq!(tx.gas_price, DEFAULT_GAS_PRICE);
        assert_eq!(tx.chain_id, Some(1337));
        assert_eq!(tx.to, TxKind::Call(DEPLOYED));
        assert_eq!(tx.input, input);
    }

    #[tokio::test]
    async fn test_sign_transaction_is_legacy_eip155() {
        let (client, _asserter) = mocked_client(ReceiptPolicy::default());
        let tx = TxLegacy {
            chain_id: Some(1337),
            nonce: 0,
            gas_price: DEFAULT_GAS_PRICE,
            gas_limit: 21000,
            to: TxKind::Call(DEPLOYED),
            value: U256::ZERO,
            input: Bytes::new(),
        };

        let raw = client.sign_transaction(tx).await.unwrap();
        // legacy 交易没有类型前缀，直接是 RLP list
        assert!(raw[0] >= 0xc0);
    }

    #[tokio::test]
    async fn test_deploy_returns_contract_address() {
        let (client, asserter) = mocked_client(ReceiptPolicy::default());
        let tx_hash = B256::repeat_byte(0x11);
        asserter.push_success(&"0x0");
        asserter.push_success(&"0x1e8480");
        asserter.push_success(&tx_hash);
        asserter.push_success(&receipt_json(tx_hash, client.address(), Some(DEPLOYED)));

        let (address, receipt) = client.deploy(&sample_contract_compiled()).await.unwrap();
        assert_eq!(address, DEPLOYED);
        assert_eq!(receipt.transaction_hash, tx_hash);
    }

    #[tokio::test]
    async fn test_deploy_without_contract_address() {
        let (client, asserter) = mocked_client(ReceiptPolicy::default());
        let tx_hash = B256::repeat_byte(0x22);
        asserter.push_success(&"0x0");
        asserter.push_success(&"0x1e8480");
        asserter.push_success(&tx_hash);
        asserter.push_success(&receipt_json(tx_hash, client.address(), None));

        let err = client.deploy(&sample_contract_compiled()).await.unwrap_err();
        assert!(matches!(err, DeployerError::MissingContractAddress(h) if h == tx_hash));
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_transaction_times_out() {
        let (client, asserter) = mocked_client(ReceiptPolicy::default());
        asserter.push_success(&"0x0");
        asserter.push_success(&"0x5208");
        asserter.push_success(&B256::repeat_byte(0x33));
        for _ in 0..7 {
            asserter.push_success(&Value::Null);
        }

        let err = client
            .send_transaction(TxParams::call(DEPLOYED, Bytes::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, DeployerError::ReceiptTimeout { attempts: 7 }));
    }

    #[tokio::test]
    async fn test_rpc_error_aborts() {
        let (client, asserter) = mocked_client(ReceiptPolicy::default());
        asserter.push_failure_msg("nonce too low");

        let err = client
            .send_transaction(TxParams::call(DEPLOYED, Bytes::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, DeployerError::Rpc(_)));
    }
}
