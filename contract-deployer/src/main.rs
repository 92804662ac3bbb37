use anyhow::Result;
use clap::Parser;
use contract_deployer::{
    flow, wallet, DeployClient, ReceiptPolicy, Solc, DEFAULT_GAS_PRICE, DEFAULT_RPC_URL,
};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// 合约部署器
///
/// 编译示例合约并部署到以太坊兼容节点，随后发送交易并调用合约方法
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// RPC 节点地址
    #[arg(long, default_value = DEFAULT_RPC_URL)]
    rpc_url: String,

    /// 私钥（64 位十六进制，可选 0x 前缀）
    #[arg(long, default_value = wallet::DEV_PRIVATE_KEY)]
    private_key: String,

    /// solc 可执行文件路径
    #[arg(long, default_value = "solc")]
    solc: String,

    /// gas price (wei)
    #[arg(long, default_value_t = DEFAULT_GAS_PRICE)]
    gas_price: u128,

    /// 收据查询重试次数（不含首次查询）
    #[arg(long, default_value = "6")]
    receipt_retries: u32,

    /// 收据查询间隔（毫秒）
    #[arg(long, default_value = "1000")]
    receipt_interval_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let args = Args::parse();

    let signer = wallet::load_signer(&args.private_key)?;
    info!("发送地址: {}", signer.address());

    let policy = ReceiptPolicy {
        retries: args.receipt_retries,
        interval: Duration::from_millis(args.receipt_interval_ms),
    };
    let client = DeployClient::connect(&args.rpc_url, signer, policy)
        .await?
        .with_gas_price(args.gas_price);

    let summary = flow::run(&client, &Solc::new(&args.solc)).await?;

    println!("Balance: {}", summary.balance);
    println!("Contract deployed: {}", summary.contract);
    for event in &summary.events {
        println!("Event: {}", event);
    }
    if let Some(addr) = summary.output.address("0") {
        println!("{}", addr);
    }
    if let Some(value) = summary.output.uint("1") {
        println!("{}", value);
    }

    Ok(())
}
