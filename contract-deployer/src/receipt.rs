//! 交易收据轮询
//!
//! 交易广播后按固定间隔查询收据，超出重试次数则返回超时错误。

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::DeployerError;

/// 默认重试次数（不含首次查询）
pub const DEFAULT_RECEIPT_RETRIES: u32 = 6;

/// 默认轮询间隔
pub const DEFAULT_RECEIPT_INTERVAL: Duration = Duration::from_secs(1);

/// 收据轮询策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptPolicy {
    /// 首次查询之后的最大重试次数
    pub retries: u32,
    /// 两次查询之间的等待时间
    pub interval: Duration,
}

impl Default for ReceiptPolicy {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RECEIPT_RETRIES,
            interval: DEFAULT_RECEIPT_INTERVAL,
        }
    }
}

impl ReceiptPolicy {
    /// 最多查询次数（首次 + 重试）
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

/// 轮询直到拿到收据
///
/// `fetch` 返回 `Ok(None)` 表示收据尚未产生；返回错误时立即终止轮询。
/// 拿到收据后立即返回，不再发起查询。
pub async fn wait_for_receipt<R, F, Fut>(
    policy: &ReceiptPolicy,
    mut fetch: F,
) -> Result<R, DeployerError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<R>, DeployerError>>,
{
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        if let Some(receipt) = fetch().await? {
            debug!("第 {} 次查询拿到收据", attempt);
            return Ok(receipt);
        }

        if attempt >= policy.max_attempts() {
            return Err(DeployerError::ReceiptTimeout { attempts: attempt });
        }

        debug!("收据未就绪 ({}/{}), {:?} 后重试", attempt, policy.max_attempts(), policy.interval);
        tokio::time::sleep(policy.interval).await;
    }
}
