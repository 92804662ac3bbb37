//! 收据日志解码

use std::fmt;

use alloy::dyn_abi::{DynSolValue, EventExt};
use alloy::json_abi::JsonAbi;
use alloy::primitives::{Address, Log};
use tracing::debug;

use crate::call::{field_name, format_value};
use crate::error::DeployerError;

/// 按 ABI 事件定义解码后的日志
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedLog {
    pub event: String,
    pub address: Address,
    pub fields: Vec<(String, DynSolValue)>,
}

impl fmt::Display for DecodedLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(name, value)| format!("{}={}", name, format_value(value)))
            .collect();
        write!(f, "{}({}) @ {}", self.event, parts.join(", "), self.address)
    }
}

/// 解码单条日志；topic0 不匹配任何非匿名事件时返回 `None`
pub fn decode_log(abi: &JsonAbi, log: &Log) -> Result<Option<DecodedLog>, DeployerError> {
    let Some(topic0) = log.data.topics().first() else {
        return Ok(None);
    };
    let Some(event) = abi
        .events()
        .find(|event| !event.anonymous && event.selector() == *topic0)
    else {
        return Ok(None);
    };

    let decoded = event.decode_log(&log.data)?;
    let mut indexed = decoded.indexed.into_iter();
    let mut body = decoded.body.into_iter();

    let fields = event
        .inputs
        .iter()
        .enumerate()
        .filter_map(|(i, input)| {
            let value = if input.indexed {
                indexed.next()
            } else {
                body.next()
            };
            value.map(|value| (field_name(&input.name, i), value))
        })
        .collect();

    Ok(Some(DecodedLog {
        event: event.name.clone(),
        address: log.address,
        fields,
    }))
}

/// 解码收据中的所有日志，无法识别的日志被跳过
pub fn decode_logs(
    abi: &JsonAbi,
    logs: &[alloy::rpc::types::Log],
) -> Result<Vec<DecodedLog>, DeployerError> {
    let mut decoded = Vec::with_capacity(logs.len());
    for log in logs {
        match decode_log(abi, &log.inner)? {
            Some(entry) => decoded.push(entry),
            None => debug!("跳过无法识别的日志: {:?}", log.inner.data.topics().first()),
        }
    }
    Ok(decoded)
}
