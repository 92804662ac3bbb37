//! 合约调用编解码
//!
//! 按方法名查找 ABI，按位置编码参数并加上选择器前缀；
//! 返回数据按输出定义解码为具名字段。

use std::fmt;

use alloy::dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt};
use alloy::json_abi::{Function, JsonAbi};
use alloy::primitives::{Address, Bytes, U256};

use crate::error::DeployerError;

/// 按名称查找方法（重载时取第一个）
pub fn find_method<'a>(abi: &'a JsonAbi, name: &str) -> Result<&'a Function, DeployerError> {
    abi.function(name)
        .and_then(|overloads| overloads.first())
        .ok_or_else(|| DeployerError::MethodNotFound(name.to_string()))
}

/// 编码调用数据: selector ++ abi_encode(args)
pub fn encode_call(function: &Function, args: &[DynSolValue]) -> Result<Bytes, DeployerError> {
    let encoded = function.abi_encode_input_raw(args)?;

    let mut data = Vec::with_capacity(4 + encoded.len());
    data.extend_from_slice(function.selector().as_slice());
    data.extend_from_slice(&encoded);
    Ok(data.into())
}

/// 将返回数据解码为具名字段
pub fn decode_output(function: &Function, raw: &[u8]) -> Result<CallOutput, DeployerError> {
    let values = function.abi_decode_output(raw)?;
    let fields = function
        .outputs
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (param, value))| (field_name(&param.name, i), value))
        .collect();
    Ok(CallOutput { fields })
}

/// 无名参数以位置作为字段名
pub(crate) fn field_name(name: &str, index: usize) -> String {
    if name.is_empty() {
        index.to_string()
    } else {
        name.to_string()
    }
}

/// 调用返回值（保持 ABI 输出顺序）
#[derive(Debug, Clone, PartialEq)]
pub struct CallOutput {
    fields: Vec<(String, DynSolValue)>,
}

impl CallOutput {
    pub fn get(&self, name: &str) -> Option<&DynSolValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn address(&self, name: &str) -> Option<Address> {
        self.get(name).and_then(DynSolValue::as_address)
    }

    pub fn uint(&self, name: &str) -> Option<U256> {
        self.get(name).and_then(|v| v.as_uint()).map(|(value, _)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DynSolValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl fmt::Display for CallOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(name, value)| format!("{}={}", name, format_value(value)))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// 将 ABI 值格式化为可读字符串
pub fn format_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Address(addr) => addr.to_string(),
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Uint(v, _) => v.to_string(),
        DynSolValue::Int(v, _) => v.to_string(),
        DynSolValue::FixedBytes(word, size) => format!("0x{}", hex::encode(&word[..*size])),
        DynSolValue::Bytes(bytes) => format!("0x{}", hex::encode(bytes)),
        DynSolValue::String(s) => format!("{:?}", s),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => {
            let inner: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", inner.join(", "))
        }
        DynSolValue::Tuple(items) => {
            let inner: Vec<String> = items.iter().map(format_value).collect();
            format!("({})", inner.join(", "))
        }
        other => format!("{:?}", other),
    }
}
