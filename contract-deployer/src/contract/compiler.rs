//! solc 编译器封装
//!
//! 将源码写入临时目录，交给 foundry-compilers 调用 solc 编译，从产物中取出 ABI 与部署字节码。

use std::path::PathBuf;

use alloy::json_abi::JsonAbi;
use alloy::primitives::Bytes;
use foundry_compilers::artifacts::CompilerOutput;
use foundry_compilers::solc::Solc as SolcCompiler;
use tracing::{debug, info};

use crate::error::DeployerError;

/// 编译产物
#[derive(Debug, Clone)]
pub struct CompiledContract {
    /// 合约名称
    pub name: String,
    /// 合约 ABI
    pub abi: JsonAbi,
    /// 部署字节码（构造函数 + 运行时代码）
    pub bytecode: Bytes,
}

/// solc 可执行文件
#[derive(Debug, Clone)]
pub struct Solc {
    path: PathBuf,
}

impl Default for Solc {
    fn default() -> Self {
        Self::new("solc")
    }
}

impl Solc {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 编译源码并取出指定合约
    pub async fn compile(&self, source: &str, contract: &str) -> Result<CompiledContract, DeployerError> {
        let dir = tempfile::tempdir()?;
        let source_path = dir.path().join(format!("{}.sol", contract));
        tokio::fs::write(&source_path, source).await?;

        debug!("调用 {:?} 编译 {:?}", self.path, source_path);

        // solc 为阻塞调用
        let solc_path = self.path.clone();
        let output = tokio::task::spawn_blocking(move || {
            let solc = SolcCompiler::new(solc_path)?;
            solc.compile_source(&source_path)
        })
        .await
        .map_err(|e| DeployerError::Compile(format!("solc task failed: {}", e)))??;

        let compiled = extract_contract(&output, contract)?;
        info!(
            "合约 {} 编译完成, 字节码 {} bytes, {} 个 ABI 条目",
            compiled.name,
            compiled.bytecode.len(),
            compiled.abi.len()
        );
        Ok(compiled)
    }
}

/// 从编译输出中取出指定合约的 ABI 与字节码
pub fn extract_contract(output: &CompilerOutput, contract: &str) -> Result<CompiledContract, DeployerError> {
    let errors: Vec<&str> = output
        .errors
        .iter()
        .filter(|e| e.severity.is_error())
        .map(|e| e.message.as_str())
        .collect();
    if !errors.is_empty() {
        return Err(DeployerError::Compile(errors.join("; ")));
    }

    let artifact = output
        .find(contract)
        .ok_or_else(|| DeployerError::Compile(format!("contract {} not found in solc output", contract)))?;

    let abi = artifact
        .abi
        .cloned()
        .ok_or_else(|| DeployerError::Compile(format!("contract {} has no ABI", contract)))?;

    let bytecode = artifact
        .bin
        .and_then(|bin| bin.as_bytes())
        .filter(|bytes| !bytes.is_empty())
        .cloned()
        .ok_or_else(|| DeployerError::Compile(format!("contract {} has no bytecode", contract)))?;

    Ok(CompiledContract {
        name: contract.to_string(),
        abi,
        bytecode,
    })
}
