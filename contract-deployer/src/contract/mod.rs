//! 合约生成与编译

pub mod compiler;
pub mod source;

pub use compiler::{extract_contract, CompiledContract, Solc};
pub use source::{ContractSource, EventDef, DEFAULT_CONTRACT_NAME};

use alloy::primitives::{address, keccak256, Address, Selector};

use crate::error::DeployerError;

/// 事件参数中使用的地址 (首字节为 0x01)
pub const ONE_ADDRESS: Address = address!("0100000000000000000000000000000000000000");

/// 无参方法 `name()` 的 4 字节选择器
pub fn method_sig(name: &str) -> Selector {
    let hash = keccak256(format!("{}()", name).as_bytes());
    Selector::from_slice(&hash[..4])
}

impl ContractSource {
    /// 使用给定的 solc 编译当前合约
    pub async fn compile(&self, solc: &Solc) -> Result<CompiledContract, DeployerError> {
        solc.compile(&self.render(), self.name()).await
    }
}

/// 构建示例合约
///
/// - 事件 `A(address indexed, address indexed)`
/// - `setA(address, uint256)` 原样返回参数
/// - `setA1()` 以 `ONE_ADDRESS` 触发事件 `A`
pub fn sample_contract() -> ContractSource {
    let mut contract = ContractSource::default();
    contract.add_event(EventDef::new("A").add("address", true).add("address", true));
    contract.add_dual_caller("setA", &["address", "uint256"]);
    contract.emit_event(
        "setA1",
        "A",
        &[ONE_ADDRESS.to_string(), ONE_ADDRESS.to_string()],
    );
    contract
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_abi;

    #[test]
    fn test_method_sig_known_selectors() {
        assert_eq!(method_sig("totalSupply"), Selector::from([0x18, 0x16, 0x0d, 0xdd]));
        assert_eq!(method_sig("decimals"), Selector::from([0x31, 0x3c, 0xe5, 0x67]));
    }

    #[test]
    fn test_method_sig_matches_abi() {
        let abi = sample_abi();
        let set_a1 = &abi.function("setA1").unwrap()[0];
        assert_eq!(method_sig("setA1"), set_a1.selector());
    }

    #[test]
    fn test_sample_contract_source() {
        let rendered = sample_contract().render();

        assert!(rendered.contains("contract Sample {"));
        assert!(rendered.contains("event A(address indexed val_0, address indexed val_1);"));
        assert!(rendered.contains("function setA(address val_0, uint256 val_1)"));
        assert!(rendered.contains(
            "emit A(0x0100000000000000000000000000000000000000, 0x0100000000000000000000000000000000000000);"
        ));
    }
}
