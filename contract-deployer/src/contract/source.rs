//! Solidity 合约源码生成
//!
//! 以构建器的方式拼装一个测试合约：事件声明、回显参数的调用方法、触发事件的方法。

/// 生成合约的默认名称
pub const DEFAULT_CONTRACT_NAME: &str = "Sample";

/// 事件字段
#[derive(Debug, Clone, PartialEq, Eq)]
struct EventField {
    ty: String,
    indexed: bool,
}

/// 事件声明
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDef {
    name: String,
    fields: Vec<EventField>,
}

impl EventDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// 追加一个字段，字段名按位置生成为 `val_<i>`
    pub fn add(mut self, ty: impl Into<String>, indexed: bool) -> Self {
        self.fields.push(EventField {
            ty: ty.into(),
            indexed,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 渲染为 Solidity 事件声明
    pub fn render(&self) -> String {
        let args: Vec<String> = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                if field.indexed {
                    format!("{} indexed val_{}", field.ty, i)
                } else {
                    format!("{} val_{}", field.ty, i)
                }
            })
            .collect();
        format!("event {}({});", self.name, args.join(", "))
    }
}

/// 合约源码构建器
#[derive(Debug, Clone)]
pub struct ContractSource {
    name: String,
    events: Vec<EventDef>,
    functions: Vec<String>,
}

impl Default for ContractSource {
    fn default() -> Self {
        Self::new(DEFAULT_CONTRACT_NAME)
    }
}

impl ContractSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            events: Vec::new(),
            functions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 添加事件声明
    pub fn add_event(&mut self, event: EventDef) -> &mut Self {
        self.events.push(event);
        self
    }

    /// 添加回显方法：按位置接收参数，并原样（无名）返回
    pub fn add_dual_caller(&mut self, method: &str, types: &[&str]) -> &mut Self {
        let inputs: Vec<String> = types
            .iter()
            .enumerate()
            .map(|(i, ty)| format!("{} val_{}", ty, i))
            .collect();
        let returns: Vec<String> = (0..types.len()).map(|i| format!("val_{}", i)).collect();

        self.functions.push(format!(
            "function {}({}) public pure returns ({}) {{\n        return ({});\n    }}",
            method,
            inputs.join(", "),
            types.join(", "),
            returns.join(", "),
        ));
        self
    }

    /// 添加一个无参方法，调用时触发指定事件
    pub fn emit_event(&mut self, method: &str, event: &str, args: &[String]) -> &mut Self {
        self.functions.push(format!(
            "function {}() public payable {{\n        emit {}({});\n    }}",
            method,
            event,
            args.join(", "),
        ));
        self
    }

    /// 渲染完整的 Solidity 源码
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("// SPDX-License-Identifier: MIT\n");
        out.push_str("pragma solidity >=0.5.0;\n\n");
        out.push_str(&format!("contract {} {{\n", self.name));

        for event in &self.events {
            out.push_str(&format!("    {}\n", event.render()));
        }
        for function in &self.functions {
            out.push('\n');
            out.push_str(&format!("    {}\n", function));
        }

        out.push_str("}\n");
        out
    }
}
