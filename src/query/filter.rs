// query/filter.rs - 过滤条件构建器
//! 将解析后的条件集合转换为服务端的 domain 表示
//!
//! domain 是三元组列表 `[[field, op, value], ...]`，列表内各项隐式为 AND。

use serde_json::{Value, json};

use super::types::*;

/// Domain 构建器
pub struct DomainBuilder<'a> {
    conditions: &'a ConditionSet,
}

impl<'a> DomainBuilder<'a> {
    pub fn new(conditions: &'a ConditionSet) -> Self {
        Self { conditions }
    }

    /// 构建完整的 domain
    ///
    /// 空集合得到空列表，服务端视为不过滤。
    pub fn build(&self) -> Value {
        Value::Array(self.conditions.iter().map(build_clause).collect())
    }
}

/// 构建单个三元组
fn build_clause(clause: &FilterClause) -> Value {
    let value = match clause.value() {
        FilterValue::Integer(n) => json!(n),
        FilterValue::Float(x) => json!(x),
        FilterValue::Date(d) => json!(d.format("%Y-%m-%d").to_string()),
        FilterValue::Text(s) => json!(s),
    };
    json!([clause.field(), clause.operator().as_str(), value])
}

/// 便捷函数
pub fn to_domain(conditions: &ConditionSet) -> Value {
    DomainBuilder::new(conditions).build()
}
