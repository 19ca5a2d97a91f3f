// session/core.rs - 会话接口
//! 批量查询引擎依赖的两个远程操作

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::Record;
use crate::error::QueryResult;
use crate::query::ConditionSet;

/// 已认证的远程会话
///
/// 同一次运行中，同一表和条件的 `fetch` 返回顺序必须稳定；
/// 不同会话之间不保证。
pub trait Session {
    /// 满足条件的总行数（忽略分页）
    fn count(&mut self, table: &str, conditions: &ConditionSet) -> QueryResult<usize>;

    /// 从 `offset` 开始最多返回 `limit` 行
    fn fetch(
        &mut self,
        table: &str,
        conditions: &ConditionSet,
        fields: &[String],
        offset: usize,
        limit: usize,
    ) -> QueryResult<Vec<Record>>;
}

impl<S: Session + ?Sized> Session for Box<S> {
    fn count(&mut self, table: &str, conditions: &ConditionSet) -> QueryResult<usize> {
        (**self).count(table, conditions)
    }

    fn fetch(
        &mut self,
        table: &str,
        conditions: &ConditionSet,
        fields: &[String],
        offset: usize,
        limit: usize,
    ) -> QueryResult<Vec<Record>> {
        (**self).fetch(table, conditions, fields, offset, limit)
    }
}

/// 服务端版本信息（版本探测的返回值）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerVersion {
    #[serde(default)]
    pub server_version: String,

    #[serde(default)]
    pub server_version_info: Vec<Value>,

    #[serde(default)]
    pub server_serie: String,

    #[serde(default)]
    pub protocol_version: i64,
}
