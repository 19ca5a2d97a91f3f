// api/response.rs - 查询结果类型
//! 定义结果集以及它的 JSON 表示

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::QueryResult;

/// 单行记录：字段名 → 值
pub type Record = Map<String, Value>;

/// 结果集
///
/// 行的顺序即窗口顺序（offset 递增）。序列化为 JSON 数组。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    rows: Vec<Record>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.rows.iter()
    }

    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }

    /// 追加一页结果，保持顺序
    pub(crate) fn append(&mut self, page: Vec<Record>) {
        self.rows.extend(page);
    }

    /// 序列化为 JSON 文本
    pub fn to_json(&self, pretty: bool) -> QueryResult<String> {
        let text = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(text)
    }

    /// 从 JSON 数组解析
    pub fn from_json(text: &str) -> QueryResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

impl From<Vec<Record>> for ResultSet {
    fn from(rows: Vec<Record>) -> Self {
        Self { rows }
    }
}

impl IntoIterator for ResultSet {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
