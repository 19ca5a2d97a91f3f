// api/request.rs - 查询请求类型
//! 定义一次表格提取的结构化请求

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};
use crate::query::ConditionSet;

/// 服务端默认的单页行数
pub const DEFAULT_PAGE_SIZE: usize = 500;

/// 查询请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// 表名（模型名），例如 res.partner
    pub table: String,

    /// 需要返回的字段，空表示全部字段
    #[serde(default)]
    pub fields: Vec<String>,

    /// 过滤条件
    #[serde(default)]
    pub conditions: ConditionSet,

    /// 每个窗口的行数
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// 显式行数限制：设置后只发出一次 fetch，不做 count
    #[serde(default)]
    pub explicit_limit: Option<usize>,
}

fn default_page_size() -> usize { DEFAULT_PAGE_SIZE }

impl QueryRequest {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into().trim().to_string(),
            fields: Vec::new(),
            conditions: ConditionSet::new(),
            page_size: default_page_size(),
            explicit_limit: None,
        }
    }

    /// 设置字段列表
    ///
    /// 字段名去除空白并转为小写，重复的字段只保留第一次出现。
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for field in fields {
            let field = field.as_ref().trim().to_lowercase();
            if !field.is_empty() && !normalized.contains(&field) {
                normalized.push(field);
            }
        }
        self.fields = normalized;
        self
    }

    pub fn with_conditions(mut self, conditions: ConditionSet) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.explicit_limit = limit;
        self
    }

    /// 检查请求是否可以执行
    pub fn validate(&self) -> QueryResult<()> {
        if self.table.is_empty() {
            return Err(QueryError::InvalidArgument("table name is empty".to_string()));
        }
        if self.page_size == 0 {
            return Err(QueryError::InvalidArgument("page size must be greater than 0".to_string()));
        }
        if self.explicit_limit == Some(0) {
            return Err(QueryError::InvalidArgument("limit must be greater than 0".to_string()));
        }
        Ok(())
    }
}

/// 解析命令行传入的行数限制
///
/// 空文本或 "none" 表示不限制；其它非正整数文本都是错误。
pub fn parse_limit(text: &str) -> QueryResult<Option<usize>> {
    let text = text.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    match text.parse::<usize>() {
        Ok(0) => Err(QueryError::InvalidArgument("limit must be greater than 0".to_string())),
        Ok(n) => Ok(Some(n)),
        Err(_) => Err(QueryError::InvalidArgument(format!(
            "limit must be an integer or none, got `{}`",
            text
        ))),
    }
}
