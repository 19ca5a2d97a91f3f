// error.rs - 错误类型
//! 整个查询流程共用的错误类型

/// 查询错误
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// 条件文本格式错误，在任何网络调用之前报告
    #[error("Condition syntax error in `{clause}`: {reason}")]
    ConditionSyntax { clause: String, reason: String },

    /// 认证失败（凭据错误或认证端点不可达）
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// 传输层错误
    #[error("Connection error: {0}")]
    Connection(String),

    /// 服务端返回的错误对象（例如字段不存在）
    #[error("Remote error {code}: {message}")]
    Remote { code: i64, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// 在发出第 `window` 个窗口之前被取消
    #[error("Query cancelled before window {window}")]
    Cancelled { window: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl QueryError {
    pub fn syntax(clause: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConditionSyntax {
            clause: clause.into(),
            reason: reason.into(),
        }
    }
}

pub type QueryResult<T> = Result<T, QueryError>;
