// session/builder.rs - 会话构建器
//! 使用 Builder 模式打开远程会话

use std::time::Duration;

use super::rpc::RpcSession;
use super::transport::HttpTransport;
use crate::error::{QueryError, QueryResult};

/// 会话构建器
pub struct SessionBuilder {
    url: String,
    database: String,
    username: String,
    password: String,
    timeout: Duration,
}

impl SessionBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into().trim().to_string(),
            database: String::new(),
            username: String::new(),
            password: String::new(),
            timeout: Duration::from_secs(60),
        }
    }

    /// 设置数据库名
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into().trim().to_string();
        self
    }

    /// 设置用户名和密码
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into().trim().to_string();
        self.password = password.into();
        self
    }

    /// 设置单次请求超时
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn validate(&self) -> QueryResult<()> {
        if self.url.is_empty() {
            return Err(QueryError::InvalidArgument("server url is empty".to_string()));
        }
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(QueryError::InvalidArgument(format!(
                "server url must start with http:// or https://, got `{}`",
                self.url
            )));
        }
        if self.database.is_empty() {
            return Err(QueryError::InvalidArgument("database name is empty".to_string()));
        }
        Ok(())
    }

    /// 打开会话但不认证（用于版本探测）
    pub fn open(self) -> QueryResult<RpcSession<HttpTransport>> {
        self.validate()?;
        let transport = HttpTransport::new(&self.url, self.timeout);
        Ok(RpcSession::new(transport, self.database, self.username, self.password))
    }

    /// 打开会话并立即认证
    pub fn connect(self) -> QueryResult<RpcSession<HttpTransport>> {
        if self.username.is_empty() {
            return Err(QueryError::InvalidArgument("user name is empty".to_string()));
        }
        let mut session = self.open()?;
        session.authenticate()?;
        Ok(session)
    }
}
