// session/rpc.rs - 远程会话实现
//! 通过外部 API (common / object 服务) 实现 Session

use std::fmt;

use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use super::core::{ServerVersion, Session};
use super::transport::{HttpTransport, Transport};
use crate::api::Record;
use crate::error::{QueryError, QueryResult};
use crate::query::{ConditionSet, to_domain};

const SERVICE_COMMON: &str = "common";
const SERVICE_OBJECT: &str = "object";

/// 远程会话
///
/// 创建后尚未认证；`authenticate` 成功之前 count/fetch 返回 `QueryError::Auth`。
pub struct RpcSession<T: Transport = HttpTransport> {
    transport: T,
    database: String,
    username: String,
    password: String,
    uid: Option<i64>,
}

impl<T: Transport> RpcSession<T> {
    pub fn new(
        transport: T,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            database: database.into().trim().to_string(),
            username: username.into().trim().to_string(),
            password: password.into(),
            uid: None,
        }
    }

    /// 探测服务端版本
    pub fn probe_version(&self) -> QueryResult<ServerVersion> {
        let reply = self.transport.call(SERVICE_COMMON, "version", Vec::new())?;
        Ok(serde_json::from_value(reply)?)
    }

    /// 版本探测是否成功
    pub fn check_connection(&self) -> bool {
        match self.probe_version() {
            Ok(version) => {
                info!(server_version = %version.server_version, "connection ok");
                true
            }
            Err(e) => {
                warn!(error = %e, "connection check failed");
                false
            }
        }
    }

    /// 认证，成功后保存 uid
    ///
    /// 认证端点不可达或凭据错误都返回 `QueryError::Auth`。
    pub fn authenticate(&mut self) -> QueryResult<i64> {
        let args = vec![
            json!(self.database),
            json!(self.username),
            json!(self.password),
            json!({}),
        ];
        let reply = self
            .transport
            .call(SERVICE_COMMON, "authenticate", args)
            .map_err(|e| QueryError::Auth(e.to_string()))?;

        let uid = match reply {
            Value::Number(n) => n.as_i64().ok_or_else(|| {
                QueryError::Auth(format!("unexpected uid `{}`", n))
            })?,
            Value::Bool(false) | Value::Null => {
                return Err(QueryError::Auth(format!(
                    "invalid credentials for user `{}` on database `{}`",
                    self.username, self.database
                )));
            }
            other => {
                return Err(QueryError::Auth(format!("unexpected reply `{}`", other)));
            }
        };

        info!(database = %self.database, user = %self.username, uid, "authenticated");
        self.uid = Some(uid);
        Ok(uid)
    }

    pub fn is_authenticated(&self) -> bool {
        self.uid.is_some()
    }

    pub fn uid(&self) -> Option<i64> {
        self.uid
    }

    /// object.execute_kw(db, uid, password, table, operation, args, kwargs)
    fn execute_kw(
        &self,
        table: &str,
        operation: &str,
        args: Vec<Value>,
        kwargs: Option<Map<String, Value>>,
    ) -> QueryResult<Value> {
        let uid = self
            .uid
            .ok_or_else(|| QueryError::Auth("session is not authenticated".to_string()))?;

        let mut call_args = vec![
            json!(self.database),
            json!(uid),
            json!(self.password),
            json!(table),
            json!(operation),
            Value::Array(args),
        ];
        if let Some(kwargs) = kwargs {
            call_args.push(Value::Object(kwargs));
        }

        self.transport.call(SERVICE_OBJECT, "execute_kw", call_args)
    }
}

impl<T: Transport> Session for RpcSession<T> {
    fn count(&mut self, table: &str, conditions: &ConditionSet) -> QueryResult<usize> {
        let reply = self.execute_kw(table, "search_count", vec![to_domain(conditions)], None)?;
        let total = reply
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| QueryError::Connection(format!("malformed search_count reply `{}`", reply)))?;

        debug!(table, total, "search_count");
        Ok(total)
    }

    fn fetch(
        &mut self,
        table: &str,
        conditions: &ConditionSet,
        fields: &[String],
        offset: usize,
        limit: usize,
    ) -> QueryResult<Vec<Record>> {
        let mut kwargs = Map::new();
        if !fields.is_empty() {
            kwargs.insert("fields".to_string(), json!(fields));
        }
        kwargs.insert("offset".to_string(), json!(offset));
        kwargs.insert("limit".to_string(), json!(limit));

        let reply = self.execute_kw(table, "search_read", vec![to_domain(conditions)], Some(kwargs))?;
        let rows = match reply {
            Value::Array(rows) => rows,
            other => {
                return Err(QueryError::Connection(format!("malformed search_read reply `{}`", other)));
            }
        };

        rows.into_iter()
            .map(|row| match row {
                Value::Object(record) => Ok(record),
                other => Err(QueryError::Connection(format!("malformed row `{}`", other))),
            })
            .collect()
    }
}

impl<T: Transport> fmt::Debug for RpcSession<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcSession")
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"***")
            .field("uid", &self.uid)
            .finish()
    }
}
