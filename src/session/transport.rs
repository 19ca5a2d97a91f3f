// session/transport.rs - 远程调用传输层
//! JSON-RPC 2.0 over HTTP (`<url>/jsonrpc`)

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::error::{QueryError, QueryResult};

/// 传输层：调用 `service.method(args...)` 并返回 result
pub trait Transport {
    fn call(&self, service: &str, method: &str, args: Vec<Value>) -> QueryResult<Value>;
}

/// 基于 HTTP 的阻塞式 JSON-RPC 传输
pub struct HttpTransport {
    endpoint: String,
    agent: ureq::Agent,
    next_id: AtomicU64,
}

impl HttpTransport {
    pub fn new(url: &str, timeout: Duration) -> Self {
        let endpoint = format!("{}/jsonrpc", url.trim().trim_end_matches('/'));
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            endpoint,
            agent,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    fn call(&self, service: &str, method: &str, args: Vec<Value>) -> QueryResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = request_body(id, service, method, args);
        debug!(endpoint = %self.endpoint, service, method, id, "rpc call");

        let response = self
            .agent
            .post(&self.endpoint)
            .send_json(body)
            .map_err(|e| QueryError::Connection(e.to_string()))?;
        let reply: RpcReply = response
            .into_json()
            .map_err(|e| QueryError::Connection(format!("malformed reply: {}", e)))?;

        reply.into_result()
    }
}

/// 构建请求体
pub(crate) fn request_body(id: u64, service: &str, method: &str, args: Vec<Value>) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": "call",
        "params": {
            "service": service,
            "method": method,
            "args": args,
        },
        "id": id,
    })
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcReply {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<RpcErrorData>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorData {
    #[serde(default)]
    message: String,
}

impl RpcReply {
    /// 服务端错误对象优先；否则返回 result（缺失时为 null）
    pub(crate) fn into_result(self) -> QueryResult<Value> {
        if let Some(error) = self.error {
            // data.message 通常比顶层 message 更具体
            let message = match error.data {
                Some(data) if !data.message.is_empty() => data.message,
                _ => error.message,
            };
            return Err(QueryError::Remote {
                code: error.code,
                message,
            });
        }
        Ok(self.result.unwrap_or(Value::Null))
    }
}
