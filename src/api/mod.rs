// api/mod.rs - API 模块
//! 提供结构化的请求和结果类型

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
