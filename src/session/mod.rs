// session/mod.rs - 远程会话模块
//! 会话接口、传输层和构建器

pub mod core;
pub mod builder;
pub mod rpc;
pub mod transport;

pub use self::core::*;
pub use builder::*;
pub use rpc::*;
pub use transport::*;
