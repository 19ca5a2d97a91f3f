// query/mod.rs - 查询模块
//! 条件解析和 domain 构建

mod parser;
pub mod filter;
pub mod types;

pub use parser::*;
pub use filter::*;
pub use types::*;
