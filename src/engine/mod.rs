// engine/mod.rs - 批量查询引擎
//! 分页拉取并聚合结果

pub mod core;

pub use self::core::*;
