// src/lib.rs
pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod query;
pub mod session;

pub use config::AppConfig;
pub use error::{QueryError, QueryResult};
pub use engine::{BatchQueryEngine, CancelFlag};
pub use output::{OutputTarget, ResultSink, SinkOutcome};
pub use query::{ConditionParser, ConditionSet, parse_conditions};
pub use api::{QueryRequest, ResultSet};
pub use session::{RpcSession, Session, SessionBuilder};
