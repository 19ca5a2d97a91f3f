// 配置模块 - 支持外部配置文件
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::DEFAULT_PAGE_SIZE;
use crate::error::{QueryError, QueryResult};

/// 默认配置文件路径
pub const CONFIG_FILE: &str = "./odoo_query.toml";

// ============== 配置结构体 ==============

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub connection: ConnectionConfig,
    pub query: QueryConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ConnectionConfig {
    /// 单次远程调用超时（秒）
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct QueryConfig {
    /// 每个窗口的行数
    pub page_size: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    /// 输出目录无效时使用的目录，支持 ~ 开头
    pub fallback_dir: Option<String>,
    /// 是否输出带缩进的 JSON
    pub pretty: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// 默认日志级别（RUST_LOG 优先）
    pub level: String,
}

// ============== 默认配置 ==============

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self { timeout_secs: 60 }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self { page_size: DEFAULT_PAGE_SIZE }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            fallback_dir: Some("~/Downloads".to_string()),
            pretty: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string() }
    }
}

// ============== 配置加载 ==============

impl AppConfig {
    /// 加载配置
    ///
    /// 指定路径时必须能读取；未指定时读取默认路径，文件不存在则使用默认配置。
    pub fn load(path: Option<&Path>) -> QueryResult<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None if Path::new(CONFIG_FILE).exists() => Self::load_from_file(CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// 加载配置，默认路径的文件出错时退回默认配置
    ///
    /// 显式指定的文件读取或解析失败时直接返回错误；默认文件出错时返回默认配置和该错误，
    /// 由调用方在日志初始化后记录警告。
    pub fn load_or_default(path: Option<&Path>) -> QueryResult<(Self, Option<QueryError>)> {
        match Self::load(path) {
            Ok(config) => Ok((config, None)),
            Err(e) if path.is_some() => Err(e),
            Err(e) => Ok((Self::default(), Some(e))),
        }
    }

    /// 从指定文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> QueryResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| QueryError::Config(format!("cannot read '{}': {}", path.display(), e)))?;
        Self::from_toml(&content)
            .map_err(|e| QueryError::Config(format!("'{}': {}", path.display(), e)))
    }

    pub fn from_toml(content: &str) -> QueryResult<Self> {
        let config: AppConfig = toml::from_str(content).map_err(|e| QueryError::Config(e.to_string()))?;
        if config.query.page_size == 0 {
            return Err(QueryError::Config("query.page_size must be greater than 0".to_string()));
        }
        Ok(config)
    }

    /// 远程调用超时
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.connection.timeout_secs)
    }

    /// 展开后的备用输出目录
    pub fn fallback_dir(&self) -> Option<PathBuf> {
        self.output.fallback_dir.as_deref().map(expand_home)
    }
}

/// 展开 ~ 为用户主目录；取不到主目录时原样返回
pub fn expand_home(path: &str) -> PathBuf {
    let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"));
    match (path.strip_prefix('~'), home) {
        (Some(rest), Some(home)) => {
            let rest = rest.trim_start_matches(['/', '\\']);
            PathBuf::from(home).join(rest)
        }
        _ => PathBuf::from(path),
    }
}
