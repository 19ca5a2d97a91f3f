//! odoo-query: 从 Odoo 实例提取表格数据
//!
//! ```bash
//! odoo-query -u https://www.example.com -d example-db-8858 -U my_user \
//!     -c "date > 2024/12/1, name like 'sam%'" -t res.partner -f id -f name -f date -l 30
//! ```

mod cli;

use std::process::ExitCode;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use odoo_query::AppConfig;

use cli::Cli;

/// 初始化日志，输出到 stderr
///
/// - `quiet`: 关闭所有日志
/// - `verbose`: debug 级别
/// - 否则 RUST_LOG，再否则配置文件中的级别
fn init_tracing(quiet: bool, verbose: bool, default_level: &str) {
    let filter = if quiet {
        EnvFilter::new("off")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // 显式指定的配置文件出错直接退出；默认文件出错则退回默认配置
    let (config, config_error) = match AppConfig::load_or_default(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(cli.quiet, cli.verbose, &config.logging.level);
    if let Some(e) = config_error {
        warn!("{}; using default configuration", e);
    }

    match cli.run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
