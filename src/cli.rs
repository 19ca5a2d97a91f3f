//! 命令行参数解析和执行
//!
//! 缺少的连接参数会在终端提示输入，密码输入不回显。

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;

use odoo_query::api::parse_limit;
use odoo_query::session::Transport;
use odoo_query::{
    AppConfig, BatchQueryEngine, OutputTarget, QueryRequest, ResultSink, RpcSession, SessionBuilder,
    SinkOutcome, parse_conditions,
};

/// 通过外部 API 从 Odoo 实例提取表格数据
#[derive(Parser, Debug)]
#[command(name = "odoo-query")]
#[command(version)]
#[command(about = "Extract table data from a live Odoo instance through its external API")]
#[command(long_about = "Extract table data from a live Odoo instance through its external API.\n\n\
    Example:\n\n  odoo-query -u https://www.example.com -d example-db-8858 -U my_user \
    -t res.partner -c \"date > 2024/12/1, name like 'sam%'\" -f id -f name -f date -l 30")]
pub struct Cli {
    /// Url for the Odoo instance. Example: https://example.com
    #[arg(short = 'u', long, env = "ODOO_URL")]
    pub url: Option<String>,

    /// Name of the database. Example: my_db1125
    #[arg(short = 'd', long, env = "ODOO_DB")]
    pub db: Option<String>,

    /// Name of the user in the database. Example: myuser
    #[arg(short = 'U', long, env = "ODOO_USER")]
    pub user: Option<String>,

    /// Password for the user. Prompted without echo when missing.
    #[arg(short = 'p', long, env = "ODOO_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Table name to query. Example: res.partner
    #[arg(short = 't', long)]
    pub table: Option<String>,

    /// Conditions applied to the data. Example: "date > 2024/12/1, name like 'sam%'"
    #[arg(short = 'c', long)]
    pub conditions: Option<String>,

    /// Field to return, repeatable. Example: -f id -f name -f date
    #[arg(short = 'f', long = "fields")]
    pub fields: Vec<String>,

    /// Only extract this many rows. Example: -l 10
    #[arg(short = 'l', long)]
    pub limit: Option<String>,

    /// Directory to save <table>.json to. Prints the result when missing.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Rows per request when extracting everything (default from config, 500).
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Configuration file (default ./odoo_query.toml).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Only check that the server answers and print its version.
    #[arg(long)]
    pub check: bool,

    /// Enable debug logging.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Suppress all logging output.
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

impl Cli {
    pub fn run(self, config: &AppConfig) -> Result<()> {
        // 本地参数先校验，出错时不会发出任何远程调用
        let conditions = parse_conditions(self.conditions.as_deref())?;
        let limit = match self.limit.as_deref() {
            Some(text) => parse_limit(text)?,
            None => None,
        };
        let page_size = self.page_size.unwrap_or(config.query.page_size);

        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut prompt_out = io::stderr();

        let url = require(self.url, "Url", &mut input, &mut prompt_out)?;
        let db = require(self.db, "Db", &mut input, &mut prompt_out)?;

        if self.check {
            let session = SessionBuilder::new(url)
                .database(db)
                .timeout(config.timeout())
                .open()?;
            return report_check(&session, &mut io::stdout());
        }

        let user = require(self.user, "User", &mut input, &mut prompt_out)?;
        let table = require(self.table, "Table", &mut input, &mut prompt_out)?;

        let request = QueryRequest::new(table)
            .with_fields(&self.fields)
            .with_conditions(conditions)
            .with_page_size(page_size)
            .with_limit(limit);
        request.validate()?;

        let password = match self.password {
            Some(password) => password,
            None => rpassword::prompt_password("Password: ").context("could not read password")?,
        };

        let mut session = SessionBuilder::new(url)
            .database(db)
            .credentials(user, password)
            .timeout(config.timeout())
            .connect()?;
        let rows = BatchQueryEngine::new().run(&mut session, &request)?;
        info!(table = %request.table, rows = rows.len(), "query finished");

        let sink = ResultSink::new()
            .with_fallback_dir(config.fallback_dir())
            .with_pretty(config.output.pretty);
        let target = OutputTarget::from(self.output);
        let stdout = io::stdout();
        match sink.emit(&request.table, &rows, &target, &mut stdout.lock())? {
            SinkOutcome::Printed => {}
            SinkOutcome::Saved(path) => println!("File saved to {}.", path.display()),
            SinkOutcome::Skipped(reason) => println!("{}", reason),
        }
        Ok(())
    }
}

/// `--check`：版本探测失败时返回错误
fn report_check<T: Transport, W: Write>(session: &RpcSession<T>, out: &mut W) -> Result<()> {
    if !session.check_connection() {
        bail!("server did not answer the version probe");
    }
    writeln!(out, "Connection OK.")?;
    Ok(())
}

/// 返回已有的值，否则在终端提示输入直到得到非空值
fn require<R: BufRead, W: Write>(
    value: Option<String>,
    label: &str,
    input: &mut R,
    out: &mut W,
) -> Result<String> {
    if let Some(value) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        return Ok(value);
    }

    loop {
        write!(out, "{}: ", label)?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("missing value for {}", label.to_lowercase());
        }
        let line = line.trim();
        if !line.is_empty() {
            return Ok(line.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odoo_query::{QueryError, QueryResult};
    use serde_json::{Value, json};
    use std::io::Cursor;

    /// 固定应答的传输层
    struct StaticTransport(fn() -> QueryResult<Value>);

    impl Transport for StaticTransport {
        fn call(&self, _service: &str, _method: &str, _args: Vec<Value>) -> QueryResult<Value> {
            (self.0)()
        }
    }

    #[test]
    fn test_require_uses_given_value() {
        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        let value = require(Some(" res.partner ".to_string()), "Table", &mut input, &mut out).unwrap();
        assert_eq!(value, "res.partner");
        assert!(out.is_empty());
    }

    #[test]
    fn test_require_prompts_until_non_empty() {
        let mut input = Cursor::new(b"\n  \nmy_db\n".to_vec());
        let mut out = Vec::new();
        let value = require(None, "Db", &mut input, &mut out).unwrap();
        assert_eq!(value, "my_db");
        assert_eq!(String::from_utf8(out).unwrap(), "Db: Db: Db: ");
    }

    #[test]
    fn test_require_fails_on_eof() {
        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        assert!(require(None, "Url", &mut input, &mut out).is_err());
    }

    #[test]
    fn test_report_check() {
        let up = RpcSession::new(
            StaticTransport(|| Ok(json!({"server_version": "17.0", "protocol_version": 1}))),
            "db",
            "",
            "",
        );
        let mut out = Vec::new();
        report_check(&up, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Connection OK.\n");

        let down = RpcSession::new(
            StaticTransport(|| Err(QueryError::Connection("connection refused".to_string()))),
            "db",
            "",
            "",
        );
        let mut out = Vec::new();
        assert!(report_check(&down, &mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "odoo-query",
            "-u", "https://www.example.com",
            "-d", "example-db",
            "-U", "me",
            "-p", "pw",
            "-t", "res.partner",
            "-c", "date > 2024/12/1, name like 'sam%'",
            "-f", "id",
            "-f", "name",
            "-l", "30",
            "-o", "/tmp",
        ])
        .unwrap();

        assert_eq!(cli.url.as_deref(), Some("https://www.example.com"));
        assert_eq!(cli.table.as_deref(), Some("res.partner"));
        assert_eq!(cli.fields, vec!["id", "name"]);
        assert_eq!(cli.limit.as_deref(), Some("30"));
        assert_eq!(cli.output, Some(PathBuf::from("/tmp")));
        assert!(!cli.check);
    }

    #[test]
    fn test_local_errors_before_network() {
        let config = AppConfig::default();

        let cli = Cli::try_parse_from(["odoo-query", "-u", "http://127.0.0.1:9", "-c", "name like"]).unwrap();
        let err = cli.run(&config).unwrap_err();
        assert!(err.to_string().contains("Condition syntax error"));

        let cli = Cli::try_parse_from(["odoo-query", "-u", "http://127.0.0.1:9", "-l", "ten"]).unwrap();
        let err = cli.run(&config).unwrap_err();
        assert!(err.to_string().contains("Invalid argument"));
    }
}
