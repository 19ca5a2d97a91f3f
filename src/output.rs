// output.rs - 结果输出
// 打印到终端，或写入 <目录>/<表名>.json；目录无效时退回到下载目录

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::api::ResultSet;
use crate::error::QueryResult;

/// 输出目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// 打印到终端
    Console,
    /// 写入目录
    Directory(PathBuf),
}

impl From<Option<PathBuf>> for OutputTarget {
    fn from(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => OutputTarget::Directory(path),
            None => OutputTarget::Console,
        }
    }
}

/// 输出结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkOutcome {
    Printed,
    Saved(PathBuf),
    /// 没有可写的目录，附带诊断信息
    Skipped(String),
}

/// 结果输出器
#[derive(Debug, Clone, Default)]
pub struct ResultSink {
    fallback_dir: Option<PathBuf>,
    pretty: bool,
}

impl ResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置备用目录（通常是 ~/Downloads）
    pub fn with_fallback_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.fallback_dir = dir;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// 输出结果集
    ///
    /// 写文件失败不会返回错误，而是返回 `SinkOutcome::Skipped`。
    /// 只有写终端失败和序列化失败才返回错误。
    pub fn emit<W: Write>(
        &self,
        table: &str,
        rows: &ResultSet,
        target: &OutputTarget,
        console: &mut W,
    ) -> QueryResult<SinkOutcome> {
        let text = rows.to_json(self.pretty)?;
        match target {
            OutputTarget::Console => {
                writeln!(console, "{}", text)?;
                Ok(SinkOutcome::Printed)
            }
            OutputTarget::Directory(dir) => Ok(self.save(table, &text, dir)),
        }
    }

    fn save(&self, table: &str, text: &str, dir: &Path) -> SinkOutcome {
        let file_name = output_file_name(table);

        let mut candidates: Vec<&Path> = Vec::new();
        if dir.is_dir() {
            candidates.push(dir);
        } else {
            warn!(path = %dir.display(), "output path is not a directory");
        }
        if let Some(fallback) = self.fallback_dir.as_deref() {
            if fallback.is_dir() && fallback != dir {
                candidates.push(fallback);
            }
        }

        for candidate in candidates {
            let path = candidate.join(&file_name);
            match fs::write(&path, text) {
                Ok(()) => {
                    info!(path = %path.display(), bytes = text.len(), "result saved");
                    return SinkOutcome::Saved(path);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "could not write result"),
            }
        }

        SinkOutcome::Skipped(format!(
            "Value provided in output argument `{}` does not match a writable directory. File was not saved.",
            dir.display()
        ))
    }
}

/// 输出文件名：<表名>.json，路径分隔符替换为下划线
pub fn output_file_name(table: &str) -> String {
    let name: String = table
        .trim()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{}.json", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Record;
    use serde_json::json;
    use tempfile::tempdir;

    fn sample() -> ResultSet {
        let rows: Vec<Record> = vec![
            json!({"id": 1, "name": "Acme"}),
            json!({"id": 2, "name": "Globex", "partner_id": [3, "Sam"]}),
        ]
        .into_iter()
        .filter_map(|v| v.as_object().cloned())
        .collect();
        ResultSet::from(rows)
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("res.partner"), "res.partner.json");
        assert_eq!(output_file_name("../x"), ".._x.json");
    }

    #[test]
    fn test_print_to_console() {
        let mut console = Vec::new();
        let outcome = ResultSink::new()
            .emit("res.partner", &sample(), &OutputTarget::Console, &mut console)
            .unwrap();

        assert_eq!(outcome, SinkOutcome::Printed);
        let printed = String::from_utf8(console).unwrap();
        assert_eq!(ResultSet::from_json(printed.trim()).unwrap(), sample());
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempdir().unwrap();
        let target = OutputTarget::Directory(dir.path().to_path_buf());

        let outcome = ResultSink::new()
            .with_pretty(true)
            .emit("res.partner", &sample(), &target, &mut Vec::new())
            .unwrap();

        let expected = dir.path().join("res.partner.json");
        assert_eq!(outcome, SinkOutcome::Saved(expected.clone()));
        let text = fs::read_to_string(expected).unwrap();
        assert_eq!(ResultSet::from_json(&text).unwrap(), sample());
    }

    #[test]
    fn test_fallback_directory() {
        let fallback = tempdir().unwrap();
        let missing = fallback.path().join("does-not-exist");
        let target = OutputTarget::Directory(missing);

        let outcome = ResultSink::new()
            .with_fallback_dir(Some(fallback.path().to_path_buf()))
            .emit("sale.order", &sample(), &target, &mut Vec::new())
            .unwrap();

        assert_eq!(outcome, SinkOutcome::Saved(fallback.path().join("sale.order.json")));
    }

    #[test]
    fn test_skipped_when_nothing_is_writable() {
        let base = tempdir().unwrap();
        let target = OutputTarget::Directory(base.path().join("missing"));

        let outcome = ResultSink::new()
            .with_fallback_dir(Some(base.path().join("also-missing")))
            .emit("sale.order", &sample(), &target, &mut Vec::new())
            .unwrap();

        assert!(matches!(outcome, SinkOutcome::Skipped(_)));
        assert_eq!(fs::read_dir(base.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_target_from_option() {
        assert_eq!(OutputTarget::from(None), OutputTarget::Console);
        assert_eq!(
            OutputTarget::from(Some(PathBuf::from("/tmp"))),
            OutputTarget::Directory(PathBuf::from("/tmp"))
        );
    }
}
