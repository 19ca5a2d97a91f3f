// engine/core.rs - 批量查询引擎
//! 通过多次有界 fetch 拼出完整结果集
//!
//! 流程:
//! 1. 有显式 limit 时只发一次 fetch(offset=0, limit)，不做 count
//! 2. 否则先 count 得到总行数，计算窗口数 = 总行数 / 页大小（有余数再加一）
//! 3. 按 offset 递增顺序逐个 fetch，结果依次追加
//!
//! 总行数为 0 时不发出任何 fetch，直接返回空结果集。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::{debug, info};

use crate::api::{QueryRequest, ResultSet};
use crate::error::{QueryError, QueryResult};
use crate::query::PageWindow;
use crate::session::Session;

/// 协作式取消标记，只在两个窗口之间检查
pub type CancelFlag = Arc<AtomicBool>;

/// 批量查询引擎
#[derive(Debug, Clone, Default)]
pub struct BatchQueryEngine {
    cancel: Option<CancelFlag>,
}

impl BatchQueryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置取消标记
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// 执行查询
    ///
    /// 任一窗口失败时立即返回错误，已取得的部分结果被丢弃。
    pub fn run<S: Session + ?Sized>(&self, session: &mut S, request: &QueryRequest) -> QueryResult<ResultSet> {
        request.validate()?;
        let start = Instant::now();

        if let Some(limit) = request.explicit_limit {
            self.check_cancelled(0)?;
            let rows = session.fetch(&request.table, &request.conditions, &request.fields, 0, limit)?;
            info!(table = %request.table, limit, rows = rows.len(), "limited fetch done");
            return Ok(ResultSet::from(rows));
        }

        let total_rows = session.count(&request.table, &request.conditions)?;
        let windows = page_windows(total_rows, request.page_size);
        info!(
            table = %request.table,
            total_rows,
            page_size = request.page_size,
            batches = windows.len(),
            "starting batched fetch"
        );

        let result = windows
            .iter()
            .enumerate()
            .try_fold(ResultSet::new(), |mut acc, (index, window)| {
                self.check_cancelled(index)?;
                let page = session.fetch(
                    &request.table,
                    &request.conditions,
                    &request.fields,
                    window.offset,
                    window.limit,
                )?;
                debug!(
                    window = index,
                    offset = window.offset,
                    limit = window.limit,
                    rows = page.len(),
                    "window fetched"
                );
                acc.append(page);
                Ok::<_, QueryError>(acc)
            })?;

        info!(
            table = %request.table,
            rows = result.len(),
            took_ms = start.elapsed().as_millis() as u64,
            "batched fetch done"
        );
        Ok(result)
    }

    fn check_cancelled(&self, window: usize) -> QueryResult<()> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(QueryError::Cancelled { window }),
            _ => Ok(()),
        }
    }
}

/// 覆盖 `total_rows` 行所需的窗口数
///
/// `page_size` 必须大于 0。
pub fn batch_count(total_rows: usize, page_size: usize) -> usize {
    let mut batches = total_rows / page_size;
    if total_rows % page_size > 0 {
        batches += 1;
    }
    batches
}

/// 生成无缝、不重叠地覆盖 `[0, total_rows)` 的窗口序列
///
/// 最后一个窗口的 limit 为余数（若有）。
pub fn page_windows(total_rows: usize, page_size: usize) -> Vec<PageWindow> {
    (0..batch_count(total_rows, page_size))
        .map(|index| {
            let offset = index * page_size;
            PageWindow::new(offset, page_size.min(total_rows - offset))
        })
        .collect()
}
