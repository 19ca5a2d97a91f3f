// 测试批量查询引擎（内存会话，不需要服务器）
use odoo_query::api::{QueryRequest, Record};
use odoo_query::engine::{BatchQueryEngine, batch_count, page_windows};
use odoo_query::query::ConditionSet;
use odoo_query::session::Session;
use odoo_query::QueryResult;
use serde_json::json;

/// 内存会话：固定行数，打印每次调用
struct DemoSession {
    total: usize,
}

impl Session for DemoSession {
    fn count(&mut self, table: &str, _conditions: &ConditionSet) -> QueryResult<usize> {
        println!("   count({}) -> {}", table, self.total);
        Ok(self.total)
    }

    fn fetch(
        &mut self,
        table: &str,
        _conditions: &ConditionSet,
        _fields: &[String],
        offset: usize,
        limit: usize,
    ) -> QueryResult<Vec<Record>> {
        let end = (offset + limit).min(self.total);
        println!("   fetch({}, offset={}, limit={}) -> {} 行", table, offset, limit, end - offset);
        Ok((offset..end)
            .filter_map(|id| json!({"id": id, "name": format!("partner {}", id)}).as_object().cloned())
            .collect())
    }
}

fn main() {
    println!("=== 批量查询引擎功能测试 ===\n");

    // 测试1: 窗口计算
    println!("1. 窗口计算:");
    for (total, page) in [(1200, 500), (500, 500), (0, 500)] {
        println!(
            "   total={} page_size={} -> batch_count={} windows={:?}",
            total,
            page,
            batch_count(total, page),
            page_windows(total, page)
        );
    }

    let engine = BatchQueryEngine::new();

    // 测试2: 全量提取
    println!("\n2. 全量提取 1200 行:");
    let mut session = DemoSession { total: 1200 };
    let request = QueryRequest::new("res.partner");
    match engine.run(&mut session, &request) {
        Ok(rows) => println!("   结果: {} 行, 最后一行 {:?}", rows.len(), rows.rows().last()),
        Err(e) => println!("   错误: {}", e),
    }

    // 测试3: 显式 limit
    println!("\n3. 显式 limit=30:");
    let request = QueryRequest::new("res.partner").with_limit(Some(30));
    match engine.run(&mut session, &request) {
        Ok(rows) => println!("   结果: {} 行", rows.len()),
        Err(e) => println!("   错误: {}", e),
    }

    // 测试4: 空表
    println!("\n4. 空表:");
    let mut empty = DemoSession { total: 0 };
    let request = QueryRequest::new("res.partner");
    match engine.run(&mut empty, &request) {
        Ok(rows) => println!("   结果: {} 行", rows.len()),
        Err(e) => println!("   错误: {}", e),
    }

    println!("\n=== 测试完成 ===");
}
