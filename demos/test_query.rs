// 测试条件解析功能
use odoo_query::query::{ConditionParser, to_domain};

fn main() {
    let parser = ConditionParser::new();

    println!("=== 条件解析器功能测试 ===\n");

    let inputs = [
        // 1. 空条件
        "",
        // 2. 日期比较
        "date > 2024/12/1",
        // 3. 模式匹配 + 多个条件
        "date > 2024/12/1, name like 'sam%'",
        // 4. 多词值与引号内的逗号
        "city = New York, name = 'Doe, John'",
        // 5. 不存在的日期保持为文本
        "date >= 2024/13/40",
        // 6. 错误: 缺少值
        "name like",
        // 7. 错误: 未知运算符
        "id == 3",
    ];

    for (i, text) in inputs.iter().enumerate() {
        println!("{}. 输入: {:?}", i + 1, text);
        match parser.parse(text) {
            Ok(conditions) => {
                println!("   条件数量: {}", conditions.len());
                for clause in &conditions {
                    println!("   - {}", clause);
                }
                println!("   domain: {}\n", to_domain(&conditions));
            }
            Err(e) => println!("   错误: {}\n", e),
        }
    }

    println!("=== 测试完成 ===");
}
