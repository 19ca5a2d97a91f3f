// query/parser.rs - 条件解析器
//! 把紧凑的条件文本解析为结构化过滤条件
//!
//! 支持的语法:
//! - 多个条件用逗号分隔，全部条件为 AND 关系: "date > 2024/12/1, name like 'sam%'"
//! - 每个条件依次为 字段 运算符 值，用空格分隔
//! - 运算符: =, like, <, >, <=, >=, !=
//! - 值可以包含空格，直到条件结束为止
//! - 值以引号开头时，引号内的逗号不会切分条件；值中间的引号按普通字符处理
//! - 日期: YYYY/M/D，会被规范化为 ISO 日期

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use super::types::*;
use crate::error::{QueryError, QueryResult};

// 正则表达式预编译
static CLAUSE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    // 字段 运算符 剩余部分（值）
    Regex::new(r"^(\S+)\s+(\S+)\s+(.+)$").unwrap()
});

static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})/(\d{1,2})/(\d{1,2})$").unwrap()
});

// 只接受普通十进制写法，前导零、正号、指数形式都保留为文本
static INTEGER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?(0|[1-9]\d*)$").unwrap()
});

static FLOAT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?(0|[1-9]\d*)\.\d+$").unwrap()
});

/// 条件解析器
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionParser;

impl ConditionParser {
    pub fn new() -> Self {
        Self
    }

    /// 解析条件文本
    ///
    /// 空文本（或只有空白）返回空的条件集合。
    pub fn parse(&self, text: &str) -> QueryResult<ConditionSet> {
        if text.trim().is_empty() {
            return Ok(ConditionSet::new());
        }

        split_clauses(text)?
            .into_iter()
            .map(|clause| self.parse_clause(clause))
            .collect()
    }

    /// 解析单个条件
    pub fn parse_clause(&self, clause: &str) -> QueryResult<FilterClause> {
        let clause = clause.trim();
        let cap = CLAUSE_PATTERN.captures(clause).ok_or_else(|| {
            let found = clause.split_whitespace().count();
            QueryError::syntax(
                clause,
                format!("expected `field operator value`, found {} token(s)", found),
            )
        })?;

        let field = cap[1].trim();
        let operator: Operator = cap[2]
            .parse()
            .map_err(|reason: String| QueryError::syntax(clause, reason))?;
        let value = parse_value(&cap[3]);

        Ok(FilterClause::new(field, operator, value))
    }
}

/// 便捷函数：`None` 与空文本一样得到空集合
pub fn parse_conditions(text: Option<&str>) -> QueryResult<ConditionSet> {
    match text {
        Some(text) => ConditionParser::new().parse(text),
        None => Ok(ConditionSet::new()),
    }
}

/// 按逗号切分条件
///
/// 只有出现在值开头（第三个 token 的首字符）的引号才开始引用，
/// 引用内的逗号保留；其余位置的引号是普通字符。
fn split_clauses(text: &str) -> QueryResult<Vec<&str>> {
    let mut clauses = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;
    // 当前条件里已经开始的 token 数
    let mut tokens = 0;
    let mut in_token = false;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            ',' => {
                clauses.push(&text[start..i]);
                start = i + 1;
                tokens = 0;
                in_token = false;
            }
            c if c.is_whitespace() => in_token = false,
            c => {
                if !in_token {
                    in_token = true;
                    tokens += 1;
                    if tokens == 3 && matches!(c, '\'' | '"') {
                        quote = Some(c);
                    }
                }
            }
        }
    }

    if quote.is_some() {
        return Err(QueryError::syntax(text[start..].trim(), "unterminated quote"));
    }
    clauses.push(&text[start..]);
    Ok(clauses)
}

/// 解析值：引号字符串 → 日期 → 整数 → 浮点数 → 原样文本
fn parse_value(raw: &str) -> FilterValue {
    let raw = raw.trim();

    if let Some(inner) = strip_quotes(raw) {
        return FilterValue::text(inner);
    }
    if let Some(date) = parse_date(raw) {
        return FilterValue::Date(date);
    }
    if INTEGER_PATTERN.is_match(raw) {
        // 超出 i64 范围的数字串保留为文本
        if let Ok(n) = raw.parse::<i64>() {
            return FilterValue::Integer(n);
        }
    } else if FLOAT_PATTERN.is_match(raw) {
        if let Ok(x) = raw.parse::<f64>() {
            if x.is_finite() {
                return FilterValue::Float(x);
            }
        }
    }
    FilterValue::text(raw)
}

/// 去掉一对匹配的首尾引号
fn strip_quotes(raw: &str) -> Option<&str> {
    ['\'', '"'].into_iter().find_map(|q| {
        raw.strip_prefix(q)
            .and_then(|rest| rest.strip_suffix(q))
    })
}

/// 解析 YYYY/M/D 日期，不存在的日期返回 None
fn parse_date(s: &str) -> Option<NaiveDate> {
    let cap = DATE_PATTERN.captures(s)?;
    let year: i32 = cap[1].parse().ok()?;
    let month: u32 = cap[2].parse().ok()?;
    let day: u32 = cap[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let parser = ConditionParser::new();
        assert!(parser.parse("").unwrap().is_empty());
        assert!(parser.parse("   ").unwrap().is_empty());
        assert!(parse_conditions(None).unwrap().is_empty());
    }

    #[test]
    fn test_parse_multiple_clauses_in_order() {
        let parser = ConditionParser::new();
        let result = parser.parse("date > 2024/12/1, name like 'sam%', active = 1").unwrap();

        assert_eq!(result.len(), 3);
        let fields: Vec<&str> = result.iter().map(|c| c.field()).collect();
        assert_eq!(fields, vec!["date", "name", "active"]);

        assert_eq!(result.clauses()[0].operator(), Operator::Gt);
        assert_eq!(
            result.clauses()[0].value().as_date(),
            NaiveDate::from_ymd_opt(2024, 12, 1)
        );
        assert_eq!(result.clauses()[1].operator(), Operator::Like);
        assert_eq!(result.clauses()[1].value(), &FilterValue::text("sam%"));
        assert_eq!(result.clauses()[2].value(), &FilterValue::Integer(1));
    }

    #[test]
    fn test_parse_all_operators() {
        let parser = ConditionParser::new();
        for op in Operator::ALL {
            let text = format!("amount {} 10", op.as_str());
            let result = parser.parse(&text).unwrap();
            assert_eq!(result.clauses()[0].operator(), op, "operator {}", op);
        }
    }

    #[test]
    fn test_multi_word_value() {
        let parser = ConditionParser::new();
        let result = parser.parse("name like 'acme %', city = New York").unwrap();
        assert_eq!(result.clauses()[0].value(), &FilterValue::text("acme %"));
        assert_eq!(result.clauses()[1].value(), &FilterValue::text("New York"));
    }

    #[test]
    fn test_comma_inside_quotes() {
        let parser = ConditionParser::new();
        let result = parser.parse("name = 'Doe, John', id > 3").unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.clauses()[0].value(), &FilterValue::text("Doe, John"));
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let parser = ConditionParser::new();
        let result = parser.parse("  id   >=   5  ,name != x ").unwrap();
        assert_eq!(result.clauses()[0].field(), "id");
        assert_eq!(result.clauses()[0].operator(), Operator::Gte);
        assert_eq!(result.clauses()[0].value(), &FilterValue::Integer(5));
        assert_eq!(result.clauses()[1].value(), &FilterValue::text("x"));
    }

    #[test]
    fn test_value_types() {
        assert_eq!(parse_value("42"), FilterValue::Integer(42));
        assert_eq!(parse_value("-3"), FilterValue::Integer(-3));
        assert_eq!(parse_value("2.5"), FilterValue::Float(2.5));
        assert_eq!(parse_value("'42'"), FilterValue::text("42"));
        assert_eq!(parse_value("\"2024/1/2\""), FilterValue::text("2024/1/2"));
        assert_eq!(parse_value("nan"), FilterValue::text("nan"));
        assert_eq!(parse_value("0"), FilterValue::Integer(0));
        assert_eq!(parse_value("-0.75"), FilterValue::Float(-0.75));

        // 编号、邮编、电话号码保持原样
        assert_eq!(parse_value("007"), FilterValue::text("007"));
        assert_eq!(parse_value("01234"), FilterValue::text("01234"));
        assert_eq!(parse_value("+33612345678"), FilterValue::text("+33612345678"));
        assert_eq!(parse_value("1e3"), FilterValue::text("1e3"));
        assert_eq!(parse_value("99999999999999999999"), FilterValue::text("99999999999999999999"));
        assert_eq!(parse_value("1."), FilterValue::text("1."));
        assert_eq!(parse_value(".5"), FilterValue::text(".5"));
        assert_eq!(
            parse_value("2024/1/2"),
            FilterValue::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
        );
    }

    #[test]
    fn test_invalid_date_kept_as_text() {
        assert_eq!(parse_value("2024/13/40"), FilterValue::text("2024/13/40"));
        assert_eq!(parse_value("2024-12-01"), FilterValue::text("2024-12-01"));
    }

    #[test]
    fn test_wrong_token_count() {
        let parser = ConditionParser::new();
        let err = parser.parse("name like").unwrap_err();
        assert!(matches!(err, QueryError::ConditionSyntax { ref clause, .. } if clause == "name like"));

        // 末尾多余的逗号产生一个空条件
        assert!(parser.parse("id = 1,").is_err());
        assert!(parser.parse("id = 1, , id = 2").is_err());
    }

    #[test]
    fn test_unknown_operator() {
        let parser = ConditionParser::new();
        let err = parser.parse("id == 1").unwrap_err();
        match err {
            QueryError::ConditionSyntax { clause, reason } => {
                assert_eq!(clause, "id == 1");
                assert!(reason.contains("=="));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_apostrophe_inside_value() {
        let parser = ConditionParser::new();

        let result = parser.parse("name = O'Brien").unwrap();
        assert_eq!(result.clauses()[0].value(), &FilterValue::text("O'Brien"));

        let result = parser.parse("name = O'Brien, id > 3").unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.clauses()[0].value(), &FilterValue::text("O'Brien"));
        assert_eq!(result.clauses()[1].field(), "id");
        assert_eq!(result.clauses()[1].value(), &FilterValue::Integer(3));

        let result = parser.parse("note like it's \"fine\", id = 1").unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.clauses()[0].value(), &FilterValue::text("it's \"fine\""));
    }

    #[test]
    fn test_unterminated_quote() {
        let parser = ConditionParser::new();
        assert!(matches!(
            parser.parse("name = 'abc, id = 1"),
            Err(QueryError::ConditionSyntax { .. })
        ));
    }
}
