use sqlparser::{ast::Statement, dialect::SQLiteDialect, parser::Parser};

use crate::planner::error::PlannerError;

/// Declared column names, in declaration order, from a stored
/// `CREATE TABLE` statement. Requested columns in a projection resolve to
/// positions in this list.
///
/// The grammar does the real work; stored DDL that it rejects (old or
/// exotic shapes) falls back to a conservative textual split of the
/// parenthesized column list.
pub fn declared_columns(sql: &str) -> Result<Vec<String>, PlannerError> {
    let dialect = SQLiteDialect {};
    match Parser::parse_sql(&dialect, sql) {
        Ok(statements) => {
            for statement in &statements {
                if let Statement::CreateTable(create) = statement {
                    return Ok(create
                        .columns
                        .iter()
                        .map(|column| column.name.value.clone())
                        .collect());
                }
            }
            Err(PlannerError::UnsupportedStatement(sql.to_string()))
        }
        Err(_) => split_column_list(sql),
    }
}

// Table-level constraint clauses that can appear in the column list but do
// not declare a column.
const CONSTRAINT_KEYWORDS: &[&str] = &["PRIMARY", "FOREIGN", "UNIQUE", "CHECK", "CONSTRAINT"];

/// Split the parenthesized body on top-level commas and take the first
/// token of each declaration. Tracks paren depth and quoting so commas
/// inside default expressions or quoted identifiers do not split. This is
/// the fallback behind `declared_columns`; quoted names containing
/// whitespace are beyond it.
pub fn split_column_list(sql: &str) -> Result<Vec<String>, PlannerError> {
    let malformed = || PlannerError::MalformedColumnList(sql.to_string());
    let start = sql.find('(').ok_or_else(malformed)? + 1;
    let end = sql.rfind(')').ok_or_else(malformed)?;
    if end <= start {
        return Err(malformed());
    }
    let mut declarations = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for ch in sql[start..end].chars() {
        match quote {
            Some(closer) => {
                if ch == closer {
                    quote = None;
                }
                current.push(ch);
            }
            None => match ch {
                '\'' | '"' | '`' => {
                    quote = Some(ch);
                    current.push(ch);
                }
                '[' => {
                    quote = Some(']');
                    current.push(ch);
                }
                '(' => {
                    depth += 1;
                    current.push(ch);
                }
                ')' => {
                    depth = depth.saturating_sub(1);
                    current.push(ch);
                }
                ',' if depth == 0 => declarations.push(std::mem::take(&mut current)),
                _ => current.push(ch),
            },
        }
    }
    if !current.trim().is_empty() {
        declarations.push(current);
    }
    let mut columns = Vec::with_capacity(declarations.len());
    for declaration in &declarations {
        let Some(token) = declaration.split_whitespace().next() else {
            continue;
        };
        if CONSTRAINT_KEYWORDS
            .iter()
            .any(|kw| token.eq_ignore_ascii_case(kw))
        {
            continue;
        }
        columns.push(unquote(token));
    }
    if columns.is_empty() {
        return Err(malformed());
    }
    Ok(columns)
}

fn unquote(token: &str) -> String {
    token
        .trim_matches(|c| matches!(c, '"' | '\'' | '`' | '[' | ']'))
        .to_string()
}
