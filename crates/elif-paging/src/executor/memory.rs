//! In-memory paging executor
//!
//! Evaluates [`PagingQuery`] values over JSON rows. Used as the test double
//! for the paginator: it counts the queries it runs and records their SQL
//! text, so tests can assert which lookups a request actually issued.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use super::PagingExecutor;
use crate::error::{PagingError, PagingResult};
use crate::query::{OrderDirection, PagingQuery, QueryOperator, WhereCondition};

type Row = Map<String, Value>;

/// Executor over in-memory tables of JSON rows
#[derive(Debug, Default)]
pub struct MemoryExecutor {
    tables: RwLock<HashMap<String, Vec<Row>>>,
    query_count: AtomicUsize,
    executed: RwLock<Vec<String>>,
}

impl MemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style table setup; non-object rows are ignored
    pub fn with_table(self, table: &str, rows: Vec<Value>) -> Self {
        self.insert_rows(table, rows);
        self
    }

    pub fn insert_rows(&self, table: &str, rows: Vec<Value>) {
        let rows = rows.into_iter().filter_map(|row| match row {
            Value::Object(map) => Some(map),
            _ => None,
        });
        self.tables
            .write()
            .entry(table.to_string())
            .or_default()
            .extend(rows);
    }

    /// Number of queries executed so far
    pub fn query_count(&self) -> usize {
        self.query_count.load(AtomicOrdering::SeqCst)
    }

    /// SQL text of every executed query, in order
    pub fn executed(&self) -> Vec<String> {
        self.executed.read().clone()
    }

    pub fn reset_counters(&self) {
        self.query_count.store(0, AtomicOrdering::SeqCst);
        self.executed.write().clear();
    }

    fn record(&self, sql: String) {
        tracing::debug!(sql = %sql, "Executing paging query in memory");
        self.query_count.fetch_add(1, AtomicOrdering::SeqCst);
        self.executed.write().push(sql);
    }

    /// Rows of the query's table matching every condition
    fn matching_rows(&self, query: &PagingQuery) -> PagingResult<Vec<Row>> {
        if !query.joins().is_empty() {
            return Err(PagingError::query(
                "joins are not supported by the memory executor",
            ));
        }

        let tables = self.tables.read();
        let rows = tables.get(query.table()).ok_or_else(|| {
            PagingError::query(format!("relation \"{}\" does not exist", query.table()))
        })?;

        let mut matching = Vec::new();
        for row in rows {
            let mut keep = true;
            for condition in query.where_conditions() {
                if !matches_condition(row, query.table(), condition)? {
                    keep = false;
                    break;
                }
            }
            if keep {
                matching.push(row.clone());
            }
        }
        Ok(matching)
    }
}

/// Column lookup; `table.column` resolves against the query's own table
fn column_value<'a>(row: &'a Row, table: &str, column: &str) -> Option<&'a Value> {
    let name = match column.split_once('.') {
        Some((prefix, name)) if prefix == table => name,
        _ => column,
    };
    row.get(name)
}

fn row_id(row: &Row, query: &PagingQuery) -> PagingResult<i64> {
    column_value(row, query.table(), query.id_column())
        .and_then(Value::as_i64)
        .ok_or_else(|| {
            PagingError::query(format!(
                "column {} is missing or not an integer",
                query.id_column()
            ))
        })
}

fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// NULLs sort last ascending, like PostgreSQL
fn compare_for_order(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|value| !value.is_null());
    let b = b.filter(|value| !value.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => compare_values(a, b).unwrap_or(Ordering::Equal),
    }
}

fn like_matches(text: &str, pattern: &str) -> bool {
    let parts: Vec<&str> = pattern.split('%').collect();
    if parts.len() == 1 {
        return text == pattern;
    }

    let first = parts[0];
    let last = parts[parts.len() - 1];
    if !text.starts_with(first) || text.len() < first.len() + last.len() || !text.ends_with(last) {
        return false;
    }

    let mut rest = &text[first.len()..text.len() - last.len()];
    for part in &parts[1..parts.len() - 1] {
        match rest.find(part) {
            Some(pos) => rest = &rest[pos + part.len()..],
            None => return false,
        }
    }
    true
}

fn matches_condition(row: &Row, table: &str, condition: &WhereCondition) -> PagingResult<bool> {
    let actual = column_value(row, table, &condition.column).filter(|value| !value.is_null());

    let matched = match condition.operator {
        QueryOperator::IsNull => actual.is_none(),
        QueryOperator::IsNotNull => actual.is_some(),
        QueryOperator::In => match actual {
            Some(actual) => condition
                .values
                .iter()
                .any(|value| compare_values(actual, value) == Some(Ordering::Equal)),
            None => false,
        },
        QueryOperator::Like => {
            let pattern = condition
                .value
                .as_ref()
                .and_then(Value::as_str)
                .ok_or_else(|| PagingError::query("LIKE needs a string pattern"))?;
            match actual.and_then(Value::as_str) {
                Some(text) => like_matches(text, pattern),
                None => false,
            }
        }
        ref operator => {
            let expected = condition.value.as_ref().filter(|value| !value.is_null());
            match (actual, expected) {
                (None, None) => *operator != QueryOperator::NotEqual,
                (Some(_), None) => *operator == QueryOperator::NotEqual,
                (None, Some(_)) => false,
                (Some(actual), Some(expected)) => match compare_values(actual, expected) {
                    Some(ordering) => match operator {
                        QueryOperator::Equal => ordering == Ordering::Equal,
                        QueryOperator::NotEqual => ordering != Ordering::Equal,
                        QueryOperator::GreaterThan => ordering == Ordering::Greater,
                        QueryOperator::GreaterThanOrEqual => ordering != Ordering::Less,
                        QueryOperator::LessThan => ordering == Ordering::Less,
                        QueryOperator::LessThanOrEqual => ordering != Ordering::Greater,
                        _ => false,
                    },
                    None => {
                        return Err(PagingError::query(format!(
                            "cannot compare {} with {}",
                            actual, expected
                        )))
                    }
                },
            }
        }
    };
    Ok(matched)
}

#[async_trait]
impl PagingExecutor for MemoryExecutor {
    async fn fetch_ids(&self, query: &PagingQuery) -> PagingResult<Vec<i64>> {
        self.record(query.to_sql());
        let mut rows = self.matching_rows(query)?;

        // Stable sort keeps insertion order for ties and unordered queries
        rows.sort_by(|a, b| {
            for (column, direction) in query.order_clauses() {
                let ordering = compare_for_order(
                    column_value(a, query.table(), column),
                    column_value(b, query.table(), column),
                );
                let ordering = match direction {
                    OrderDirection::Asc => ordering,
                    OrderDirection::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });

        let offset = query.offset_value().unwrap_or(0).max(0) as usize;
        let limit = query
            .limit_count()
            .map(|limit| limit.max(0) as usize)
            .unwrap_or(usize::MAX);

        rows.iter()
            .skip(offset)
            .take(limit)
            .map(|row| row_id(row, query))
            .collect()
    }

    async fn fetch_count(&self, query: &PagingQuery) -> PagingResult<i64> {
        self.record(query.to_count_sql());
        let rows = self.matching_rows(query)?;

        let mut distinct = HashSet::new();
        for row in &rows {
            distinct.insert(row_id(row, query)?);
        }
        Ok(distinct.len() as i64)
    }
}
