//! Paging query builder - fluent construction of a filtered id set

use serde_json::Value;

use super::types::*;
use crate::model::Pageable;

/// Filtered, ordered set of record ids
#[derive(Debug, Clone, PartialEq)]
pub struct PagingQuery {
    pub(crate) table: String,
    pub(crate) id_column: String,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) where_conditions: Vec<WhereCondition>,
    pub(crate) order_by: Vec<(String, OrderDirection)>,
    pub(crate) limit_count: Option<i64>,
    pub(crate) offset_value: Option<i64>,
}

impl PagingQuery {
    /// Query over `table`, identified by `{table}.id`
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            id_column: format!("{}.id", table),
            joins: Vec::new(),
            where_conditions: Vec::new(),
            order_by: Vec::new(),
            limit_count: None,
            offset_value: None,
        }
    }

    /// Query over the table of a pageable model
    pub fn for_model<M: Pageable>() -> Self {
        Self::new(M::table_name()).with_id_column(&M::qualified_column(M::primary_key_name()))
    }

    /// Override the id column
    pub fn with_id_column(mut self, column: &str) -> Self {
        self.id_column = column.to_string();
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    pub fn where_conditions(&self) -> &[WhereCondition] {
        &self.where_conditions
    }

    pub fn order_clauses(&self) -> &[(String, OrderDirection)] {
        &self.order_by
    }

    pub fn limit_count(&self) -> Option<i64> {
        self.limit_count
    }

    pub fn offset_value(&self) -> Option<i64> {
        self.offset_value
    }

    /// Add an INNER JOIN on `left = right`
    pub fn inner_join(mut self, table: &str, left: &str, right: &str) -> Self {
        self.joins.push(JoinClause {
            table: table.to_string(),
            left: left.to_string(),
            right: right.to_string(),
        });
        self
    }

    fn push_condition(mut self, column: &str, operator: QueryOperator, value: Option<Value>) -> Self {
        self.where_conditions.push(WhereCondition {
            column: column.to_string(),
            operator,
            value,
            values: Vec::new(),
        });
        self
    }

    /// Add WHERE condition with equality
    pub fn where_eq<T: Into<Value>>(self, column: &str, value: T) -> Self {
        self.push_condition(column, QueryOperator::Equal, Some(value.into()))
    }

    /// Add WHERE condition with not equal
    pub fn where_ne<T: Into<Value>>(self, column: &str, value: T) -> Self {
        self.push_condition(column, QueryOperator::NotEqual, Some(value.into()))
    }

    /// Add WHERE condition with greater than
    pub fn where_gt<T: Into<Value>>(self, column: &str, value: T) -> Self {
        self.push_condition(column, QueryOperator::GreaterThan, Some(value.into()))
    }

    /// Add WHERE condition with greater than or equal
    pub fn where_gte<T: Into<Value>>(self, column: &str, value: T) -> Self {
        self.push_condition(column, QueryOperator::GreaterThanOrEqual, Some(value.into()))
    }

    /// Add WHERE condition with less than
    pub fn where_lt<T: Into<Value>>(self, column: &str, value: T) -> Self {
        self.push_condition(column, QueryOperator::LessThan, Some(value.into()))
    }

    /// Add WHERE condition with less than or equal
    pub fn where_lte<T: Into<Value>>(self, column: &str, value: T) -> Self {
        self.push_condition(column, QueryOperator::LessThanOrEqual, Some(value.into()))
    }

    /// Add WHERE condition with LIKE (`%` wildcards)
    pub fn where_like(self, column: &str, pattern: &str) -> Self {
        self.push_condition(
            column,
            QueryOperator::Like,
            Some(Value::String(pattern.to_string())),
        )
    }

    /// Add WHERE condition with IN
    pub fn where_in<T: Into<Value>>(mut self, column: &str, values: Vec<T>) -> Self {
        self.where_conditions.push(WhereCondition {
            column: column.to_string(),
            operator: QueryOperator::In,
            value: None,
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Add WHERE condition with IS NULL
    pub fn where_null(self, column: &str) -> Self {
        self.push_condition(column, QueryOperator::IsNull, None)
    }

    /// Add WHERE condition with IS NOT NULL
    pub fn where_not_null(self, column: &str) -> Self {
        self.push_condition(column, QueryOperator::IsNotNull, None)
    }

    /// Add ORDER BY clause (ascending)
    pub fn order_by(mut self, column: &str) -> Self {
        self.order_by.push((column.to_string(), OrderDirection::Asc));
        self
    }

    /// Add ORDER BY clause (descending)
    pub fn order_by_desc(mut self, column: &str) -> Self {
        self.order_by.push((column.to_string(), OrderDirection::Desc));
        self
    }

    /// Make `column` the leading ORDER BY clause; existing clauses on other
    /// columns stay behind it as tie-breakers
    pub fn order_first(mut self, column: &str, direction: OrderDirection) -> Self {
        self.order_by.retain(|(existing, _)| existing.as_str() != column);
        self.order_by.insert(0, (column.to_string(), direction));
        self
    }

    pub fn has_order(&self) -> bool {
        !self.order_by.is_empty()
    }

    /// Keep the filter's ordering, or order by id ascending when it has none
    pub fn ordered_or_default(self) -> Self {
        if self.has_order() {
            self
        } else {
            let id_column = self.id_column.clone();
            self.order_by(&id_column)
        }
    }

    /// Reverse every ordering clause; an unordered query becomes id descending
    pub fn reversed(mut self) -> Self {
        if self.order_by.is_empty() {
            let id_column = self.id_column.clone();
            return self.order_by_desc(&id_column);
        }
        for (_, direction) in self.order_by.iter_mut() {
            *direction = direction.reversed();
        }
        self
    }

    /// Add LIMIT clause
    pub fn limit(mut self, count: i64) -> Self {
        self.limit_count = Some(count);
        self
    }

    /// Add OFFSET clause
    pub fn offset(mut self, count: i64) -> Self {
        self.offset_value = Some(count);
        self
    }
}
