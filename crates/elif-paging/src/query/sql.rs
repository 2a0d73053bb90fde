//! Paging query SQL generation (PostgreSQL placeholders)

use serde_json::Value;

use super::builder::PagingQuery;
use super::types::*;

impl PagingQuery {
    /// SELECT of the id column with `$n` placeholders and their parameters.
    ///
    /// The id is cast to `BIGINT` so `INT4` (`SERIAL`) keys decode as `i64`.
    pub fn to_sql_with_params(&self) -> (String, Vec<Value>) {
        let mut sql = format!("SELECT {}::BIGINT FROM {}", self.id_column, self.table);
        let mut params = Vec::new();

        self.build_join_clause(&mut sql);
        self.build_where_clause(&mut sql, &mut params);
        self.build_order_limit_clause(&mut sql);

        (sql, params)
    }

    /// `COUNT(DISTINCT id)` over the filtered set, ignoring ordering and limits
    pub fn to_count_sql_with_params(&self) -> (String, Vec<Value>) {
        let mut sql = format!(
            "SELECT COUNT(DISTINCT {}) FROM {}",
            self.id_column, self.table
        );
        let mut params = Vec::new();

        self.build_join_clause(&mut sql);
        self.build_where_clause(&mut sql, &mut params);

        (sql, params)
    }

    /// SQL text of the id SELECT
    pub fn to_sql(&self) -> String {
        self.to_sql_with_params().0
    }

    /// SQL text of the count query
    pub fn to_count_sql(&self) -> String {
        self.to_count_sql_with_params().0
    }

    fn build_join_clause(&self, sql: &mut String) {
        for join in &self.joins {
            sql.push_str(&format!(
                " INNER JOIN {} ON {} = {}",
                join.table, join.left, join.right
            ));
        }
    }

    fn build_where_clause(&self, sql: &mut String, params: &mut Vec<Value>) {
        if self.where_conditions.is_empty() {
            return;
        }

        sql.push_str(" WHERE ");
        for (i, condition) in self.where_conditions.iter().enumerate() {
            if i > 0 {
                sql.push_str(" AND ");
            }

            match condition.operator {
                QueryOperator::In => {
                    if condition.values.is_empty() {
                        // Nothing can match an empty IN list
                        sql.push_str("FALSE");
                        continue;
                    }
                    sql.push_str(&format!("{} IN (", condition.column));
                    for (j, value) in condition.values.iter().enumerate() {
                        if j > 0 {
                            sql.push_str(", ");
                        }
                        params.push(value.clone());
                        sql.push_str(&format!("${}", params.len()));
                    }
                    sql.push(')');
                }
                QueryOperator::IsNull | QueryOperator::IsNotNull => {
                    sql.push_str(&format!("{} {}", condition.column, condition.operator));
                }
                _ => match &condition.value {
                    Some(Value::Null) | None => {
                        let operator = if condition.operator == QueryOperator::NotEqual {
                            QueryOperator::IsNotNull
                        } else {
                            QueryOperator::IsNull
                        };
                        sql.push_str(&format!("{} {}", condition.column, operator));
                    }
                    Some(value) => {
                        params.push(value.clone());
                        sql.push_str(&format!(
                            "{} {} ${}",
                            condition.column,
                            condition.operator,
                            params.len()
                        ));
                    }
                },
            }
        }
    }

    fn build_order_limit_clause(&self, sql: &mut String) {
        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            let clauses: Vec<String> = self
                .order_by
                .iter()
                .map(|(column, direction)| format!("{} {}", column, direction))
                .collect();
            sql.push_str(&clauses.join(", "));
        }

        if let Some(limit) = self.limit_count {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        if let Some(offset) = self.offset_value {
            sql.push_str(&format!(" OFFSET {}", offset));
        }
    }
}
