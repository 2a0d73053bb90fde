//! Request parameters and link parameter sets
//!
//! [`RequestParams`] is the incoming query string of a request. It is both the
//! options map handed to paging filters and the source of the carried paging
//! state (`n`, `p`, `c_i`, `h`, `t`, `t_c`). [`ParamSet`] is the ordered
//! parameter map attached to generated links.

use crate::error::{PagingError, PagingResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Query-string names of the carried paging state
pub mod keys {
    /// Id of the next record
    pub const NEXT_ID: &str = "n";
    /// Id of the previous record
    pub const PREV_ID: &str = "p";
    /// 1-based position of the current record
    pub const CURRENT_INDEX: &str = "c_i";
    /// Id of the first record of the filtered set
    pub const HEAD_ID: &str = "h";
    /// Id of the last record of the filtered set
    pub const TAIL_ID: &str = "t";
    /// Size of the filtered set
    pub const TOTAL_COUNT: &str = "t_c";
}

/// Incoming request parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestParams {
    values: HashMap<String, String>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw query string (without the leading `?`)
    pub fn from_query(query: &str) -> PagingResult<Self> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
            .map_err(|err| PagingError::invalid_param("query", err.to_string()))?;
        Ok(pairs.into_iter().collect())
    }

    /// Builder-style insert
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl ToString) {
        self.values.insert(key.to_string(), value.to_string());
    }

    /// Non-blank value of a parameter
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Non-blank value parsed as an integer.
    ///
    /// A present but non-numeric value is an error rather than "absent".
    pub fn get_i64(&self, key: &str) -> PagingResult<Option<i64>> {
        match self.get(key) {
            Some(value) => value
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| PagingError::invalid_param(key, value)),
            None => Ok(None),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keep only the allow-listed, non-blank parameters, in allow-list order
    pub fn allow_list(&self, fields: &[&str]) -> ParamSet {
        let mut carried = ParamSet::new();
        for field in fields {
            if let Some(value) = self.get(field) {
                carried.set(field, value);
            }
        }
        carried
    }
}

impl FromIterator<(String, String)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl From<HashMap<String, String>> for RequestParams {
    fn from(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

/// Insertion-ordered string parameters attached to generated links.
///
/// Setting an existing key replaces its value in place; new keys are
/// appended, so the encoded query string is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSet {
    pairs: Vec<(String, String)>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    /// Set a value only when one is present
    pub fn with_opt<T: ToString>(mut self, key: &str, value: Option<T>) -> Self {
        if let Some(value) = value {
            self.set(key, value);
        }
        self
    }

    pub fn set(&mut self, key: &str, value: impl ToString) {
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(existing, _)| existing.as_str() == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(existing, _)| existing.as_str() == key)
            .map(|(_, value)| value.as_str())
    }

    /// Merge `other` into this set; `other` wins on conflicts
    pub fn merge(mut self, other: &ParamSet) -> Self {
        for (key, value) in &other.pairs {
            self.set(key, value);
        }
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// URL-encode as a query string (without the leading `?`)
    pub fn to_query(&self) -> PagingResult<String> {
        Ok(serde_urlencoded::to_string(&self.pairs)?)
    }
}
