//! Route table for paging links
//!
//! Links are resolved through a lookup table keyed by resource name and
//! [`RouteKind`]. Templates use `{id}` for the record id, e.g.
//! `/posts/{id}/edit`; link parameters are appended as a query string.

use crate::error::{PagingError, PagingResult};
use crate::params::ParamSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Kinds of record routes a paging link can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    /// Detail view, `/{resource}/{id}`
    Show,
    /// Edit form, `/{resource}/{id}/edit`
    Edit,
}

impl RouteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKind::Show => "show",
            RouteKind::Edit => "edit",
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RouteKind {
    type Err = PagingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "show" => Ok(RouteKind::Show),
            "edit" => Ok(RouteKind::Edit),
            other => Err(PagingError::route(format!("unknown route kind '{}'", other))),
        }
    }
}

/// Lookup table of record route templates
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<(String, RouteKind), String>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template for a resource and route kind
    pub fn route(mut self, resource: &str, kind: RouteKind, template: &str) -> Self {
        self.routes
            .insert((resource.to_string(), kind), template.to_string());
        self
    }

    /// Register the conventional show and edit routes of a resource
    pub fn resource(self, resource: &str) -> Self {
        let show = format!("/{}/{{id}}", resource);
        let edit = format!("/{}/{{id}}/edit", resource);
        self.route(resource, RouteKind::Show, &show)
            .route(resource, RouteKind::Edit, &edit)
    }

    pub fn template(&self, resource: &str, kind: RouteKind) -> Option<&str> {
        self.routes
            .get(&(resource.to_string(), kind))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Generate the URL of a record route with the given link parameters
    pub fn url_for(
        &self,
        resource: &str,
        kind: RouteKind,
        id: i64,
        params: &ParamSet,
    ) -> PagingResult<String> {
        let template = self.template(resource, kind).ok_or_else(|| {
            PagingError::route(format!("no {} route registered for '{}'", kind, resource))
        })?;

        if !template.contains("{id}") {
            return Err(PagingError::route(format!(
                "route template '{}' has no {{id}} placeholder",
                template
            )));
        }

        let mut url = template.replace("{id}", &id.to_string());
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.to_query()?);
        }
        Ok(url)
    }
}
