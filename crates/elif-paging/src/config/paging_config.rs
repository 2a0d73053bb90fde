//! Paging bar configuration
//!
//! Controls the markup contract of the rendered navigation bar (CSS classes,
//! inert fragment) and the route kind links resolve to when the paging state
//! does not name one.

use super::defaults::PagingDefaults;
use crate::error::ConfigError;
use crate::routes::RouteKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;

/// Where a configuration value came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    EnvVar(String),
    Default(String),
}

/// Paging bar configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagingConfig {
    /// Classes of the wrapping `div`
    pub container_class: String,
    /// Class shared by every anchor
    pub button_class: String,
    /// Extra class on the previous/next step anchors
    pub step_class: String,
    /// Href used by links that must not navigate
    pub inert_href: String,
    /// Route kind used when the paging state carries none
    pub default_route: RouteKind,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            container_class: PagingDefaults::CONTAINER_CLASS.to_string(),
            button_class: PagingDefaults::BUTTON_CLASS.to_string(),
            step_class: PagingDefaults::STEP_CLASS.to_string(),
            inert_href: PagingDefaults::INERT_HREF.to_string(),
            default_route: PagingDefaults::DEFAULT_ROUTE,
        }
    }
}

impl PagingConfig {
    /// Load configuration from `PAGING_*` environment variables, falling back
    /// to the defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let container_class =
            get_env_or_default("PAGING_CONTAINER_CLASS", PagingDefaults::CONTAINER_CLASS);
        let button_class = get_env_or_default("PAGING_BUTTON_CLASS", PagingDefaults::BUTTON_CLASS);
        let step_class = get_env_or_default("PAGING_STEP_CLASS", PagingDefaults::STEP_CLASS);
        let inert_href = get_env_or_default("PAGING_INERT_HREF", PagingDefaults::INERT_HREF);

        let default_route = get_env_or_default(
            "PAGING_DEFAULT_ROUTE",
            PagingDefaults::DEFAULT_ROUTE.as_str(),
        )
        .parse::<RouteKind>()
        .map_err(|_| ConfigError::InvalidValue {
            field: "default_route".to_string(),
            value: env::var("PAGING_DEFAULT_ROUTE").unwrap_or_default(),
            expected: "show or edit".to_string(),
        })?;

        let config = PagingConfig {
            container_class,
            button_class,
            step_class,
            inert_href,
            default_route,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.container_class.trim().is_empty() {
            return Err(ConfigError::validation_failed(
                "Container class must not be empty",
            ));
        }

        if self.button_class.trim().is_empty() || self.step_class.trim().is_empty() {
            return Err(ConfigError::validation_failed(
                "Button and step classes must not be empty",
            ));
        }

        if !self.inert_href.starts_with('#') {
            return Err(ConfigError::validation_failed(
                "Inert href must be a fragment starting with '#'",
            ));
        }

        Ok(())
    }

    /// Configuration source information for debugging
    pub fn config_sources(&self) -> HashMap<String, ConfigSource> {
        let fields = [
            ("container_class", "PAGING_CONTAINER_CLASS"),
            ("button_class", "PAGING_BUTTON_CLASS"),
            ("step_class", "PAGING_STEP_CLASS"),
            ("inert_href", "PAGING_INERT_HREF"),
            ("default_route", "PAGING_DEFAULT_ROUTE"),
        ];

        fields
            .iter()
            .map(|(field, var)| {
                let source = if env::var(var).is_ok() {
                    ConfigSource::EnvVar(var.to_string())
                } else {
                    ConfigSource::Default(field.to_string())
                };
                (field.to_string(), source)
            })
            .collect()
    }

    /// Class attribute of the previous/next step anchors
    pub fn step_classes(&self) -> String {
        format!("{} {}", self.button_class, self.step_class)
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
