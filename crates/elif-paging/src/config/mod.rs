//! Paging bar configuration

pub mod defaults;
pub mod paging_config;

pub use defaults::PagingDefaults;
pub use paging_config::{ConfigSource, PagingConfig};
