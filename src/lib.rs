pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::destination::DuckDbDestination;
pub use crate::config::{CliConfig, ShopifyConfig};
pub use crate::core::client::ShopifyClient;
pub use crate::core::etl::EtlEngine;
pub use crate::core::pipeline::ResourcePipeline;
pub use crate::domain::model::{FetchOutcome, Record, ResourceKind, RunReport, Termination};
pub use crate::utils::error::{EtlError, Result};
