use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use clap::Parser;
use std::time::Duration;

pub const API_VERSION: &str = "2024-01";

/// Shopify allows ~2 requests per second; sleep this long between page fetches.
pub const PAGE_DELAY_MS: u64 = 500;

const API_TOKEN_VAR: &str = "API_TOKEN";
const STORE_ID_VAR: &str = "STORE_ID";

#[derive(Debug, Clone, Parser)]
#[command(name = "shopify-etl")]
#[command(about = "Extract Shopify orders, products and customers into DuckDB")]
pub struct CliConfig {
    #[arg(long, default_value = "shopify_data.duckdb")]
    pub db_path: String,

    #[arg(long, default_value = "250", help = "Page size per API request (1-250)")]
    pub limit: u32,

    #[arg(long, default_value = "any", help = "Order status filter (orders only)")]
    pub status: String,

    #[arg(long, default_value_t = PAGE_DELAY_MS, help = "Pause between page fetches in ms")]
    pub page_delay_ms: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("db_path", &self.db_path)?;
        validate_range("limit", self.limit, 1, 250)?;
        validate_non_empty_string("status", &self.status)?;
        Ok(())
    }
}

/// Explicit API configuration passed into the extractor at construction time.
/// Credentials are read from the process environment once, in `from_env`.
#[derive(Debug, Clone)]
pub struct ShopifyConfig {
    pub store_id: String,
    pub api_token: String,
    pub api_version: String,
    /// Scheme + host, without the `/admin/api/{version}` suffix. Defaults to
    /// the store's myshopify.com domain; tests point it at a mock server.
    pub api_base: String,
    pub limit: u32,
    pub order_status: String,
    pub page_delay: Duration,
}

impl ShopifyConfig {
    pub fn new(store_id: impl Into<String>, api_token: impl Into<String>) -> Self {
        let store_id = store_id.into();
        let api_base = format!("https://{}.myshopify.com", store_id);
        Self {
            store_id,
            api_token: api_token.into(),
            api_version: API_VERSION.to_string(),
            api_base,
            limit: 250,
            order_status: "any".to_string(),
            page_delay: Duration::from_millis(PAGE_DELAY_MS),
        }
    }

    pub fn from_env(cli: &CliConfig) -> Result<Self> {
        let api_token = required_env(API_TOKEN_VAR)?;
        let store_id = required_env(STORE_ID_VAR)?;

        let mut config = Self::new(store_id, api_token);
        config.limit = cli.limit;
        config.order_status = cli.status.clone();
        config.page_delay = Duration::from_millis(cli.page_delay_ms);
        Ok(config)
    }

    pub fn shop_domain(&self) -> String {
        format!("{}.myshopify.com", self.store_id)
    }

    /// `https://{store}.myshopify.com/admin/api/2024-01`
    pub fn base_url(&self) -> String {
        format!("{}/admin/api/{}", self.api_base, self.api_version)
    }
}

impl Validate for ShopifyConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("store_id", &self.store_id)?;
        validate_non_empty_string("api_token", &self.api_token)?;
        validate_url("api_base", &self.api_base)?;
        validate_range("limit", self.limit, 1, 250)?;
        Ok(())
    }
}

fn required_env(var: &str) -> Result<String> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(EtlError::MissingConfigError {
            field: var.to_string(),
        }),
    }
}
