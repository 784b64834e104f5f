use crate::core::client::ShopifyClient;
use crate::domain::model::ResourceKind;
use crate::utils::error::{EtlError, Result};

/// One labeled read-only check with its human-readable findings.
#[derive(Debug)]
pub struct ProbeCheck {
    pub label: String,
    pub details: Vec<String>,
}

#[derive(Debug)]
pub struct ProbeFailure {
    pub summary: String,
    pub hints: Vec<String>,
}

/// Result of the connectivity probe: the checks that ran, and the classified
/// failure that stopped the sequence, if any. Never touches the destination.
#[derive(Debug)]
pub struct ProbeReport {
    pub checks: Vec<ProbeCheck>,
    pub failure: Option<ProbeFailure>,
}

impl ProbeReport {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Runs the sequential read-only checks: shop info, per-resource counts, and
/// one sample order when any orders exist. Stops at the first failure.
pub async fn run(client: &ShopifyClient) -> ProbeReport {
    let mut checks = Vec::new();

    match shop_check(client).await {
        Ok(check) => checks.push(check),
        Err(e) => {
            return ProbeReport {
                checks,
                failure: Some(classify(&e)),
            }
        }
    }

    let mut orders_count = 0;
    for (index, kind) in ResourceKind::ALL.iter().enumerate() {
        match count_check(client, *kind, index + 2).await {
            Ok((check, count)) => {
                if *kind == ResourceKind::Orders {
                    orders_count = count;
                }
                checks.push(check);
            }
            Err(e) => {
                return ProbeReport {
                    checks,
                    failure: Some(classify(&e)),
                }
            }
        }
    }

    if orders_count > 0 {
        match sample_order_check(client).await {
            Ok(check) => checks.push(check),
            Err(e) => {
                return ProbeReport {
                    checks,
                    failure: Some(classify(&e)),
                }
            }
        }
    }

    ProbeReport {
        checks,
        failure: None,
    }
}

async fn shop_check(client: &ShopifyClient) -> Result<ProbeCheck> {
    let shop = client.shop().await?;
    Ok(ProbeCheck {
        label: "1. Testing shop information...".to_string(),
        details: vec![
            format!("Shop name: {}", text_field(&shop, "name")),
            format!("Shop domain: {}", text_field(&shop, "domain")),
            format!("Shop email: {}", text_field(&shop, "email")),
        ],
    })
}

async fn count_check(
    client: &ShopifyClient,
    kind: ResourceKind,
    position: usize,
) -> Result<(ProbeCheck, u64)> {
    let count = client.count(kind).await?;
    let check = ProbeCheck {
        label: format!("{}. Testing {} access...", position, kind),
        details: vec![format!("Total {}: {}", kind, count)],
    };
    Ok((check, count))
}

async fn sample_order_check(client: &ShopifyClient) -> Result<ProbeCheck> {
    let page = client
        .fetch_page(ResourceKind::Orders, &[("limit", "1".to_string())])
        .await?;
    let mut details = Vec::new();
    if let Some(order) = page
        .body
        .get("orders")
        .and_then(|v| v.as_array())
        .and_then(|orders| orders.first())
    {
        details.push(format!("Sample order ID: {}", text_field(order, "id")));
        details.push(format!(
            "Sample order number: {}",
            text_field(order, "order_number")
        ));
        details.push(format!(
            "Sample order total: {}",
            text_field(order, "total_price")
        ));
    }
    Ok(ProbeCheck {
        label: "5. Testing sample order retrieval...".to_string(),
        details,
    })
}

fn text_field(value: &serde_json::Value, field: &str) -> String {
    match value.get(field) {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Null) | None => "N/A".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Maps an error onto the diagnostic taxonomy with actionable hints.
pub fn classify(error: &EtlError) -> ProbeFailure {
    match error {
        EtlError::MissingConfigError { field } => ProbeFailure {
            summary: format!("Configuration error: {} is not set", field),
            hints: vec![
                "Set the API_TOKEN and STORE_ID environment variables before running.".to_string(),
            ],
        },
        EtlError::AuthError { .. } => ProbeFailure {
            summary: "Authentication error (401): Invalid API token or insufficient permissions"
                .to_string(),
            hints: vec![
                "Please check your API token and ensure it has the required scopes:".to_string(),
                "- read_orders".to_string(),
                "- read_products".to_string(),
                "- read_customers".to_string(),
            ],
        },
        EtlError::NotFoundError { .. } => ProbeFailure {
            summary: "Not found error (404): Invalid shop URL".to_string(),
            hints: vec!["Please check your STORE_ID value.".to_string()],
        },
        EtlError::HttpStatusError { .. } => ProbeFailure {
            summary: format!("HTTP error: {}", error),
            hints: Vec::new(),
        },
        EtlError::ApiError(_) => ProbeFailure {
            summary: format!("Network error: {}", error),
            hints: vec!["Please check your internet connection and try again.".to_string()],
        },
        other => ProbeFailure {
            summary: format!("Unexpected error: {}", other),
            hints: Vec::new(),
        },
    }
}
