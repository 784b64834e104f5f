use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// A nested JSON object exactly as returned by the API, before flattening.
pub type RawObject = serde_json::Map<String, serde_json::Value>;

/// One flat row: field name to scalar value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

/// The three Shopify resource streams. Endpoint path, plural JSON key and
/// destination table name all coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Orders,
    Products,
    Customers,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Orders,
        ResourceKind::Products,
        ResourceKind::Customers,
    ];

    pub fn plural_key(&self) -> &'static str {
        match self {
            ResourceKind::Orders => "orders",
            ResourceKind::Products => "products",
            ResourceKind::Customers => "customers",
        }
    }

    pub fn table_name(&self) -> &'static str {
        self.plural_key()
    }

    pub fn endpoint(&self) -> String {
        format!("{}.json", self.plural_key())
    }

    pub fn count_endpoint(&self) -> String {
        format!("{}/count.json", self.plural_key())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plural_key())
    }
}

/// Why a pagination run stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// Empty page, or the Link header carried no rel="next".
    Exhausted,
    /// A rel="next" link was present but no page_info could be parsed from it.
    /// Treated as end-of-stream, not an error.
    CursorUnparsable,
    /// A request failed. Records from prior pages are kept.
    Failed { reason: String },
}

impl Termination {
    pub fn is_failure(&self) -> bool {
        matches!(self, Termination::Failed { .. })
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Exhausted => f.write_str("complete"),
            Termination::CursorUnparsable => f.write_str("complete (unparsable next-page cursor)"),
            Termination::Failed { reason } => write!(f, "stopped early: {}", reason),
        }
    }
}

/// Result of paginating one resource to the end (or to the first error).
#[derive(Debug)]
pub struct FetchOutcome {
    pub records: Vec<RawObject>,
    pub pages: usize,
    pub termination: Termination,
}

/// Per-resource summary returned by the engine.
#[derive(Debug)]
pub struct RunReport {
    pub resource: String,
    pub rows_loaded: usize,
    pub pages: usize,
    pub termination: Termination,
    pub duration: Duration,
}
