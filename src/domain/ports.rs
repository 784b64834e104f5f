use crate::domain::model::{FetchOutcome, RawObject, Record};
use crate::utils::error::Result;
use async_trait::async_trait;

/// One extract-load stream. `extract` never returns a request error; failures
/// terminate pagination and surface through `FetchOutcome::termination`.
#[async_trait]
pub trait Pipeline: Send + Sync {
    fn name(&self) -> &str;

    async fn extract(&self) -> Result<FetchOutcome>;

    async fn transform(&self, raw: Vec<RawObject>) -> Result<Vec<Record>>;

    async fn load(&self, records: Vec<Record>) -> Result<usize>;
}

/// Destination table writer with merge/upsert semantics keyed by `key`.
pub trait Destination: Send + Sync {
    fn merge(&self, table: &str, columns: &[&str], key: &str, records: &[Record])
        -> Result<usize>;
}
