use crate::core::client::ShopifyClient;
use crate::core::fetch::{self, FetchParams};
use crate::core::flatten;
use crate::domain::model::{FetchOutcome, RawObject, Record, ResourceKind};
use crate::domain::ports::{Destination, Pipeline};
use crate::utils::error::Result;
use std::sync::Arc;

/// Extract-flatten-load stream for one resource kind. The three streams share
/// the client and destination handles but no mutable state.
pub struct ResourcePipeline<D: Destination> {
    kind: ResourceKind,
    client: Arc<ShopifyClient>,
    destination: Arc<D>,
}

impl<D: Destination> ResourcePipeline<D> {
    pub fn new(kind: ResourceKind, client: Arc<ShopifyClient>, destination: Arc<D>) -> Self {
        Self {
            kind,
            client,
            destination,
        }
    }

    fn fetch_params(&self) -> FetchParams {
        let config = self.client.config();
        FetchParams {
            limit: config.limit,
            // The status filter only applies to the orders endpoint.
            status: match self.kind {
                ResourceKind::Orders => Some(config.order_status.clone()),
                _ => None,
            },
            page_delay: config.page_delay,
        }
    }
}

#[async_trait::async_trait]
impl<D: Destination> Pipeline for ResourcePipeline<D> {
    fn name(&self) -> &str {
        self.kind.plural_key()
    }

    async fn extract(&self) -> Result<FetchOutcome> {
        Ok(fetch::fetch_all(&self.client, self.kind, &self.fetch_params()).await)
    }

    async fn transform(&self, raw: Vec<RawObject>) -> Result<Vec<Record>> {
        Ok(raw
            .iter()
            .map(|record| flatten::flatten(self.kind, record))
            .collect())
    }

    async fn load(&self, records: Vec<Record>) -> Result<usize> {
        let columns = flatten::columns(self.kind);
        self.destination
            .merge(self.kind.table_name(), &columns, "id", &records)
    }
}
