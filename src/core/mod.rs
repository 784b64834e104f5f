pub mod client;
pub mod etl;
pub mod fetch;
pub mod flatten;
pub mod pipeline;
pub mod probe;

pub use crate::domain::model::{FetchOutcome, RawObject, Record, ResourceKind, RunReport, Termination};
pub use crate::domain::ports::{Destination, Pipeline};
pub use crate::utils::error::Result;
