use crate::domain::model::RunReport;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

/// Runs the configured resource streams strictly sequentially, in the order
/// they were added. A stream whose fetch stopped early still gets its partial
/// rows loaded and does not prevent later streams from running; destination
/// errors abort the run.
pub struct EtlEngine {
    pipelines: Vec<Box<dyn Pipeline>>,
}

impl EtlEngine {
    pub fn new() -> Self {
        Self {
            pipelines: Vec::new(),
        }
    }

    pub fn add_pipeline(&mut self, pipeline: Box<dyn Pipeline>) {
        self.pipelines.push(pipeline);
    }

    pub async fn run_all(&self) -> Result<Vec<RunReport>> {
        let mut reports = Vec::with_capacity(self.pipelines.len());

        for pipeline in &self.pipelines {
            let started = Instant::now();
            println!("📥 Extracting {}...", pipeline.name());

            let outcome = pipeline.extract().await?;
            if outcome.termination.is_failure() {
                tracing::warn!(
                    "⚠️ {}: extraction {} — loading {} records from prior pages",
                    pipeline.name(),
                    outcome.termination,
                    outcome.records.len()
                );
            }
            println!(
                "   {} records fetched over {} pages",
                outcome.records.len(),
                outcome.pages
            );
            let pages = outcome.pages;
            let termination = outcome.termination.clone();

            let rows = pipeline.transform(outcome.records).await?;
            let rows_loaded = pipeline.load(rows).await?;
            println!("💾 Loaded {} rows into '{}'", rows_loaded, pipeline.name());

            reports.push(RunReport {
                resource: pipeline.name().to_string(),
                rows_loaded,
                pages,
                termination,
                duration: started.elapsed(),
            });
        }

        Ok(reports)
    }
}

impl Default for EtlEngine {
    fn default() -> Self {
        Self::new()
    }
}
