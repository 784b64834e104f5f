use clap::Parser;
use shopify_etl::utils::{logger, validation::Validate};
use shopify_etl::{
    CliConfig, DuckDbDestination, EtlEngine, ResourceKind, ResourcePipeline, ShopifyClient,
    ShopifyConfig,
};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting shopify-etl");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = cli.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let config = match ShopifyConfig::from_env(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            eprintln!("💡 Set the API_TOKEN and STORE_ID environment variables.");
            std::process::exit(1);
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let destination = match DuckDbDestination::open(&cli.db_path) {
        Ok(destination) => Arc::new(destination),
        Err(e) => {
            eprintln!("❌ Failed to open database '{}': {}", cli.db_path, e);
            std::process::exit(1);
        }
    };

    println!("Running Shopify ETL pipeline...");
    let client = Arc::new(ShopifyClient::new(config));

    let mut engine = EtlEngine::new();
    for kind in ResourceKind::ALL {
        engine.add_pipeline(Box::new(ResourcePipeline::new(
            kind,
            client.clone(),
            destination.clone(),
        )));
    }

    match engine.run_all().await {
        Ok(reports) => {
            println!("✅ Pipeline completed!");
            for report in &reports {
                println!(
                    "  - {}: {} rows loaded, {} pages, {} ({:?})",
                    report.resource,
                    report.rows_loaded,
                    report.pages,
                    report.termination,
                    report.duration
                );
            }
            println!("📁 Data written to: {}", cli.db_path);

            if reports.iter().any(|r| r.termination.is_failure()) {
                eprintln!("⚠️ One or more resources stopped early; counts may be partial.");
            }
        }
        Err(e) => {
            tracing::error!("❌ ETL process failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}
