//! Connectivity probe: verifies credentials and permission scopes with
//! read-only calls before a real pipeline run.

use shopify_etl::core::probe;
use shopify_etl::utils::validation::Validate;
use shopify_etl::{CliConfig, ShopifyClient, ShopifyConfig};

fn token_preview(token: &str) -> String {
    if token.len() > 14 {
        format!("{}...{}", &token[..10], &token[token.len() - 4..])
    } else {
        "***".to_string()
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    println!("Testing Shopify API Connection...");
    println!("{}", "=".repeat(50));

    let cli = CliConfig {
        db_path: "unused".to_string(),
        limit: 250,
        status: "any".to_string(),
        page_delay_ms: 500,
        verbose: false,
    };

    let config = match ShopifyConfig::from_env(&cli).and_then(|c| {
        c.validate()?;
        Ok(c)
    }) {
        Ok(config) => config,
        Err(e) => {
            let failure = probe::classify(&e);
            println!("✗ {}", failure.summary);
            for hint in &failure.hints {
                println!("{}", hint);
            }
            println!("{}", "=".repeat(50));
            println!("✗ Connection test failed. Please fix the issues above and try again.");
            std::process::exit(1);
        }
    };

    println!("Testing connection to: {}", config.shop_domain());
    println!(
        "API Token: {} (truncated for security)",
        token_preview(&config.api_token)
    );

    let client = ShopifyClient::new(config);
    let report = probe::run(&client).await;

    for check in &report.checks {
        println!("\n{}", check.label);
        for detail in &check.details {
            println!("✓ {}", detail);
        }
    }

    println!();
    match &report.failure {
        None => {
            println!("✓ All tests passed! Your Shopify API connection is working correctly.");
            println!("✓ You can now run the full pipeline with: shopify-etl");
            println!("{}", "=".repeat(50));
            println!("✓ Connection test passed! You're ready to run the pipeline.");
        }
        Some(failure) => {
            println!("✗ {}", failure.summary);
            for hint in &failure.hints {
                println!("{}", hint);
            }
            println!("{}", "=".repeat(50));
            println!("✗ Connection test failed. Please fix the issues above and try again.");
            std::process::exit(1);
        }
    }
}
