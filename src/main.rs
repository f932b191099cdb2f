use anyhow::Context;
use clap::Parser;
use hotel_aggregator::utils::{logger, validation::Validate};
use hotel_aggregator::{AggregationEngine, AggregatorConfig, SearchArgs, SearchResponse};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = SearchArgs::parse();

    let config = match &args.config {
        Some(path) => match AggregatorConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => AggregatorConfig::default(),
    };

    if let Err(e) = config.validate() {
        eprintln!("❌ Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    logger::init_logger(args.verbose, config.log_level(), config.log_format());

    let query = args.to_query();
    if let Err(e) = query.validate() {
        tracing::warn!("Rejected search query: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let client = reqwest::Client::builder()
        .user_agent(concat!("hotel-aggregator/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build HTTP client")?;
    let engine = AggregationEngine::new(config.build_adapters()).with_client(client);
    tracing::info!(
        "🚀 Searching '{}' across suppliers: {}",
        query.location,
        engine.supplier_names().join(", ")
    );

    let offers = engine.search(&query).await;
    let response = SearchResponse::new(query, offers);

    let serialized = if args.pretty {
        serde_json::to_string_pretty(&response)
    } else {
        serde_json::to_string(&response)
    };
    let output = serialized.context("failed to serialize search response")?;

    println!("{}", output);
    Ok(())
}
