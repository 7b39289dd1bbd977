mod config;
mod errors;
mod handlers;
mod models;
mod services;

use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;

use config::Config;
use handlers::{Console, ImageFile};
use models::SchemaVariant;
use services::AnalysisClient;

/// 음식 사진으로 칼로리와 영양소를 분석합니다.
#[derive(Debug, Parser)]
#[command(name = "calorie-lens", version)]
struct Cli {
    /// Images to analyze; the interactive console starts when none are given
    images: Vec<PathBuf>,

    /// Response schema: basic or extended
    #[arg(long)]
    schema: Option<SchemaVariant>,

    /// Gemini model id
    #[arg(long)]
    model: Option<String>,

    /// Print the validated result as JSON instead of the text panel
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables (.env may carry RUST_LOG too)
    dotenv().ok();

    // Initialize logger
    env_logger::init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(schema) = cli.schema {
        config.schema = schema;
    }
    if let Some(model) = cli.model {
        config.model = model;
    }

    if config.api_key.is_none() {
        log::warn!("⚠️ No API key found in VITE_API_KEY or API_KEY, analyses will fail");
    }

    let client = Arc::new(AnalysisClient::from_config(&config));
    log::info!(
        "✅ Analysis client initialized (model: {}, schema: {})",
        client.model_id(),
        client.schema()
    );

    let mut console = Console::new(client);

    if cli.images.is_empty() {
        println!("\n🥗 AI 칼로리 분석");
        println!("음식 사진을 올리면 AI가 칼로리와 영양소를 분석해 드립니다.");

        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        console.run(stdin, tokio::io::stdout()).await?;

        log::info!("🛑 Shutting down...");
        return Ok(());
    }

    let total = cli.images.len();
    let mut failed = 0;

    for path in cli.images {
        let file = ImageFile::from_path(path);
        log::info!("📸 Analyzing {}", file.path.display());

        let panel = console.analyze_file(&file).await;
        match console.session().result() {
            Some(result) if cli.json => println!("{}", serde_json::to_string_pretty(result)?),
            _ => println!("\n{}\n", panel),
        }
        if console.session().error().is_some() {
            failed += 1;
        }

        console.reset();
    }

    if failed > 0 {
        log::warn!("⚠️ {} of {} images could not be analyzed", failed, total);
    }

    Ok(())
}
