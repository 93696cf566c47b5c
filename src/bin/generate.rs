use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use flashstudy::config::AppConfig;
use flashstudy::db::Database;
use flashstudy::extract::{DocumentFormat, Extractor};
use flashstudy::gen::Generator;
use flashstudy::oracle::{ImportanceOracle, LinearOracle};

#[derive(Parser, Debug)]
#[command(name = "generate")]
#[command(about = "Generate flashcards from a study document and print them as JSON")]
struct Cli {
    /// Input document (pdf, docx, txt/md, or image)
    #[arg(long)]
    file: String,
    /// Also persist the generated cards to the configured database
    #[arg(long, default_value_t = false)]
    save: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = AppConfig::from_env();

    let oracle = match LinearOracle::load(&config.model_path)? {
        Some(oracle) => Some(oracle as std::sync::Arc<dyn ImportanceOracle>),
        None => {
            tracing::warn!("no importance oracle artifact; running rule-based scoring only");
            None
        }
    };

    let format = DocumentFormat::from_filename(&cli.file)?;
    let bytes = tokio::fs::read(&cli.file)
        .await
        .with_context(|| format!("failed reading {}", cli.file))?;

    let extractor = Extractor::new(&config.strip_patterns);
    let text = extractor.extract_text(&bytes, format).await?;

    let generator = Generator::new(config.generation.clone(), oracle);
    let cards = tokio::task::spawn_blocking(move || generator.generate(&text))
        .await
        .map_err(|_| anyhow::anyhow!("generation task panicked"))?;

    let cards = if cli.save {
        tokio::fs::create_dir_all(&config.data_dir).await?;
        let db = Database::new(&config).await?;
        let stored = db.save_cards(&cards).await?;
        tracing::info!(cards = stored.len(), "saved generated batch");
        stored
    } else {
        cards
    };

    println!("{}", serde_json::to_string_pretty(&cards)?);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
