use anyhow::Result;
use tracing_subscriber::EnvFilter;

use flashstudy::db::Database;
use flashstudy::gen::Generator;
use flashstudy::oracle::LinearOracle;
use flashstudy::{run_server, AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::from_env();
    tokio::fs::create_dir_all(&config.data_dir).await?;

    let db = Database::new(&config).await?;

    let oracle = match LinearOracle::load(&config.model_path)? {
        Some(oracle) => {
            tracing::info!(path = %config.model_path.display(), "importance oracle loaded");
            Some(oracle as std::sync::Arc<dyn flashstudy::oracle::ImportanceOracle>)
        }
        None => {
            tracing::warn!(
                path = %config.model_path.display(),
                "no importance oracle artifact; running rule-based scoring only"
            );
            None
        }
    };

    let generator = Generator::new(config.generation.clone(), oracle);

    run_server(config, db, generator).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
