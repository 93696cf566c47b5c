use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct GenerationConfig {
    pub max_cards: usize,
    pub lookahead_window: usize,
    pub heading_lookback: usize,
    pub score_cutoff: i32,
    pub min_words: usize,
    pub require_anchor: bool,
    pub anchors: Vec<String>,
    pub domain_keywords: Vec<String>,
    pub domain_category: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_cards: 20,
            lookahead_window: 3,
            heading_lookback: 5,
            score_cutoff: 3,
            min_words: 4,
            require_anchor: false,
            anchors: split_list("learning,reasoning,intelligence,network,data,system"),
            domain_keywords: split_list(
                "ai,machine learning,deep learning,neural,symbolic,expert system",
            ),
            domain_category: "Artificial Intelligence".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub data_dir: PathBuf,
    pub model_path: PathBuf,
    pub strip_patterns: Vec<String>,
    pub generation: GenerationConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let data_dir = env::var("FLASHSTUDY_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        let model_path = env::var("FLASHSTUDY_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("importance_model.json"));

        let defaults = GenerationConfig::default();

        Self {
            bind_addr: env::var("FLASHSTUDY_BIND")
                .unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            data_dir,
            model_path,
            strip_patterns: env::var("STRIP_PATTERNS")
                .map(|v| v.split(';').map(|p| p.trim().to_string()).collect())
                .unwrap_or_else(|_| default_strip_patterns()),
            generation: GenerationConfig {
                max_cards: env_usize("MAX_CARDS", defaults.max_cards),
                lookahead_window: env_usize("LOOKAHEAD_WINDOW", defaults.lookahead_window),
                heading_lookback: env_usize("HEADING_LOOKBACK", defaults.heading_lookback),
                score_cutoff: env::var("SCORE_CUTOFF")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.score_cutoff),
                min_words: env_usize("MIN_IMPORTANT_WORDS", defaults.min_words),
                require_anchor: env::var("REQUIRE_ANCHOR")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.require_anchor),
                anchors: env::var("ANCHOR_KEYWORDS")
                    .map(|v| split_list(&v))
                    .unwrap_or(defaults.anchors),
                domain_keywords: env::var("DOMAIN_KEYWORDS")
                    .map(|v| split_list(&v))
                    .unwrap_or(defaults.domain_keywords),
                domain_category: env::var("DOMAIN_CATEGORY")
                    .unwrap_or(defaults.domain_category),
            },
        }
    }

    pub fn sqlite_dsn(&self) -> String {
        format!(
            "sqlite://{}",
            self.data_dir.join("flashcards.sqlite3").display()
        )
    }
}

fn env_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn default_strip_patterns() -> Vec<String> {
    vec![
        // page-number-only lines
        r"^\s*\d+\s*$".to_string(),
        r"^\s*Page \d+( of \d+)?\s*$".to_string(),
        // classification banners and boilerplate
        r"(?i)^\s*(confidential|unclassified|for internal use only)\s*$".to_string(),
        r"(?i)^\s*copyright\b.*$".to_string(),
    ]
}
