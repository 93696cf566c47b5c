use serde::{Deserialize, Serialize};

/// One flashcard. `id` is empty until the storage layer assigns one at save
/// time. `links` holds the front text of related cards, appended by the
/// cross-linker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Flashcard {
    #[serde(default)]
    pub id: String,
    pub front: String,
    pub back: String,
    pub category: String,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default = "default_interval")]
    pub interval: f64,
    #[serde(default = "default_ease")]
    pub ease: f64,
}

impl Flashcard {
    pub fn new(front: String, back: String, category: String) -> Self {
        Self {
            id: String::new(),
            front,
            back,
            category,
            links: Vec::new(),
            interval: default_interval(),
            ease: default_ease(),
        }
    }
}

fn default_interval() -> f64 {
    1.0
}

fn default_ease() -> f64 {
    2.5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub flashcards: Vec<Flashcard>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub card_id: String,
    pub quality: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}
