use crate::config::GenerationConfig;
use crate::gen::segment::Line;

const DEFAULT_CATEGORY: &str = "General";

/// Infers a topical label for a term from heading markers or whole-document
/// keyword presence.
#[derive(Clone)]
pub struct CategoryDetector {
    domain_keywords: Vec<String>,
    domain_category: String,
}

impl CategoryDetector {
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            domain_keywords: config
                .domain_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            domain_category: config.domain_category.clone(),
        }
    }

    /// Document-wide domain keyword presence wins; otherwise the nearest
    /// heading preceding the term's first occurrence; otherwise "General".
    pub fn detect(&self, lines: &[Line], term: &str) -> String {
        let document = lines
            .iter()
            .map(|line| line.text.to_lowercase())
            .collect::<Vec<_>>()
            .join("\n");
        if self
            .domain_keywords
            .iter()
            .any(|keyword| document.contains(keyword))
        {
            return self.domain_category.clone();
        }

        let term_lower = term.to_lowercase();
        let term_position = lines
            .iter()
            .find(|line| line.text.to_lowercase().contains(&term_lower))
            .map(|line| line.position);

        let mut nearest: Option<String> = None;
        for line in lines {
            if !line.is_heading() {
                continue;
            }
            if let Some(position) = term_position {
                if line.position > position {
                    break;
                }
            }
            nearest = Some(line.text.trim_start_matches('#').trim().to_string());
        }

        nearest.unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
    }
}
