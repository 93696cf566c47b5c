use regex::Regex;

use crate::config::GenerationConfig;

const STOPWORDS: &[&str] = &[
    "what", "why", "how", "who", "when", "where", "is", "are", "a", "an", "the", "this", "that",
    "these", "those", "there", "here", "define", "explain", "list", "describe", "and", "but",
    "for", "with", "from", "into", "unlike", "whereas", "some", "many", "most", "each", "its",
    "it", "they", "them", "can", "will", "may", "has", "have", "was", "were", "below", "above",
];

/// Derives candidate topic terms from a line of text.
///
/// Capitalized runs of one or two words win; if none are found the extractor
/// falls back to lowercase tokens that carry a configured anchor substring.
#[derive(Clone)]
pub struct TermExtractor {
    capitalized: Regex,
    word: Regex,
    anchors: Vec<String>,
    require_anchor: bool,
}

impl TermExtractor {
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            capitalized: Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?\b")
                .unwrap_or_else(|_| Regex::new("^$").unwrap()),
            word: Regex::new(r"[a-z]{3,}").unwrap_or_else(|_| Regex::new("^$").unwrap()),
            anchors: config.anchors.iter().map(|a| a.to_lowercase()).collect(),
            require_anchor: config.require_anchor,
        }
    }

    /// Ordered, distinct terms for one line. Capitalized path first, anchored
    /// lowercase fallback otherwise.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let capitalized = self.extract_capitalized(text);
        if !capitalized.is_empty() {
            return capitalized;
        }
        self.extract_fallback(text)
    }

    /// Capitalized one- or two-word runs, first-occurrence order,
    /// case-sensitive dedupe. Stopword-titled candidates ("The", "There")
    /// are dropped.
    pub fn extract_capitalized(&self, text: &str) -> Vec<String> {
        let mut terms: Vec<String> = Vec::new();

        for found in self.capitalized.find_iter(text) {
            let term = found.as_str().trim().to_string();
            if term.split_whitespace().count() > 2 {
                continue;
            }
            let lower = term.to_lowercase();
            if lower
                .split_whitespace()
                .all(|word| STOPWORDS.contains(&word))
            {
                continue;
            }
            if self.require_anchor && !self.contains_anchor(&lower) {
                continue;
            }
            if !terms.contains(&term) {
                terms.push(term);
            }
        }

        terms
    }

    /// Lowercase alphabetic tokens of length >= 3, stopwords excluded,
    /// anchored to the configured domain list, case-insensitive dedupe.
    fn extract_fallback(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let mut terms: Vec<String> = Vec::new();

        for found in self.word.find_iter(&lower) {
            let token = found.as_str();
            if STOPWORDS.contains(&token) {
                continue;
            }
            if !self.contains_anchor(token) {
                continue;
            }
            if !terms.iter().any(|t| t == token) {
                terms.push(token.to_string());
            }
        }

        terms
    }

    pub fn contains_anchor(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.anchors.iter().any(|anchor| lower.contains(anchor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> TermExtractor {
        TermExtractor::new(&GenerationConfig::default())
    }

    #[test]
    fn capitalized_pairs_win() {
        let terms = extractor().extract("Machine Learning is a subset of AI.");
        assert_eq!(terms, vec!["Machine Learning"]);
    }

    #[test]
    fn stopword_titles_are_dropped() {
        let terms = extractor().extract("The term Expert Systems predates The Internet boom.");
        assert_eq!(terms[0], "Expert Systems");
        assert!(terms.iter().all(|t| t != "The"));
    }

    #[test]
    fn fallback_requires_anchor() {
        let terms = extractor().extract("supervised learning trains on labeled samples");
        assert_eq!(terms, vec!["learning"]);
    }

    #[test]
    fn fallback_without_anchor_is_empty() {
        let terms = extractor().extract("the quick brown fox jumps over fences");
        assert!(terms.is_empty());
    }

    #[test]
    fn dedupe_preserves_first_occurrence_order() {
        let terms = extractor()
            .extract("Neural Networks drive Deep Learning, and Neural Networks keep improving.");
        assert_eq!(terms, vec!["Neural Networks", "Deep Learning"]);
    }

    #[test]
    fn strict_variant_filters_unanchored_capitalized_terms() {
        let mut config = GenerationConfig::default();
        config.require_anchor = true;
        let extractor = TermExtractor::new(&config);
        let terms = extractor.extract("Symbolic Reasoning beats Brute Force on structured tasks.");
        assert_eq!(terms, vec!["Symbolic Reasoning"]);
    }
}
