pub mod category;
pub mod link;
pub mod score;
pub mod segment;
pub mod synth;
pub mod terms;

use std::sync::Arc;

use crate::config::GenerationConfig;
use crate::models::Flashcard;
use crate::oracle::ImportanceOracle;

use self::category::CategoryDetector;
use self::score::ImportanceScorer;
use self::synth::Synthesizer;
use self::terms::TermExtractor;

/// One full flashcard-generation pass: segment, synthesize question/answer
/// pairs, clean answers, detect categories, cap, cross-link. All state is
/// owned by the invocation; the only shared handle is the read-only oracle.
#[derive(Clone)]
pub struct Generator {
    config: GenerationConfig,
    scorer: ImportanceScorer,
    extractor: TermExtractor,
    detector: CategoryDetector,
}

impl Generator {
    pub fn new(config: GenerationConfig, oracle: Option<Arc<dyn ImportanceOracle>>) -> Self {
        Self {
            scorer: ImportanceScorer::new(config.clone(), oracle),
            extractor: TermExtractor::new(&config),
            detector: CategoryDetector::new(&config),
            config,
        }
    }

    pub fn generate(&self, text: &str) -> Vec<Flashcard> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let lines = segment::segment_lines(text);
        let synthesizer = Synthesizer::new(&self.scorer, &self.extractor, &self.config);
        let map = synthesizer.synthesize(&lines);

        let mut cards = Vec::new();
        for entry in map.entries() {
            if cards.len() >= self.config.max_cards {
                tracing::debug!(max = self.config.max_cards, "card cap reached");
                break;
            }
            let back = synth::clean_answer(entry, &self.extractor);
            let category = self.detector.detect(&lines, &entry.term);
            cards.push(Flashcard::new(entry.question.clone(), back, category));
        }

        link::link_cards(&mut cards, &self.extractor);

        tracing::info!(cards = cards.len(), "generation pass complete");
        cards
    }
}
