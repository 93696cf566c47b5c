use crate::config::GenerationConfig;
use crate::gen::score::ImportanceScorer;
use crate::gen::segment::{scan_window, split_sentences, Line};
use crate::gen::terms::TermExtractor;

const NO_DEFINITION: &str = "No specific definition available.";

#[derive(Debug, Clone)]
pub struct QaEntry {
    pub question: String,
    pub term: String,
    pub fragments: Vec<String>,
}

/// Insertion-ordered question -> answer-fragments map accumulated during one
/// generation pass. A verbatim question collision overwrites the earlier
/// fragments but keeps the original position.
#[derive(Debug, Default)]
pub struct QaMap {
    entries: Vec<QaEntry>,
}

impl QaMap {
    pub fn insert(&mut self, question: String, term: String, fragments: Vec<String>) {
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|entry| entry.question == question)
        {
            existing.term = term;
            existing.fragments = fragments;
            return;
        }
        self.entries.push(QaEntry {
            question,
            term,
            fragments,
        });
    }

    pub fn entries(&self) -> &[QaEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Walks segmented lines and pairs scored-important units with candidate
/// terms, accumulating forward-looking context into answers.
pub struct Synthesizer<'a> {
    scorer: &'a ImportanceScorer,
    extractor: &'a TermExtractor,
    window: usize,
}

impl<'a> Synthesizer<'a> {
    pub fn new(
        scorer: &'a ImportanceScorer,
        extractor: &'a TermExtractor,
        config: &GenerationConfig,
    ) -> Self {
        Self {
            scorer,
            extractor,
            window: config.lookahead_window,
        }
    }

    pub fn synthesize(&self, lines: &[Line]) -> QaMap {
        let mut map = QaMap::default();
        let mut cursor = 0;

        while cursor < lines.len() {
            let line = &lines[cursor];
            if line.is_blank() || line.is_heading() {
                cursor += 1;
                continue;
            }

            if let Some((term, definition)) = self.colon_definition(&line.text) {
                tracing::debug!(%term, "colon definition");
                map.insert(format!("What is {term}?"), term, vec![definition]);
                cursor += 1;
                continue;
            }

            let body = strip_list_marker(&line.text);
            let terms = self.extractor.extract(body);
            let Some(term) = terms.first().cloned() else {
                cursor += 1;
                continue;
            };

            if self.scorer.is_important(&line.text, lines, cursor) {
                let question = if line.is_list_item() {
                    format!("How does {term} work?")
                } else {
                    format!("What is {term}?")
                };
                let (fragments, next) = self.accumulate_answer(lines, cursor);
                tracing::debug!(%question, fragments = fragments.len(), "flushing entry");
                map.insert(question, term, fragments);
                cursor = next;
            } else if !self.extractor.extract_capitalized(body).is_empty() {
                cursor = self.lead_in(lines, cursor, term, &mut map);
            } else {
                cursor += 1;
            }
        }

        map
    }

    /// Important unit: seed the answer with the unit itself, then extend it
    /// within the look-ahead window. Extension stops at the first unit that is
    /// independently important (it starts the next candidate), or at a
    /// heading, list marker, or question-prefixed unit. Returns the fragments
    /// and the position scanning resumes from.
    fn accumulate_answer(&self, lines: &[Line], start: usize) -> (Vec<String>, usize) {
        let mut fragments = vec![strip_list_marker(&lines[start].text).to_string()];
        let end = start
            .saturating_add(self.window)
            .min(lines.len().saturating_sub(1));

        let mut idx = start + 1;
        while idx <= end {
            let line = &lines[idx];
            if line.is_blank() {
                idx += 1;
                continue;
            }
            if self.scorer.is_important(&line.text, lines, idx)
                || line.is_heading()
                || line.is_list_item()
                || self.scorer.is_question_shaped(&line.text)
            {
                return (fragments, idx);
            }
            fragments.push(line.text.clone());
            idx += 1;
        }

        (fragments, idx)
    }

    /// Unimportant unit that still names a term: treat it as a lead-in and
    /// look ahead for a unit that repeats the term or carries an anchor
    /// keyword. That unit replaces the answer outright. Returns the next
    /// cursor position; no entry is opened when nothing in the window matches.
    fn lead_in(&self, lines: &[Line], cursor: usize, term: String, map: &mut QaMap) -> usize {
        let term_lower = term.to_lowercase();
        let hit = scan_window(lines, cursor, self.window, |line| {
            !line.is_blank()
                && !line.is_heading()
                && (line.text.to_lowercase().contains(&term_lower)
                    || self.extractor.contains_anchor(&line.text))
        });

        match hit {
            Some(idx) => {
                tracing::debug!(%term, answer_at = idx, "lead-in resolved");
                map.insert(
                    format!("What is {term}?"),
                    term,
                    vec![lines[idx].text.clone()],
                );
                idx + 1
            }
            None => cursor + 1,
        }
    }

    /// `Term: definition` lines. The left side must be a short phrase and the
    /// right side must carry at least a weakly positive rule signal.
    fn colon_definition(&self, text: &str) -> Option<(String, String)> {
        let (lhs, rhs) = text.split_once(':')?;
        let term = lhs.trim();
        let definition = rhs.trim();

        if term.is_empty() || definition.is_empty() {
            return None;
        }
        if term.split_whitespace().count() > 3 {
            return None;
        }
        if term.contains(['.', '!', '?']) {
            return None;
        }
        if self.scorer.rule_score(definition, &[], 0) <= 0 {
            return None;
        }

        Some((term.to_string(), definition.to_string()))
    }
}

/// Selects the back text for one entry: the first sentence naming the term,
/// else the first carrying an anchor keyword, else the leading two sentences,
/// else a literal fallback.
pub fn clean_answer(entry: &QaEntry, extractor: &TermExtractor) -> String {
    let joined = entry.fragments.join(" ");
    let sentences = split_sentences(&joined);
    if sentences.is_empty() {
        return NO_DEFINITION.to_string();
    }

    let term_lower = entry.term.to_lowercase();
    if let Some(sentence) = sentences
        .iter()
        .find(|s| s.to_lowercase().contains(&term_lower))
    {
        return sentence.clone();
    }
    if let Some(sentence) = sentences.iter().find(|s| extractor.contains_anchor(s)) {
        return sentence.clone();
    }

    sentences.iter().take(2).cloned().collect::<Vec<_>>().join(" ")
}

fn strip_list_marker(text: &str) -> &str {
    text.trim_start_matches(['-', '*', '\u{2022}']).trim_start()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gen::segment::segment_lines;

    fn fixtures() -> (ImportanceScorer, TermExtractor, GenerationConfig) {
        let config = GenerationConfig::default();
        (
            ImportanceScorer::new(config.clone(), None),
            TermExtractor::new(&config),
            config,
        )
    }

    fn synthesize(text: &str) -> QaMap {
        let (scorer, extractor, config) = fixtures();
        let synth = Synthesizer::new(&scorer, &extractor, &config);
        synth.synthesize(&segment_lines(text))
    }

    #[test]
    fn important_line_seeds_its_own_answer() {
        let map = synthesize(
            "# Artificial Intelligence\nMachine Learning is a subset of AI that refers to systems which learn from data.\n",
        );
        assert_eq!(map.len(), 1);
        let entry = &map.entries()[0];
        assert_eq!(entry.question, "What is Machine Learning?");
        assert!(entry.fragments[0].contains("subset of AI"));
    }

    #[test]
    fn colon_definition_forms_card() {
        let map = synthesize("Deep learning: uses neural networks for image recognition.");
        assert_eq!(map.len(), 1);
        let entry = &map.entries()[0];
        assert_eq!(entry.question, "What is Deep learning?");
        assert_eq!(entry.fragments, vec!["uses neural networks for image recognition."]);
    }

    #[test]
    fn list_item_synthesizes_how_question() {
        let text = "- Backpropagation is a neural training method that refers to gradient flow.\nIt propagates errors backwards through the layers.";
        let map = synthesize(text);
        assert_eq!(map.entries()[0].question, "How does Backpropagation work?");
    }

    #[test]
    fn answer_extension_stops_at_next_important_unit() {
        let text = "Machine Learning is a subset of AI that refers to systems which learn.\n\
                    It improves with more examples over time.\n\
                    Deep Learning is a neural approach that refers to stacked layers.";
        let map = synthesize(text);
        assert_eq!(map.len(), 2);
        let first = &map.entries()[0];
        assert_eq!(first.fragments.len(), 2);
        assert!(first.fragments[1].contains("more examples"));
        assert_eq!(map.entries()[1].question, "What is Deep Learning?");
    }

    #[test]
    fn question_shaped_stop_unit_is_reexamined() {
        // the stop line is excluded from the first answer and then drives
        // its own lead-in card
        let text = "Machine Learning is a subset of AI that refers to systems which learn.\n\
                    How is Transfer Learning used in practice?\n\
                    Transfer Learning reuses neural weights from a source task.";
        let map = synthesize(text);
        assert_eq!(map.len(), 2);
        let first = &map.entries()[0];
        assert_eq!(first.fragments.len(), 1);
        let second = &map.entries()[1];
        assert_eq!(second.question, "What is Transfer Learning?");
        assert!(second.fragments[0].contains("reuses neural weights"));
    }

    #[test]
    fn lead_in_answer_replaces_rather_than_appends() {
        let text = "Symbolic Reasoning comes up often in older textbooks.\n\
                    filler line without much content here.\n\
                    Symbolic Reasoning represents data as symbols and rules.";
        let map = synthesize(text);
        assert_eq!(map.len(), 1);
        let entry = &map.entries()[0];
        assert_eq!(entry.question, "What is Symbolic Reasoning?");
        assert_eq!(entry.fragments.len(), 1);
        assert!(entry.fragments[0].contains("represents data as symbols"));
    }

    #[test]
    fn verbatim_question_collision_keeps_last_answer_in_place() {
        let mut map = QaMap::default();
        map.insert("What is X?".into(), "X".into(), vec!["first".into()]);
        map.insert("What is Y?".into(), "Y".into(), vec!["other".into()]);
        map.insert("What is X?".into(), "X".into(), vec!["second".into()]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.entries()[0].fragments, vec!["second"]);
        assert_eq!(map.entries()[1].question, "What is Y?");
    }

    #[test]
    fn cleaning_prefers_sentence_naming_the_term() {
        let (_, extractor, _) = fixtures();
        let entry = QaEntry {
            question: "What is Gradient Descent?".into(),
            term: "Gradient Descent".into(),
            fragments: vec![
                "Optimizers vary widely in practice.".into(),
                "Gradient Descent steps along the negative slope.".into(),
            ],
        };
        assert_eq!(
            clean_answer(&entry, &extractor),
            "Gradient Descent steps along the negative slope."
        );
    }

    #[test]
    fn cleaning_falls_back_to_anchor_then_leading_sentences() {
        let (_, extractor, _) = fixtures();
        let anchored = QaEntry {
            question: "What is Foo?".into(),
            term: "Foo".into(),
            fragments: vec!["Unrelated lead.".into(), "It relies on neural networks.".into()],
        };
        assert_eq!(clean_answer(&anchored, &extractor), "It relies on neural networks.");

        let plain = QaEntry {
            question: "What is Foo?".into(),
            term: "Foo".into(),
            fragments: vec!["First part.".into(), "Second part.".into(), "Third part.".into()],
        };
        assert_eq!(clean_answer(&plain, &extractor), "First part. Second part.");

        let empty = QaEntry {
            question: "What is Foo?".into(),
            term: "Foo".into(),
            fragments: vec![],
        };
        assert_eq!(clean_answer(&empty, &extractor), NO_DEFINITION);
    }
}
