use std::sync::Arc;

use regex::Regex;

use crate::config::GenerationConfig;
use crate::gen::segment::Line;
use crate::oracle::ImportanceOracle;

/// Decides whether a unit of text carries definitional or comparative content
/// worth turning into a question. Rule-based by default; when an oracle is
/// configured, a non-positive rule score still forces "not important" and the
/// oracle decides the rest.
#[derive(Clone)]
pub struct ImportanceScorer {
    config: GenerationConfig,
    oracle: Option<Arc<dyn ImportanceOracle>>,
    definitional: Regex,
    comparison: Regex,
    quantitative: Regex,
    question_prefix: Regex,
}

impl ImportanceScorer {
    pub fn new(config: GenerationConfig, oracle: Option<Arc<dyn ImportanceOracle>>) -> Self {
        Self {
            config,
            oracle,
            definitional: Regex::new(
                r"(?i)\b(is a|is an|are a|are an|refers to|means|defined as|concerned with|represents|emulates?)\b",
            )
            .unwrap_or_else(|_| Regex::new("^$").unwrap()),
            comparison: Regex::new(r"(?i)\b(unlike|whereas|in contrast|compared to)\b")
                .unwrap_or_else(|_| Regex::new("^$").unwrap()),
            quantitative: Regex::new(
                r"(?i)\b\d+(?:\.\d+)?\s*(%|percent|px|ms|seconds?|minutes?|hours?|days?|years?|kg|km|mb|gb|layers?|nodes?|parameters?|samples?)\b",
            )
            .unwrap_or_else(|_| Regex::new("^$").unwrap()),
            question_prefix: Regex::new(
                r"(?i)^(what|why|how|define|explain|list|describe|who|when|where)\b",
            )
            .unwrap_or_else(|_| Regex::new("^$").unwrap()),
        }
    }

    /// Additive rule score for one unit given its surrounding lines. Pure
    /// function of the inputs; diagnostics are advisory logging only.
    pub fn rule_score(&self, unit: &str, context: &[Line], position: usize) -> i32 {
        let trimmed = unit.trim();
        if trimmed.is_empty() {
            return i32::MIN / 2;
        }

        let lower = trimmed.to_lowercase();
        let mut score = 0;

        if self.definitional.is_match(trimmed) {
            score += 3;
        }
        if self.comparison.is_match(trimmed) {
            score += 2;
        }
        if self
            .config
            .domain_keywords
            .iter()
            .any(|keyword| lower.contains(&keyword.to_lowercase()))
        {
            score += 2;
        }
        if self.quantitative.is_match(trimmed) {
            score += 1;
        }
        if position > 0 {
            if let Some(previous) = context.get(position - 1) {
                if self.is_lead_in(&previous.text) {
                    score += 2;
                }
            }
        }
        if self.heading_in_lookback(context, position) {
            score += 1;
        }

        if self.is_question_shaped(trimmed) {
            score -= 3;
        }
        if self.is_lead_in(trimmed) {
            score -= 3;
        }
        if trimmed.split_whitespace().count() < self.config.min_words {
            score -= 2;
        }
        if self.is_heading_shaped(trimmed) {
            score -= 3;
        }

        tracing::debug!(unit = trimmed, score, "rule score");
        score
    }

    /// Boolean verdict. Rule-only without an oracle; with one, the rule score
    /// gates negatives and the oracle decides the rest.
    pub fn is_important(&self, unit: &str, context: &[Line], position: usize) -> bool {
        let score = self.rule_score(unit, context, position);

        match &self.oracle {
            Some(oracle) => {
                if score <= 0 {
                    return false;
                }
                oracle.predict(unit)
            }
            None => score > self.config.score_cutoff,
        }
    }

    pub fn is_question_shaped(&self, text: &str) -> bool {
        text.trim_end().ends_with('?') || self.question_prefix.is_match(text)
    }

    /// Transitional lead-ins introduce a list or definition on the next unit.
    pub fn is_lead_in(&self, text: &str) -> bool {
        let trimmed = text.trim_end();
        let lower = trimmed.to_lowercase();
        trimmed.ends_with(':')
            || lower.contains("described below")
            || lower.contains("as follows")
            || lower.ends_with("the following")
    }

    pub fn is_heading_shaped(&self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.starts_with('#') {
            return true;
        }

        let words: Vec<&str> = trimmed.split_whitespace().collect();
        if words.is_empty() || words.len() > 6 {
            return false;
        }
        let ends_sentence = trimmed.ends_with('.') || trimmed.ends_with('!') || trimmed.ends_with('?');
        !ends_sentence
            && words
                .iter()
                .all(|word| word.chars().next().is_some_and(|c| c.is_uppercase()))
    }

    fn heading_in_lookback(&self, context: &[Line], position: usize) -> bool {
        let start = position.saturating_sub(self.config.heading_lookback);
        context[..position.min(context.len())]
            .iter()
            .skip(start)
            .any(|line| line.is_heading())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gen::segment::segment_lines;

    struct AlwaysYes;
    impl ImportanceOracle for AlwaysYes {
        fn predict(&self, _text: &str) -> bool {
            true
        }
    }

    struct AlwaysNo;
    impl ImportanceOracle for AlwaysNo {
        fn predict(&self, _text: &str) -> bool {
            false
        }
    }

    fn rule_scorer() -> ImportanceScorer {
        ImportanceScorer::new(GenerationConfig::default(), None)
    }

    #[test]
    fn definitional_sentence_is_important() {
        let lines = segment_lines(
            "Machine Learning is a subset of AI that refers to systems which learn from data.",
        );
        let scorer = rule_scorer();
        assert!(scorer.is_important(&lines[0].text, &lines, 0));
    }

    #[test]
    fn questions_are_not_important() {
        let lines = segment_lines("What is machine learning used for in practice?");
        let scorer = rule_scorer();
        assert!(!scorer.is_important(&lines[0].text, &lines, 0));
    }

    #[test]
    fn lead_in_scores_negative_and_boosts_successor() {
        let lines = segment_lines(
            "There are many kinds of AI, some are described briefly below:\nSymbolic Reasoning represents data as symbols.",
        );
        let scorer = rule_scorer();
        assert!(scorer.rule_score(&lines[0].text, &lines, 0) <= 0);
        let boosted = scorer.rule_score(&lines[1].text, &lines, 1);
        let plain = scorer.rule_score(&lines[1].text, &[], 0);
        assert_eq!(boosted - plain, 2);
    }

    #[test]
    fn heading_lookback_adds_boost() {
        let text = "# Neural Networks\nBackpropagation means adjusting weights from errors.";
        let lines = segment_lines(text);
        let scorer = rule_scorer();
        let with_heading = scorer.rule_score(&lines[1].text, &lines, 1);
        let without = scorer.rule_score(&lines[1].text, &[], 0);
        assert_eq!(with_heading - without, 1);
    }

    #[test]
    fn quantitative_pattern_scores() {
        let scorer = rule_scorer();
        let with_number =
            scorer.rule_score("Training a deep network takes around 12 hours on average.", &[], 0);
        let without =
            scorer.rule_score("Training a deep network takes quite a while on average.", &[], 0);
        assert_eq!(with_number - without, 1);
    }

    #[test]
    fn non_positive_rule_score_gates_oracle() {
        let scorer = ImportanceScorer::new(
            GenerationConfig::default(),
            Some(Arc::new(AlwaysYes)),
        );
        // lead-in shape scores negative; the oracle may not override that
        assert!(!scorer.is_important("The main kinds are described below:", &[], 0));
    }

    #[test]
    fn oracle_is_authoritative_on_positive_rule_scores() {
        let line = "Neural methods improve with data volume over time.";
        let rule_only = rule_scorer();
        let score = rule_only.rule_score(line, &[], 0);
        assert!(score > 0 && score <= rule_only.config.score_cutoff);
        assert!(!rule_only.is_important(line, &[], 0));

        let yes = ImportanceScorer::new(GenerationConfig::default(), Some(Arc::new(AlwaysYes)));
        assert!(yes.is_important(line, &[], 0));

        let no = ImportanceScorer::new(GenerationConfig::default(), Some(Arc::new(AlwaysNo)));
        assert!(!no.is_important(
            "Machine Learning is a subset of AI that refers to systems which learn from data.",
            &[],
            0
        ));
    }
}
