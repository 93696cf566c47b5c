use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Optional learned verdict on whether a unit of text is important. Loaded
/// once at startup and read-only afterwards; absence degrades the scorer to
/// rule-only mode.
pub trait ImportanceOracle: Send + Sync {
    fn predict(&self, text: &str) -> bool;
}

/// TF-IDF + linear model exported by the offline training script as JSON:
/// a vocabulary, per-term idf values, one coefficient per vocabulary slot,
/// and an intercept.
#[derive(Debug, Deserialize)]
pub struct LinearOracle {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearOracle {
    /// Loads the artifact if present. A missing file is not an error: the
    /// caller logs the degradation and runs rule-only.
    pub fn load(path: &Path) -> Result<Option<Arc<LinearOracle>>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed reading oracle artifact: {}", path.display()))?;
        let oracle: LinearOracle = serde_json::from_str(&raw)
            .with_context(|| format!("failed parsing oracle artifact: {}", path.display()))?;

        if oracle.idf.len() != oracle.vocabulary.len()
            || oracle.coefficients.len() != oracle.vocabulary.len()
        {
            anyhow::bail!(
                "oracle artifact is inconsistent: {} vocab terms, {} idf values, {} coefficients",
                oracle.vocabulary.len(),
                oracle.idf.len(),
                oracle.coefficients.len()
            );
        }
        if let Some(&slot) = oracle
            .vocabulary
            .values()
            .find(|&&slot| slot >= oracle.idf.len())
        {
            anyhow::bail!(
                "oracle artifact is inconsistent: vocabulary slot {} out of range for {} weights",
                slot,
                oracle.idf.len()
            );
        }

        Ok(Some(Arc::new(oracle)))
    }

    fn vectorize(&self, text: &str) -> Vec<(usize, f64)> {
        let lower = text.to_lowercase();
        let mut counts: HashMap<usize, f64> = HashMap::new();

        for token in lower
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            if let Some(&slot) = self.vocabulary.get(token) {
                *counts.entry(slot).or_insert(0.0) += 1.0;
            }
        }

        let mut weighted: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(slot, tf)| (slot, tf * self.idf[slot]))
            .collect();

        let norm = weighted
            .iter()
            .map(|(_, value)| value * value)
            .sum::<f64>()
            .sqrt();
        if norm > 0.0 {
            for (_, value) in weighted.iter_mut() {
                *value /= norm;
            }
        }

        weighted
    }
}

impl ImportanceOracle for LinearOracle {
    fn predict(&self, text: &str) -> bool {
        let features = self.vectorize(text);
        let score: f64 = features
            .iter()
            .map(|(slot, value)| self.coefficients[*slot] * value)
            .sum::<f64>()
            + self.intercept;
        score > 0.0
    }
}
