use std::collections::HashSet;

use crate::gen::terms::TermExtractor;
use crate::models::Flashcard;

/// Appends card j's front to card i's links for every ordered pair whose
/// front+back term sets overlap. Links are additive and never deduplicated:
/// running the linker again over the same set doubles every link count.
pub fn link_cards(cards: &mut [Flashcard], extractor: &TermExtractor) {
    let term_sets: Vec<HashSet<String>> = cards
        .iter()
        .map(|card| {
            extractor
                .extract(&format!("{} {}", card.front, card.back))
                .into_iter()
                .collect()
        })
        .collect();

    for i in 0..cards.len() {
        for j in 0..cards.len() {
            if i == j {
                continue;
            }
            if term_sets[i].intersection(&term_sets[j]).next().is_some() {
                let front = cards[j].front.clone();
                tracing::debug!(from = %cards[i].front, to = %front, "linked cards");
                cards[i].links.push(front);
            }
        }
    }
}
