use crate::models::Flashcard;

const MIN_EASE: f64 = 1.3;

/// SM-2 style interval/ease update. Quality >= 3 counts as a successful
/// review: the first success jumps the interval to six days, later ones
/// multiply by the ease factor. Failures reset the interval to one day.
pub fn apply_review(card: &mut Flashcard, quality: i32) {
    if quality >= 3 {
        if card.interval <= 1.0 {
            card.interval = 6.0;
        } else {
            card.interval *= card.ease;
        }
        let miss = (5 - quality) as f64;
        card.ease = (card.ease + 0.1 - miss * (0.08 + miss * 0.02)).max(MIN_EASE);
    } else {
        card.interval = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> Flashcard {
        Flashcard::new("What is X?".into(), "X is a thing.".into(), "General".into())
    }

    #[test]
    fn first_success_jumps_to_six_days() {
        let mut card = card();
        apply_review(&mut card, 5);
        assert_eq!(card.interval, 6.0);
        assert!((card.ease - 2.6).abs() < 1e-9);
    }

    #[test]
    fn later_successes_multiply_by_ease() {
        let mut card = card();
        apply_review(&mut card, 5);
        apply_review(&mut card, 4);
        assert!((card.interval - 6.0 * 2.6).abs() < 1e-9);
    }

    #[test]
    fn failure_resets_interval_and_keeps_ease() {
        let mut card = card();
        apply_review(&mut card, 5);
        let ease = card.ease;
        apply_review(&mut card, 1);
        assert_eq!(card.interval, 1.0);
        assert_eq!(card.ease, ease);
    }

    #[test]
    fn ease_never_drops_below_floor() {
        let mut card = card();
        card.ease = 1.31;
        apply_review(&mut card, 3);
        assert_eq!(card.ease, MIN_EASE);
    }
}
