/// One line of input text with its original position, so later passes can
/// look back at surrounding context.
#[derive(Debug, Clone)]
pub struct Line {
    pub text: String,
    pub position: usize,
}

impl Line {
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_heading(&self) -> bool {
        self.text.starts_with('#')
    }

    pub fn is_list_item(&self) -> bool {
        self.text.starts_with("- ")
            || self.text.starts_with("* ")
            || self.text.starts_with("\u{2022} ")
    }
}

/// Splits raw text into trimmed lines. Blank lines are kept so positions stay
/// stable for context lookups; callers skip them.
pub fn segment_lines(text: &str) -> Vec<Line> {
    text.lines()
        .enumerate()
        .map(|(position, raw)| Line {
            text: raw.trim().to_string(),
            position,
        })
        .collect()
}

/// Splits a block of text into sentences on `.`, `!` and `?` boundaries.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            let sentence = current.trim().to_string();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            current.clear();
        }
    }

    let tail = current.trim().to_string();
    if !tail.is_empty() {
        sentences.push(tail);
    }

    sentences
}

/// Returns the index of the first line in `(start..start + window]` matching
/// the predicate. Every look-ahead in the pipeline goes through this instead
/// of hand-rolled nested loops.
pub fn scan_window<F>(lines: &[Line], start: usize, window: usize, mut pred: F) -> Option<usize>
where
    F: FnMut(&Line) -> bool,
{
    let end = start.saturating_add(window).min(lines.len().saturating_sub(1));
    for idx in (start + 1)..=end {
        if pred(&lines[idx]) {
            return Some(idx);
        }
    }
    None
}
