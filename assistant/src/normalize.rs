//! Text normalization: entity cleanup and accent-insensitive folding.

use unicode_normalization::char::{decompose_canonical, is_combining_mark};

const TRAILING_PUNCTUATION: &[char] = &['?', '.', '!', ',', ';', ':'];

/// Normalize an extracted entity: trim, strip trailing `?.!,;:` and title-case
/// every whitespace-separated word.
///
/// ```
/// assert_eq!(assistant::normalize::normalize_entity("  sant cugat!? "), "Sant Cugat");
/// ```
pub fn normalize_entity(raw: &str) -> String {
    raw.trim()
        .trim_end_matches(TRAILING_PUNCTUATION)
        .split_whitespace()
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Lowercased, accent-stripped view of a text that remembers where each folded
/// byte came from, so matches on the folded text can be cut out of the original.
#[derive(Debug, Clone)]
pub struct FoldedText<'a> {
    original: &'a str,
    folded: String,
    /// `origin[i]` is the byte offset in `original` of the char that produced
    /// folded byte `i`; the extra last entry is `original.len()`.
    origin: Vec<usize>,
}

impl<'a> FoldedText<'a> {
    pub fn new(original: &'a str) -> Self {
        let mut folded = String::with_capacity(original.len());
        let mut origin = Vec::with_capacity(original.len() + 1);

        for (offset, ch) in original.char_indices() {
            decompose_canonical(ch, |c| {
                if !is_combining_mark(c) {
                    folded.extend(c.to_lowercase());
                }
            });
            origin.resize(folded.len(), offset);
        }
        origin.push(original.len());

        Self {
            original,
            folded,
            origin,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.folded
    }

    /// Slice of the original text covering the folded byte range `start..end`.
    pub fn original_slice(&self, start: usize, end: usize) -> &'a str {
        let from = self.origin[start];
        let to = self.origin[end];
        &self.original[from..to]
    }
}

/// Fold a text for comparison only (lowercase, no diacritics).
pub fn fold(text: &str) -> String {
    FoldedText::new(text).folded
}
