//! Stop-word lists for word frequency.

use std::collections::HashSet;

const BUILTIN: &str = include_str!("stop_words.txt");

/// A case-insensitive set of words to leave out of word counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWords(HashSet<String>);

impl StopWords {
    /// The built-in English and Hinglish chat list.
    pub fn builtin() -> Self {
        Self::parse(BUILTIN)
    }

    /// Parses a newline-separated list.
    ///
    /// Blank lines and lines starting with `#` are skipped.
    pub fn parse(list: &str) -> Self {
        list.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect()
    }

    /// Returns true if `word` (already lower-cased) is a stop word.
    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for StopWords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        )
    }
}
