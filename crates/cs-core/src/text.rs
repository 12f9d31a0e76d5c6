//! Lexical scanning of message text: words, links and emoji.

use std::sync::LazyLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Pre-compiled regex for URLs: scheme or `www.` forms, then bare domains.
///
/// Bare domains must end in a common top-level domain so that run-together
/// chat text like `ok.thanks` is not taken for a link.
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        \b(?:https?|ftp)://[^\s<>]+
        | \bwww\.[^\s<>]+
        | \b[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)*
          \.(?:com|org|net|edu|gov|io|co|in|uk|us|ca|au|de|fr|me|ly|gl|gg|tv|ai|app|dev|info|biz|xyz)
          \b(?:/[^\s<>]*)?
        ",
    )
    .unwrap()
});

/// Whitespace-delimited tokens.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

/// Number of URL occurrences in `text`.
pub fn count_links(text: &str) -> usize {
    URL_RE.find_iter(text).count()
}

/// Emoji occurrences in `text`, one item per grapheme cluster.
///
/// Multi-codepoint emoji (skin tones, flags, ZWJ families) are reported as a
/// single item. Each item is the fully-qualified form, so `❤` and `❤️`
/// yield the same string.
pub fn emoji_graphemes(text: &str) -> impl Iterator<Item = &'static str> + '_ {
    text.graphemes(true)
        .filter_map(|grapheme| emojis::get(grapheme).map(emojis::Emoji::as_str))
}
