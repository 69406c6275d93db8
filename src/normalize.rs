//! Whitespace normalization.
//!
//! Text pulled out of a PDF is full of layout debris: hard line breaks at
//! every column edge, runs of blank lines between pages, tabs and padding
//! spaces used for alignment.
//!
//! ```text
//! "  Title\n\n\nFirst   line\nsecond\tline  "
//!                     ↓
//! "Title First line second line"
//! ```
//!
//! Normalization collapses runs of newlines to one newline, then collapses
//! every whitespace run (newlines included) to a single ASCII space, then
//! trims both ends. The two collapse steps compose into "every maximal
//! whitespace run becomes one space", which is what is implemented here in a
//! single pass.
//!
//! A separator is any Unicode `White_Space` character plus the four ASCII
//! information separators U+001C..U+001F. The chunker uses the same
//! predicate, so the normalized text and the chunker always agree on where
//! words are.

/// Collapse whitespace runs to single spaces and trim the ends.
///
/// Pure and idempotent: `normalize(&normalize(s)) == normalize(s)`.
///
/// ```rust
/// use precis::normalize;
///
/// assert_eq!(normalize("  a \n\n b\t\tc  "), "a b c");
/// assert_eq!(normalize("\n \t"), "");
/// ```
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in words(text) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Number of whitespace-separated words in `text`.
#[must_use]
pub fn word_count(text: &str) -> usize {
    words(text).count()
}

/// Whether `c` separates words.
pub(crate) fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// The words of `text`, in order.
fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_separator).filter(|w| !w.is_empty())
}
