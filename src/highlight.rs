//! Splits display text around occurrences of the search query.

use serde::Serialize;

/// A piece of highlighted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "camelCase")]
pub enum Segment {
    Plain(String),
    /// An occurrence of the query, in the text's original casing.
    Match(String),
}

impl Segment {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) | Self::Match(text) => text,
        }
    }

    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Match(_))
    }
}

/// Highlights `text` for `query`. See [`Highlighter::highlight`].
#[must_use]
pub fn highlight(text: &str, query: &str) -> Vec<Segment> {
    Highlighter::new(query).highlight(text)
}

/// Joins segments back into one string, wrapping matches in `open`/`close`.
#[must_use]
pub fn mark(segments: &[Segment], open: &str, close: &str) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Plain(text) => text.clone(),
            Segment::Match(text) => format!("{open}{text}{close}"),
        })
        .collect()
}

/// Highlighter bound to one query, reused across every field of a row.
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    /// Trimmed query as chars; `None` when the query is blank.
    query: Option<Vec<char>>,
}

impl Highlighter {
    #[must_use]
    pub fn new(query: &str) -> Self {
        let trimmed = query.trim();
        let query = (!trimmed.is_empty()).then(|| trimmed.chars().collect());
        Self { query }
    }

    /// Whether highlighting is a no-op.
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        self.query.is_none()
    }

    /// Splits `text` into plain and matched segments.
    ///
    /// The query is matched literally and case-insensitively; matches are
    /// leftmost-first and never overlap. A blank query returns `text` as one
    /// plain segment.
    #[must_use]
    #[allow(clippy::string_slice)]
    pub fn highlight(&self, text: &str) -> Vec<Segment> {
        let Some(query) = &self.query else {
            return vec![Segment::Plain(text.to_string())];
        };

        let mut segments = Vec::new();
        let mut plain_start = 0;
        let mut search_from = 0;

        while let Some((start, end)) = find_ignore_case(text, search_from, query) {
            if start > plain_start {
                segments.push(Segment::Plain(text[plain_start..start].to_string()));
            }
            segments.push(Segment::Match(text[start..end].to_string()));
            plain_start = end;
            search_from = end;
        }

        if plain_start < text.len() || segments.is_empty() {
            segments.push(Segment::Plain(text[plain_start..].to_string()));
        }
        segments
    }
}

/// Byte range of the first case-insensitive occurrence of `query` at or after `from`.
///
/// `from` must be a char boundary of `text`.
#[allow(clippy::string_slice)]
fn find_ignore_case(text: &str, from: usize, query: &[char]) -> Option<(usize, usize)> {
    text[from..].char_indices().find_map(|(offset, _)| {
        let start = from + offset;
        match_at(&text[start..], query).map(|len| (start, start + len))
    })
}

/// Length in bytes of `query` matched at the start of `haystack`, if it matches.
fn match_at(haystack: &str, query: &[char]) -> Option<usize> {
    let mut chars = haystack.char_indices();
    for expected in query {
        let (_, actual) = chars.next()?;
        if !chars_eq_ignore_case(actual, *expected) {
            return None;
        }
    }
    Some(chars.next().map_or(haystack.len(), |(index, _)| index))
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}
