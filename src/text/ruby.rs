//! Inline ruby (furigana) markup: `(base){reading}`.
//!
//! An annotation is an opening `(`, a non-empty base without `)`, `)`, `{`, a non-empty reading
//! without `}`, and a closing `}`. Anything that does not complete that shape is literal text.

use std::borrow::Cow;
use std::ops::Range;

/// One piece of a parsed line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RubySegment<'a> {
    /// Text drawn as-is.
    Plain(&'a str),
    /// Base text with a reading drawn above it.
    Ruby {
        /// Text drawn on the line.
        base: &'a str,
        /// Small annotation drawn above `base`.
        reading: &'a str,
    },
}

impl<'a> RubySegment<'a> {
    /// Text this segment contributes to the visible line.
    pub fn visible(&self) -> &'a str {
        match *self {
            RubySegment::Plain(s) => s,
            RubySegment::Ruby { base, .. } => base,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Annotation {
    base: Range<usize>,
    reading: Range<usize>,
    end: usize,
}

/// Try to match an annotation whose `(` sits at byte offset `open`.
fn annotation_at(line: &str, open: usize) -> Option<Annotation> {
    let bytes = line.as_bytes();
    let base_start = open + 1;
    let close = base_start + line.get(base_start..)?.find(')')?;
    if close == base_start || bytes.get(close + 1) != Some(&b'{') {
        return None;
    }
    let reading_start = close + 2;
    let reading_end = reading_start + line[reading_start..].find('}')?;
    if reading_end == reading_start {
        return None;
    }
    Some(Annotation {
        base: base_start..close,
        reading: reading_start..reading_end,
        end: reading_end + 1,
    })
}

/// Split a line into plain and annotated segments, left to right, non-overlapping.
///
/// A line without annotations yields a single [`RubySegment::Plain`] holding the whole line
/// (including the empty line).
pub fn parse_ruby(line: &str) -> Vec<RubySegment<'_>> {
    let mut out = Vec::new();
    let mut plain_start = 0;
    let mut cursor = 0;

    while let Some(rel) = line[cursor..].find('(') {
        let open = cursor + rel;
        let Some(a) = annotation_at(line, open) else {
            cursor = open + 1;
            continue;
        };
        if open > plain_start {
            out.push(RubySegment::Plain(&line[plain_start..open]));
        }
        out.push(RubySegment::Ruby {
            base: &line[a.base],
            reading: &line[a.reading],
        });
        // base + reading + the four delimiters
        cursor = a.end;
        plain_start = a.end;
    }

    if plain_start < line.len() || out.is_empty() {
        out.push(RubySegment::Plain(&line[plain_start..]));
    }
    out
}

/// Replace every annotation with its base text.
///
/// Borrows the input when the line carries no annotations.
pub fn strip_ruby(line: &str) -> Cow<'_, str> {
    let segments = parse_ruby(line);
    if segments
        .iter()
        .all(|s| matches!(s, RubySegment::Plain(_)))
    {
        return Cow::Borrowed(line);
    }
    Cow::Owned(segments.iter().map(RubySegment::visible).collect())
}

#[cfg(test)]
#[path = "../../tests/unit/text/ruby.rs"]
mod tests;
