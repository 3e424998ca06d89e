//! Splits message text into prose and fenced-code segments.
//!
//! A code block opens at a line start with three backticks, an optional
//! language tag (a run of non-whitespace, non-backtick characters) and a
//! newline. It closes at the next three backticks. An opening fence with no
//! closing fence is not a code block: it and everything after it stay prose.

use serde::{Deserialize, Serialize};

const FENCE: &str = "```";

/// A typed chunk of message text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    /// Text outside any code block.
    Prose {
        /// The verbatim text.
        content: String,
    },
    /// The body of a fenced code block.
    Code {
        /// The language tag after the opening fence, if any.
        language: Option<String>,
        /// The text strictly between the opening line and the closing fence.
        content: String,
    },
}

impl Segment {
    /// Creates a prose segment.
    #[must_use]
    pub fn prose(content: impl Into<String>) -> Self {
        Self::Prose {
            content: content.into(),
        }
    }

    /// Creates a code segment.
    #[must_use]
    pub fn code(language: Option<&str>, content: impl Into<String>) -> Self {
        Self::Code {
            language: language.map(str::to_owned),
            content: content.into(),
        }
    }

    /// Returns the segment text without fence delimiters.
    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Self::Prose { content } | Self::Code { content, .. } => content,
        }
    }

    /// Returns the language of a code segment, or `fallback` when untagged.
    ///
    /// Prose segments have no language and return `None`.
    #[must_use]
    pub fn language_or<'a>(&'a self, fallback: &'a str) -> Option<&'a str> {
        match self {
            Self::Prose { .. } => None,
            Self::Code { language, .. } => Some(language.as_deref().unwrap_or(fallback)),
        }
    }

    /// Returns `true` for code segments.
    #[must_use]
    pub const fn is_code(&self) -> bool {
        matches!(self, Self::Code { .. })
    }
}

/// Segments `text` into alternating prose and code regions.
///
/// Empty prose between adjacent regions is omitted, and empty input yields
/// no segments.
///
/// # Examples
///
/// ```
/// use hoverchat::session::domain::{Segment, segment};
///
/// let segments = segment("a\n```js\nconsole.log(1)\n```\nb");
/// assert_eq!(
///     segments,
///     vec![
///         Segment::prose("a\n"),
///         Segment::code(Some("js"), "console.log(1)\n"),
///         Segment::prose("\nb"),
///     ]
/// );
///
/// // An unterminated fence stays prose.
/// assert_eq!(segment("```py\nx=1"), vec![Segment::prose("```py\nx=1")]);
/// ```
#[must_use]
pub fn segment(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = text;
    let mut at_line_start = true;

    while let Some(block) = FencedBlock::find(rest, at_line_start) {
        if !block.before.is_empty() {
            segments.push(Segment::prose(block.before));
        }
        segments.push(Segment::code(block.language, block.content));
        rest = block.after;
        // The remainder begins right after a closing fence.
        at_line_start = false;
    }

    if !rest.is_empty() {
        segments.push(Segment::prose(rest));
    }
    segments
}

/// Rebuilds message text from segments, restoring the fence delimiters.
///
/// For any `text`, `render_raw(&segment(text)) == text`.
#[must_use]
pub fn render_raw(segments: &[Segment]) -> String {
    let mut raw = String::new();
    for item in segments {
        match item {
            Segment::Prose { content } => raw.push_str(content),
            Segment::Code { language, content } => {
                raw.push_str(FENCE);
                raw.push_str(language.as_deref().unwrap_or_default());
                raw.push('\n');
                raw.push_str(content);
                raw.push_str(FENCE);
            }
        }
    }
    raw
}

/// A complete opening/closing fence pair located in a haystack.
struct FencedBlock<'a> {
    before: &'a str,
    language: Option<&'a str>,
    content: &'a str,
    after: &'a str,
}

impl<'a> FencedBlock<'a> {
    /// Finds the first complete block in `haystack`.
    ///
    /// `starts_line` tells whether offset zero of `haystack` sits at a line
    /// start in the full text. Returns `None` when no opening fence has a
    /// matching close.
    fn find(haystack: &'a str, starts_line: bool) -> Option<Self> {
        let mut offset = 0;
        while let Some(found) = haystack.get(offset..)?.find(FENCE) {
            let start = offset + found;
            let after_fence = start + FENCE.len();
            offset = after_fence;

            if !is_line_start(haystack, start, starts_line) {
                continue;
            }
            let Some((language, body_start)) = opening_line(haystack, after_fence) else {
                continue;
            };

            // Any later fence would close this one, so a missing close means
            // the remainder holds no further blocks either.
            let body = haystack.get(body_start..)?;
            let close = body.find(FENCE)?;
            return Some(Self {
                before: haystack.get(..start)?,
                language,
                content: body.get(..close)?,
                after: body.get(close + FENCE.len()..)?,
            });
        }
        None
    }
}

fn is_line_start(haystack: &str, position: usize, starts_line: bool) -> bool {
    if position == 0 {
        return starts_line;
    }
    haystack
        .get(..position)
        .is_some_and(|prefix| prefix.ends_with('\n'))
}

/// Parses the remainder of an opening fence line starting at `from`.
///
/// Returns the language tag and the offset of the first body byte.
fn opening_line(haystack: &str, from: usize) -> Option<(Option<&str>, usize)> {
    let line = haystack.get(from..)?;
    let newline = line.find('\n')?;
    let tag = line.get(..newline)?;
    if tag.chars().any(|ch| ch.is_whitespace() || ch == '`') {
        return None;
    }
    let language = (!tag.is_empty()).then_some(tag);
    Some((language, from + newline + 1))
}
