//! Per-glyph pixel widths and text measurement.
//!
//! The width resource is a UTF-8 text file with one `<char>\t<width>` pair per
//! line. A character may be written literally or as `U+XXXX`. Anything after
//! `//` is a comment and blank lines are ignored:
//!
//! ```text
//! // lowercase
//! a	5
//! i	1
//! U+0020	3   // space
//! ```
//!
//! Malformed lines are logged and skipped, so a partially broken table still
//! loads. Measurement is strict instead: a character without a width is an
//! error.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use crate::error::BookError;
use crate::text_unit::TextUnit;

/// Marker that starts a two-character color/format control code.
pub const CONTROL_CODE_MARKER: char = '§';

/// Pixel gap inserted between two consecutive glyphs (never after the last).
pub const BETWEEN_CHARS_WIDTH: u32 = 1;

/// Characters that may follow [`CONTROL_CODE_MARKER`].
///
/// `0-9a-f` select one of 16 colors; `k l m n o r` are the six formatting
/// codes (obfuscated, bold, strikethrough, underline, italic, reset).
const CONTROL_CODE_CHARS: &[char] = &[
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'k', 'l', 'm',
    'n', 'o', 'r',
];

/// Text measurement hook used by the layout engine.
pub trait WidthMeasurer {
    /// Rendered width of `text` in pixels.
    fn width_of(&self, text: &str) -> Result<u32, BookError>;

    /// Width of a sequence of already decomposed units.
    ///
    /// Each unit is measured on its own and a single inter-glyph gap is added
    /// between neighbours, so a hypothetical merge can be measured without
    /// building the merged text first.
    fn width_of_units(&self, units: &[&TextUnit]) -> Result<u32, BookError> {
        let mut total = 0u32;
        for unit in units {
            total = total.saturating_add(self.width_of(unit.raw_text())?);
        }
        let gaps = units.len().saturating_sub(1) as u32;
        Ok(total.saturating_add(gaps * BETWEEN_CHARS_WIDTH))
    }
}

/// Remove color and formatting control codes from `text`.
pub fn strip_control_codes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == CONTROL_CODE_MARKER {
            if let Some(next) = chars.peek() {
                if CONTROL_CODE_CHARS.contains(next) {
                    chars.next();
                    continue;
                }
            }
        }
        out.push(ch);
    }
    out
}

/// Character to pixel-width lookup loaded from a two-column resource.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphWidthTable {
    widths: HashMap<char, u32>,
}

impl GlyphWidthTable {
    /// Build a table from explicit `(char, width)` pairs.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (char, u32)>,
    {
        Self {
            widths: entries.into_iter().collect(),
        }
    }

    /// Parse a width resource held in memory.
    pub fn parse(source: &str) -> Self {
        let mut widths = HashMap::with_capacity(256);

        for (index, raw_line) in source.lines().enumerate() {
            let line_number = index + 1;
            let line = match raw_line.find("//") {
                Some(comment_at) => &raw_line[..comment_at],
                None => raw_line,
            };
            if line.trim().is_empty() {
                continue;
            }

            let columns: Vec<&str> = line.trim_end().split('\t').collect();
            let [value, width] = columns.as_slice() else {
                log::warn!("Wrong number of entities at line {}", line_number);
                continue;
            };

            let Some(ch) = parse_char_column(value) else {
                log::warn!("Unable to read char width at line {}", line_number);
                continue;
            };
            let Ok(width) = width.trim().parse::<u32>() else {
                log::warn!("Unable to read width value at line {}", line_number);
                continue;
            };
            widths.insert(ch, width);
        }

        log::debug!("glyph width table size: {}", widths.len());
        Self { widths }
    }

    /// Load a width resource from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BookError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| BookError::ReadResource {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_source(path, &source)
    }

    /// Load a width resource from disk without blocking the runtime.
    #[cfg(feature = "async")]
    pub async fn from_path_async(path: impl AsRef<Path>) -> Result<Self, BookError> {
        let path = path.as_ref();
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| BookError::ReadResource {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_source(path, &source)
    }

    fn from_source(path: &Path, source: &str) -> Result<Self, BookError> {
        source.parse::<Self>().map_err(|err| match err {
            BookError::InvalidWidthTable { message } => BookError::InvalidWidthTable {
                message: format!("{} in {}", message, path.display()),
            },
            other => other,
        })
    }

    /// Number of characters with a known width.
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    /// True if no widths were loaded.
    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Width of a single glyph, without any gap.
    pub fn char_width(&self, ch: char) -> Option<u32> {
        self.widths.get(&ch).copied()
    }

    /// Add or replace a glyph width.
    pub fn insert(&mut self, ch: char, width: u32) {
        self.widths.insert(ch, width);
    }
}

/// Strict counterpart of [`GlyphWidthTable::parse`]: a resource without a
/// single usable entry is an error.
impl FromStr for GlyphWidthTable {
    type Err = BookError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let table = Self::parse(source);
        if table.is_empty() {
            return Err(BookError::InvalidWidthTable {
                message: "no glyph widths found".to_string(),
            });
        }
        Ok(table)
    }
}

impl WidthMeasurer for GlyphWidthTable {
    fn width_of(&self, text: &str) -> Result<u32, BookError> {
        let clean = strip_control_codes(text);
        let mut total = 0u32;
        let mut count = 0u32;
        for ch in clean.chars() {
            let width = self
                .char_width(ch)
                .ok_or(BookError::MissingGlyph { ch })?;
            total = total.saturating_add(width);
            count += 1;
        }
        Ok(total.saturating_add(count.saturating_sub(1) * BETWEEN_CHARS_WIDTH))
    }
}

fn parse_char_column(value: &str) -> Option<char> {
    let mut chars = value.chars();
    let first = chars.next()?;
    if chars.next().is_none() {
        return Some(first);
    }
    let hex = value.strip_prefix("U+")?;
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}
