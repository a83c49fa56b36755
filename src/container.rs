//! Line, page and book accumulators.
//!
//! Appends cascade top-down: a book offers a unit to its last page, a page to
//! its last line. When the last container refuses, the parent opens a fresh
//! sibling and retries once. Fit is decided from the committed text plus the
//! candidate without mutating anything, so a refused append leaves no trace.

use crate::error::BookError;
use crate::glyph_width::WidthMeasurer;
use crate::text_unit::{FormatFlag, TextUnit};
use crate::writer::BookWritingConfig;

/// Layout limits plus the measurer used to test fit.
#[derive(Clone, Copy)]
pub(crate) struct Fit<'a> {
    pub(crate) cfg: &'a BookWritingConfig,
    pub(crate) measurer: &'a dyn WidthMeasurer,
}

/// One rendered line of a page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Line {
    text: String,
}

impl Line {
    /// Display text with trailing whitespace removed.
    pub fn text(&self) -> &str {
        self.text.trim_end()
    }

    /// Accepted text exactly as appended.
    pub fn raw_text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Text `unit` contributes when appended here.
    ///
    /// A unit opening an empty line loses its leading whitespace unless it
    /// starts a paragraph.
    fn piece<'u>(&self, unit: &'u TextUnit) -> &'u str {
        if self.text.is_empty() && !unit.has_flag(FormatFlag::StartOfParagraph) {
            unit.raw_text().trim_start()
        } else {
            unit.raw_text()
        }
    }

    /// Width the line would have after appending `unit`.
    pub(crate) fn projected_width(
        &self,
        unit: &TextUnit,
        measurer: &dyn WidthMeasurer,
    ) -> Result<u32, BookError> {
        let piece = self.piece(unit);
        let mut merged = String::with_capacity(self.text.len() + piece.len());
        merged.push_str(&self.text);
        merged.push_str(piece);
        measurer.width_of(merged.trim_end())
    }

    pub(crate) fn try_append(&mut self, unit: &TextUnit, fit: Fit<'_>) -> Result<bool, BookError> {
        if self.projected_width(unit, fit.measurer)? > fit.cfg.max_line_width_px {
            return Ok(false);
        }
        let piece = self.piece(unit);
        self.text.push_str(piece);
        Ok(true)
    }
}

/// Ordered lines, bounded by `max_lines_per_page`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Page {
    lines: Vec<Line>,
}

impl Page {
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Last-line sentence policy.
    ///
    /// While the page is on its final line (existing or about to be opened), a
    /// unit that starts a sentence but is only a fragment of it is refused so
    /// the sentence moves to the next page instead of starting on the last line.
    fn allows(&self, unit: &TextUnit, cfg: &BookWritingConfig) -> bool {
        if cfg.allow_new_sentence_on_the_last_line {
            return true;
        }
        let on_last_line = self.lines.len() + 1 >= cfg.max_lines_per_page;
        let sentence_fragment =
            unit.has_flag(FormatFlag::StartOfSentence) && !unit.kind().is_whole_sentence();
        !(on_last_line && sentence_fragment)
    }

    pub(crate) fn try_append(&mut self, unit: &TextUnit, fit: Fit<'_>) -> Result<bool, BookError> {
        if !self.allows(unit, fit.cfg) {
            log::trace!("last-line policy refused {}", unit);
            return Ok(false);
        }

        let new_line_required = unit.has_flag(FormatFlag::StartOfParagraph);
        if !new_line_required {
            if let Some(last) = self.lines.last_mut() {
                if last.try_append(unit, fit)? {
                    return Ok(true);
                }
            }
        }

        if self.lines.len() >= fit.cfg.max_lines_per_page {
            return Ok(false);
        }
        let mut line = Line::default();
        if !line.try_append(unit, fit)? {
            return Ok(false);
        }
        self.lines.push(line);
        Ok(true)
    }
}

/// Ordered pages plus an optional title, bounded by `max_pages`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Book {
    title: Option<String>,
    pages: Vec<Page>,
}

impl Book {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Display text of every line, page by page.
    pub fn page_texts(&self) -> Vec<Vec<&str>> {
        self.pages
            .iter()
            .map(|page| page.lines.iter().map(Line::text).collect())
            .collect()
    }

    /// Offer `unit` to the book.
    ///
    /// `Ok(true)` means the unit was consumed: placed, or dropped because it is
    /// never rendered. `Ok(false)` is a soft refusal and the caller should try
    /// a finer unit.
    pub(crate) fn try_append(&mut self, unit: &TextUnit, fit: Fit<'_>) -> Result<bool, BookError> {
        if unit.has_flag(FormatFlag::IgnoreUnit) {
            log::trace!("skipping ignored {}", unit);
            return Ok(true);
        }
        if unit.kind().is_structural() {
            // Only ever laid out through its children.
            return Ok(unit.is_leaf());
        }

        let new_page_required = unit.has_flag(FormatFlag::RequestedNewPage);
        if !new_page_required {
            if let Some(last) = self.pages.last_mut() {
                if last.try_append(unit, fit)? {
                    return Ok(true);
                }
            }
        }

        if self.pages.len() >= fit.cfg.max_pages {
            return Ok(false);
        }
        let mut page = Page::default();
        if !page.try_append(unit, fit)? {
            return Ok(false);
        }
        self.pages.push(page);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph_width::GlyphWidthTable;
    use crate::text_unit::{FormatFlags, TextUnitKind};

    fn table() -> GlyphWidthTable {
        GlyphWidthTable::from_entries(('a'..='z').map(|c| (c, 1)).chain([(' ', 1), ('.', 1)]))
    }

    fn cfg(width: u32, lines: usize, pages: usize) -> BookWritingConfig {
        BookWritingConfig {
            max_line_width_px: width,
            max_lines_per_page: lines,
            max_pages: pages,
            allow_new_sentence_on_the_last_line: false,
        }
    }

    #[test]
    fn line_trims_leading_space_unless_paragraph_start() {
        let table = table();
        let cfg = cfg(100, 4, 4);
        let fit = Fit {
            cfg: &cfg,
            measurer: &table,
        };

        let mut line = Line::default();
        assert!(line.try_append(&TextUnit::word("  ab"), fit).expect("fit"));
        assert_eq!(line.raw_text(), "ab");

        let paragraph = TextUnit::word("  ab").with_flags(FormatFlags::only(FormatFlag::StartOfParagraph));
        let mut line = Line::default();
        assert!(line.try_append(&paragraph, fit).expect("fit"));
        assert_eq!(line.raw_text(), "  ab");
    }

    #[test]
    fn refused_append_leaves_line_untouched() {
        let table = table();
        let cfg = cfg(5, 4, 4);
        let fit = Fit {
            cfg: &cfg,
            measurer: &table,
        };
        let mut line = Line::default();
        assert!(line.try_append(&TextUnit::word("abc"), fit).expect("fit"));
        assert!(!line.try_append(&TextUnit::word("d"), fit).expect("fit"));
        assert_eq!(line.text(), "abc");
    }

    #[test]
    fn trailing_space_does_not_count_toward_width() {
        let table = table();
        let cfg = cfg(5, 4, 4);
        let fit = Fit {
            cfg: &cfg,
            measurer: &table,
        };
        let mut line = Line::default();
        assert!(line.try_append(&TextUnit::word("abc"), fit).expect("fit"));
        assert!(line.try_append(&TextUnit::space("   "), fit).expect("fit"));
        assert_eq!(line.raw_text(), "abc   ");
        assert_eq!(line.text(), "abc");
    }

    #[test]
    fn page_opens_new_line_for_paragraph_start() {
        let table = table();
        let cfg = cfg(100, 4, 4);
        let fit = Fit {
            cfg: &cfg,
            measurer: &table,
        };
        let mut page = Page::default();
        assert!(page.try_append(&TextUnit::word("ab"), fit).expect("fit"));
        let paragraph = TextUnit::word("cd").with_flags(FormatFlags::only(FormatFlag::StartOfParagraph));
        assert!(page.try_append(&paragraph, fit).expect("fit"));
        assert_eq!(page.line_count(), 2);
    }

    #[test]
    fn page_refuses_when_full() {
        let table = table();
        let cfg = cfg(3, 2, 4);
        let fit = Fit {
            cfg: &cfg,
            measurer: &table,
        };
        let mut page = Page::default();
        assert!(page.try_append(&TextUnit::word("ab"), fit).expect("fit"));
        assert!(page.try_append(&TextUnit::word("cd"), fit).expect("fit"));
        assert!(!page.try_append(&TextUnit::word("ef"), fit).expect("fit"));
        assert_eq!(page.line_count(), 2);
    }

    #[test]
    fn last_line_policy_only_blocks_sentence_fragments() {
        let cfg = cfg(100, 2, 4);
        let page = Page {
            lines: vec![Line::default()],
        };
        let sentence_start = FormatFlags::only(FormatFlag::StartOfSentence);

        let word = TextUnit::word("ab").with_flags(sentence_start);
        assert!(!page.allows(&word, &cfg));

        let plain = TextUnit::word("ab");
        assert!(page.allows(&plain, &cfg));

        let sentence = TextUnit::build(
            TextUnitKind::Sentence,
            "ab.".to_string(),
            FormatFlags::empty(),
            &Default::default(),
        )
        .expect("sentence");
        assert!(page.allows(&sentence, &cfg));

        let relaxed = BookWritingConfig {
            allow_new_sentence_on_the_last_line: true,
            ..cfg
        };
        assert!(page.allows(&word, &relaxed));
    }

    #[test]
    fn book_skips_ignored_units_and_refuses_structural_ones() {
        let table = table();
        let cfg = cfg(100, 4, 4);
        let fit = Fit {
            cfg: &cfg,
            measurer: &table,
        };
        let mut book = Book::new();
        let marker = TextUnit::word("zz").with_flags(FormatFlags::only(FormatFlag::IgnoreUnit));
        assert!(book.try_append(&marker, fit).expect("fit"));
        assert!(book.is_empty());

        let root = TextUnit::root("ab").expect("tree");
        assert!(!book.try_append(&root, fit).expect("fit"));
        assert!(book.is_empty());
    }

    #[test]
    fn book_honours_new_page_request_except_first() {
        let table = table();
        let cfg = cfg(100, 4, 4);
        let fit = Fit {
            cfg: &cfg,
            measurer: &table,
        };
        let new_page = FormatFlags::only(FormatFlag::RequestedNewPage);
        let mut book = Book::new();
        assert!(book
            .try_append(&TextUnit::word("ab").with_flags(new_page), fit)
            .expect("fit"));
        assert!(book.try_append(&TextUnit::word(" cd"), fit).expect("fit"));
        assert!(book
            .try_append(&TextUnit::word("ef").with_flags(new_page), fit)
            .expect("fit"));
        assert_eq!(book.page_texts(), vec![vec!["ab cd"], vec!["ef"]]);
    }

    #[test]
    fn book_refuses_when_page_budget_is_spent() {
        let table = table();
        let cfg = cfg(3, 1, 1);
        let fit = Fit {
            cfg: &cfg,
            measurer: &table,
        };
        let mut book = Book::new();
        assert!(book.try_append(&TextUnit::word("ab"), fit).expect("fit"));
        assert!(!book.try_append(&TextUnit::word("cd"), fit).expect("fit"));
        assert_eq!(book.page_count(), 1);
    }

    #[test]
    fn missing_glyph_propagates() {
        let table = table();
        let cfg = cfg(100, 4, 4);
        let fit = Fit {
            cfg: &cfg,
            measurer: &table,
        };
        let mut book = Book::new();
        let err = book
            .try_append(&TextUnit::word("a?"), fit)
            .expect_err("missing glyph");
        assert_eq!(err.code(), "MISSING_GLYPH");
    }
}
