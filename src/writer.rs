//! Greedy layout engine: walks a text-unit tree and fills a [`Book`].

use crate::container::{Book, Fit};
use crate::decompose::DecomposeConfig;
use crate::error::BookError;
use crate::glyph_width::WidthMeasurer;
use crate::reader::TextUnitReader;
use crate::text_unit::TextUnit;

/// Page geometry and layout policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BookWritingConfig {
    /// Widest line, in pixels, measured without trailing whitespace.
    pub max_line_width_px: u32,
    /// Lines per page.
    pub max_lines_per_page: usize,
    /// Pages per book.
    pub max_pages: usize,
    /// Let a sentence begin on a page's last line even when only a fragment
    /// of it fits there.
    pub allow_new_sentence_on_the_last_line: bool,
}

impl Default for BookWritingConfig {
    fn default() -> Self {
        Self {
            max_line_width_px: 114,
            max_lines_per_page: 14,
            max_pages: 100,
            allow_new_sentence_on_the_last_line: false,
        }
    }
}

/// Lays text out into pages.
///
/// The writer offers the coarsest pending unit first. Each refusal retries one
/// level finer; every placement consumes that unit and resets to the coarsest
/// level again. A leaf that still cannot be placed ends the run with
/// [`BookError::Unplaceable`].
#[derive(Clone, Debug, Default)]
pub struct BookWriter {
    cfg: BookWritingConfig,
    decompose: DecomposeConfig,
}

impl BookWriter {
    pub fn new(cfg: BookWritingConfig) -> Self {
        Self {
            cfg,
            decompose: DecomposeConfig::default(),
        }
    }

    /// Replace the tree-building configuration used by [`write_str`](Self::write_str).
    pub fn with_decompose(mut self, decompose: DecomposeConfig) -> Self {
        self.decompose = decompose;
        self
    }

    pub fn config(&self) -> &BookWritingConfig {
        &self.cfg
    }

    /// Decompose `text` and lay it out.
    pub fn write_str<M: WidthMeasurer>(&self, text: &str, measurer: &M) -> Result<Book, BookError> {
        let root = TextUnit::root_with(text, &self.decompose)?;
        self.write_unit(&root, measurer)
    }

    /// Lay out an already built tree.
    pub fn write_unit<M: WidthMeasurer>(
        &self,
        root: &TextUnit,
        measurer: &M,
    ) -> Result<Book, BookError> {
        let mut reader = TextUnitReader::new(root);
        self.write(&mut reader, measurer)
    }

    /// Drain `reader` into a new book.
    pub fn write<M: WidthMeasurer>(
        &self,
        reader: &mut TextUnitReader<'_>,
        measurer: &M,
    ) -> Result<Book, BookError> {
        let fit = Fit {
            cfg: &self.cfg,
            measurer,
        };
        let mut book = Book::new();
        let mut depth = 0usize;

        loop {
            let Some(unit) = reader.peek(depth) else {
                if depth > 0 {
                    if let Some(residual) = reader.peek(depth - 1) {
                        return Err(BookError::Unplaceable {
                            text: residual.raw_text().to_string(),
                        });
                    }
                }
                break;
            };

            if book.try_append(unit, fit)? {
                log::trace!("placed {} at depth {}", unit, depth);
                reader.advance(depth);
                depth = 0;
            } else {
                depth += 1;
            }
        }

        log::debug!(
            "laid out {} page(s) with {} line(s)",
            book.page_count(),
            book.pages().iter().map(|p| p.line_count()).sum::<usize>()
        );
        Ok(book)
    }
}
