//! Glyph-width aware pagination of plain text into fixed-size book pages.
//!
//! Text is decomposed into a tree of progressively finer units (paragraphs,
//! sentences, clauses, words). The [`BookWriter`] offers the coarsest pending
//! unit to the [`Book`] and steps one level finer whenever it does not fit,
//! so text is broken at the most natural boundary available.
//!
//! ```
//! use bookmaster::{BookWriter, BookWritingConfig, GlyphWidthTable};
//!
//! let widths = GlyphWidthTable::from_entries(
//!     ('a'..='z').chain([' ']).map(|c| (c, 1)),
//! );
//! let writer = BookWriter::new(BookWritingConfig {
//!     max_line_width_px: 9,
//!     ..BookWritingConfig::default()
//! });
//! let book = writer.write_str("ab cd ef", &widths).unwrap();
//! assert_eq!(book.page_texts(), vec![vec!["ab cd", "ef"]]);
//! ```

#![cfg_attr(
    not(test),
    deny(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::todo,
        clippy::unimplemented
    )
)]

mod container;
mod decompose;
mod error;
mod glyph_width;
mod reader;
mod tags;
mod template;
mod text_unit;
mod writer;

pub use container::{Book, Line, Page};
pub use decompose::{DecomposeConfig, RootLayout};
pub use error::BookError;
pub use glyph_width::{
    strip_control_codes, GlyphWidthTable, WidthMeasurer, BETWEEN_CHARS_WIDTH, CONTROL_CODE_MARKER,
};
pub use reader::{Address, TextUnitReader};
pub use tags::TagTable;
pub use template::fill_template;
pub use text_unit::{FormatFlag, FormatFlags, Leaves, TextUnit, TextUnitKind};
pub use writer::{BookWriter, BookWritingConfig};
