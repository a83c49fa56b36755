//! Output formats for laid-out books and unit-tree dumps.

#![cfg_attr(
    not(test),
    deny(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented
    )
)]

use core::fmt;
use std::fmt::Write as _;

use bookmaster::{Book, TextUnit};
use serde::{Deserialize, Serialize};

/// Serialization failure.
#[derive(Debug)]
pub enum FormatError {
    Json(serde_json::Error),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "json: {}", err),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for FormatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Persisted shape of a book: `{"title"?: str, "pages": [[line, ...], ...]}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub pages: Vec<Vec<String>>,
}

impl From<&Book> for BookDocument {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title().map(str::to_string),
            pages: book
                .pages()
                .iter()
                .map(|page| page.lines().iter().map(|l| l.text().to_string()).collect())
                .collect(),
        }
    }
}

/// Renders a [`Book`] for storage or for reading in a terminal.
#[derive(Clone, Copy, Debug)]
pub struct BookFormatter<'a> {
    book: &'a Book,
}

impl<'a> BookFormatter<'a> {
    pub fn new(book: &'a Book) -> Self {
        Self { book }
    }

    /// Compact JSON document.
    pub fn to_json(&self) -> Result<String, FormatError> {
        Ok(serde_json::to_string(&BookDocument::from(self.book))?)
    }

    /// Indented JSON document.
    pub fn to_json_pretty(&self) -> Result<String, FormatError> {
        Ok(serde_json::to_string_pretty(&BookDocument::from(self.book))?)
    }

    /// Page-by-page listing with numbered lines.
    ///
    /// ```text
    /// title: My book
    ///  -------- Page 1 --------
    /// 1: first line
    /// 2: second line
    /// ```
    pub fn to_pretty_text(&self) -> String {
        let mut out = String::new();
        if let Some(title) = self.book.title() {
            let _ = writeln!(out, "title: {}", title);
        }

        let pages: Vec<String> = self
            .book
            .pages()
            .iter()
            .enumerate()
            .map(|(page_index, page)| {
                let mut block = format!(" -------- Page {} -------- ", page_index + 1);
                for (line_index, line) in page.lines().iter().enumerate() {
                    let _ = write!(block, "\n{}: {}", line_index + 1, line.text());
                }
                block
            })
            .collect();
        out.push_str(&pages.join("\n\n"));
        out
    }
}

/// Pretty JSON dump of a decomposition tree.
pub fn unit_tree_json(unit: &TextUnit) -> Result<String, FormatError> {
    let json = serde_json::to_string_pretty(unit)?;
    log::debug!("tree dump covers {} unit(s)", unit.node_count());
    Ok(json)
}

/// Parse a document written by [`BookFormatter::to_json`].
pub fn parse_document(json: &str) -> Result<BookDocument, FormatError> {
    Ok(serde_json::from_str(json)?)
}
