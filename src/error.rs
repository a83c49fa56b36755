//! Error type shared by the width table, tree builder and layout engine.

use core::fmt;
use std::io;
use std::path::PathBuf;

/// Errors raised while building a text-unit tree or laying out a book.
#[derive(Debug)]
pub enum BookError {
    /// Inline `{{$...}}` marker that has no entry in the tag table.
    UnknownTag { tag: String },
    /// Tag table lists the same tag or flag more than once.
    DuplicateTag { tag: &'static str },
    /// Character absent from the glyph width table.
    MissingGlyph { ch: char },
    /// Width resource could not be used at all.
    InvalidWidthTable { message: String },
    /// Unit that could not be placed even after descending to a leaf.
    Unplaceable { text: String },
    /// Resource file could not be read.
    ReadResource { path: PathBuf, source: io::Error },
    /// Underlying I/O failure without a known path.
    Io(io::Error),
}

impl BookError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownTag { .. } => "UNKNOWN_TAG",
            Self::DuplicateTag { .. } => "DUPLICATE_TAG",
            Self::MissingGlyph { .. } => "MISSING_GLYPH",
            Self::InvalidWidthTable { .. } => "INVALID_WIDTH_TABLE",
            Self::Unplaceable { .. } => "UNPLACEABLE_CONTENT",
            Self::ReadResource { .. } | Self::Io(_) => "IO",
        }
    }

    /// True for errors caused by configuration rather than content.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownTag { .. }
                | Self::DuplicateTag { .. }
                | Self::MissingGlyph { .. }
                | Self::InvalidWidthTable { .. }
        )
    }
}

impl fmt::Display for BookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTag { tag } => {
                write!(f, "{}: unknown text tag '{}'", self.code(), tag)
            }
            Self::DuplicateTag { tag } => {
                write!(f, "{}: tag table maps '{}' more than once", self.code(), tag)
            }
            Self::MissingGlyph { ch } => write!(
                f,
                "{}: width is missing for character '{}' (U+{:04X})",
                self.code(),
                ch,
                *ch as u32
            ),
            Self::InvalidWidthTable { message } => write!(f, "{}: {}", self.code(), message),
            Self::Unplaceable { text } => write!(
                f,
                "{}: some text could not be placed: '{}'",
                self.code(),
                text
            ),
            Self::ReadResource { path, source } => write!(
                f,
                "{}: cannot read {}: {}",
                self.code(),
                path.display(),
                source
            ),
            Self::Io(err) => write!(f, "{}: {}", self.code(), err),
        }
    }
}

impl std::error::Error for BookError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadResource { source, .. } => Some(source),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for BookError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}
