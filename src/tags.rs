//! Inline tag markers (`{{$name}}`) and the flags they request.

use crate::error::BookError;
use crate::text_unit::FormatFlag;

/// Built-in tag to flag pairs.
const BUILTIN_TAGS: &[(&str, FormatFlag)] = &[("{{$new_page}}", FormatFlag::RequestedNewPage)];

/// Closed bidirectional mapping between tag markers and format flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagTable {
    entries: &'static [(&'static str, FormatFlag)],
}

impl TagTable {
    /// Table of markers understood by the tree builder.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_TAGS,
        }
    }

    /// Table over caller-provided entries. Call [`validate`](Self::validate)
    /// before use.
    pub const fn from_static(entries: &'static [(&'static str, FormatFlag)]) -> Self {
        Self { entries }
    }

    /// Fail if a tag or a flag appears more than once.
    pub fn validate(&self) -> Result<(), BookError> {
        for (index, (tag, flag)) in self.entries.iter().enumerate() {
            let rest = &self.entries[index + 1..];
            if rest.iter().any(|(other_tag, other_flag)| other_tag == tag || other_flag == flag) {
                return Err(BookError::DuplicateTag { tag: *tag });
            }
        }
        Ok(())
    }

    /// Flag requested by `tag`, if the tag is known.
    pub fn flag_for(&self, tag: &str) -> Option<FormatFlag> {
        self.entries
            .iter()
            .find(|(known, _)| *known == tag)
            .map(|(_, flag)| *flag)
    }

    /// Marker text that requests `flag`, if any.
    pub fn tag_for(&self, flag: FormatFlag) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(_, known)| *known == flag)
            .map(|(tag, _)| *tag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TagTable {
    fn default() -> Self {
        Self::builtin()
    }
}
