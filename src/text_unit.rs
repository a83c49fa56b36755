//! Text-unit tree: raw text decomposed into paragraphs, sentences,
//! sub-sentences and word-level atoms.
//!
//! Every node keeps the exact slice of source text it covers plus a small set
//! of [`FormatFlag`]s. Flags flow from a parent to its *first* child only, so
//! the first atom of a paragraph still knows it starts a paragraph after the
//! coarser units above it have been split away.

use core::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::decompose::{self, DecomposeConfig};
use crate::error::BookError;

/// Layout annotation attached to a text unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormatFlag {
    /// Unit begins a paragraph and must open a new line.
    StartOfParagraph,
    /// Unit begins a sentence.
    StartOfSentence,
    /// Unit must open a new page (requested by an inline tag).
    RequestedNewPage,
    /// Unit is consumed without being rendered.
    IgnoreUnit,
}

impl FormatFlag {
    /// All flags in declaration order.
    pub const ALL: [FormatFlag; 4] = [
        FormatFlag::StartOfParagraph,
        FormatFlag::StartOfSentence,
        FormatFlag::RequestedNewPage,
        FormatFlag::IgnoreUnit,
    ];

    /// Stable name used in tree dumps.
    pub fn name(self) -> &'static str {
        match self {
            Self::StartOfParagraph => "START_OF_PARAGRAPH",
            Self::StartOfSentence => "START_OF_SENTENCE",
            Self::RequestedNewPage => "START_OF_PAGE",
            Self::IgnoreUnit => "IGNORE_UNIT",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Self::StartOfParagraph => 1 << 0,
            Self::StartOfSentence => 1 << 1,
            Self::RequestedNewPage => 1 << 2,
            Self::IgnoreUnit => 1 << 3,
        }
    }
}

impl fmt::Display for FormatFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of [`FormatFlag`]s.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FormatFlags(u8);

impl FormatFlags {
    /// Empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Set holding a single flag.
    pub fn only(flag: FormatFlag) -> Self {
        Self(flag.bit())
    }

    /// Add a flag.
    pub fn insert(&mut self, flag: FormatFlag) {
        self.0 |= flag.bit();
    }

    /// Copy of this set with `flag` added.
    pub fn with(mut self, flag: FormatFlag) -> Self {
        self.insert(flag);
        self
    }

    /// Membership test.
    pub fn contains(self, flag: FormatFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    /// True when no flag is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Subset handed down to a first child during decomposition.
    ///
    /// `IgnoreUnit` belongs to the unit that carries it and never propagates.
    pub fn inherited(self) -> Self {
        let mut out = Self::empty();
        for flag in [
            FormatFlag::StartOfParagraph,
            FormatFlag::StartOfSentence,
            FormatFlag::RequestedNewPage,
        ] {
            if self.contains(flag) {
                out.insert(flag);
            }
        }
        out
    }

    /// Flags in declaration order.
    pub fn iter(self) -> impl Iterator<Item = FormatFlag> {
        FormatFlag::ALL
            .into_iter()
            .filter(move |flag| self.contains(*flag))
    }
}

impl FromIterator<FormatFlag> for FormatFlags {
    fn from_iter<T: IntoIterator<Item = FormatFlag>>(iter: T) -> Self {
        let mut out = Self::empty();
        for flag in iter {
            out.insert(flag);
        }
        out
    }
}

impl Serialize for FormatFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(None)?;
        for flag in self.iter() {
            seq.serialize_element(flag.name())?;
        }
        seq.end()
    }
}

/// Decomposition level of a text unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextUnitKind {
    /// Whole input.
    Root,
    /// Text span between inline tag markers.
    Tagged,
    /// Literal `{{$...}}` tag marker; never rendered.
    Marker,
    /// One input line.
    Paragraph,
    /// Text up to and including a sentence terminator.
    Sentence,
    /// Clause delimited by `,` `;` `:` or `...`.
    SubSentence,
    /// Non-space run, possibly fused with trailing punctuation.
    Word,
    /// Whitespace run.
    Space,
    /// Short word kept together with what follows it.
    WordGroup,
}

impl TextUnitKind {
    /// Name used in tree dumps.
    pub fn name(self) -> &'static str {
        match self {
            Self::Root => "Root",
            Self::Tagged => "Tagged",
            Self::Marker => "Marker",
            Self::Paragraph => "Paragraph",
            Self::Sentence => "Sentence",
            Self::SubSentence => "SubSentence",
            Self::Word => "Word",
            Self::Space => "Space",
            Self::WordGroup => "WordGroup",
        }
    }

    /// Containers that group paragraphs and are never laid out whole.
    pub fn is_structural(self) -> bool {
        matches!(self, Self::Root | Self::Tagged)
    }

    /// Units that represent a complete sentence or clause.
    pub fn is_whole_sentence(self) -> bool {
        matches!(self, Self::Sentence | Self::SubSentence)
    }
}

/// Node of the decomposition tree.
///
/// Children are computed once at construction and the node is immutable
/// afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextUnit {
    kind: TextUnitKind,
    raw_text: String,
    flags: FormatFlags,
    children: Vec<TextUnit>,
}

impl TextUnit {
    /// Decompose `text` with the default configuration.
    pub fn root(text: &str) -> Result<Self, BookError> {
        Self::root_with(text, &DecomposeConfig::default())
    }

    /// Decompose `text` with an explicit configuration.
    pub fn root_with(text: &str, cfg: &DecomposeConfig) -> Result<Self, BookError> {
        Self::build(TextUnitKind::Root, text.to_string(), FormatFlags::empty(), cfg)
    }

    /// Build a unit of `kind` and decompose it.
    pub(crate) fn build(
        kind: TextUnitKind,
        raw_text: String,
        flags: FormatFlags,
        cfg: &DecomposeConfig,
    ) -> Result<Self, BookError> {
        let flags = decompose::own_flags(kind, flags);
        let children = decompose::children(kind, &raw_text, flags, cfg)?;
        Ok(Self {
            kind,
            raw_text,
            flags,
            children,
        })
    }

    /// Leaf unit that never has children.
    pub(crate) fn leaf(kind: TextUnitKind, raw_text: impl Into<String>, flags: FormatFlags) -> Self {
        Self {
            kind,
            raw_text: raw_text.into(),
            flags,
            children: Vec::new(),
        }
    }

    /// Group whose children were decided by the caller.
    pub(crate) fn group(children: Vec<TextUnit>) -> Self {
        let raw_text = children.iter().map(|c| c.raw_text.as_str()).collect();
        let flags = children.first().map(|c| c.flags).unwrap_or_default();
        Self {
            kind: TextUnitKind::WordGroup,
            raw_text,
            flags,
            children,
        }
    }

    /// Standalone word leaf.
    pub fn word(text: impl Into<String>) -> Self {
        Self::leaf(TextUnitKind::Word, text, FormatFlags::empty())
    }

    /// Standalone whitespace leaf.
    pub fn space(text: impl Into<String>) -> Self {
        Self::leaf(TextUnitKind::Space, text, FormatFlags::empty())
    }

    /// Copy of this unit with `flags` replacing its own.
    pub fn with_flags(mut self, flags: FormatFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn kind(&self) -> TextUnitKind {
        self.kind
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn flags(&self) -> FormatFlags {
        self.flags
    }

    pub fn has_flag(&self, flag: FormatFlag) -> bool {
        self.flags.contains(flag)
    }

    pub fn children(&self) -> &[TextUnit] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Resolve a child path.
    ///
    /// An empty address is the unit itself; `[0, 1]` is the second child of
    /// the first child. Any out-of-range index yields `None`.
    pub fn get(&self, address: &[usize]) -> Option<&TextUnit> {
        let mut unit = self;
        for &index in address {
            unit = unit.children.get(index)?;
        }
        Some(unit)
    }

    /// Leaves in document order.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves { stack: vec![self] }
    }

    /// Concatenated raw text of all leaves.
    pub fn leaf_text(&self) -> String {
        self.leaves().map(TextUnit::raw_text).collect()
    }

    /// Total number of units in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TextUnit::node_count).sum::<usize>()
    }
}

impl fmt::Display for TextUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.kind.name(), self.raw_text)
    }
}

/// Diagnostic dump: `{type, raw_text, format_flags, sub_units?}`.
impl Serialize for TextUnit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.children.is_empty() { 3 } else { 4 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("type", self.kind.name())?;
        map.serialize_entry("raw_text", &self.raw_text)?;
        map.serialize_entry("format_flags", &self.flags)?;
        if !self.children.is_empty() {
            map.serialize_entry("sub_units", &self.children)?;
        }
        map.end()
    }
}

/// Depth-first iterator over leaf units.
pub struct Leaves<'a> {
    stack: Vec<&'a TextUnit>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a TextUnit;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(unit) = self.stack.pop() {
            if unit.children.is_empty() {
                return Some(unit);
            }
            self.stack.extend(unit.children.iter().rev());
        }
        None
    }
}
