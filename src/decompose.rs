//! Splitting rules for each text-unit kind.
//!
//! | kind        | children                                   |
//! |-------------|--------------------------------------------|
//! | Root        | tag markers and tagged spans (or paragraphs) |
//! | Tagged      | paragraph runs                             |
//! | Paragraph   | sentence runs                              |
//! | Sentence    | sub-sentence runs                          |
//! | SubSentence | words, spaces, fused words and word groups |
//!
//! Only the first child of a unit receives the parent's inheritable flags.

use std::collections::VecDeque;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::BookError;
use crate::tags::TagTable;
use crate::text_unit::{FormatFlag, FormatFlags, TextUnit, TextUnitKind};

static TAG_MARKER: LazyLock<Regex> = LazyLock::new(|| compiled(r"\{\{\$[^}]*\}\}"));
static PARAGRAPH_RUN: LazyLock<Regex> = LazyLock::new(|| compiled(r".+\n|.+|\n"));
// Closing quotes and brackets stay with the punctuation they follow.
static SENTENCE_RUN: LazyLock<Regex> =
    LazyLock::new(|| compiled(r#"[^.!?]*[.!?]+["')\]»]*|[^.!?]+"#));
static SUB_SENTENCE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    compiled(r#"[^,:;.]+(?:,|;|\.\.\.|[:.])?["')\]»]*|(?:\.\.\.|[,:;.])["')\]»]*"#)
});
static WORD_OR_SPACE: LazyLock<Regex> = LazyLock::new(|| compiled(r"\S+|\s+"));

#[allow(clippy::expect_used)]
fn compiled(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern is valid")
}

/// How the root splits its text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RootLayout {
    /// Split on `{{$tag}}` markers first; each span between markers becomes a
    /// tagged unit carrying the flags of the markers before it.
    #[default]
    Tagged,
    /// Split straight into paragraph runs; markers are plain text.
    Paragraphs,
}

/// Tuning for tree construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecomposeConfig {
    /// Window size of the word-grouping scan. Values below 2 disable grouping.
    pub group_size: usize,
    /// Longest word (in chars) treated as a satellite of the words after it.
    pub max_satellite_len: usize,
    /// Root splitting strategy.
    pub root_layout: RootLayout,
}

impl Default for DecomposeConfig {
    fn default() -> Self {
        Self {
            group_size: 3,
            max_satellite_len: 3,
            root_layout: RootLayout::Tagged,
        }
    }
}

/// Flags a unit of `kind` adds to the ones it received from its parent.
pub(crate) fn own_flags(kind: TextUnitKind, received: FormatFlags) -> FormatFlags {
    match kind {
        TextUnitKind::Paragraph => received.with(FormatFlag::StartOfParagraph),
        TextUnitKind::Sentence => received.with(FormatFlag::StartOfSentence),
        TextUnitKind::Marker => received.with(FormatFlag::IgnoreUnit),
        _ => received,
    }
}

/// Children of a unit of `kind` covering `raw_text`.
pub(crate) fn children(
    kind: TextUnitKind,
    raw_text: &str,
    flags: FormatFlags,
    cfg: &DecomposeConfig,
) -> Result<Vec<TextUnit>, BookError> {
    match kind {
        TextUnitKind::Root => match cfg.root_layout {
            RootLayout::Tagged => split_tagged_spans(raw_text, cfg),
            RootLayout::Paragraphs => {
                split_runs(&PARAGRAPH_RUN, raw_text, TextUnitKind::Paragraph, flags, cfg)
            }
        },
        TextUnitKind::Tagged => {
            split_runs(&PARAGRAPH_RUN, raw_text, TextUnitKind::Paragraph, flags, cfg)
        }
        TextUnitKind::Paragraph => {
            let first = flags.inherited().with(FormatFlag::StartOfSentence);
            split_runs(&SENTENCE_RUN, raw_text, TextUnitKind::Sentence, first, cfg)
        }
        TextUnitKind::Sentence => split_runs(
            &SUB_SENTENCE_RUN,
            raw_text,
            TextUnitKind::SubSentence,
            flags,
            cfg,
        ),
        TextUnitKind::SubSentence => Ok(group_tokens(tokenize(raw_text, flags), cfg)),
        TextUnitKind::Marker
        | TextUnitKind::Word
        | TextUnitKind::Space
        | TextUnitKind::WordGroup => Ok(Vec::new()),
    }
}

fn split_runs(
    pattern: &Regex,
    raw_text: &str,
    kind: TextUnitKind,
    parent_flags: FormatFlags,
    cfg: &DecomposeConfig,
) -> Result<Vec<TextUnit>, BookError> {
    let first_flags = parent_flags.inherited();
    pattern
        .find_iter(raw_text)
        .enumerate()
        .map(|(index, run)| {
            let flags = if index == 0 {
                first_flags
            } else {
                FormatFlags::empty()
            };
            TextUnit::build(kind, run.as_str().to_string(), flags, cfg)
        })
        .collect()
}

fn split_tagged_spans(raw_text: &str, cfg: &DecomposeConfig) -> Result<Vec<TextUnit>, BookError> {
    let table = TagTable::builtin();
    table.validate()?;

    let mut units = Vec::with_capacity(4);
    let mut pending = FormatFlags::empty();
    let mut cursor = 0usize;

    for marker in TAG_MARKER.find_iter(raw_text) {
        if marker.start() > cursor {
            let span = raw_text[cursor..marker.start()].to_string();
            units.push(TextUnit::build(TextUnitKind::Tagged, span, pending, cfg)?);
            pending = FormatFlags::empty();
        }
        let flag = table
            .flag_for(marker.as_str())
            .ok_or_else(|| BookError::UnknownTag {
                tag: marker.as_str().to_string(),
            })?;
        pending.insert(flag);
        units.push(TextUnit::build(
            TextUnitKind::Marker,
            marker.as_str().to_string(),
            FormatFlags::empty(),
            cfg,
        )?);
        cursor = marker.end();
    }

    if cursor < raw_text.len() {
        let span = raw_text[cursor..].to_string();
        units.push(TextUnit::build(TextUnitKind::Tagged, span, pending, cfg)?);
    } else if !pending.is_empty() {
        log::warn!("trailing tag markers have no text to apply to; dropping {:?}", pending);
    }

    Ok(units)
}

fn tokenize(raw_text: &str, parent_flags: FormatFlags) -> Vec<TextUnit> {
    let first_flags = parent_flags.inherited();
    WORD_OR_SPACE
        .find_iter(raw_text)
        .enumerate()
        .map(|(index, token)| {
            let flags = if index == 0 {
                first_flags
            } else {
                FormatFlags::empty()
            };
            let text = token.as_str();
            let kind = if text.trim().is_empty() {
                TextUnitKind::Space
            } else {
                TextUnitKind::Word
            };
            TextUnit::leaf(kind, text, flags)
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GroupStep {
    Single,
    FuseWord,
    Group,
}

fn classify_window(window: &[TextUnit], cfg: &DecomposeConfig) -> GroupStep {
    let (Some(first), Some(last)) = (window.first(), window.last()) else {
        return GroupStep::Single;
    };
    if cfg.group_size < 2 || window.len() < cfg.group_size || first.kind() == TextUnitKind::Space {
        return GroupStep::Single;
    }
    if is_single_punctuation(last.raw_text()) {
        return GroupStep::FuseWord;
    }
    if first.raw_text().chars().count() <= cfg.max_satellite_len {
        return GroupStep::Group;
    }
    GroupStep::Single
}

fn is_single_punctuation(text: &str) -> bool {
    let mut chars = text.chars();
    matches!((chars.next(), chars.next()), (Some(ch), None) if ch.is_ascii_punctuation())
}

/// Sliding-window pass that glues trailing punctuation to its word and keeps
/// short satellite words together with what follows them.
fn group_tokens(tokens: Vec<TextUnit>, cfg: &DecomposeConfig) -> Vec<TextUnit> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut pending: VecDeque<TextUnit> = tokens.into();

    while !pending.is_empty() {
        let window_len = cfg.group_size.max(1).min(pending.len());
        let step = classify_window(&pending.make_contiguous()[..window_len], cfg);
        match step {
            GroupStep::Single => {
                if let Some(unit) = pending.pop_front() {
                    out.push(unit);
                }
            }
            GroupStep::FuseWord => {
                let window: Vec<TextUnit> = pending.drain(..window_len).collect();
                let flags = window.first().map(TextUnit::flags).unwrap_or_default();
                let text: String = window.iter().map(TextUnit::raw_text).collect();
                out.push(TextUnit::leaf(TextUnitKind::Word, text, flags));
            }
            GroupStep::Group => {
                let window: Vec<TextUnit> = pending.drain(..window_len).collect();
                out.push(TextUnit::group(window));
            }
        }
    }

    out
}
