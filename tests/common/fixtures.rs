use std::path::PathBuf;

use bookmaster::GlyphWidthTable;

pub fn width_table_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/char_width.txt")
}

pub fn width_table() -> GlyphWidthTable {
    let path = width_table_path();
    GlyphWidthTable::from_path(&path).unwrap_or_else(|e| panic!("load {}: {}", path.display(), e))
}

/// Multi-paragraph prose exercising every splitting level.
pub const STORY: &str = "The night was cold, and the wind howled through the empty streets. \
Nobody dared to leave the house; even the dogs were silent... Then, at midnight, \
someone knocked on the door!\n\
\n\
\"Who is there?\" asked the old man. No answer came. He waited: one minute, two, three.\n\
{{$new_page}}In the morning the snow had covered every trace of the visitor, \
and the village went on with its quiet life as if nothing had happened at all.";

/// `STORY` repeated until it is at least `min_len` bytes long.
pub fn long_story(min_len: usize) -> String {
    let mut out = String::with_capacity(min_len + STORY.len());
    while out.len() < min_len {
        out.push_str(STORY);
        out.push('\n');
    }
    out
}
