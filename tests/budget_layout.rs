mod common;

use bookmaster::{BookWriter, BookWritingConfig, TextUnit, TextUnitReader};
use common::counting_alloc::CountingAlloc;
use common::fixtures::{long_story, width_table};

// Tree plus book for a 16KiB input. Guards against per-unit copies of the
// whole input sneaking into the tree builder or the fit test.
const LAYOUT_BUDGET_BYTES: usize = 4 * 1024 * 1024;
const INPUT_BYTES: usize = 16 * 1024;

#[global_allocator]
static ALLOC: CountingAlloc = CountingAlloc::new();

#[test]
fn tree_layout_and_peek_stay_under_budget() {
    let table = width_table();
    let text = long_story(INPUT_BYTES);
    let writer = BookWriter::new(BookWritingConfig {
        max_pages: 10_000,
        ..BookWritingConfig::default()
    });

    let (book, snapshot) = ALLOC.measure(|| {
        let root = TextUnit::root(&text).expect("tree");
        writer.write_unit(&root, &table).expect("layout")
    });
    assert!(!book.is_empty());
    assert!(
        snapshot.peak_bytes <= LAYOUT_BUDGET_BYTES,
        "layout peak over budget: {} bytes ({:.1}KB), budget: {}KB",
        snapshot.peak_bytes,
        snapshot.peak_bytes as f64 / 1024.0,
        LAYOUT_BUDGET_BYTES / 1024
    );

    // Addresses up to eight levels deep stay inline.
    let root = TextUnit::root(&text).expect("tree");
    let reader = TextUnitReader::new(&root);

    let (found, snapshot) = ALLOC.measure(|| {
        (0..6).filter(|depth| reader.peek(*depth).is_some()).count()
    });
    assert_eq!(found, 6);
    assert_eq!(snapshot.calls, 0, "peek allocated");
}
