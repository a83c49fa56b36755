use std::hint::black_box;
use std::time::Instant;

use bookmaster::{BookWriter, BookWritingConfig, GlyphWidthTable, TextUnit};

const PARAGRAPH: &str = "The river ran fast under the old bridge, carrying leaves, branches \
and the occasional lost boot. Nobody knew where it went after the mill; some said the sea, \
others said nowhere at all... Children threw stones into it anyway!\n";

const SIZES: &[(&str, usize)] = &[("4k", 4 * 1024), ("32k", 32 * 1024), ("128k", 128 * 1024)];

struct Timing {
    input: &'static str,
    case: &'static str,
    iterations: usize,
    min_ns: u128,
    median_ns: u128,
    max_ns: u128,
}

fn text_of_size(bytes: usize) -> String {
    PARAGRAPH.repeat(bytes / PARAGRAPH.len() + 1)
}

fn time_case<F>(input: &'static str, case: &'static str, iterations: usize, mut op: F) -> Timing
where
    F: FnMut() -> usize,
{
    black_box(op());
    let mut samples: Vec<u128> = (0..iterations)
        .map(|_| {
            let start = Instant::now();
            black_box(op());
            start.elapsed().as_nanos()
        })
        .collect();
    samples.sort_unstable();
    Timing {
        input,
        case,
        iterations,
        min_ns: samples.first().copied().unwrap_or_default(),
        median_ns: samples.get(samples.len() / 2).copied().unwrap_or_default(),
        max_ns: samples.last().copied().unwrap_or_default(),
    }
}

fn main() {
    let quick = std::env::args().any(|arg| arg == "--quick");
    let iterations = if quick { 3 } else { 15 };

    let widths_path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/char_width.txt");
    let widths =
        GlyphWidthTable::from_path(widths_path).unwrap_or_else(|e| panic!("widths: {}", e));
    let writer = BookWriter::new(BookWritingConfig {
        max_pages: usize::MAX,
        ..BookWritingConfig::default()
    });

    println!("# bookmaster layout benchmark (iterations={})", iterations);
    println!("input,case,iterations,min_ns,median_ns,max_ns");

    let mut timings = Vec::new();
    for (label, bytes) in SIZES {
        let text = text_of_size(*bytes);
        timings.push(time_case(label, "build_tree", iterations, || {
            TextUnit::root(&text)
                .unwrap_or_else(|e| panic!("tree: {}", e))
                .node_count()
        }));

        let root = TextUnit::root(&text).unwrap_or_else(|e| panic!("tree: {}", e));
        timings.push(time_case(label, "layout", iterations, || {
            writer
                .write_unit(&root, &widths)
                .unwrap_or_else(|e| panic!("layout: {}", e))
                .page_count()
        }));
    }

    for t in &timings {
        println!(
            "{},{},{},{},{},{}",
            t.input, t.case, t.iterations, t.min_ns, t.median_ns, t.max_ns
        );
    }
}
