//! bookmaster - lay text out into book pages

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bookmaster::{fill_template, BookWriter, BookWritingConfig, GlyphWidthTable, TextUnit};
use bookmaster_format::{unit_tree_json, BookFormatter};
use clap::Parser;

#[derive(Parser)]
#[command(name = "bookmaster")]
#[command(version, about = "Paginate text into fixed-size book pages", long_about = None)]
#[command(after_help = "EXAMPLES:
    bookmaster story.txt --widths char_width.txt --pretty-out story.pages.txt
    bookmaster letter.txt --widths char_width.txt --param name=Steve --single-page")]
struct Cli {
    /// Input text file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Glyph width table (`<char>\t<width>` per line)
    #[arg(long, value_name = "FILE")]
    widths: PathBuf,

    /// Book title
    #[arg(long)]
    title: Option<String>,

    /// Write the book as JSON
    #[arg(long, value_name = "FILE")]
    json_out: Option<PathBuf>,

    /// Write the book as numbered plain text
    #[arg(long, value_name = "FILE")]
    pretty_out: Option<PathBuf>,

    /// Write the decomposition tree as JSON
    #[arg(long, value_name = "FILE")]
    tree_out: Option<PathBuf>,

    /// Template value substituted for `{{key}}` (repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Fail unless the text fits on a single page
    #[arg(long)]
    single_page: bool,

    /// Line width in pixels
    #[arg(long)]
    max_line_width: Option<u32>,

    /// Lines per page
    #[arg(long)]
    max_lines: Option<usize>,

    /// Pages per book
    #[arg(long)]
    max_pages: Option<usize>,

    /// Let sentences begin on a page's last line
    #[arg(long)]
    allow_new_sentence_on_last_line: bool,
}

impl Cli {
    fn writing_config(&self) -> BookWritingConfig {
        let defaults = BookWritingConfig::default();
        BookWritingConfig {
            max_line_width_px: self.max_line_width.unwrap_or(defaults.max_line_width_px),
            max_lines_per_page: self.max_lines.unwrap_or(defaults.max_lines_per_page),
            max_pages: self.max_pages.unwrap_or(defaults.max_pages),
            allow_new_sentence_on_the_last_line: self.allow_new_sentence_on_last_line
                || defaults.allow_new_sentence_on_the_last_line,
        }
    }
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(page_count) => {
            println!("Written a book with {page_count} page(s)");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<usize, String> {
    let widths = GlyphWidthTable::from_path(&cli.widths).map_err(|e| e.to_string())?;
    let source = fs::read_to_string(&cli.input)
        .map_err(|e| format!("cannot read {}: {e}", cli.input.display()))?;

    let args: HashMap<String, String> = cli.params.iter().cloned().collect();
    let text = fill_template(&source, &args);

    let root = TextUnit::root(&text).map_err(|e| e.to_string())?;
    let writer = BookWriter::new(cli.writing_config());
    let mut book = writer
        .write_unit(&root, &widths)
        .map_err(|e| e.to_string())?;
    if let Some(title) = &cli.title {
        book.set_title(title.clone());
    }
    log::info!("laid out {} into {} page(s)", cli.input.display(), book.page_count());

    // Nothing is written for a book that fails the single-page check.
    if cli.single_page && book.page_count() > 1 {
        return Err(format!(
            "text does not fit in a single page ({} pages)",
            book.page_count()
        ));
    }

    if let Some(path) = &cli.tree_out {
        let dump = unit_tree_json(&root).map_err(|e| e.to_string())?;
        write_output(path, &dump)?;
    }
    let formatter = BookFormatter::new(&book);
    if let Some(path) = &cli.json_out {
        write_output(path, &formatter.to_json().map_err(|e| e.to_string())?)?;
    }
    if let Some(path) = &cli.pretty_out {
        write_output(path, &formatter.to_pretty_text())?;
    }
    Ok(book.page_count())
}

fn write_output(path: &Path, contents: &str) -> Result<(), String> {
    fs::write(path, contents).map_err(|e| format!("cannot write {}: {e}", path.display()))
}
