//! pg-dump-splitter: split a PostgreSQL schema dump into per-object files
//!
//! This library takes the plain-text output of `pg_dump --schema-only`,
//! splits it into individual statements, classifies each statement by the
//! object it defines, folds sequence/constraint/index statements into their
//! owning tables, and writes one `.sql` file per object — a layout that
//! diffs well under version control.

pub mod error;
pub mod input;
pub mod model;
pub mod output;
pub mod parser;
mod util;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;

pub use error::SplitterError;
pub use model::{parse_dump, ObjectKind, ParseResult, ParsedObject};
pub use output::WriteSummary;

/// Options for splitting a dump
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Path to the schema dump file
    pub dump_path: PathBuf,
    /// Output directory (defaults to a directory named after the dump file)
    pub output_dir: Option<PathBuf>,
    /// Enable verbose output
    pub verbose: bool,
}

/// Counts describing one completed split
#[derive(Debug, Clone)]
pub struct SplitSummary {
    pub output_dir: PathBuf,
    pub files_written: usize,
    pub objects_by_kind: BTreeMap<ObjectKind, usize>,
    pub sequences_inlined: usize,
    pub constraints_inlined: usize,
    pub indexes_attached: usize,
    pub has_residual: bool,
}

/// Split a schema dump into per-object files
pub fn split_dump(options: SplitOptions) -> Result<SplitSummary> {
    if options.verbose {
        println!("Reading dump: {}", options.dump_path.display());
    }

    // Step 1: Read and decode the dump
    let content = input::read_dump(&options.dump_path)?;

    // Step 2: Parse it into classified objects plus residual text
    let result = model::parse_dump(&content);

    if options.verbose {
        println!("Classified {} objects", result.objects.len());
        if !result.residual.is_empty() {
            println!("Unclassified statements kept as residual");
        }
    }

    // Step 3: Determine the output directory
    let output_dir = options
        .output_dir
        .unwrap_or_else(|| default_output_dir(&options.dump_path));

    // Step 4: Write the per-object files
    let write_summary = output::write_objects(&result, &output_dir)?;

    if options.verbose {
        println!(
            "Wrote {} files to {}",
            write_summary.files_written,
            output_dir.display()
        );
    }

    Ok(summarize(&result, &write_summary, output_dir))
}

fn default_output_dir(dump_path: &Path) -> PathBuf {
    let parent = dump_path.parent().unwrap_or(Path::new("."));
    let stem = dump_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("schema");
    parent.join(stem)
}

fn summarize(
    result: &ParseResult,
    write_summary: &WriteSummary,
    output_dir: PathBuf,
) -> SplitSummary {
    let mut objects_by_kind: BTreeMap<ObjectKind, usize> = BTreeMap::new();
    let mut sequences_inlined = 0;
    let mut constraints_inlined = 0;
    let mut indexes_attached = 0;
    for object in &result.objects {
        *objects_by_kind.entry(object.kind).or_default() += 1;
        sequences_inlined += object.sequences.len();
        constraints_inlined += object.constraints.len();
        indexes_attached += object.indexes.len();
    }

    SplitSummary {
        output_dir,
        files_written: write_summary.files_written,
        objects_by_kind,
        sequences_inlined,
        constraints_inlined,
        indexes_attached,
        has_residual: !result.residual.is_empty(),
    }
}
