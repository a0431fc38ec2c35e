//! Writing the classified objects to per-object files

use std::path::{Path, PathBuf};

use crate::error::SplitterError;
use crate::model::{ObjectKind, ParseResult};

/// What was written, in write order
#[derive(Debug, Default)]
pub struct WriteSummary {
    pub files_written: usize,
    /// Paths relative to the output directory
    pub paths: Vec<PathBuf>,
}

/// Write every object to `{out_dir}/{kind}s/{qualified-name}.sql` and any
/// residual text to `{out_dir}/residual.sql`.
pub fn write_objects(result: &ParseResult, out_dir: &Path) -> Result<WriteSummary, SplitterError> {
    let mut summary = WriteSummary::default();

    for object in &result.objects {
        let file_name = format!("{}.sql", sanitize_file_stem(&object.qualified_name()));
        let relative = PathBuf::from(object.kind.directory()).join(file_name);
        write_sql_file(&out_dir.join(&relative), &object.definition)?;
        summary.paths.push(relative);
        summary.files_written += 1;
    }

    if !result.residual.is_empty() {
        let relative = PathBuf::from("residual.sql");
        write_sql_file(&out_dir.join(&relative), &result.residual)?;
        summary.paths.push(relative);
        summary.files_written += 1;
    }

    Ok(summary)
}

fn write_sql_file(path: &Path, definition: &str) -> Result<(), SplitterError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| SplitterError::OutputWrite {
            path: path.to_path_buf(),
            source,
        })?;
    }

    let mut content = String::with_capacity(definition.len() + 1);
    content.push_str(definition);
    if !content.ends_with('\n') {
        content.push('\n');
    }

    std::fs::write(path, content).map_err(|source| SplitterError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Originally double-quoted identifiers may contain arbitrary characters;
/// keep the file name inside its kind directory.
fn sanitize_file_stem(stem: &str) -> String {
    stem.chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            other => other,
        })
        .collect()
}
