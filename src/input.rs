//! Reading and decoding the schema dump file

use std::path::Path;

use encoding_rs::WINDOWS_1252;

use crate::error::SplitterError;

/// Read a dump file as a string, trying UTF-8 first, then Windows-1252 as
/// fallback. A UTF-8 BOM is stripped. Missing files, directories, and
/// whitespace-only dumps are reported as distinct errors before any parsing
/// happens.
pub fn read_dump(path: &Path) -> Result<String, SplitterError> {
    if path.is_dir() {
        return Err(SplitterError::DumpIsDirectory {
            path: path.to_path_buf(),
        });
    }

    let bytes = std::fs::read(path).map_err(|source| SplitterError::DumpRead {
        path: path.to_path_buf(),
        source,
    })?;

    let content = match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(err) => {
            // Fall back to Windows-1252 (common for SQL files edited on Windows)
            let (decoded, _, had_errors) = WINDOWS_1252.decode(err.as_bytes());
            if had_errors {
                return Err(SplitterError::DumpRead {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "dump contains invalid characters",
                    ),
                });
            }
            decoded.into_owned()
        }
    };

    let content = content.strip_prefix('\u{FEFF}').unwrap_or(&content);

    if content.trim().is_empty() {
        return Err(SplitterError::DumpEmpty {
            path: path.to_path_buf(),
        });
    }

    Ok(content.to_string())
}
