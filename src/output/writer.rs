// src/output/writer.rs

//! Manages the output destination (stdout or a file).

use crate::config::OutputDestination;
use crate::errors::{io_error_with_path, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Creates the writer for `destination`.
///
/// # Errors
/// Returns `Error::Io` if the output file cannot be created.
pub fn open_output(destination: &OutputDestination) -> Result<Box<dyn Write + Send>> {
    let writer: Box<dyn Write + Send> = match destination {
        OutputDestination::Stdout => Box::new(io::stdout()),
        OutputDestination::File(path) => {
            let file = File::create(path).map_err(|e| io_error_with_path(e, path))?;
            Box::new(BufWriter::new(file))
        }
    };
    Ok(writer)
}

/// Writes `document` to `destination` and flushes it.
pub fn write_document(destination: &OutputDestination, document: &str) -> Result<()> {
    let describe = |e: io::Error| match destination {
        OutputDestination::File(path) => io_error_with_path(e, path),
        OutputDestination::Stdout => io_error_with_path(e, "<stdout>"),
    };
    let mut writer = open_output(destination)?;
    writer.write_all(document.as_bytes()).map_err(describe)?;
    if !document.ends_with('\n') {
        writer.write_all(b"\n").map_err(describe)?;
    }
    writer.flush().map_err(describe)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_write_document_to_file() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("analysis.md");
        write_document(&OutputDestination::File(path.clone()), "# Analysis of x\n")?;
        assert_eq!(std::fs::read_to_string(&path)?, "# Analysis of x\n");
        Ok(())
    }

    #[test]
    fn test_trailing_newline_added() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("out.txt");
        write_document(&OutputDestination::File(path.clone()), "no newline")?;
        assert_eq!(std::fs::read_to_string(&path)?, "no newline\n");
        Ok(())
    }

    #[test]
    fn test_unwritable_path_reports_path() {
        let path = PathBuf::from("/nonexistent-dir-for-repodigest/out.txt");
        let err = write_document(&OutputDestination::File(path), "x").unwrap_err();
        match err {
            Error::Io { path, .. } => assert!(path.contains("nonexistent-dir-for-repodigest")),
            other => panic!("Expected Error::Io, got {:?}", other),
        }
    }
}
