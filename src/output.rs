//! Writing run outputs.
//!
//! Every output file is first staged as a temporary file in its
//! destination directory. Files are only moved into place once all of
//! them were staged, so a failure on one destination leaves no other
//! output behind.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// The outputs of one run, committed together.
#[derive(Debug, Default)]
pub struct OutputSet {
    files: Vec<(PathBuf, Vec<u8>)>,
    stdout: Option<Vec<u8>>,
}

impl OutputSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `content` for `path`.
    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: Vec<u8>) {
        self.files.push((path.into(), content));
    }

    /// Queue `content` for standard output, written after all files.
    pub fn add_stdout(&mut self, content: Vec<u8>) {
        self.stdout = Some(content);
    }

    /// Stage every file, then move them all into place.
    pub fn commit(self) -> Result<()> {
        let mut staged = Vec::with_capacity(self.files.len());
        for (path, content) in &self.files {
            staged.push((stage(path, content)?, path));
        }

        for (temp, path) in staged {
            temp.persist(path)
                .map_err(|e| e.error)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            debug!("Wrote {}", path.display());
        }

        if let Some(content) = self.stdout {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&content)
                .and_then(|_| stdout.flush())
                .context("Failed to write to stdout")?;
        }

        Ok(())
    }
}

/// Write `content` to a temporary file in the directory of `path`.
fn stage(path: &Path, content: &[u8]) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    temp.write_all(content)
        .and_then(|_| temp.flush())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(temp)
}
