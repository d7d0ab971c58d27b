//! Pipeline endpoints: file collection and fixed-output write-back.

use std::fs;
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::info;
use walkdir::WalkDir;

use crate::error::PipelineError;
use crate::file::FileItem;
use crate::stream::Stage;

/// Collects the files under `base` matching the given glob patterns.
///
/// Patterns are matched against the path relative to `base`. The returned
/// files are sorted, deduplicated and read eagerly. Hidden files are not
/// skipped here; ignore policy belongs to the engine.
pub fn collect_files(
    base: impl AsRef<Path>,
    patterns: &[String],
) -> Result<Vec<FileItem>, PipelineError> {
    let base = base.as_ref();
    let globset = build_globset(patterns)?;

    let mut paths = Vec::new();
    for entry in WalkDir::new(base).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(base).unwrap_or(path);
        if globset.is_match(relative) {
            paths.push(path.to_path_buf());
        }
    }

    paths.sort();
    paths.dedup();
    info!("Collected {} file(s) under {}", paths.len(), base.display());

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let contents = fs::read(&path)?;
        files.push(FileItem::new(path, base, contents));
    }
    Ok(files)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, PipelineError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| {
            PipelineError::invalid_options(format!("Invalid glob pattern '{pattern}': {e}"))
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| PipelineError::invalid_options(format!("Failed to build glob set: {e}")))
}

/// Stage built by [`write_fixed`].
pub struct WriteFixed {
    written: usize,
}

/// A stage writing contents back to disk for files whose result was fixed.
///
/// A write failure drops that file from the stream; the run continues.
pub fn write_fixed() -> WriteFixed {
    WriteFixed { written: 0 }
}

impl Stage for WriteFixed {
    fn name(&self) -> &'static str {
        "write_fixed"
    }

    fn on_file(&mut self, file: &mut FileItem) -> Result<(), PipelineError> {
        let fixed = file.lint.as_ref().is_some_and(|result| result.fixed);
        if !fixed {
            return Ok(());
        }
        fs::write(&file.path, &file.contents).map_err(|e| {
            PipelineError::file(format!("Failed to write {}: {}", file.path.display(), e))
        })?;
        self.written += 1;
        Ok(())
    }

    fn on_end(&mut self) -> Result<(), PipelineError> {
        if self.written > 0 {
            info!("Wrote {} fixed file(s)", self.written);
        }
        Ok(())
    }
}
