//! Writing generated files under an output root.

use anyhow::Context;
use serde::Serialize;
use serts_typegen::OutputFile;
use std::path::{Path, PathBuf};

/// What happened to one output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteStatus {
    Created,
    Updated,
    Unchanged,
}

#[derive(Debug, Clone, Serialize)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub status: WriteStatus,
}

/// Result of writing one translation.
#[derive(Debug, Default, Serialize)]
pub struct WriteSummary {
    pub files: Vec<WrittenFile>,
    pub dry_run: bool,
}

impl WriteSummary {
    pub fn count(&self, status: WriteStatus) -> usize {
        self.files.iter().filter(|f| f.status == status).count()
    }
}

/// Write `files` below `root`, creating directories as needed.
///
/// Files whose content is already identical are left untouched so their
/// modification times stay stable. With `dry_run` nothing is written but the
/// summary reports what would change.
pub fn write_outputs<'a>(
    root: &Path,
    files: impl IntoIterator<Item = &'a OutputFile>,
    dry_run: bool,
) -> anyhow::Result<WriteSummary> {
    let mut summary = WriteSummary {
        files: Vec::new(),
        dry_run,
    };

    for file in files {
        let path = root.join(&file.path);
        let status = match std::fs::read_to_string(&path) {
            Ok(existing) if existing == file.contents => WriteStatus::Unchanged,
            Ok(_) => WriteStatus::Updated,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => WriteStatus::Created,
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };

        if status != WriteStatus::Unchanged && !dry_run {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(&path, &file.contents)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        tracing::debug!(path = %path.display(), ?status, dry_run, "output file");
        summary.files.push(WrittenFile { path, status });
    }

    Ok(summary)
}
