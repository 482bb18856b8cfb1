//! Static asset publishing.
//!
//! Copies the configured asset directories and root files into the output
//! directory. Directories are merged, not replaced: a file that exists at
//! the same relative path in the output is overwritten, anything else
//! already in the output stays. This is what lets hand-written pages under
//! `../pages/` sit next to the generated tool pages in `output/pages/`.
//!
//! Nothing here is fatal. A missing source is reported as
//! [`AssetOutcome::NotPresent`], and each file that fails to copy is recorded
//! on its group while the remaining files are still copied.

use crate::config::{AssetDir, AssetsConfig};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CopyError {
    #[error("failed to copy {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// What happened to one asset directory or root file.
#[derive(Debug)]
pub enum AssetOutcome {
    NotPresent,
    Copied { files: usize, errors: Vec<CopyError> },
}

impl AssetOutcome {
    pub fn files(&self) -> usize {
        match self {
            AssetOutcome::Copied { files, .. } => *files,
            AssetOutcome::NotPresent => 0,
        }
    }

    pub fn errors(&self) -> &[CopyError] {
        match self {
            AssetOutcome::Copied { errors, .. } => errors,
            AssetOutcome::NotPresent => &[],
        }
    }
}

#[derive(Debug)]
pub struct AssetReport {
    /// Source as configured (relative to the project root).
    pub source: PathBuf,
    pub dest: PathBuf,
    pub outcome: AssetOutcome,
}

/// Result of publishing all assets.
#[derive(Debug, Default)]
pub struct PublishReport {
    pub dirs: Vec<AssetReport>,
    pub root_files: Vec<AssetReport>,
}

impl PublishReport {
    pub fn files_copied(&self) -> usize {
        self.dirs
            .iter()
            .chain(&self.root_files)
            .map(|r| r.outcome.files())
            .sum()
    }

    pub fn errors(&self) -> impl Iterator<Item = &CopyError> {
        self.dirs
            .iter()
            .chain(&self.root_files)
            .flat_map(|r| r.outcome.errors())
    }
}

/// Copy every configured asset from `root` into `output_dir`.
pub fn publish_assets(assets: &AssetsConfig, root: &Path, output_dir: &Path) -> PublishReport {
    let dirs = assets
        .dirs
        .iter()
        .map(|AssetDir { source, dest }| AssetReport {
            source: source.clone(),
            dest: dest.clone(),
            outcome: copy_dir_merge(&root.join(source), &output_dir.join(dest)),
        })
        .collect();

    let root_files = assets
        .root_files
        .iter()
        .map(|source| {
            let name = source.file_name().map(PathBuf::from).unwrap_or_default();
            let outcome = copy_root_file(&root.join(source), &output_dir.join(&name));
            AssetReport {
                source: source.clone(),
                dest: name,
                outcome,
            }
        })
        .collect();

    PublishReport { dirs, root_files }
}

/// Recursively merge `src` into `dst`.
pub fn copy_dir_merge(src: &Path, dst: &Path) -> AssetOutcome {
    if !src.is_dir() {
        return AssetOutcome::NotPresent;
    }

    let mut files = 0;
    let mut errors = Vec::new();

    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                errors.push(CopyError::Walk(e));
                continue;
            }
        };
        // WalkDir only yields paths under `src`.
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);

        let result = if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
        } else {
            fs::copy(entry.path(), &target).map(|_| files += 1)
        };
        if let Err(source) = result {
            errors.push(CopyError::Io {
                path: entry.path().to_path_buf(),
                source,
            });
        }
    }

    AssetOutcome::Copied { files, errors }
}

fn copy_root_file(src: &Path, dst: &Path) -> AssetOutcome {
    if !src.is_file() {
        return AssetOutcome::NotPresent;
    }
    let result = dst
        .parent()
        .map_or(Ok(()), |parent| fs::create_dir_all(parent))
        .and_then(|_| fs::copy(src, dst));
    match result {
        Ok(_) => AssetOutcome::Copied {
            files: 1,
            errors: Vec::new(),
        },
        Err(source) => AssetOutcome::Copied {
            files: 0,
            errors: vec![CopyError::Io {
                path: src.to_path_buf(),
                source,
            }],
        },
    }
}
