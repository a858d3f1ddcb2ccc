use std::fs;
use std::io;

use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

use crate::manifest::Manifest;
use crate::report::Reporter;

/// Whether a pass changes the filesystem or only reports what it would do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Apply,
    DryRun,
}

/// Observed state of a manifest directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DirState {
    Present,
    Missing,
    /// The path or one of its ancestors exists but is not a directory.
    Blocked,
}

impl DirState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DirState::Present => "present",
            DirState::Missing => "missing",
            DirState::Blocked => "blocked",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Existing,
    /// Dry run only: the directory would have been created.
    Planned,
}

/// Ensure a directory exists, creating it recursively if needed.
/// Returns `true` when something was created.
pub fn ensure_dir(path: &Utf8Path) -> io::Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(path)?;
    Ok(true)
}

/// Provision every manifest entry below `root`, stopping at the first failure.
pub fn provision<W: io::Write>(
    root: &Utf8Path,
    manifest: &Manifest,
    mode: Mode,
    reporter: &mut Reporter<W>,
) -> Result<Vec<(Utf8PathBuf, Outcome)>> {
    let mut outcomes = Vec::with_capacity(manifest.len());

    for dir in manifest.iter() {
        let target = root.join(dir);
        let outcome = match mode {
            Mode::Apply => {
                let created =
                    ensure_dir(&target).with_context(|| format!("creating directory {}", dir))?;
                reporter.dir_ready(dir)?;
                if created {
                    Outcome::Created
                } else {
                    Outcome::Existing
                }
            }
            Mode::DryRun => match inspect(root, dir)? {
                DirState::Present => {
                    reporter.dir_exists(dir)?;
                    Outcome::Existing
                }
                DirState::Missing => {
                    reporter.dir_planned(dir)?;
                    Outcome::Planned
                }
                DirState::Blocked => {
                    bail!("cannot create directory {}: a non-directory is in the way", dir)
                }
            },
        };
        tracing::debug!(dir = %dir, ?outcome, "provisioned");
        outcomes.push((dir.to_owned(), outcome));
    }

    Ok(outcomes)
}

/// Classify `dir` (relative to `root`) without modifying anything.
pub fn inspect(root: &Utf8Path, dir: &Utf8Path) -> Result<DirState> {
    let target = root.join(dir);
    if probe(&target)? == Some(true) {
        return Ok(DirState::Present);
    }

    let mut current = Some(target.as_path());
    while let Some(path) = current {
        if path == root {
            break;
        }
        if probe(path)? == Some(false) {
            return Ok(DirState::Blocked);
        }
        current = path.parent();
    }
    Ok(DirState::Missing)
}

/// `Some(is_dir)` when the path exists, `None` when it does not.
fn probe(path: &Utf8Path) -> Result<Option<bool>> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(meta.is_dir())),
        Err(err) if matches!(err.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            Ok(None)
        }
        Err(err) => Err(err).with_context(|| format!("inspecting {}", path)),
    }
}
