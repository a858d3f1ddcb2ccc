use std::fs;
use std::io;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

use crate::provision::Mode;
use crate::report::Reporter;
use crate::templates;

/// Destination of the pipeline notes, relative to the setup root.
pub const README_PATH: &str = "data/README.md";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadmeState {
    /// Byte-identical to the embedded template.
    Current,
    Stale,
    Missing,
    /// Something other than a regular file occupies the path.
    Blocked,
}

impl ReadmeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadmeState::Current => "current",
            ReadmeState::Stale => "stale",
            ReadmeState::Missing => "missing",
            ReadmeState::Blocked => "blocked",
        }
    }
}

/// Write the embedded notes to `data/README.md`, replacing whatever is there.
///
/// The parent directory is never created here; provisioning has to run first.
pub fn emit<W: io::Write>(root: &Utf8Path, mode: Mode, reporter: &mut Reporter<W>) -> Result<()> {
    let bytes = templates::get_bytes(templates::DATA_README)?;
    let destination = root.join(README_PATH);

    match mode {
        Mode::Apply => {
            write_replacing(&destination, &bytes)
                .with_context(|| format!("writing {}", README_PATH))?;
            tracing::debug!(path = %destination, bytes = bytes.len(), "wrote readme");
            reporter.readme_written(README_PATH)?;
        }
        Mode::DryRun => reporter.readme_planned(README_PATH)?,
    }
    Ok(())
}

/// Write to a sibling temp file and rename it over `destination`, so readers
/// see either the old content or the complete new content.
fn write_replacing(destination: &Utf8Path, bytes: &[u8]) -> io::Result<()> {
    let staging = staging_path(destination);
    let result = fs::write(&staging, bytes).and_then(|_| fs::rename(&staging, destination));
    if result.is_err() {
        let _ = fs::remove_file(&staging);
    }
    result
}

fn staging_path(destination: &Utf8Path) -> Utf8PathBuf {
    let name = destination.file_name().unwrap_or("README.md");
    destination.with_file_name(format!(".{name}.tmp"))
}

pub fn inspect(root: &Utf8Path) -> Result<ReadmeState> {
    let destination = root.join(README_PATH);
    let meta = match fs::metadata(&destination) {
        Ok(meta) => meta,
        Err(err)
            if matches!(err.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) =>
        {
            return Ok(ReadmeState::Missing);
        }
        Err(err) => return Err(err).with_context(|| format!("inspecting {}", README_PATH)),
    };
    if !meta.is_file() {
        return Ok(ReadmeState::Blocked);
    }

    let current = fs::read(&destination).with_context(|| format!("reading {}", README_PATH))?;
    let expected = templates::get_bytes(templates::DATA_README)?;
    Ok(if current == expected {
        ReadmeState::Current
    } else {
        ReadmeState::Stale
    })
}
