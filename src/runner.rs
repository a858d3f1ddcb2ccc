use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::Serialize;

use crate::cli::{Cli, Command};
use crate::manifest::Manifest;
use crate::provision::{self, DirState, Mode, Outcome};
use crate::readme::{self, README_PATH, ReadmeState};
use crate::report::Reporter;

pub fn run(cli: Cli) -> Result<()> {
    let ctx = CliContext::from(&cli);
    ctx.apply_chdir()?;

    let root = Utf8Path::new(".");
    let manifest = Manifest::pipeline();
    let mut reporter = Reporter::stdout();

    match cli.command.unwrap_or(Command::Setup) {
        Command::Setup => {
            let summary = setup(root, &manifest, ctx.mode(), &mut reporter)?;
            tracing::info!(
                created = summary.created,
                existing = summary.existing,
                planned = summary.planned,
                dry_run = ctx.dry_run,
                "setup finished"
            );
            Ok(())
        }
        Command::Status { json } => {
            let report = status(root, &manifest)?;
            if json {
                let text =
                    serde_json::to_string_pretty(&report).context("serializing status report")?;
                reporter.line(text)?;
            } else {
                print_status(&report, &mut reporter)?;
            }
            Ok(())
        }
        Command::Manifest => {
            for dir in manifest.iter() {
                reporter.line(dir.as_str())?;
            }
            reporter.line(README_PATH)?;
            Ok(())
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SetupSummary {
    pub created: usize,
    pub existing: usize,
    pub planned: usize,
}

/// Provision the manifest, then write the README. Any failure ends the run
/// before later steps start.
pub fn setup<W: io::Write>(
    root: &Utf8Path,
    manifest: &Manifest,
    mode: Mode,
    reporter: &mut Reporter<W>,
) -> Result<SetupSummary> {
    let dry_run = mode == Mode::DryRun;
    reporter.banner()?;

    reporter.provisioning_started()?;
    let outcomes = provision::provision(root, manifest, mode, reporter)?;
    reporter.provisioning_finished(dry_run)?;

    readme::emit(root, mode, reporter)?;

    reporter.completed(dry_run)?;

    let mut summary = SetupSummary::default();
    for (_, outcome) in &outcomes {
        match outcome {
            Outcome::Created => summary.created += 1,
            Outcome::Existing => summary.existing += 1,
            Outcome::Planned => summary.planned += 1,
        }
    }
    Ok(summary)
}

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub directories: Vec<DirStatus>,
    pub readme: ReadmeStatus,
}

#[derive(Debug, Serialize)]
pub struct DirStatus {
    pub path: String,
    pub state: DirState,
}

#[derive(Debug, Serialize)]
pub struct ReadmeStatus {
    pub path: String,
    pub state: ReadmeState,
}

pub fn status(root: &Utf8Path, manifest: &Manifest) -> Result<StatusReport> {
    let directories = manifest
        .iter()
        .map(|dir| -> Result<DirStatus> {
            Ok(DirStatus {
                path: dir.to_string(),
                state: provision::inspect(root, dir)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let readme = ReadmeStatus {
        path: README_PATH.to_owned(),
        state: readme::inspect(root)?,
    };
    Ok(StatusReport {
        directories,
        readme,
    })
}

fn print_status<W: io::Write>(report: &StatusReport, reporter: &mut Reporter<W>) -> Result<()> {
    reporter.line("Pipeline Directory Status")?;
    reporter.line("=========================\n")?;
    for dir in &report.directories {
        reporter.line(format!("{:32} {}", dir.path, dir.state.as_str()))?;
    }
    reporter.line(format!(
        "{:32} {}",
        report.readme.path,
        report.readme.state.as_str()
    ))?;
    Ok(())
}

struct CliContext {
    chdir: Option<PathBuf>,
    dry_run: bool,
}

impl CliContext {
    fn apply_chdir(&self) -> Result<()> {
        if let Some(path) = &self.chdir {
            std::env::set_current_dir(path)
                .with_context(|| format!("changing directory to {}", path.display()))?;
        }
        Ok(())
    }

    fn mode(&self) -> Mode {
        if self.dry_run { Mode::DryRun } else { Mode::Apply }
    }
}

impl From<&Cli> for CliContext {
    fn from(cli: &Cli) -> Self {
        Self {
            chdir: cli.chdir.clone(),
            dry_run: cli.dry_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates;
    use camino::Utf8PathBuf;
    use std::fs;
    use tempfile::TempDir;

    fn temp_root() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, root)
    }

    /// Every directory and file below `root`, relative and sorted.
    fn tree(root: &Utf8Path) -> (Vec<String>, Vec<String>) {
        fn walk(root: &Utf8Path, dir: &Utf8Path, dirs: &mut Vec<String>, files: &mut Vec<String>) {
            for entry in dir.read_dir_utf8().unwrap() {
                let entry = entry.unwrap();
                let rel = entry.path().strip_prefix(root).unwrap().to_string();
                if entry.file_type().unwrap().is_dir() {
                    dirs.push(rel);
                    walk(root, entry.path(), dirs, files);
                } else {
                    files.push(rel);
                }
            }
        }
        let (mut dirs, mut files) = (Vec::new(), Vec::new());
        walk(root, root, &mut dirs, &mut files);
        dirs.sort();
        files.sort();
        (dirs, files)
    }

    #[test]
    fn setup_in_empty_dir_builds_full_layout() {
        let (_guard, root) = temp_root();
        let manifest = Manifest::pipeline();
        let mut reporter = Reporter::new(Vec::new());

        let summary = setup(&root, &manifest, Mode::Apply, &mut reporter).unwrap();

        assert_eq!(
            summary,
            SetupSummary {
                created: 12,
                existing: 0,
                planned: 0
            }
        );
        let (dirs, files) = tree(&root);
        for dir in manifest.iter() {
            assert!(dirs.contains(&dir.to_string()), "{} missing", dir);
        }
        // manifest leaves plus their ancestors, nothing else
        let mut expected: Vec<String> = vec![
            "data",
            "output",
            "output/4_1",
            "trained_agents",
            "trained_agents/5_7_3",
            "trained_agents/5_7_3/1sec",
            "trained_agents/5_7_3/1min",
            "trained_agents/5_7_3/5min",
        ]
        .into_iter()
        .map(String::from)
        .chain(manifest.iter().map(|dir| dir.to_string()))
        .collect();
        expected.sort();
        assert_eq!(dirs, expected);
        assert_eq!(files, vec![README_PATH.to_owned()]);
        assert_eq!(
            fs::read(root.join(README_PATH)).unwrap(),
            templates::get_bytes(templates::DATA_README).unwrap()
        );

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        let banner = text.find("FinRL Pipeline Data Setup").unwrap();
        let first_dir = text.find("✓ Created: data/1sec").unwrap();
        let readme_line = text.find("✓ Created data/README.md").unwrap();
        let done = text.find("✅ Setup complete!").unwrap();
        assert!(banner < first_dir && first_dir < readme_line && readme_line < done);
    }

    #[test]
    fn setup_twice_is_stable() {
        let (_guard, root) = temp_root();
        let manifest = Manifest::pipeline();

        setup(&root, &manifest, Mode::Apply, &mut Reporter::new(Vec::new())).unwrap();
        let first = tree(&root);
        let summary =
            setup(&root, &manifest, Mode::Apply, &mut Reporter::new(Vec::new())).unwrap();

        assert_eq!(summary.existing, 12);
        assert_eq!(tree(&root), first);
    }

    #[test]
    fn blocked_data_dir_skips_readme() {
        let (_guard, root) = temp_root();
        fs::write(root.join("data"), b"a file, not a directory").unwrap();
        let mut reporter = Reporter::new(Vec::new());

        let err = setup(&root, &Manifest::pipeline(), Mode::Apply, &mut reporter).unwrap_err();

        assert!(err.to_string().contains("data/1sec"));
        assert_eq!(fs::read(root.join("data")).unwrap(), b"a file, not a directory");
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(!text.contains("README"));
        assert!(!text.contains("Setup complete"));
    }

    #[test]
    fn dry_run_leaves_directory_empty() {
        let (_guard, root) = temp_root();

        let summary =
            setup(&root, &Manifest::pipeline(), Mode::DryRun, &mut Reporter::new(Vec::new()))
                .unwrap();

        assert_eq!(summary.planned, 12);
        assert_eq!(tree(&root), (Vec::new(), Vec::new()));
    }

    #[test]
    fn status_tracks_progress() {
        let (_guard, root) = temp_root();
        let manifest = Manifest::pipeline();

        let before = status(&root, &manifest).unwrap();
        assert!(before.directories.iter().all(|d| d.state == DirState::Missing));
        assert_eq!(before.readme.state, ReadmeState::Missing);

        setup(&root, &manifest, Mode::Apply, &mut Reporter::new(Vec::new())).unwrap();
        fs::write(root.join(README_PATH), "edited by hand").unwrap();

        let after = status(&root, &manifest).unwrap();
        assert!(after.directories.iter().all(|d| d.state == DirState::Present));
        assert_eq!(after.readme.state, ReadmeState::Stale);

        let json = serde_json::to_value(&after).unwrap();
        assert_eq!(json["directories"][0]["path"], "data/1sec");
        assert_eq!(json["directories"][0]["state"], "present");
        assert_eq!(json["readme"]["state"], "stale");
    }

    #[test]
    fn status_text_lists_every_entry() {
        let (_guard, root) = temp_root();
        let report = status(&root, &Manifest::pipeline()).unwrap();
        let mut reporter = Reporter::new(Vec::new());

        print_status(&report, &mut reporter).unwrap();

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(text.matches(" missing").count(), 13);
    }
}
