use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{GeneratorError, Result};
use crate::region::{append_region, wrap_region, RegionKind};
use crate::report::{FileReport, MergeOutcome};

/// Files that define package identity. Existing copies are never touched.
pub const CRITICAL_FILES: &[&str] = &["pyproject.toml", "setup.py"];

/// How a rendered file is reconciled with an existing file at its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "policy", content = "region", rename_all = "snake_case")]
pub enum FilePolicy {
    /// Append template lines not already present (`.gitignore`).
    LineUnion,
    /// Same union, restricted to packaging directives (`MANIFEST.in`).
    DirectiveUnion,
    /// Append a project-keyed delimited region once.
    Delimited(RegionKind),
    /// Existing file aborts the whole generation.
    HardFail,
    /// Write when absent, otherwise leave alone.
    CreateOnly,
}

/// Pick the policy for a path relative to the project root.
pub fn policy_for(path: &str) -> FilePolicy {
    match path {
        ".gitignore" => FilePolicy::LineUnion,
        "MANIFEST.in" => FilePolicy::DirectiveUnion,
        "README.md" => FilePolicy::Delimited(RegionKind::Content),
        "MCP-USAGE.md" => FilePolicy::Delimited(RegionKind::Usage),
        p if CRITICAL_FILES.contains(&p) => FilePolicy::HardFail,
        _ => FilePolicy::CreateOnly,
    }
}

impl FilePolicy {
    /// Whether planning needs the existing file's content.
    fn reads_existing(self) -> bool {
        matches!(
            self,
            FilePolicy::LineUnion | FilePolicy::DirectiveUnion | FilePolicy::Delimited(_)
        )
    }
}

/// Template output for one file, path relative to the project root using `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: String,
    pub content: String,
}

impl RenderedFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// What is on disk at a target path before merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetState {
    Absent,
    /// Present; content not needed by the policy.
    Present,
    Loaded(String),
}

/// The single write a plan performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileWrite {
    /// New file with this content.
    Create(String),
    /// Bytes appended after the existing content.
    Append(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePlan {
    pub path: String,
    pub policy: FilePolicy,
    pub outcome: MergeOutcome,
    pub existing: Option<String>,
    pub write: Option<FileWrite>,
}

impl FilePlan {
    /// Full file content after the plan is applied, if it changes anything.
    pub fn proposed(&self) -> Option<String> {
        match &self.write {
            Some(FileWrite::Create(content)) => Some(content.clone()),
            Some(FileWrite::Append(suffix)) => {
                let mut out = self.existing.clone().unwrap_or_default();
                out.push_str(suffix);
                Some(out)
            }
            None => None,
        }
    }
}

/// Result of a line-set union: the suffix to append plus counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineUnion {
    pub suffix: String,
    pub added: usize,
    pub skipped: usize,
}

/// Union `template` lines into `existing`.
///
/// Existing lines are the only de-duplication authority and are never
/// reordered; new lines go at the end in template order. Blank template lines
/// and lines rejected by `accept` are ignored. A line repeated inside the
/// template is inserted once and counted as skipped afterwards.
pub fn union_lines(existing: &str, template: &str, accept: impl Fn(&str) -> bool) -> LineUnion {
    let mut seen: HashSet<&str> = existing.lines().collect();
    let mut novel: Vec<&str> = Vec::new();
    let mut skipped = 0;

    for line in template.lines() {
        if line.trim().is_empty() || !accept(line) {
            continue;
        }
        if seen.insert(line) {
            novel.push(line);
        } else {
            skipped += 1;
        }
    }

    // Appended lines follow the existing file's line ending.
    let newline = if existing.contains("\r\n") { "\r\n" } else { "\n" };
    let mut suffix = String::new();
    if !novel.is_empty() {
        if !existing.is_empty() && !existing.ends_with('\n') {
            suffix.push_str(newline);
        }
        for line in &novel {
            suffix.push_str(line);
            suffix.push_str(newline);
        }
    }

    LineUnion {
        suffix,
        added: novel.len(),
        skipped,
    }
}

/// `MANIFEST.in` include/exclude style directive.
pub fn is_manifest_directive(line: &str) -> bool {
    const DIRECTIVES: &[&str] = &[
        "include",
        "exclude",
        "recursive-include",
        "recursive-exclude",
        "global-include",
        "global-exclude",
        "graft",
        "prune",
    ];
    line.split_whitespace()
        .next()
        .map(|word| DIRECTIVES.contains(&word))
        .unwrap_or(false)
}

/// Decide what to do with one rendered file. Pure: no filesystem access.
pub fn plan_file(file: &RenderedFile, state: TargetState, project: &str) -> FilePlan {
    let policy = policy_for(&file.path);

    let (outcome, existing, write) = match state {
        TargetState::Absent => {
            let content = match policy {
                FilePolicy::Delimited(kind) => wrap_region(kind, project, &file.content),
                _ => file.content.clone(),
            };
            (MergeOutcome::Created, None, Some(FileWrite::Create(content)))
        }
        TargetState::Present => match policy {
            FilePolicy::HardFail => (MergeOutcome::Conflict, None, None),
            _ => (
                MergeOutcome::Skipped {
                    reason: "File already exists".to_string(),
                },
                None,
                None,
            ),
        },
        TargetState::Loaded(existing) => {
            let (outcome, write) = match policy {
                FilePolicy::LineUnion => union_outcome(union_lines(&existing, &file.content, |_| true)),
                FilePolicy::DirectiveUnion => {
                    union_outcome(union_lines(&existing, &file.content, is_manifest_directive))
                }
                FilePolicy::Delimited(kind) => {
                    match append_region(&existing, kind, project, &file.content) {
                        Some(append) => (
                            MergeOutcome::Appended {
                                line_number: append.line_number,
                            },
                            Some(FileWrite::Append(append.block)),
                        ),
                        None => (
                            MergeOutcome::Skipped {
                                reason: format!(
                                    "Already contains {} region",
                                    kind.start_token(project)
                                ),
                            },
                            None,
                        ),
                    }
                }
                FilePolicy::HardFail => (MergeOutcome::Conflict, None),
                FilePolicy::CreateOnly => (
                    MergeOutcome::Skipped {
                        reason: "File already exists".to_string(),
                    },
                    None,
                ),
            };
            (outcome, Some(existing), write)
        }
    };

    FilePlan {
        path: file.path.clone(),
        policy,
        outcome,
        existing,
        write,
    }
}

fn union_outcome(union: LineUnion) -> (MergeOutcome, Option<FileWrite>) {
    let write = if union.added > 0 {
        Some(FileWrite::Append(union.suffix))
    } else {
        None
    };
    (
        MergeOutcome::Merged {
            added: union.added,
            skipped: union.skipped,
        },
        write,
    )
}

/// Applies the per-file policy table under one project root.
pub struct MergeEngine<'a> {
    root: &'a Path,
    project: &'a str,
}

impl<'a> MergeEngine<'a> {
    pub fn new(root: &'a Path, project: &'a str) -> Self {
        Self { root, project }
    }

    pub fn target(&self, relative: &str) -> PathBuf {
        relative
            .split('/')
            .fold(self.root.to_path_buf(), |path, part| path.join(part))
    }

    /// Fail if any critical identity file already exists under the root.
    /// Runs before anything else so no write can precede the conflict.
    pub fn preflight(&self, files: &[RenderedFile]) -> Result<()> {
        let mut critical: Vec<&str> = CRITICAL_FILES.to_vec();
        for file in files {
            if policy_for(&file.path) == FilePolicy::HardFail && !critical.contains(&file.path.as_str()) {
                critical.push(&file.path);
            }
        }

        let conflicts: Vec<String> = critical
            .into_iter()
            .filter(|path| self.target(path).exists())
            .map(str::to_string)
            .collect();

        if conflicts.is_empty() {
            Ok(())
        } else {
            Err(GeneratorError::CriticalFilesConflict(conflicts))
        }
    }

    /// Pre-flight, then plan every file. Reads only.
    pub fn plan(&self, files: &[RenderedFile]) -> Result<Vec<FilePlan>> {
        self.preflight(files)?;

        let mut plans = Vec::with_capacity(files.len());
        for file in files {
            let target = self.target(&file.path);
            let state = if !target.exists() {
                TargetState::Absent
            } else if policy_for(&file.path).reads_existing() {
                TargetState::Loaded(fs::read_to_string(&target)?)
            } else {
                TargetState::Present
            };
            let plan = plan_file(file, state, self.project);
            debug!("{}: {:?} -> {}", plan.path, plan.policy, plan.outcome);
            plans.push(plan);
        }
        Ok(plans)
    }

    /// Execute plans in order, recording a report per completed file. On an
    /// I/O error the reports gathered so far stay in `reports`.
    pub fn apply(&self, plans: &[FilePlan], reports: &mut Vec<FileReport>) -> Result<()> {
        for plan in plans {
            if plan.outcome == MergeOutcome::Conflict {
                return Err(GeneratorError::CriticalFilesConflict(vec![plan.path.clone()]));
            }
            let target = self.target(&plan.path);
            match &plan.write {
                Some(FileWrite::Create(content)) => create_file(&target, content)?,
                Some(FileWrite::Append(suffix)) => append_file(&target, suffix)?,
                None => {}
            }
            reports.push(FileReport {
                path: plan.path.clone(),
                outcome: plan.outcome.clone(),
            });
        }
        Ok(())
    }

    pub fn merge(&self, files: &[RenderedFile]) -> Result<Vec<FileReport>> {
        let plans = self.plan(files)?;
        let mut reports = Vec::with_capacity(plans.len());
        self.apply(&plans, &mut reports)?;
        Ok(reports)
    }
}

fn create_file(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(content.as_bytes())
}

fn append_file(path: &Path, suffix: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().append(true).open(path)?;
    file.write_all(suffix.as_bytes())
}

// ── Single-file entry points ──

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct UnionReport {
    pub added: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AppendReport {
    pub appended: bool,
    pub line_number: Option<usize>,
    pub reason: Option<String>,
}

fn merge_lines_into(path: &Path, template: &str, accept: impl Fn(&str) -> bool) -> Result<UnionReport> {
    let existing = fs::read_to_string(path)?;
    let union = union_lines(&existing, template, accept);
    if union.added > 0 {
        append_file(path, &union.suffix)?;
    }
    Ok(UnionReport {
        added: union.added,
        skipped: union.skipped,
    })
}

/// Union-merge a template into an existing `.gitignore`.
pub fn merge_gitignore(path: &Path, template: &str) -> Result<UnionReport> {
    merge_lines_into(path, template, |_| true)
}

/// Union-merge the directive lines of a template into an existing `MANIFEST.in`.
pub fn merge_manifest(path: &Path, template: &str) -> Result<UnionReport> {
    merge_lines_into(path, template, is_manifest_directive)
}

fn append_region_to(path: &Path, kind: RegionKind, template: &str, project: &str) -> Result<AppendReport> {
    let existing = fs::read_to_string(path)?;
    match append_region(&existing, kind, project, template) {
        Some(append) => {
            append_file(path, &append.block)?;
            Ok(AppendReport {
                appended: true,
                line_number: Some(append.line_number),
                reason: None,
            })
        }
        None => Ok(AppendReport {
            appended: false,
            line_number: None,
            reason: Some(format!("Already contains {} region", kind.start_token(project))),
        }),
    }
}

pub fn append_to_readme(path: &Path, template: &str, project: &str) -> Result<AppendReport> {
    append_region_to(path, RegionKind::Content, template, project)
}

pub fn append_to_usage(path: &Path, template: &str, project: &str) -> Result<AppendReport> {
    append_region_to(path, RegionKind::Usage, template, project)
}
