use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::GeneratorError;

/// What the merge engine did (or would do) with one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MergeOutcome {
    /// File was absent and has been written from the template.
    Created,
    /// Line-set union into an existing file.
    Merged { added: usize, skipped: usize },
    /// Delimited region appended; `line_number` is where insertion began.
    Appended { line_number: usize },
    /// Existing file left untouched.
    Skipped { reason: String },
    /// Existing critical identity file; generation must not proceed.
    Conflict,
}

impl MergeOutcome {
    /// Whether applying this outcome writes to disk.
    pub fn writes(&self) -> bool {
        match self {
            MergeOutcome::Created | MergeOutcome::Appended { .. } => true,
            MergeOutcome::Merged { added, .. } => *added > 0,
            MergeOutcome::Skipped { .. } | MergeOutcome::Conflict => false,
        }
    }
}

impl fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeOutcome::Created => write!(f, "created"),
            MergeOutcome::Merged { added, skipped } => {
                write!(f, "merged ({} added, {} skipped)", added, skipped)
            }
            MergeOutcome::Appended { line_number } => {
                write!(f, "appended at line {}", line_number)
            }
            MergeOutcome::Skipped { reason } => write!(f, "skipped: {}", reason),
            MergeOutcome::Conflict => write!(f, "conflict"),
        }
    }
}

/// Outcome for one file, keyed by its path relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: String,
    pub outcome: MergeOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub kind: String,
    pub message: String,
}

impl From<&GeneratorError> for ErrorInfo {
    fn from(err: &GeneratorError) -> Self {
        ErrorInfo {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Summary handed back to the caller of a generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    pub success: bool,
    pub project_path: PathBuf,
    pub package_name: String,
    pub import_name: String,
    pub files_created: Vec<String>,
    pub files_merged: Vec<String>,
    pub files_appended: Vec<String>,
    pub files_skipped: Vec<String>,
    pub reports: Vec<FileReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl GenerationResult {
    /// Aggregate per-file reports. A present `error` marks the run failed; the
    /// reports still list what was done before it.
    pub fn from_reports(
        project_path: PathBuf,
        package_name: String,
        import_name: String,
        reports: Vec<FileReport>,
        error: Option<&GeneratorError>,
    ) -> Self {
        let mut result = GenerationResult {
            success: error.is_none(),
            project_path,
            package_name,
            import_name,
            files_created: Vec::new(),
            files_merged: Vec::new(),
            files_appended: Vec::new(),
            files_skipped: Vec::new(),
            reports: Vec::new(),
            error: error.map(ErrorInfo::from),
        };
        for report in &reports {
            let bucket = match report.outcome {
                MergeOutcome::Created => &mut result.files_created,
                MergeOutcome::Merged { .. } => &mut result.files_merged,
                MergeOutcome::Appended { .. } => &mut result.files_appended,
                MergeOutcome::Skipped { .. } | MergeOutcome::Conflict => {
                    &mut result.files_skipped
                }
            };
            bucket.push(report.path.clone());
        }
        result.reports = reports;
        result
    }

    pub fn outcome_for(&self, path: &str) -> Option<&MergeOutcome> {
        self.reports
            .iter()
            .find(|r| r.path == path)
            .map(|r| &r.outcome)
    }
}

impl fmt::Display for GenerationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "created: {}", self.files_created.len())?;
        if !self.files_merged.is_empty() {
            write!(f, ", merged: {}", self.files_merged.len())?;
        }
        if !self.files_appended.is_empty() {
            write!(f, ", appended: {}", self.files_appended.len())?;
        }
        if !self.files_skipped.is_empty() {
            write!(f, ", skipped: {}", self.files_skipped.len())?;
        }
        if let Some(ref err) = self.error {
            write!(f, " (FAILED: {})", err.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(path: &str, outcome: MergeOutcome) -> FileReport {
        FileReport {
            path: path.to_string(),
            outcome,
        }
    }

    #[test]
    fn test_reports_are_bucketed() {
        let result = GenerationResult::from_reports(
            PathBuf::from("/tmp/demo"),
            "demo".into(),
            "demo".into(),
            vec![
                report("setup.py", MergeOutcome::Created),
                report(".gitignore", MergeOutcome::Merged { added: 2, skipped: 1 }),
                report("README.md", MergeOutcome::Appended { line_number: 4 }),
                report("LICENSE", MergeOutcome::Skipped { reason: "exists".into() }),
            ],
            None,
        );
        assert!(result.success);
        assert_eq!(result.files_created, vec!["setup.py"]);
        assert_eq!(result.files_merged, vec![".gitignore"]);
        assert_eq!(result.files_appended, vec!["README.md"]);
        assert_eq!(result.files_skipped, vec!["LICENSE"]);
        assert_eq!(
            result.to_string(),
            "created: 1, merged: 1, appended: 1, skipped: 1"
        );
    }

    #[test]
    fn test_failed_result_carries_error_kind() {
        let err = GeneratorError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let result = GenerationResult::from_reports(
            PathBuf::from("/tmp/demo"),
            "demo".into(),
            "demo".into(),
            vec![],
            Some(&err),
        );
        assert!(!result.success);
        assert_eq!(result.error.as_ref().unwrap().kind, "IoError");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["error"]["kind"], "IoError");
    }

    #[test]
    fn test_outcome_writes() {
        assert!(MergeOutcome::Created.writes());
        assert!(MergeOutcome::Appended { line_number: 1 }.writes());
        assert!(MergeOutcome::Merged { added: 1, skipped: 0 }.writes());
        assert!(!MergeOutcome::Merged { added: 0, skipped: 3 }.writes());
        assert!(!MergeOutcome::Skipped { reason: String::new() }.writes());
        assert!(!MergeOutcome::Conflict.writes());
    }
}
