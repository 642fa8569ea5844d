use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info};

use crate::error::{GeneratorError, Result};
use crate::identity::{GitIdentity, IdentityLookup};
use crate::merge::{FilePlan, MergeEngine};
use crate::report::{FileReport, GenerationResult};
use crate::request::{GenerationRequest, ValidatedRequest};
use crate::templates::render_project;

/// Where a request will be generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub project_path: PathBuf,
    /// Generating into an existing directory rather than a new subdirectory.
    pub in_place: bool,
}

/// Everything `generate` would do, computed without writing.
#[derive(Debug, Clone)]
pub struct GenerationPlan {
    pub project_path: PathBuf,
    pub in_place: bool,
    pub package_name: String,
    pub import_name: String,
    pub files: Vec<FilePlan>,
}

/// Sequences validation, rendering and the merge engine for one request.
pub struct Generator<L: IdentityLookup> {
    working_dir: PathBuf,
    identity: L,
}

impl Generator<GitIdentity> {
    /// Generator rooted at the process working directory, using git for `AUTO`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(std::env::current_dir()?, GitIdentity))
    }
}

impl<L: IdentityLookup> Generator<L> {
    pub fn new(working_dir: impl Into<PathBuf>, identity: L) -> Self {
        Self {
            working_dir: working_dir.into(),
            identity,
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Resolve the project directory: a new `<project>` subdirectory of the
    /// output directory, or the working directory itself when it is `.`.
    pub fn resolve_target(&self, output_dir: Option<&Path>, project_name: &str) -> Target {
        match output_dir {
            Some(dir) if dir == Path::new(".") => Target {
                project_path: self.working_dir.clone(),
                in_place: true,
            },
            Some(dir) => Target {
                project_path: self.working_dir.join(dir).join(project_name),
                in_place: false,
            },
            None => Target {
                project_path: self.working_dir.join(project_name),
                in_place: false,
            },
        }
    }

    /// Validate, resolve and pre-flight, then plan every file. Reads only.
    pub fn plan(&self, request: &GenerationRequest) -> Result<GenerationPlan> {
        let validated = request.validate(&self.identity)?;
        self.plan_validated(&validated)
    }

    fn plan_validated(&self, validated: &ValidatedRequest) -> Result<GenerationPlan> {
        let target = self.resolve_target(validated.output_dir.as_deref(), &validated.project_name);
        if !target.in_place && target.project_path.exists() {
            return Err(GeneratorError::DirectoryAlreadyExists(target.project_path));
        }

        let rendered = render_project(validated)?;
        let engine = MergeEngine::new(&target.project_path, &validated.project_name);
        let files = engine.plan(&rendered)?;

        Ok(GenerationPlan {
            project_path: target.project_path,
            in_place: target.in_place,
            package_name: validated.package_name.clone(),
            import_name: validated.import_name.clone(),
            files,
        })
    }

    /// Generate a project.
    ///
    /// Validation and conflict failures return `Err` before anything is
    /// written. A failure once writing has started is reported in the
    /// returned result, together with the files completed before it.
    pub fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let validated = request.validate(&self.identity)?;
        let plan = self.plan_validated(&validated)?;
        debug!(
            "generating {} into {} (in place: {})",
            plan.package_name,
            plan.project_path.display(),
            plan.in_place
        );

        let mut reports: Vec<FileReport> = Vec::with_capacity(plan.files.len());
        let outcome = fs::create_dir_all(&plan.project_path)
            .map_err(GeneratorError::from)
            .and_then(|_| {
                MergeEngine::new(&plan.project_path, &validated.project_name).apply(&plan.files, &mut reports)
            });

        let failure = outcome.err();
        let result = GenerationResult::from_reports(
            plan.project_path,
            plan.package_name,
            plan.import_name,
            reports,
            failure.as_ref(),
        );
        match &failure {
            None => info!("generated {}: {}", result.project_path.display(), result),
            Some(err) => error!("generation into {} failed: {}", result.project_path.display(), err),
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> Generator<fn() -> Option<String>> {
        fn no_identity() -> Option<String> {
            None
        }
        Generator::new("/work", no_identity as fn() -> Option<String>)
    }

    #[test]
    fn test_target_defaults_to_subdirectory() {
        let target = generator().resolve_target(None, "demo");
        assert_eq!(target.project_path, PathBuf::from("/work/demo"));
        assert!(!target.in_place);
    }

    #[test]
    fn test_target_dot_is_in_place() {
        let target = generator().resolve_target(Some(Path::new(".")), "demo");
        assert_eq!(target.project_path, PathBuf::from("/work"));
        assert!(target.in_place);
    }

    #[test]
    fn test_target_relative_and_absolute_output() {
        let g = generator();
        assert_eq!(
            g.resolve_target(Some(Path::new("out")), "demo").project_path,
            PathBuf::from("/work/out/demo")
        );
        assert_eq!(
            g.resolve_target(Some(Path::new("/srv")), "demo").project_path,
            PathBuf::from("/srv/demo")
        );
    }
}
