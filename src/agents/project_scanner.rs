use crate::error::Result;
use crate::utils::PathValidator;
use std::path::{Path, PathBuf};

/// ProjectScannerAgent validates the project structure
pub struct ProjectScannerAgent {
    project_path: PathBuf,
}

impl ProjectScannerAgent {
    pub fn new<P: AsRef<Path>>(project_path: P) -> Self {
        Self {
            project_path: project_path.as_ref().to_path_buf(),
        }
    }

    /// Validates the project structure
    pub fn validate(&self) -> Result<ProjectInfo> {
        let pom_path = PathValidator::validate_pom_path(&self.project_path)?;
        let project_dir = pom_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.project_path.clone());

        // Check for Git repository
        let git_dir = project_dir.join(".git");
        let is_git_repo = git_dir.exists() && git_dir.is_dir();

        Ok(ProjectInfo {
            maven_path: Self::maven_executable(&project_dir),
            project_path: project_dir,
            pom_path,
            has_git: is_git_repo,
        })
    }

    /// Prefers the Maven wrapper shipped with the project over `mvn` on PATH.
    fn maven_executable(project_dir: &Path) -> PathBuf {
        let wrapper = if cfg!(target_os = "windows") {
            "mvnw.cmd"
        } else {
            "mvnw"
        };
        let wrapper_path = project_dir.join(wrapper);
        if wrapper_path.is_file() {
            return wrapper_path;
        }

        PathBuf::from(if cfg!(target_os = "windows") {
            "mvn.cmd"
        } else {
            "mvn"
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProjectInfo {
    pub project_path: PathBuf,
    pub pom_path: PathBuf,
    pub has_git: bool,
    pub maven_path: PathBuf,
}
