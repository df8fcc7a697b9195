use crate::error::{FvuError, Result};
use crate::maven::pom::POM_FILE_NAME;
use std::path::{Path, PathBuf};

const FORBIDDEN: &[&str] = &["/etc", "/sys", "/proc", "/dev", "/boot"];

/// Provides safe path validation helpers to avoid traversal and host intrusion.
pub struct PathValidator;

impl PathValidator {
    /// Validates and canonicalises an incoming project directory.
    pub fn validate_project_path(path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        let canonical = Self::canonicalize(path)?;

        if !canonical.is_dir() {
            return Err(FvuError::ProjectValidation(format!(
                "Path '{}' is not a directory",
                canonical.display()
            )));
        }

        Ok(canonical)
    }

    /// Accepts either a project directory or a POM file and returns the
    /// canonical POM path.
    pub fn validate_pom_path(path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        let canonical = Self::canonicalize(path)?;

        let pom = if canonical.is_dir() {
            canonical.join(POM_FILE_NAME)
        } else {
            canonical
        };

        if !pom.is_file() {
            return Err(FvuError::ProjectValidation(format!(
                "No {} found at '{}'",
                POM_FILE_NAME,
                path.display()
            )));
        }

        if pom.extension().and_then(|e| e.to_str()) != Some("xml") {
            return Err(FvuError::ProjectValidation(format!(
                "'{}' is not an XML project descriptor",
                pom.display()
            )));
        }

        Ok(pom)
    }

    fn canonicalize(path: &Path) -> Result<PathBuf> {
        let canonical = path.canonicalize().map_err(|e| {
            FvuError::ProjectValidation(format!("Invalid path '{}': {e}", path.display()))
        })?;

        for forbidden in FORBIDDEN {
            let forbidden_path = Path::new(forbidden);

            if path.starts_with(forbidden_path) || canonical.starts_with(forbidden_path) {
                return Err(FvuError::ProjectValidation(format!(
                    "Access to system directory '{}' is not allowed",
                    forbidden
                )));
            }

            if let Ok(canonical_forbidden) = forbidden_path.canonicalize() {
                if canonical.starts_with(&canonical_forbidden) {
                    return Err(FvuError::ProjectValidation(format!(
                        "Access to system directory '{}' is not allowed",
                        forbidden
                    )));
                }
            }
        }

        Ok(canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn validate_project_path_accepts_directory() {
        let dir = tempdir().unwrap();
        assert!(PathValidator::validate_project_path(dir.path()).is_ok());
    }

    #[test]
    fn validate_project_path_rejects_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("file.txt");
        fs::write(&file_path, "test").unwrap();
        let err = PathValidator::validate_project_path(&file_path).unwrap_err();
        assert!(matches!(err, FvuError::ProjectValidation(_)));
    }

    #[test]
    fn validate_project_path_rejects_system_directory() {
        assert!(PathValidator::validate_project_path("/etc").is_err());
    }

    #[test]
    fn validate_pom_path_appends_pom_to_directories() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("pom.xml"), "<project/>").unwrap();
        let pom = PathValidator::validate_pom_path(dir.path()).unwrap();
        assert_eq!(pom.file_name().unwrap(), "pom.xml");
    }

    #[test]
    fn validate_pom_path_accepts_alternate_descriptor() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("release-pom.xml");
        fs::write(&file, "<project/>").unwrap();
        assert!(PathValidator::validate_pom_path(&file).is_ok());
    }

    #[test]
    fn validate_pom_path_rejects_directory_without_pom() {
        let dir = tempdir().unwrap();
        let err = PathValidator::validate_pom_path(dir.path()).unwrap_err();
        assert!(matches!(err, FvuError::ProjectValidation(_)));
    }

    #[test]
    fn validate_pom_path_rejects_non_xml_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("pom.json");
        fs::write(&file, "{}").unwrap();
        assert!(PathValidator::validate_pom_path(&file).is_err());
    }
}
