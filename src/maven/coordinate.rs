use std::fmt;

/// Placeholder rendered for a missing group or artifact id.
pub const MISSING_COMPONENT: &str = "null";

/// Version-agnostic `group:artifact` identifier of a dependency.
///
/// Equality and ordering use the canonical string, so two dependencies
/// differing only in version collapse into one set entry. Missing
/// components are kept as the literal `null` and never resolved from a
/// parent POM, which means `null:foo` and `com.bar:foo` are distinct.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coordinate(String);

impl Coordinate {
    pub fn new(group: Option<&str>, artifact: Option<&str>) -> Self {
        Self(format!(
            "{}:{}",
            group.unwrap_or(MISSING_COMPONENT),
            artifact.unwrap_or(MISSING_COMPONENT)
        ))
    }

    #[allow(dead_code)]
    pub fn of(group: &str, artifact: &str) -> Self {
        Self::new(Some(group), Some(artifact))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Coordinate {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A single `<dependency>` entry as read from a POM.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyRef {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
}

#[allow(dead_code)]
impl DependencyRef {
    pub fn new(group_id: &str, artifact_id: &str) -> Self {
        Self {
            group_id: Some(group_id.to_string()),
            artifact_id: Some(artifact_id.to_string()),
            version: None,
        }
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.group_id.as_deref(), self.artifact_id.as_deref())
    }
}
