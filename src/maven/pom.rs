//! POM document reading.
//!
//! Only the parts of a POM that matter for include/exclude computation are
//! recorded: the project's identity, its `<parent>` reference, properties,
//! `<dependencies>`, `<dependencyManagement>` and `<modules>`. Values are kept
//! exactly as written; see [`crate::maven::model`] for interpolation.

use crate::error::{FvuError, Result};
use crate::maven::coordinate::{Coordinate, DependencyRef};
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const POM_FILE_NAME: &str = "pom.xml";
pub const DEFAULT_RELATIVE_PATH: &str = "../pom.xml";

/// The `<parent>` block of a POM.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentRef {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    /// `None` when the element is absent, `Some("")` for `<relativePath/>`.
    pub relative_path: Option<String>,
}

impl ParentRef {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.group_id.as_deref(), self.artifact_id.as_deref())
    }

    /// Path to look for the parent POM relative to the child's directory,
    /// or `None` when local lookup is disabled.
    pub fn local_lookup_path(&self) -> Option<&str> {
        match self.relative_path.as_deref() {
            None => Some(DEFAULT_RELATIVE_PATH),
            Some(path) if path.trim().is_empty() => None,
            Some(path) => Some(path.trim()),
        }
    }
}

/// A POM file as written on disk.
#[derive(Debug, Clone, Default)]
pub struct PomDocument {
    pub path: PathBuf,
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub parent: Option<ParentRef>,
    pub properties: BTreeMap<String, String>,
    pub dependencies: Vec<DependencyRef>,
    pub dependency_management: Vec<DependencyRef>,
    pub modules: Vec<String>,
}

impl PomDocument {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| FvuError::pom_parse(path, format!("cannot read file: {e}")))?;
        Self::parse(&content, path)
    }

    pub fn parse<P: AsRef<Path>>(xml: &str, path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut builder = PomBuilder::new(path);
        // Text is trimmed once per element in `close`, so entity references
        // keep their surrounding spaces.
        let mut reader = Reader::from_str(xml);

        let mut saw_root = false;

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    return Err(FvuError::pom_parse(
                        path,
                        format!("malformed XML at byte {}: {e}", reader.buffer_position()),
                    ));
                }
            };

            match event {
                Event::Start(ref e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    if !saw_root {
                        Self::check_root(&name, path)?;
                        saw_root = true;
                    }
                    builder.open(name);
                }
                Event::Empty(ref e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    if !saw_root {
                        Self::check_root(&name, path)?;
                        saw_root = true;
                    }
                    builder.open(name);
                    builder.close();
                }
                Event::Text(ref e) => {
                    let text = e
                        .decode()
                        .map_err(|err| FvuError::pom_parse(path, err.to_string()))?;
                    builder.text.push_str(&text);
                }
                Event::CData(ref e) => {
                    let text = e
                        .decode()
                        .map_err(|err| FvuError::pom_parse(path, err.to_string()))?;
                    builder.text.push_str(&text);
                }
                Event::GeneralRef(ref e) => {
                    if let Ok(Some(ch)) = e.resolve_char_ref() {
                        builder.text.push(ch);
                    } else {
                        let name = e
                            .decode()
                            .map_err(|err| FvuError::pom_parse(path, err.to_string()))?;
                        match resolve_predefined_entity(&name) {
                            Some(resolved) => builder.text.push_str(resolved),
                            None => {
                                builder.text.push('&');
                                builder.text.push_str(&name);
                                builder.text.push(';');
                            }
                        }
                    }
                }
                Event::End(_) => builder.close(),
                Event::Eof => break,
                _ => {}
            }
        }

        if !saw_root {
            return Err(FvuError::pom_parse(path, "document has no <project> element"));
        }

        Ok(builder.finish())
    }

    fn check_root(name: &str, path: &Path) -> Result<()> {
        if name == "project" {
            Ok(())
        } else {
            Err(FvuError::pom_parse(
                path,
                format!("expected <project> root element, found <{name}>"),
            ))
        }
    }

    /// Group id, falling back to the parent's as Maven does.
    pub fn effective_group_id(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .or_else(|| self.parent.as_ref().and_then(|p| p.group_id.as_deref()))
    }

    pub fn effective_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or_else(|| self.parent.as_ref().and_then(|p| p.version.as_deref()))
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.effective_group_id(), self.artifact_id.as_deref())
    }

    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Event-driven accumulator tracking the element path from `<project>` down.
struct PomBuilder {
    doc: PomDocument,
    stack: Vec<String>,
    text: String,
    dependency: Option<DependencyRef>,
}

impl PomBuilder {
    fn new(path: &Path) -> Self {
        Self {
            doc: PomDocument {
                path: path.to_path_buf(),
                ..Default::default()
            },
            stack: Vec::new(),
            text: String::new(),
            dependency: None,
        }
    }

    fn open(&mut self, name: String) {
        self.stack.push(name);
        self.text.clear();

        let path: Vec<&str> = self.stack.iter().map(String::as_str).collect();
        match path.as_slice() {
            ["project", "dependencies", "dependency"]
            | ["project", "dependencyManagement", "dependencies", "dependency"] => {
                self.dependency = Some(DependencyRef::default());
            }
            ["project", "parent"] => {
                self.doc.parent.get_or_insert_with(ParentRef::default);
            }
            _ => {}
        }
    }

    fn close(&mut self) {
        let value = std::mem::take(&mut self.text).trim().to_string();
        let path: Vec<&str> = self.stack.iter().map(String::as_str).collect();

        match path.as_slice() {
            ["project", field] => {
                let slot = match *field {
                    "groupId" => Some(&mut self.doc.group_id),
                    "artifactId" => Some(&mut self.doc.artifact_id),
                    "version" => Some(&mut self.doc.version),
                    _ => None,
                };
                if let Some(slot) = slot {
                    *slot = Some(value);
                }
            }
            ["project", "parent", field] => {
                if let Some(parent) = self.doc.parent.as_mut() {
                    match *field {
                        "groupId" => parent.group_id = Some(value),
                        "artifactId" => parent.artifact_id = Some(value),
                        "version" => parent.version = Some(value),
                        "relativePath" => parent.relative_path = Some(value),
                        _ => {}
                    }
                }
            }
            ["project", "properties", key] => {
                self.doc.properties.insert(key.to_string(), value);
            }
            ["project", "modules", "module"] => {
                if !value.is_empty() {
                    self.doc.modules.push(value);
                }
            }
            ["project", "dependencies", "dependency", field]
            | ["project", "dependencyManagement", "dependencies", "dependency", field] => {
                if let Some(dep) = self.dependency.as_mut() {
                    match *field {
                        "groupId" => dep.group_id = Some(value),
                        "artifactId" => dep.artifact_id = Some(value),
                        "version" => dep.version = Some(value),
                        _ => {}
                    }
                }
            }
            ["project", "dependencies", "dependency"] => {
                if let Some(dep) = self.dependency.take() {
                    self.doc.dependencies.push(dep);
                }
            }
            ["project", "dependencyManagement", "dependencies", "dependency"] => {
                if let Some(dep) = self.dependency.take() {
                    self.doc.dependency_management.push(dep);
                }
            }
            _ => {}
        }

        self.stack.pop();
    }

    fn finish(self) -> PomDocument {
        self.doc
    }
}
