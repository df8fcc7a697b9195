//! Interpolated model of an ancestor POM.
//!
//! Ancestors are read the way Maven's resolved model exposes them: `${...}`
//! references in coordinates are substituted using built-in project values
//! and properties inherited down the chain. The project itself and its
//! modules are left raw.

use crate::collector::ProjectDescriptor;
use crate::maven::coordinate::{Coordinate, DependencyRef};
use crate::maven::pom::PomDocument;
use std::collections::BTreeMap;

const MAX_INTERPOLATION_PASSES: usize = 20;

#[derive(Debug, Clone)]
pub struct ModelPom {
    coordinate: Coordinate,
    properties: BTreeMap<String, String>,
    dependencies: Vec<DependencyRef>,
    dependency_management: Vec<DependencyRef>,
    parent: Option<Box<ModelPom>>,
}

impl ModelPom {
    /// Builds the linked ancestor chain from documents ordered nearest
    /// ancestor first.
    pub fn chain(documents: Vec<PomDocument>) -> Option<Box<ModelPom>> {
        documents
            .into_iter()
            .rev()
            .fold(None, |parent, doc| Some(Box::new(Self::resolve(doc, parent))))
    }

    fn resolve(doc: PomDocument, parent: Option<Box<ModelPom>>) -> Self {
        let mut properties = parent
            .as_ref()
            .map(|p| p.properties.clone())
            .unwrap_or_default();
        properties.extend(doc.properties.clone());

        let interpolator = Interpolator {
            doc: &doc,
            properties: &properties,
        };

        let coordinate = Coordinate::new(
            interpolator.opt(doc.effective_group_id()).as_deref(),
            interpolator.opt(doc.artifact_id.as_deref()).as_deref(),
        );
        let dependencies = interpolator.dependencies(&doc.dependencies);
        let dependency_management = interpolator.dependencies(&doc.dependency_management);

        Self {
            coordinate,
            properties,
            dependencies,
            dependency_management,
            parent,
        }
    }

    #[allow(dead_code)]
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }
}

impl ProjectDescriptor for ModelPom {
    fn coordinate(&self) -> Coordinate {
        self.coordinate.clone()
    }

    fn dependencies(&self) -> &[DependencyRef] {
        &self.dependencies
    }

    fn dependency_management(&self) -> &[DependencyRef] {
        &self.dependency_management
    }

    fn parent(&self) -> Option<&dyn ProjectDescriptor> {
        self.parent.as_deref().map(|p| p as &dyn ProjectDescriptor)
    }

    fn children(&self) -> Vec<&dyn ProjectDescriptor> {
        Vec::new()
    }
}

struct Interpolator<'a> {
    doc: &'a PomDocument,
    properties: &'a BTreeMap<String, String>,
}

impl Interpolator<'_> {
    fn dependencies(&self, dependencies: &[DependencyRef]) -> Vec<DependencyRef> {
        dependencies
            .iter()
            .map(|dep| DependencyRef {
                group_id: self.opt(dep.group_id.as_deref()),
                artifact_id: self.opt(dep.artifact_id.as_deref()),
                version: self.opt(dep.version.as_deref()),
            })
            .collect()
    }

    fn opt(&self, value: Option<&str>) -> Option<String> {
        value.map(|v| self.interpolate(v))
    }

    fn interpolate(&self, input: &str) -> String {
        let mut current = input.to_string();
        for _ in 0..MAX_INTERPOLATION_PASSES {
            if !current.contains("${") {
                break;
            }
            let next = self.substitute(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    /// One left-to-right pass; unknown references are kept verbatim.
    fn substitute(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                out.push_str(&rest[start..]);
                return out;
            };

            let key = &after[..end];
            match self.lookup(key) {
                Some(value) => out.push_str(&value),
                None => {
                    out.push_str("${");
                    out.push_str(key);
                    out.push('}');
                }
            }
            rest = &after[end + 1..];
        }

        out.push_str(rest);
        out
    }

    fn lookup(&self, key: &str) -> Option<String> {
        let parent = self.doc.parent.as_ref();
        let value = match key {
            "project.groupId" | "pom.groupId" | "groupId" => self.doc.effective_group_id(),
            "project.artifactId" | "pom.artifactId" | "artifactId" => {
                self.doc.artifact_id.as_deref()
            }
            "project.version" | "pom.version" | "version" => self.doc.effective_version(),
            "project.parent.groupId" => parent.and_then(|p| p.group_id.as_deref()),
            "project.parent.artifactId" => parent.and_then(|p| p.artifact_id.as_deref()),
            "project.parent.version" => parent.and_then(|p| p.version.as_deref()),
            _ => self.properties.get(key).map(String::as_str),
        };
        value.map(str::to_string)
    }
}
