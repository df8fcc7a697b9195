use crate::collector::ProjectDescriptor;
use crate::error::{FvuError, Result};
use crate::maven::coordinate::{Coordinate, DependencyRef};
use crate::maven::model::ModelPom;
use crate::maven::pom::{POM_FILE_NAME, ParentRef, PomDocument};
use crate::utils::log;
use colored::Colorize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A project POM together with its ancestor chain and all of its modules.
#[derive(Debug)]
pub struct Reactor {
    root: PomDocument,
    parent: Option<Box<ModelPom>>,
    modules: Vec<PomDocument>,
}

impl Reactor {
    /// Loads the POM at `pom_path`, resolves its parents and reads every
    /// module reachable through `<modules>`.
    pub fn load<P: AsRef<Path>>(pom_path: P, local_repository: Option<&Path>) -> Result<Self> {
        let root = PomDocument::read(pom_path.as_ref())?;
        log::verbose(format!("Loaded project POM {}", root.path.display()));

        let resolver = ParentResolver::new(local_repository);
        let ancestors = resolver.ancestors(&root)?;
        let parent = ModelPom::chain(ancestors);

        let modules = ModuleCollector::default().collect(&root)?;
        log::verbose(format!("Collected {} module(s)", modules.len()));

        Ok(Self {
            root,
            parent,
            modules,
        })
    }

    pub fn root(&self) -> &PomDocument {
        &self.root
    }

    pub fn modules(&self) -> &[PomDocument] {
        &self.modules
    }
}

impl ProjectDescriptor for Reactor {
    fn coordinate(&self) -> Coordinate {
        self.root.coordinate()
    }

    fn dependencies(&self) -> &[DependencyRef] {
        &self.root.dependencies
    }

    fn dependency_management(&self) -> &[DependencyRef] {
        &self.root.dependency_management
    }

    fn parent(&self) -> Option<&dyn ProjectDescriptor> {
        self.parent.as_deref().map(|p| p as &dyn ProjectDescriptor)
    }

    fn children(&self) -> Vec<&dyn ProjectDescriptor> {
        self.modules
            .iter()
            .map(|m| m as &dyn ProjectDescriptor)
            .collect()
    }
}

/// A raw document on its own: no parent link, no children.
impl ProjectDescriptor for PomDocument {
    fn coordinate(&self) -> Coordinate {
        PomDocument::coordinate(self)
    }

    fn dependencies(&self) -> &[DependencyRef] {
        &self.dependencies
    }

    fn dependency_management(&self) -> &[DependencyRef] {
        &self.dependency_management
    }

    fn parent(&self) -> Option<&dyn ProjectDescriptor> {
        None
    }

    fn children(&self) -> Vec<&dyn ProjectDescriptor> {
        Vec::new()
    }
}

/// Locates parent POMs through `<relativePath>` and the local repository.
pub struct ParentResolver {
    local_repository: Option<PathBuf>,
}

impl ParentResolver {
    pub fn new(local_repository: Option<&Path>) -> Self {
        Self {
            local_repository: local_repository.map(Path::to_path_buf),
        }
    }

    /// Reads the ancestor chain of `project`, nearest parent first.
    pub fn ancestors(&self, project: &PomDocument) -> Result<Vec<PomDocument>> {
        let mut chain: Vec<PomDocument> = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(canonical(&project.path));

        let mut child_path = project.path.clone();
        let mut next = project.parent.clone();
        while let Some(parent_ref) = next {
            let parent = self.resolve(&child_path, &parent_ref)?;
            if !seen.insert(canonical(&parent.path)) {
                return Err(FvuError::ParentResolution(format!(
                    "Cycle in parent chain: {} is reached twice",
                    parent.path.display()
                )));
            }
            child_path = parent.path.clone();
            next = parent.parent.clone();
            chain.push(parent);
        }

        Ok(chain)
    }

    /// Finds the POM `parent` refers to from the child POM at `child_path`.
    pub fn resolve(&self, child_path: &Path, parent: &ParentRef) -> Result<PomDocument> {
        if let Some(relative_path) = parent.local_lookup_path() {
            let directory = child_path.parent().unwrap_or_else(|| Path::new("."));
            let mut candidate = directory.join(relative_path);
            if candidate.is_dir() {
                candidate = candidate.join(POM_FILE_NAME);
            }

            if candidate.is_file() {
                match PomDocument::read(&candidate) {
                    Ok(doc) if Self::matches(&doc, parent) => {
                        log::verbose(format!(
                            "Resolved parent {} at {}",
                            parent.coordinate(),
                            candidate.display()
                        ));
                        return Ok(doc);
                    }
                    Ok(doc) => log::verbose(format!(
                        "Ignoring {}: it is {}:{}, not parent {}:{}",
                        candidate.display(),
                        doc.coordinate(),
                        doc.effective_version().unwrap_or("?"),
                        parent.coordinate(),
                        parent.version.as_deref().unwrap_or("?")
                    )),
                    Err(e) => eprintln!(
                        "{} Ignoring parent candidate {}: {}",
                        "⚠".yellow(),
                        candidate.display(),
                        e
                    ),
                }
            }
        }

        if let Some(path) = self.repository_path(parent) {
            if path.is_file() {
                log::verbose(format!(
                    "Resolved parent {} from local repository {}",
                    parent.coordinate(),
                    path.display()
                ));
                return PomDocument::read(&path);
            }
        }

        Err(FvuError::ParentResolution(format!(
            "Parent {}:{} of {} was found neither on disk nor in the local repository. \
             Run `mvn validate` once so Maven downloads it.",
            parent.coordinate(),
            parent.version.as_deref().unwrap_or("?"),
            child_path.display()
        )))
    }

    fn matches(doc: &PomDocument, parent: &ParentRef) -> bool {
        let versions_agree = match (doc.effective_version(), parent.version.as_deref()) {
            (Some(found), Some(wanted)) => found == wanted,
            _ => true,
        };
        doc.effective_group_id() == parent.group_id.as_deref()
            && doc.artifact_id.as_deref() == parent.artifact_id.as_deref()
            && versions_agree
    }

    /// `<repo>/<group path>/<artifact>/<version>/<artifact>-<version>.pom`
    fn repository_path(&self, parent: &ParentRef) -> Option<PathBuf> {
        let repository = self.local_repository.as_ref()?;
        let group = parent.group_id.as_deref()?;
        let artifact = parent.artifact_id.as_deref()?;
        let version = parent.version.as_deref()?;

        let mut path = repository.clone();
        for segment in group.split('.') {
            path.push(segment);
        }
        path.push(artifact);
        path.push(version);
        path.push(format!("{artifact}-{version}.pom"));
        Some(path)
    }
}

/// Default Maven local repository, `~/.m2/repository`.
pub fn default_local_repository() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join(".m2").join("repository"))
}

/// Reads `<modules>` recursively, flattening them in declaration order.
#[derive(Default)]
struct ModuleCollector {
    seen: HashSet<PathBuf>,
    modules: Vec<PomDocument>,
}

impl ModuleCollector {
    fn collect(mut self, root: &PomDocument) -> Result<Vec<PomDocument>> {
        self.seen.insert(canonical(&root.path));
        self.visit(root.directory(), &root.modules, &root.path)?;
        Ok(self.modules)
    }

    fn visit(&mut self, base: &Path, modules: &[String], declared_in: &Path) -> Result<()> {
        for module in modules {
            let path = module_pom_path(base, module);
            if !path.is_file() {
                return Err(FvuError::ProjectValidation(format!(
                    "Child module {} declared in {} does not exist",
                    path.display(),
                    declared_in.display()
                )));
            }
            if !self.seen.insert(canonical(&path)) {
                continue;
            }

            let doc = PomDocument::read(&path)?;
            log::verbose(format!("Loaded module POM {}", doc.path.display()));
            let nested = doc.modules.clone();
            let directory = doc.directory().to_path_buf();
            self.modules.push(doc);
            self.visit(&directory, &nested, &path)?;
        }
        Ok(())
    }
}

fn module_pom_path(base: &Path, module: &str) -> PathBuf {
    let path = base.join(module);
    if module.ends_with(".xml") {
        path
    } else {
        path.join(POM_FILE_NAME)
    }
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
