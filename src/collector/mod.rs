//! Splits the coordinates visible from a project into the ones it declares
//! itself and the ones it only inherits from its ancestors.

use crate::maven::coordinate::{Coordinate, DependencyRef};
use std::collections::BTreeSet;

/// Read-only view of one build descriptor.
///
/// Implemented both by raw POM documents and by interpolated ancestor
/// models; [`collect`] does not care which backing supplies the data.
pub trait ProjectDescriptor {
    /// The descriptor's own `group:artifact`.
    fn coordinate(&self) -> Coordinate;

    fn dependencies(&self) -> &[DependencyRef];

    fn dependency_management(&self) -> &[DependencyRef];

    fn parent(&self) -> Option<&dyn ProjectDescriptor>;

    /// Sub-module descriptors; empty for leaf projects.
    fn children(&self) -> Vec<&dyn ProjectDescriptor>;
}

/// Result of one collection run. `declared` and `transitive` are disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    declared: BTreeSet<Coordinate>,
    transitive: BTreeSet<Coordinate>,
}

impl Collection {
    pub fn declared(&self) -> &BTreeSet<Coordinate> {
        &self.declared
    }

    pub fn transitive(&self) -> &BTreeSet<Coordinate> {
        &self.transitive
    }

    /// Declared coordinates in sorted order, for include filters.
    pub fn includes(&self) -> Vec<&str> {
        self.declared.iter().map(Coordinate::as_str).collect()
    }

    /// Inherited-only coordinates in sorted order, for exclude filters.
    pub fn excludes(&self) -> Vec<&str> {
        self.transitive.iter().map(Coordinate::as_str).collect()
    }
}

/// Computes the declared and transitive-only coordinate sets of `project`.
///
/// The immediate parent counts as declared. Every dependency and managed
/// dependency found along the ancestor chain is a transitive candidate,
/// while those of the project and of each entry in its `children()` list
/// are declared. Children are visited one level deep and their own
/// ancestors are not walked. Anything declared is removed from the
/// transitive set at the end.
pub fn collect(project: &dyn ProjectDescriptor) -> Collection {
    let mut declared = BTreeSet::new();
    let mut transitive = BTreeSet::new();

    if let Some(parent) = project.parent() {
        declared.insert(parent.coordinate());

        let mut current = Some(parent);
        while let Some(ancestor) = current {
            add_all(&mut transitive, ancestor.dependencies());
            add_all(&mut transitive, ancestor.dependency_management());
            current = ancestor.parent();
        }
    }

    add_declared(&mut declared, project);
    for child in project.children() {
        add_declared(&mut declared, child);
    }

    transitive.retain(|coordinate| !declared.contains(coordinate));

    Collection {
        declared,
        transitive,
    }
}

fn add_declared(set: &mut BTreeSet<Coordinate>, project: &dyn ProjectDescriptor) {
    add_all(set, project.dependencies());
    add_all(set, project.dependency_management());
}

fn add_all(set: &mut BTreeSet<Coordinate>, dependencies: &[DependencyRef]) {
    set.extend(dependencies.iter().map(DependencyRef::coordinate));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Fixture {
        group: &'static str,
        artifact: &'static str,
        dependencies: Vec<DependencyRef>,
        managed: Vec<DependencyRef>,
        parent: Option<Box<Fixture>>,
        children: Vec<Fixture>,
    }

    impl Fixture {
        fn named(group: &'static str, artifact: &'static str) -> Self {
            Self {
                group,
                artifact,
                ..Default::default()
            }
        }

        fn depends_on(mut self, group: &str, artifact: &str) -> Self {
            self.dependencies.push(DependencyRef::new(group, artifact));
            self
        }

        fn manages(mut self, group: &str, artifact: &str) -> Self {
            self.managed.push(DependencyRef::new(group, artifact));
            self
        }

        fn with_parent(mut self, parent: Fixture) -> Self {
            self.parent = Some(Box::new(parent));
            self
        }

        fn with_child(mut self, child: Fixture) -> Self {
            self.children.push(child);
            self
        }
    }

    impl ProjectDescriptor for Fixture {
        fn coordinate(&self) -> Coordinate {
            Coordinate::of(self.group, self.artifact)
        }

        fn dependencies(&self) -> &[DependencyRef] {
            &self.dependencies
        }

        fn dependency_management(&self) -> &[DependencyRef] {
            &self.managed
        }

        fn parent(&self) -> Option<&dyn ProjectDescriptor> {
            self.parent.as_deref().map(|p| p as &dyn ProjectDescriptor)
        }

        fn children(&self) -> Vec<&dyn ProjectDescriptor> {
            self.children
                .iter()
                .map(|c| c as &dyn ProjectDescriptor)
                .collect()
        }
    }

    fn set(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn strings(coordinates: &BTreeSet<Coordinate>) -> Vec<String> {
        coordinates.iter().map(Coordinate::to_string).collect()
    }

    #[test]
    fn project_without_parent_has_no_transitives() {
        let project = Fixture::named("com.example", "app").depends_on("com.foo", "bar");

        let result = collect(&project);

        assert_eq!(strings(result.declared()), set(&["com.foo:bar"]));
        assert!(result.transitive().is_empty());
    }

    #[test]
    fn explicit_declaration_wins_over_inherited_management() {
        let parent = Fixture::named("org.p", "parent-pom").manages("org.x", "y");
        let project = Fixture::named("com.example", "app")
            .depends_on("org.x", "y")
            .with_parent(parent);

        let result = collect(&project);

        assert!(result.declared().contains(&Coordinate::of("org.x", "y")));
        assert!(!result.transitive().contains(&Coordinate::of("org.x", "y")));
    }

    #[test]
    fn immediate_parent_is_declared() {
        let project = Fixture::named("com.example", "app")
            .with_parent(Fixture::named("org.p", "parent-pom"));

        let result = collect(&project);

        assert_eq!(strings(result.declared()), set(&["org.p:parent-pom"]));
        assert!(result.transitive().is_empty());
    }

    #[test]
    fn grandparent_coordinate_is_not_declared() {
        let grandparent = Fixture::named("org.g", "grand");
        let parent = Fixture::named("org.p", "parent-pom").with_parent(grandparent);
        let project = Fixture::named("com.example", "app").with_parent(parent);

        let result = collect(&project);

        assert!(!result.declared().contains(&Coordinate::of("org.g", "grand")));
    }

    #[test]
    fn child_module_dependencies_are_declared() {
        let child = Fixture::named("com.example", "lib").depends_on("com.child", "dep1");
        let project = Fixture::named("com.example", "aggregator").with_child(child);

        let result = collect(&project);

        assert!(result.declared().contains(&Coordinate::of("com.child", "dep1")));
    }

    #[test]
    fn whole_ancestor_chain_feeds_transitives() {
        let grandparent = Fixture::named("org.g", "grand")
            .depends_on("org.g", "runtime")
            .manages("org.g", "managed");
        let parent = Fixture::named("org.p", "parent-pom")
            .manages("org.p", "managed")
            .with_parent(grandparent);
        let project = Fixture::named("com.example", "app")
            .manages("org.g", "managed")
            .with_parent(parent);

        let result = collect(&project);

        assert_eq!(
            strings(result.transitive()),
            set(&["org.g:runtime", "org.p:managed"])
        );
        assert_eq!(result.excludes(), vec!["org.g:runtime", "org.p:managed"]);
        assert_eq!(result.includes(), vec!["org.g:managed", "org.p:parent-pom"]);
    }

    #[test]
    fn child_declarations_remove_inherited_entries() {
        let parent = Fixture::named("org.p", "parent-pom").manages("org.x", "y");
        let child = Fixture::named("com.example", "lib").depends_on("org.x", "y");
        let project = Fixture::named("com.example", "aggregator")
            .with_parent(parent)
            .with_child(child);

        let result = collect(&project);

        assert!(result.transitive().is_empty());
    }

    #[test]
    fn grandchildren_and_child_ancestors_are_not_walked() {
        let grandchild = Fixture::named("com.example", "deep").depends_on("com.deep", "dep");
        let child_parent = Fixture::named("org.c", "child-parent").manages("org.c", "managed");
        let child = Fixture::named("com.example", "lib")
            .with_parent(child_parent)
            .with_child(grandchild);
        let project = Fixture::named("com.example", "aggregator").with_child(child);

        let result = collect(&project);

        assert!(!result.declared().contains(&Coordinate::of("com.deep", "dep")));
        assert!(!result.declared().contains(&Coordinate::of("org.c", "child-parent")));
        assert!(result.transitive().is_empty());
    }

    #[test]
    fn sets_are_disjoint_and_collection_is_idempotent() {
        let parent = Fixture::named("org.p", "parent-pom")
            .depends_on("a", "one")
            .depends_on("b", "two")
            .manages("c", "three");
        let project = Fixture::named("com.example", "app")
            .depends_on("b", "two")
            .manages("c", "three")
            .depends_on("d", "four")
            .with_parent(parent)
            .with_child(Fixture::named("com.example", "lib").depends_on("a", "one"));

        let first = collect(&project);
        let second = collect(&project);

        assert!(first.declared().is_disjoint(first.transitive()));
        assert_eq!(first, second);
    }

    #[test]
    fn missing_components_are_kept_distinct() {
        let mut project = Fixture::named("com.example", "app").depends_on("bar", "foo");
        project.dependencies.push(DependencyRef {
            artifact_id: Some("foo".to_string()),
            ..Default::default()
        });

        let result = collect(&project);

        assert_eq!(strings(result.declared()), set(&["bar:foo", "null:foo"]));
    }

    #[test]
    fn duplicate_coordinates_with_different_versions_collapse() {
        let mut project = Fixture::named("com.example", "app");
        project
            .dependencies
            .push(DependencyRef::new("g", "a").with_version("1"));
        project
            .managed
            .push(DependencyRef::new("g", "a").with_version("2"));

        let result = collect(&project);

        assert_eq!(result.declared().len(), 1);
    }
}
