//! Tree assembly: parent/child edges across a mod and its dependency mods.
//!
//! The containment hierarchy is a DAG, not a tree: a control listed in two
//! benchmarks has two parents and one path per parent. Edges are held by
//! name in a [`ResourceTree`] built once all participating stores are final.
//!
//! # Shape
//!
//! - Declared children (benchmark `children`, dashboard and container
//!   children, the nodes and edges of flows, graphs and hierarchies) are
//!   linked under their declaring resource.
//! - Dashboard inputs and `with` blocks are linked under their owner.
//! - Resources without a parent in their own mod are linked under the mod.
//! - Each required mod is linked under the mod requiring it.
//!
//! Leaf paths are computed during assembly; paths of inner nodes are
//! computed on first read and cached.
//!
//! # Example
//!
//! ```
//! use indexmap::IndexMap;
//! use modgraph_resolve::tree::build_resource_tree;
//! use modgraph_resource::prelude::*;
//!
//! let mut m = Mod::new("m", DeclRange::line("mod.pp", 1));
//! m.add_resources([
//!     Benchmark::new("m", "b1", DeclRange::line("mod.pp", 3))
//!         .with_children(["m.control.c1"])
//!         .into(),
//!     Control::new("m", "c1", DeclRange::line("mod.pp", 7)).with_sql("select 1").into(),
//! ])
//! .unwrap();
//!
//! let tree = build_resource_tree(&m, &IndexMap::new()).unwrap();
//! assert_eq!(tree.children("m.benchmark.b1"), ["m.control.c1"]);
//! assert_eq!(tree.parents("m.control.c1"), ["m.benchmark.b1"]);
//! ```

use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};
use indexmap::IndexMap;
use modgraph_resource::prelude::*;
use parking_lot::RwLock;

use crate::error::TreeError;

/// One root-to-node sequence of fully-qualified names.
pub type NodePath = Vec<String>;

/// Builds the tree of `root` and, transitively, every mod it requires.
///
/// `loaded` holds the dependency mods keyed by the path they are required by.
///
/// # Errors
///
/// - [`TreeError::DependencyNotLoaded`] when a required mod is not in `loaded`
/// - [`TreeError::UnresolvedChildren`] naming every resource with a missing child
/// - [`TreeError::ContainmentCycle`] when a resource contains itself
pub fn build_resource_tree(
    root: &Mod,
    loaded: &IndexMap<String, Mod>,
) -> Result<ResourceTree, TreeError> {
    ResourceTreeBuilder::new(root, loaded).build()
}

// ─────────────────────────────────────────────────────────────────────────────
// ResourceTreeBuilder
// ─────────────────────────────────────────────────────────────────────────────

/// Configurable tree assembly.
#[derive(Debug, Clone, Copy)]
pub struct ResourceTreeBuilder<'a> {
    root: &'a Mod,
    loaded: &'a IndexMap<String, Mod>,
    skip_missing_dependencies: bool,
}

impl<'a> ResourceTreeBuilder<'a> {
    /// Creates a builder for `root` with dependency mods `loaded`.
    #[must_use]
    pub fn new(root: &'a Mod, loaded: &'a IndexMap<String, Mod>) -> Self {
        Self {
            root,
            loaded,
            skip_missing_dependencies: false,
        }
    }

    /// Skips required mods that are not loaded instead of failing.
    #[must_use]
    pub fn skip_missing_dependencies(mut self, skip: bool) -> Self {
        self.skip_missing_dependencies = skip;
        self
    }

    /// Assembles the tree.
    ///
    /// # Errors
    ///
    /// See [`build_resource_tree`].
    pub fn build(&self) -> Result<ResourceTree, TreeError> {
        let _span =
            tracing::debug_span!("build_resource_tree", mod_name = %self.root.name()).entered();

        let mods = self.collect_mods()?;
        let stores: HashMap<&str, &ResourceMaps> =
            mods.iter().map(|(_, m)| (m.resources.mod_name.as_str(), &m.resources)).collect();

        let mut tree = ResourceTree::new(self.root.name());
        for (parent, m) in &mods {
            if let Some(parent) = parent {
                tree.add_edge(parent, m.name());
            }
        }

        let mut unresolved: Vec<String> = Vec::new();
        for (_, m) in &mods {
            let mut has_parent_in_mod: HashSet<String> = HashSet::new();
            for resource in m.resources.iter() {
                let Some(item) = resource.as_tree_item() else {
                    continue;
                };
                for child in item.tree_child_names() {
                    match resolve_child(&stores, &m.resources.mod_name, child) {
                        Some(child) => {
                            if child.header().mod_name == m.resources.mod_name {
                                has_parent_in_mod.insert(child.name().to_string());
                            }
                            tree.add_edge(resource.name(), child.name());
                        }
                        None => {
                            tracing::debug!(resource = resource.name(), child, "unresolved child");
                            if !unresolved.iter().any(|r| r == resource.name()) {
                                unresolved.push(resource.name().to_string());
                            }
                        }
                    }
                }
            }

            for resource in m.resources.iter() {
                if resource.kind().is_tree_item() && !has_parent_in_mod.contains(resource.name()) {
                    tree.add_edge(m.name(), resource.name());
                }
            }
        }

        if !unresolved.is_empty() {
            return Err(TreeError::UnresolvedChildren { resources: unresolved });
        }
        tree.check_acyclic()?;

        let leaves: Vec<String> = tree
            .parents
            .keys()
            .filter(|name| tree.children(name).is_empty())
            .cloned()
            .collect();
        for leaf in &leaves {
            tree.set_paths(leaf);
        }

        tracing::info!(
            mod_name = %self.root.name(),
            mods = mods.len(),
            nodes = tree.len(),
            "resource tree built"
        );
        Ok(tree)
    }

    /// The root mod and every transitively required mod, each with the name
    /// of the mod that first required it.
    fn collect_mods(&self) -> Result<Vec<(Option<String>, &'a Mod)>, TreeError> {
        let mut mods = vec![(None, self.root)];
        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(self.root.name().to_string());
        let mut queue = VecDeque::from([self.root]);

        while let Some(current) = queue.pop_front() {
            for requirement in &current.require.mods {
                let Some(dependency) = self.loaded.get(&requirement.name) else {
                    if self.skip_missing_dependencies {
                        tracing::warn!(
                            mod_name = %current.name(),
                            dependency = %requirement.name,
                            "dependency mod not loaded"
                        );
                        continue;
                    }
                    return Err(TreeError::DependencyNotLoaded {
                        mod_name: current.name().to_string(),
                        dependency: requirement.name.clone(),
                    });
                };
                if seen.insert(dependency.name().to_string()) {
                    mods.push((Some(current.name().to_string()), dependency));
                    queue.push_back(dependency);
                }
            }
        }
        Ok(mods)
    }
}

/// Looks a child name up in the store of the mod it names, qualifying
/// unqualified names with `owner_mod`.
fn resolve_child<'s>(
    stores: &HashMap<&str, &'s ResourceMaps>,
    owner_mod: &str,
    child: &str,
) -> Option<&'s Resource> {
    let parsed = ParsedResourceName::parse(child).ok()?.qualified(owner_mod);
    let store = stores.get(parsed.mod_name.as_deref()?)?;
    store.get(&parsed.full_name(owner_mod))
}

// ─────────────────────────────────────────────────────────────────────────────
// ResourceTree
// ─────────────────────────────────────────────────────────────────────────────

/// Parent/child edges between resources and mods, by fully-qualified name.
#[derive(Debug)]
pub struct ResourceTree {
    root: String,
    parents: IndexMap<String, Vec<String>>,
    children: IndexMap<String, Vec<String>>,
    paths: RwLock<HashMap<String, Vec<NodePath>>>,
}

impl ResourceTree {
    fn new(root: &str) -> Self {
        let mut parents = IndexMap::new();
        parents.insert(root.to_string(), Vec::new());
        Self {
            root: root.to_string(),
            parents,
            children: IndexMap::new(),
            paths: RwLock::new(HashMap::new()),
        }
    }

    fn add_edge(&mut self, parent: &str, child: &str) {
        let children = self.children.entry(parent.to_string()).or_default();
        if children.iter().any(|c| c == child) {
            return;
        }
        children.push(child.to_string());
        self.parents.entry(parent.to_string()).or_default();
        self.parents.entry(child.to_string()).or_default().push(parent.to_string());
    }

    /// Name of the root mod, e.g. `mod.m`.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Returns `true` if `name` is a node of the tree.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.parents.contains_key(name)
    }

    /// Number of nodes, mods included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Returns `true` if the tree holds only its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parents.len() <= 1
    }

    /// Every node name.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.parents.keys().map(String::as_str)
    }

    /// Parents of `name`, in the order they were linked.
    #[must_use]
    pub fn parents(&self, name: &str) -> &[String] {
        self.parents.get(name).map_or(&[], Vec::as_slice)
    }

    /// Children of `name`, in declaration order.
    #[must_use]
    pub fn children(&self, name: &str) -> &[String] {
        self.children.get(name).map_or(&[], Vec::as_slice)
    }

    /// Every root-to-node path of `name`; empty for unknown names.
    ///
    /// The root's only path is `[[root]]`; any other node's paths are its
    /// parents' paths extended with its own name.
    #[must_use]
    pub fn paths(&self, name: &str) -> Vec<NodePath> {
        if let Some(cached) = self.paths.read().get(name) {
            return cached.clone();
        }
        if !self.contains(name) {
            return Vec::new();
        }

        let computed = if name == self.root {
            vec![vec![self.root.clone()]]
        } else {
            let mut paths: Vec<NodePath> = Vec::new();
            for parent in self.parents(name) {
                for mut path in self.paths(parent) {
                    path.push(name.to_string());
                    if !paths.contains(&path) {
                        paths.push(path);
                    }
                }
            }
            paths
        };

        self.paths.write().insert(name.to_string(), computed.clone());
        computed
    }

    fn set_paths(&self, name: &str) {
        let _ = self.paths(name);
    }

    /// Returns `true` once the paths of `name` have been computed.
    #[must_use]
    pub fn has_cached_paths(&self, name: &str) -> bool {
        self.paths.read().contains_key(name)
    }

    /// Rejects containment cycles with a colored depth-first walk over every node.
    fn check_acyclic(&self) -> Result<(), TreeError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }

        let mut marks: HashMap<&str, Mark> = HashMap::new();
        for start in self.parents.keys() {
            if marks.contains_key(start.as_str()) {
                continue;
            }
            // (node, index of the next child to visit)
            let mut stack: Vec<(&str, usize)> = vec![(start.as_str(), 0)];
            marks.insert(start.as_str(), Mark::Visiting);

            while let Some((node, next)) = stack.last_mut() {
                let node: &str = *node;
                let Some(child) = self.children(node).get(*next) else {
                    marks.insert(node, Mark::Done);
                    stack.pop();
                    continue;
                };
                *next += 1;
                match marks.get(child.as_str()) {
                    Some(Mark::Done) => {}
                    Some(Mark::Visiting) => {
                        let from =
                            stack.iter().position(|(n, _)| *n == child.as_str()).unwrap_or(0);
                        let mut cycle: Vec<String> =
                            stack[from..].iter().map(|(n, _)| (*n).to_string()).collect();
                        cycle.push(child.clone());
                        return Err(TreeError::ContainmentCycle { cycle });
                    }
                    None => {
                        marks.insert(child.as_str(), Mark::Visiting);
                        stack.push((child.as_str(), 0));
                    }
                }
            }
        }
        Ok(())
    }
}
