//! Runtime-dependency validation.
//!
//! Arguments and parameter defaults may reference values only known when a
//! dashboard runs: an input's value, a `with` block's rows, a parameter.
//! Before a dashboard executes, every such reference is resolved to its
//! source and the dependencies are checked for a total evaluation order.
//!
//! The graph is seeded with a synthetic root. Each dependent resource hangs
//! off the root and points at one node per dependency, keyed
//! `arg.<index-or-name>-><property-path>`, which in turn points at the
//! resource providing the value. Any cycle is reported by the topological
//! sort and fails only the dashboard being validated.
//!
//! # Source resolution
//!
//! 1. `with.*` paths resolve against the dependent resource's own `with` blocks.
//! 2. `self.input.*` paths resolve against the enclosing dashboard's inputs.
//! 3. `param.*` paths resolve against the dependent resource's own parameters.
//! 4. Any other input path resolves against the mod's global inputs.
//!
//! A path that matches nothing at its scope is an error.

use hashbrown::{HashMap, HashSet};
use indexmap::IndexSet;
use modgraph_resource::prelude::*;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::RuntimeDependencyError;

const ROOT_NODE: &str = "__root__";

// ─────────────────────────────────────────────────────────────────────────────
// Public types
// ─────────────────────────────────────────────────────────────────────────────

/// Where a runtime dependency's value comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DependencySource {
    /// A dashboard input, by fully-qualified name.
    Input(String),
    /// A `with` block, by fully-qualified name.
    With(String),
    /// A parameter of the dependent resource, by name.
    Param(String),
}

impl DependencySource {
    /// The providing resource's name; `None` for parameters.
    #[must_use]
    pub fn resource_name(&self) -> Option<&str> {
        match self {
            DependencySource::Input(name) | DependencySource::With(name) => Some(name),
            DependencySource::Param(_) => None,
        }
    }
}

/// A runtime dependency together with its resolved source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    /// The dependency as extracted from the resource.
    pub dependency: RuntimeDependency,
    /// Where its value comes from.
    pub source: DependencySource,
}

/// The outcome of validating a dashboard's runtime dependencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeDependencyOrder {
    /// The validated dashboard.
    pub dashboard: String,
    /// Every runtime dependency under the dashboard, resolved.
    pub dependencies: Vec<ResolvedDependency>,
    /// Resources taking part in a dependency, sources before dependents.
    pub order: Vec<String>,
}

impl RuntimeDependencyOrder {
    /// Position of `name` in the evaluation order.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.order.iter().position(|n| n == name)
    }

    /// Returns `true` if `first` is evaluated before `second`.
    #[must_use]
    pub fn precedes(&self, first: &str, second: &str) -> bool {
        match (self.position(first), self.position(second)) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }

    /// The resolved dependencies of `owner`.
    pub fn dependencies_of<'a>(
        &'a self,
        owner: &'a str,
    ) -> impl Iterator<Item = &'a ResolvedDependency> {
        self.dependencies.iter().filter(move |d| d.dependency.owner == owner)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Validation
// ─────────────────────────────────────────────────────────────────────────────

/// Resolves and orders the runtime dependencies of everything under `dashboard`.
///
/// # Errors
///
/// - [`RuntimeDependencyError::DashboardNotFound`] if `dashboard` is not in `maps`
/// - [`RuntimeDependencyError::UnresolvedSource`] for a path matching nothing
/// - [`RuntimeDependencyError::Cycle`] if the dependencies have no total order
pub fn validate_runtime_dependencies(
    dashboard: &str,
    maps: &ResourceMaps,
) -> Result<RuntimeDependencyOrder, RuntimeDependencyError> {
    let _span = tracing::debug_span!("validate_runtime_dependencies", dashboard).entered();

    let scope = DashboardScope::new(dashboard, maps)?;
    let mut graph = DependencyGraph::new();
    let mut dependencies = Vec::new();

    let mut pending: Vec<&Resource> = scope.members();
    let mut walked: HashSet<&str> = HashSet::new();
    while let Some(resource) = pending.pop() {
        if !walked.insert(resource.name()) {
            continue;
        }
        let Some(provider) = resource.as_query_provider() else {
            continue;
        };
        for dependency in provider.runtime_dependencies() {
            let source = scope.resolve_source(provider, &dependency)?;
            let key = dependency.to_string();
            graph.add_edge(ROOT_NODE, provider.name());
            graph.add_edge(provider.name(), &key);
            if let Some(source_name) = source.resource_name() {
                graph.add_edge(&key, source_name);
                // global inputs live outside the dashboard but may depend on each other
                if let Some(source_resource) = maps.get(source_name) {
                    pending.push(source_resource);
                }
            }
            tracing::trace!(owner = provider.name(), %key, ?source, "runtime dependency");
            dependencies.push(ResolvedDependency { dependency, source });
        }
    }

    let order = graph
        .evaluation_order()
        .map_err(|node| RuntimeDependencyError::Cycle {
            dashboard: dashboard.to_string(),
            node,
        })?
        .into_iter()
        .filter(|name| maps.contains(name))
        .collect();

    tracing::debug!(dashboard, dependencies = dependencies.len(), "runtime dependencies validated");
    Ok(RuntimeDependencyOrder {
        dashboard: dashboard.to_string(),
        dependencies,
        order,
    })
}

/// Orders the inputs of `dashboard` by their dependencies on each other.
///
/// Only input-to-input edges are considered, so inputs can be evaluated
/// independently of the panels that consume them.
///
/// # Errors
///
/// As for [`validate_runtime_dependencies`].
pub fn validate_input_dependencies(
    dashboard: &str,
    maps: &ResourceMaps,
) -> Result<Vec<String>, RuntimeDependencyError> {
    let scope = DashboardScope::new(dashboard, maps)?;
    let mut graph = DependencyGraph::new();

    for input in scope.inputs.iter().filter_map(|name| maps.get(name)) {
        graph.add_edge(ROOT_NODE, input.name());
        let Some(provider) = input.as_query_provider() else {
            continue;
        };
        for dependency in provider.runtime_dependencies() {
            if let DependencySource::Input(source) = scope.resolve_source(provider, &dependency)? {
                graph.add_edge(input.name(), &source);
            }
        }
    }

    graph.evaluation_order().map_err(|node| RuntimeDependencyError::Cycle {
        dashboard: dashboard.to_string(),
        node,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Internals
// ─────────────────────────────────────────────────────────────────────────────

/// The resources of one dashboard and the inputs visible to it.
struct DashboardScope<'a> {
    dashboard: &'a Dashboard,
    maps: &'a ResourceMaps,
    inputs: IndexSet<String>,
}

impl<'a> DashboardScope<'a> {
    fn new(name: &str, maps: &'a ResourceMaps) -> Result<Self, RuntimeDependencyError> {
        let dashboard = maps
            .get(name)
            .and_then(Resource::as_dashboard)
            .ok_or_else(|| RuntimeDependencyError::DashboardNotFound(name.to_string()))?;

        let mut inputs: IndexSet<String> = dashboard.inputs.iter().cloned().collect();
        inputs.extend(maps.dashboard_inputs(dashboard.name()).map(|i| i.name().to_string()));
        Ok(Self { dashboard, maps, inputs })
    }

    /// Every resource under the dashboard: its inputs, `with` blocks and
    /// panels, recursively.
    fn members(&self) -> Vec<&'a Resource> {
        let mut members = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut stack: Vec<String> = self.inputs.iter().cloned().collect();
        stack.extend(self.dashboard.tree_child_names().into_iter().map(str::to_string));

        while let Some(name) = stack.pop() {
            let Some(resource) = self.maps.get(&name) else {
                tracing::debug!(
                    dashboard = self.dashboard.name(),
                    name = %name,
                    "skipping unknown child"
                );
                continue;
            };
            if !seen.insert(resource.name()) {
                continue;
            }
            if let Some(item) = resource.as_tree_item() {
                stack.extend(item.tree_child_names().into_iter().map(str::to_string));
            }
            members.push(resource);
        }
        members
    }

    fn resolve_source(
        &self,
        owner: &dyn QueryProvider,
        dependency: &RuntimeDependency,
    ) -> Result<DependencySource, RuntimeDependencyError> {
        let path = &dependency.property_path;
        let unresolved = || RuntimeDependencyError::UnresolvedSource {
            resource: owner.name().to_string(),
            path: path.to_string(),
        };
        let mod_name = &owner.header().mod_name;

        if path.is_with() {
            let name = path.to_full_name(mod_name).ok_or_else(unresolved)?;
            return if owner.query_source().has_with(&name) {
                Ok(DependencySource::With(name))
            } else {
                Err(unresolved())
            };
        }
        if path.is_param() {
            return match owner.query_source().param(&path.name) {
                Some(param) => Ok(DependencySource::Param(param.name.clone())),
                None => Err(unresolved()),
            };
        }
        if path.is_input() {
            let name = path.to_full_name(mod_name).ok_or_else(unresolved)?;
            let in_scope = if path.is_self_scoped() {
                self.inputs.contains(&name)
            } else {
                self.maps.global_inputs().any(|i| i.name() == name)
            };
            return if in_scope {
                Ok(DependencySource::Input(name))
            } else {
                Err(unresolved())
            };
        }
        Err(unresolved())
    }
}

/// A string-keyed directed graph over petgraph.
struct DependencyGraph {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    fn new() -> Self {
        let mut graph = Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
        };
        graph.node(ROOT_NODE);
        graph
    }

    fn node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    fn add_edge(&mut self, from: &str, to: &str) {
        let from = self.node(from);
        let to = self.node(to);
        self.graph.update_edge(from, to, ());
    }

    /// Node names with every edge target before its source, root excluded.
    ///
    /// On a cycle, returns the name of a node on it.
    fn evaluation_order(&self) -> Result<Vec<String>, String> {
        let sorted =
            toposort(&self.graph, None).map_err(|cycle| self.graph[cycle.node_id()].clone())?;
        Ok(sorted
            .into_iter()
            .rev()
            .map(|idx| self.graph[idx].clone())
            .filter(|name| name != ROOT_NODE)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn at(line: usize) -> DeclRange {
        DeclRange::line("dashboard.pp", line)
    }

    fn positional(path: &str) -> Option<QueryArgs> {
        Some(QueryArgs::new().with_positional(ArgValue::runtime(path).unwrap()))
    }

    fn named(name: &str, path: &str) -> Option<QueryArgs> {
        Some(QueryArgs::new().with_named(name, ArgValue::runtime(path).unwrap()))
    }

    fn input(name: &str, depends_on: Option<&str>) -> DashboardPanel {
        let mut panel =
            DashboardPanel::new(PanelKind::Input, "m", name, at(1)).scoped_to("m.dashboard.d1");
        if let Some(path) = depends_on {
            panel.source.args = positional(path);
        }
        panel
    }

    fn dashboard(children: &[&str], inputs: &[&str]) -> Resource {
        Dashboard::new("m", "d1", at(1))
            .with_children(children.iter().copied())
            .with_inputs(inputs.iter().copied())
            .into()
    }

    #[test]
    fn unknown_dashboard() {
        let maps = ResourceMaps::new("m");
        assert_eq!(
            validate_runtime_dependencies("m.dashboard.nope", &maps),
            Err(RuntimeDependencyError::DashboardNotFound("m.dashboard.nope".into()))
        );
    }

    #[test]
    fn with_paths_only_resolve_against_own_withs() {
        let mut owning = DashboardPanel::new(PanelKind::Table, "m", "owning", at(2));
        owning.source.withs = vec!["m.with.w1".into()];
        owning.source.args = named("ids", "with.w1.rows");
        let mut other = DashboardPanel::new(PanelKind::Table, "m", "other", at(3));
        other.source.args = named("ids", "with.w1.rows");

        let mut maps = ResourceMaps::new("m");
        maps.add_all([
            dashboard(&["m.table.owning"], &[]),
            owning.into(),
            DashboardPanel::new(PanelKind::With, "m", "w1", at(4)).with_sql("select 1").into(),
        ])
        .unwrap();

        let order = validate_runtime_dependencies("m.dashboard.d1", &maps).unwrap();
        assert!(order.precedes("m.with.w1", "m.table.owning"));

        maps.add(other.into()).unwrap();
        maps.get_mut("m.dashboard.d1")
            .and_then(|d| match d {
                Resource::Dashboard(d) => Some(d),
                _ => None,
            })
            .unwrap()
            .children
            .push("m.table.other".into());
        assert_eq!(
            validate_runtime_dependencies("m.dashboard.d1", &maps),
            Err(RuntimeDependencyError::UnresolvedSource {
                resource: "m.table.other".into(),
                path: "with.w1.rows".into(),
            })
        );
    }

    #[test]
    fn params_resolve_against_the_owner() {
        let mut table = DashboardPanel::new(PanelKind::Table, "m", "t", at(2));
        table.source.params = vec![ParamDef::new("limit").with_default(json!(10))];
        table.source.args = positional("param.limit");

        let mut maps = ResourceMaps::new("m");
        maps.add_all([dashboard(&["m.table.t"], &[]), table.into()]).unwrap();

        let order = validate_runtime_dependencies("m.dashboard.d1", &maps).unwrap();
        let deps: Vec<_> = order.dependencies_of("m.table.t").collect();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].source, DependencySource::Param("limit".into()));
    }

    #[test]
    fn self_scope_does_not_see_global_inputs() {
        let mut chart = DashboardPanel::new(PanelKind::Chart, "m", "ch", at(2));
        chart.source.args = positional("self.input.g.value");

        let mut maps = ResourceMaps::new("m");
        maps.add_all([
            dashboard(&["m.chart.ch"], &[]),
            chart.into(),
            DashboardPanel::new(PanelKind::Input, "m", "g", at(3)).into(),
        ])
        .unwrap();

        assert!(matches!(
            validate_runtime_dependencies("m.dashboard.d1", &maps),
            Err(RuntimeDependencyError::UnresolvedSource { .. })
        ));
    }

    #[test]
    fn global_input_chains_are_followed() {
        let mut chart = DashboardPanel::new(PanelKind::Chart, "m", "ch", at(2));
        chart.source.args = positional("input.a.value");
        let mut a = DashboardPanel::new(PanelKind::Input, "m", "a", at(3));
        a.source.args = positional("input.b.value");
        let b = DashboardPanel::new(PanelKind::Input, "m", "b", at(4));

        let mut maps = ResourceMaps::new("m");
        maps.add_all([dashboard(&["m.chart.ch"], &[]), chart.into(), a.into(), b.into()])
            .unwrap();

        let order = validate_runtime_dependencies("m.dashboard.d1", &maps).unwrap();
        assert_eq!(order.order, ["m.input.b", "m.input.a", "m.chart.ch"]);
    }

    #[test]
    fn input_cycles_fail_both_validations() {
        let mut maps = ResourceMaps::new("m");
        maps.add_all([
            dashboard(&[], &["m.input.i1", "m.input.i2"]),
            input("i1", Some("self.input.i2.value")).into(),
            input("i2", Some("self.input.i1.value")).into(),
        ])
        .unwrap();

        assert!(matches!(
            validate_runtime_dependencies("m.dashboard.d1", &maps),
            Err(RuntimeDependencyError::Cycle { .. })
        ));
        assert!(matches!(
            validate_input_dependencies("m.dashboard.d1", &maps),
            Err(RuntimeDependencyError::Cycle { .. })
        ));
    }

    #[test]
    fn independent_inputs_are_orderable() {
        let mut maps = ResourceMaps::new("m");
        maps.add_all([
            dashboard(&[], &["m.input.i1", "m.input.i2"]),
            input("i1", None).into(),
            input("i2", Some("self.input.i1.value")).into(),
        ])
        .unwrap();

        let order = validate_input_dependencies("m.dashboard.d1", &maps).unwrap();
        let i1 = order.iter().position(|n| n == "m.input.i1").unwrap();
        let i2 = order.iter().position(|n| n == "m.input.i2").unwrap();
        assert!(i1 < i2);
    }
}
