//! The load pipeline: inheritance, tree assembly and dashboard validation
//! for a root mod and its dependency mods.
//!
//! Each stage reads the fully converged output of the previous one: every
//! base is applied in every mod before the tree reads children (which may
//! themselves be inherited), and the tree is complete before dashboards are
//! validated against the merged store.
//!
//! # Example
//!
//! ```
//! use indexmap::IndexMap;
//! use modgraph_resolve::pipeline::{ResolveOptions, resolve_mod};
//! use modgraph_resource::prelude::*;
//!
//! let mut m = Mod::new("m", DeclRange::line("mod.pp", 1));
//! let control = Control::new("m", "c1", DeclRange::line("mod.pp", 3)).with_sql("select 1");
//! m.add_resource(control.into()).unwrap();
//!
//! let resolved = resolve_mod(m, IndexMap::new(), &ResolveOptions::default()).unwrap();
//! assert_eq!(resolved.tree.parents("m.control.c1"), ["mod.m"]);
//! ```

use indexmap::IndexMap;
use modgraph_resource::prelude::*;

use crate::error::{ResolveError, RuntimeDependencyError};
use crate::inheritance::InheritanceResolver;
use crate::runtime::{RuntimeDependencyOrder, validate_runtime_dependencies};
use crate::tree::{ResourceTree, ResourceTreeBuilder};

/// Options for [`resolve_mod`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Validate the runtime dependencies of every dashboard.
    pub validate_dashboards: bool,
    /// Fail when a required mod is not loaded, instead of skipping it.
    pub require_loaded_dependencies: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            validate_dashboards: true,
            require_loaded_dependencies: true,
        }
    }
}

impl ResolveOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether dashboards are validated.
    #[must_use]
    pub fn with_validate_dashboards(mut self, validate: bool) -> Self {
        self.validate_dashboards = validate;
        self
    }

    /// Sets whether missing dependency mods are an error.
    #[must_use]
    pub fn with_require_loaded_dependencies(mut self, require: bool) -> Self {
        self.require_loaded_dependencies = require;
        self
    }
}

/// A fully resolved mod.
#[derive(Debug)]
pub struct ResolvedMod {
    /// The root mod, bases applied.
    pub root: Mod,
    /// The dependency mods by required path, bases applied.
    pub dependencies: IndexMap<String, Mod>,
    /// The root's resources merged with those of its dependencies.
    pub resources: ResourceMaps,
    /// The containment tree.
    pub tree: ResourceTree,
    /// Evaluation orders of the dashboards that validated.
    pub runtime_orders: IndexMap<String, RuntimeDependencyOrder>,
    /// Errors of the dashboards that failed validation.
    pub dashboard_errors: IndexMap<String, RuntimeDependencyError>,
}

impl ResolvedMod {
    /// Returns `true` if `dashboard` validated.
    #[must_use]
    pub fn is_dashboard_valid(&self, dashboard: &str) -> bool {
        self.runtime_orders.contains_key(dashboard)
    }
}

/// Resolves `root` against its loaded dependency mods.
///
/// `dependencies` is keyed by the path each mod is required by. A failing
/// dashboard does not fail the load; its error is recorded in
/// [`ResolvedMod::dashboard_errors`].
///
/// # Errors
///
/// Returns the first requirement, inheritance or tree error.
pub fn resolve_mod(
    root: Mod,
    dependencies: IndexMap<String, Mod>,
    options: &ResolveOptions,
) -> Result<ResolvedMod, ResolveError> {
    let _span = tracing::info_span!("resolve_mod", mod_name = %root.name()).entered();

    root.require.validate()?;
    for dependency in dependencies.values() {
        dependency.require.validate()?;
    }

    let dependencies = resolve_dependency_bases(dependencies)?;
    let dependency_stores: Vec<&ResourceMaps> =
        dependencies.values().map(|m| &m.resources).collect();
    let mut root = root;
    root.resources = InheritanceResolver::new(&root.resources)
        .with_dependencies(&dependency_stores)
        .resolve()?;

    let tree = ResourceTreeBuilder::new(&root, &dependencies)
        .skip_missing_dependencies(!options.require_loaded_dependencies)
        .build()?;

    let mut sources = vec![&root.resources];
    sources.extend(dependency_stores.iter().copied());
    let resources = ResourceMaps::merge(&sources);

    let mut runtime_orders = IndexMap::new();
    let mut dashboard_errors = IndexMap::new();
    if options.validate_dashboards {
        for dashboard in resources.names_of(ResourceKind::Dashboard) {
            match validate_runtime_dependencies(dashboard, &resources) {
                Ok(order) => {
                    runtime_orders.insert(dashboard.to_string(), order);
                }
                Err(err) => {
                    tracing::warn!(dashboard, error = %err, "dashboard failed validation");
                    dashboard_errors.insert(dashboard.to_string(), err);
                }
            }
        }
    }

    tracing::info!(
        resources = resources.len(),
        dashboards = runtime_orders.len(),
        failed_dashboards = dashboard_errors.len(),
        "mod resolved"
    );
    Ok(ResolvedMod {
        root,
        dependencies,
        resources,
        tree,
        runtime_orders,
        dashboard_errors,
    })
}

/// Applies bases within every dependency mod, looking bases up across all of them.
fn resolve_dependency_bases(
    dependencies: IndexMap<String, Mod>,
) -> Result<IndexMap<String, Mod>, ResolveError> {
    let resolved_stores = {
        let stores: Vec<&ResourceMaps> = dependencies.values().map(|m| &m.resources).collect();
        dependencies
            .values()
            .map(|m| InheritanceResolver::new(&m.resources).with_dependencies(&stores).resolve())
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(dependencies
        .into_iter()
        .zip(resolved_stores)
        .map(|((path, mut m), resources)| {
            m.resources = resources;
            (path, m)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate_everything() {
        let options = ResolveOptions::default();
        assert!(options.validate_dashboards);
        assert!(options.require_loaded_dependencies);

        let relaxed = ResolveOptions::new()
            .with_validate_dashboards(false)
            .with_require_loaded_dependencies(false);
        assert!(!relaxed.validate_dashboards && !relaxed.require_loaded_dependencies);
    }

    #[test]
    fn duplicate_requirements_fail_the_load() {
        let require = Require::new()
            .with_mod(ModVersionConstraint::parse("github.com/x/dep@1").unwrap())
            .with_mod(ModVersionConstraint::parse("github.com/x/dep@2").unwrap());
        let m = Mod::new("m", DeclRange::default()).with_require(require);

        assert!(matches!(
            resolve_mod(m, IndexMap::new(), &ResolveOptions::default()),
            Err(ResolveError::Resource(ResourceError::DuplicateModDependency(_)))
        ));
    }
}
