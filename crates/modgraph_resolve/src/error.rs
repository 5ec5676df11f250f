//! Error types for the resolution stages.

use modgraph_resource::ResourceError;
use modgraph_resource::kind::ResourceKind;
use thiserror::Error;

/// Errors raised while resolving `base` references.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InheritanceError {
    /// The `base` names a resource that is not in the store.
    #[error("'{resource}' has unresolved base '{base}'")]
    UnresolvedBase {
        /// The resource declaring the base.
        resource: String,
        /// The base reference as written.
        base: String,
    },

    /// The `base` names a resource of a different kind.
    #[error("base '{base}' of '{resource}' is a {found}, expected a {expected}")]
    KindMismatch {
        /// The resource declaring the base.
        resource: String,
        /// The base reference as written.
        base: String,
        /// The kind of the resource.
        expected: ResourceKind,
        /// The kind the base reference names.
        found: ResourceKind,
    },

    /// The base chain loops back on itself.
    #[error("base chain of '{resource}' is cyclic: {}", .chain.join(" -> "))]
    Cycle {
        /// The resource whose chain was being resolved.
        resource: String,
        /// The chain, ending with the repeated name.
        chain: Vec<String>,
    },
}

/// Errors raised while assembling the resource tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A required mod is not among the loaded dependency mods.
    #[error("mod '{mod_name}' requires '{dependency}', which is not loaded")]
    DependencyNotLoaded {
        /// The mod declaring the requirement.
        mod_name: String,
        /// The required mod path.
        dependency: String,
    },

    /// Some resources name children that are not in the store.
    #[error("{} resources have unresolved children: {}", .resources.len(), .resources.join(", "))]
    UnresolvedChildren {
        /// The resources with at least one unresolved child.
        resources: Vec<String>,
    },

    /// A resource contains itself, directly or through its descendants.
    #[error("containment cycle: {}", .cycle.join(" -> "))]
    ContainmentCycle {
        /// The containment chain, ending with the repeated name.
        cycle: Vec<String>,
    },
}

/// Errors raised while validating a dashboard's runtime dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeDependencyError {
    /// The named dashboard is not in the store.
    #[error("dashboard '{0}' not found")]
    DashboardNotFound(String),

    /// A runtime dependency's property path matched nothing at its scope.
    #[error("cannot resolve runtime dependency '{path}' of '{resource}'")]
    UnresolvedSource {
        /// The resource owning the dependent argument.
        resource: String,
        /// The property path as written.
        path: String,
    },

    /// The dependency graph has no total order.
    #[error("runtime dependencies cannot be resolved for '{dashboard}': cycle through '{node}'")]
    Cycle {
        /// The dashboard being validated.
        dashboard: String,
        /// A node on the cycle.
        node: String,
    },
}

/// Any error raised while resolving a mod.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A registration or requirement error.
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// A base inheritance error.
    #[error(transparent)]
    Inheritance(#[from] InheritanceError),

    /// A tree assembly error.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// A runtime dependency error.
    #[error(transparent)]
    RuntimeDependency(#[from] RuntimeDependencyError),
}
