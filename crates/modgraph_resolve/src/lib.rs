//! Resource-graph resolution for modgraph (Layer 2).
//!
//! `modgraph_resolve` turns the decoded resources of a mod and its
//! dependency mods into a validated, cross-referenced graph:
//!
//! - [`inheritance`] - Applies `base` references field by field
//! - [`tree`] - Assembles parent/child edges and root-to-node paths
//! - [`runtime`] - Resolves runtime dependencies and orders them per dashboard
//! - [`diff`] - Compares two versions of a resource or store
//! - [`pipeline`] - Runs the stages in order for one load
//!
//! Every stage is a function of its input stores. Re-resolving after a
//! reload means calling it again with the new stores.
//!
//! # Example
//!
//! ```
//! use indexmap::IndexMap;
//! use modgraph_resolve::prelude::*;
//! use modgraph_resource::prelude::*;
//!
//! let mut m = Mod::new("m", DeclRange::line("mod.pp", 1));
//! m.add_resources([
//!     Dashboard::new("m", "d1", DeclRange::line("mod.pp", 3))
//!         .with_children(["m.chart.ch1"])
//!         .with_inputs(["m.input.i1"])
//!         .into(),
//!     DashboardPanel::new(PanelKind::Input, "m", "i1", DeclRange::line("mod.pp", 5))
//!         .scoped_to("m.dashboard.d1")
//!         .into(),
//!     {
//!         let range = DeclRange::line("mod.pp", 9);
//!         let mut chart = DashboardPanel::new(PanelKind::Chart, "m", "ch1", range)
//!             .with_sql("select * from t where region = $1");
//!         chart.source.args = Some(
//!             QueryArgs::new().with_positional(ArgValue::runtime("self.input.i1.value").unwrap()),
//!         );
//!         chart.into()
//!     },
//! ])
//! .unwrap();
//!
//! let resolved = resolve_mod(m, IndexMap::new(), &ResolveOptions::default()).unwrap();
//! let order = &resolved.runtime_orders["m.dashboard.d1"];
//! assert!(order.precedes("m.input.i1", "m.chart.ch1"));
//! ```
//!
//! # Architecture
//!
//! This crate is Layer 2:
//!
//! - **Layer 1** (`modgraph_core`, `modgraph_resource`): Infrastructure, resource model and store
//! - **Layer 2** (`modgraph_resolve`): Resolution stages (this crate)

/// Structural diffs.
pub mod diff;

/// Error types.
pub mod error;

/// Base-property inheritance.
pub mod inheritance;

/// The load pipeline.
pub mod pipeline;

/// Runtime-dependency validation.
pub mod runtime;

/// Tree assembly.
pub mod tree;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::diff::{DashboardTreeItemDiffs, Differ, ResourceMapsDiff, diff_resource_maps};
    pub use crate::error::{InheritanceError, ResolveError, RuntimeDependencyError, TreeError};
    pub use crate::inheritance::{InheritanceResolver, resolve_inheritance};
    pub use crate::pipeline::{ResolveOptions, ResolvedMod, resolve_mod};
    pub use crate::runtime::{
        DependencySource, ResolvedDependency, RuntimeDependencyOrder, validate_input_dependencies,
        validate_runtime_dependencies,
    };
    pub use crate::tree::{NodePath, ResourceTree, ResourceTreeBuilder, build_resource_tree};
}

pub use error::ResolveError;
pub use pipeline::{ResolveOptions, ResolvedMod, resolve_mod};
