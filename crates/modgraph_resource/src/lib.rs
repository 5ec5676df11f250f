//! The resource model and store for modgraph (Layer 1).
//!
//! `modgraph_resource` defines the closed set of resource kinds a mod can
//! declare, the capability traits they share, and the store that owns them.
//! Relations between resources are fully-qualified names looked up in the
//! store, never references into it.
//!
//! # Core Concepts
//!
//! - [`Resource`](resource::Resource) - One variant per resource kind
//! - [`HclResource`](resource::HclResource) - Identity and metadata
//! - [`ModTreeItem`](resource::ModTreeItem) - Participation in the containment hierarchy
//! - [`QueryProvider`](resource::QueryProvider) - SQL, arguments, params and `with` blocks
//! - [`ResourceMaps`](store::ResourceMaps) - Every resource of a mod, by kind and name
//! - [`Mod`](mod_definition::Mod) - A configuration unit with its requirements
//! - [`ToDynamicValue`](dynamic::ToDynamicValue) - Conversion for the expression evaluator
//!
//! # Example
//!
//! ```
//! use modgraph_resource::prelude::*;
//!
//! let mut m = Mod::new("m", DeclRange::line("mod.pp", 1));
//! m.add_resource(
//!     Benchmark::new("m", "b1", DeclRange::line("mod.pp", 3))
//!         .with_children(["m.control.c1"])
//!         .into(),
//! )
//! .unwrap();
//! m.add_resource(
//!     Control::new("m", "c1", DeclRange::line("mod.pp", 7))
//!         .with_sql("select 1")
//!         .into(),
//! )
//! .unwrap();
//!
//! let b1 = m.resources.get("benchmark.b1").unwrap();
//! assert_eq!(b1.child_names(), ["m.control.c1"]);
//! ```
//!
//! # Architecture
//!
//! This crate is part of Layer 1:
//!
//! - **Layer 1** (`modgraph_core`, `modgraph_resource`): Infrastructure, resource model and store
//! - **Layer 2** (`modgraph_resolve`): Inheritance, tree assembly, runtime dependencies and diffs

/// Conversion of resources to dynamic values.
pub mod dynamic;

/// Error types.
pub mod error;

/// Resource and panel kinds.
pub mod kind;

/// The mod container.
pub mod mod_definition;

/// Resource names and property paths.
pub mod name;

/// Declaration source ranges.
pub mod range;

/// Recorded references between resources.
pub mod reference;

/// Mod requirements and version constraints.
pub mod require;

/// Resource variants and capability traits.
pub mod resource;

/// Runtime dependency types.
pub mod runtime;

/// The resource store.
pub mod store;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::dynamic::{DynamicType, DynamicValue, ToDynamicValue};
    pub use crate::error::{DynamicValueError, ResourceError};
    pub use crate::kind::{PanelKind, ResourceKind};
    pub use crate::mod_definition::Mod;
    pub use crate::name::{ParsedPropertyPath, ParsedResourceName};
    pub use crate::range::{DeclRange, Pos};
    pub use crate::reference::ResourceReference;
    pub use crate::require::{
        ModDependencyPath, ModVersionConstraint, PluginVersion, Require, Version,
        VersionRequirement,
    };
    pub use crate::resource::{
        ArgValue, Benchmark, CategoryDef, ColumnDef, Control, Dashboard, DashboardPanel,
        HclResource, Inherit, InputOption, Local, ModTreeItem, PanelAttributes, ParamDef, Query,
        QueryArgs, QueryProvider, QuerySource, Resource, ResourceHeader, SeriesDef, Variable,
    };
    pub use crate::runtime::{ArgTarget, RuntimeDependency};
    pub use crate::store::{ResourceMaps, ResourceMapsProvider};
}

pub use error::{DynamicValueError, ResourceError};
pub use mod_definition::Mod;
pub use resource::Resource;
pub use store::ResourceMaps;
