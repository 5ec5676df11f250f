//! # Modgraph Internal Library
//!
//! Re-exports the modgraph crates for convenience.

/// Layer 1: Logging configuration.
pub use modgraph_core;

/// Layer 1: Resource model, names, requirements and the resource store.
pub use modgraph_resource;

/// Layer 2: Inheritance, tree assembly, runtime dependencies and diffs.
pub use modgraph_resolve;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use modgraph_core::{TracingConfig, TracingFormat};
    pub use modgraph_resolve::prelude::*;
    pub use modgraph_resource::prelude::*;
}
