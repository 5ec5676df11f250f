//! Resolves the decoded blocks of a mod (dashboards, benchmarks, controls,
//! queries, variables) into a validated, cross-referenced resource graph.
//!

pub use modgraph_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use modgraph_internal::prelude::*;
}
