//! Core infrastructure for modgraph.
//!
//! This crate carries the ambient pieces every embedding application needs
//! before it starts loading mods:
//!
//! - [`TracingConfig`] - Logging and observability via the `tracing` crate
//! - [`TracingFormat`] - Output format selection for the subscriber
//!
//! # Example
//!
//! ```
//! use modgraph_core::{TracingConfig, TracingFormat};
//! use tracing::Level;
//!
//! TracingConfig::default()
//!     .with_level(Level::DEBUG)
//!     .with_format(TracingFormat::Compact)
//!     .init();
//! ```
//!
//! # Architecture
//!
//! This crate is part of Layer 1 infrastructure:
//!
//! - **Layer 1** (`modgraph_core`, `modgraph_resource`): Infrastructure, resource model and store
//! - **Layer 2** (`modgraph_resolve`): Inheritance, tree assembly, runtime dependencies and diffs

mod tracing_config;

pub use tracing_config::{TracingConfig, TracingFormat};
