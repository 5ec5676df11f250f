//! Shared test utilities for `modgraph_resolve` integration tests.
//!
//! Import via `mod test_utils;` in test files.

#![allow(
    dead_code,
    missing_docs,
    reason = "shared test utilities, not all items used in every test binary"
)]

use std::sync::Once;

use modgraph_core::{TracingConfig, TracingFormat};
use modgraph_resource::prelude::*;

static TRACING: Once = Once::new();

/// Installs a compact subscriber once per test binary, honoring `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        TracingConfig::default()
            .with_format(TracingFormat::Compact)
            .with_env_filter("modgraph_resolve=debug")
            .init();
    });
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESOURCE BUILDERS
// ═══════════════════════════════════════════════════════════════════════════════

pub fn at(line: usize) -> DeclRange {
    DeclRange::line("mod.pp", line)
}

pub fn control(mod_name: &str, name: &str, line: usize) -> Resource {
    Control::new(mod_name, name, at(line)).with_sql("select 1").into()
}

pub fn benchmark(mod_name: &str, name: &str, line: usize, children: &[&str]) -> Resource {
    Benchmark::new(mod_name, name, at(line))
        .with_children(children.iter().copied())
        .into()
}

/// An input of dashboard `m.dashboard.<dashboard>` whose first argument is `depends_on`.
pub fn input(name: &str, dashboard: &str, depends_on: Option<&str>, line: usize) -> Resource {
    let mut panel = DashboardPanel::new(PanelKind::Input, "m", name, at(line))
        .scoped_to(format!("m.dashboard.{dashboard}"));
    if let Some(path) = depends_on {
        panel.source.args = Some(QueryArgs::new().with_positional(runtime(path)));
    }
    panel.into()
}

/// A chart whose first argument is `depends_on`.
pub fn chart(name: &str, depends_on: &str, line: usize) -> Resource {
    let mut panel =
        DashboardPanel::new(PanelKind::Chart, "m", name, at(line)).with_sql("select $1");
    panel.source.args = Some(QueryArgs::new().with_positional(runtime(depends_on)));
    panel.into()
}

pub fn dashboard(name: &str, children: &[&str], inputs: &[&str], line: usize) -> Resource {
    Dashboard::new("m", name, at(line))
        .with_children(children.iter().copied())
        .with_inputs(inputs.iter().copied())
        .into()
}

pub fn runtime(path: &str) -> ArgValue {
    ArgValue::runtime(path).expect("valid property path")
}

/// Builds mod `name` holding `resources`.
pub fn mod_with(name: &str, resources: impl IntoIterator<Item = Resource>) -> Mod {
    let mut m = Mod::new(name, at(0));
    m.add_resources(resources).expect("fixture resources are unique");
    m
}
