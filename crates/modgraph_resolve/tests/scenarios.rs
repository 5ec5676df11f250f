//! End-to-end resolution scenarios over small mods.
//!
//! Each test builds decoded resources the way a parser would hand them over,
//! then runs one or more resolution stages and checks the resulting graph.

mod test_utils;

use indexmap::IndexMap;
use modgraph_resolve::prelude::*;
use modgraph_resource::prelude::*;
use test_utils::{at, benchmark, chart, control, dashboard, init_tracing, input, mod_with};

// ═══════════════════════════════════════════════════════════════════════════════
// TREE ASSEMBLY
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn benchmark_with_one_control() {
    init_tracing();
    let m = mod_with("m", [benchmark("m", "b1", 1, &["control.c1"]), control("m", "c1", 5)]);

    let tree = build_resource_tree(&m, &IndexMap::new()).unwrap();

    assert_eq!(tree.children("m.benchmark.b1"), ["m.control.c1"]);
    assert_eq!(tree.parents("m.control.c1"), ["m.benchmark.b1"]);
    assert_eq!(
        tree.paths("m.control.c1"),
        [["mod.m", "m.benchmark.b1", "m.control.c1"]]
    );
    assert_eq!(tree.paths("mod.m"), [["mod.m"]]);
}

#[test]
fn paths_are_the_union_over_parents() {
    init_tracing();
    let m = mod_with(
        "m",
        [
            benchmark("m", "top", 1, &["m.benchmark.left", "m.benchmark.right"]),
            benchmark("m", "left", 2, &["m.control.shared"]),
            benchmark("m", "right", 3, &["m.control.shared", "m.control.own"]),
            control("m", "shared", 4),
            control("m", "own", 5),
        ],
    );
    let tree = build_resource_tree(&m, &IndexMap::new()).unwrap();

    for node in tree.nodes().filter(|n| *n != tree.root()) {
        let mut expected: Vec<NodePath> = Vec::new();
        for parent in tree.parents(node) {
            for mut path in tree.paths(parent) {
                path.push(node.to_string());
                expected.push(path);
            }
        }
        assert_eq!(tree.paths(node), expected, "{node}");
    }
}

#[test]
fn dependency_mods_hang_under_the_root() {
    init_tracing();
    let root = mod_with("m", [benchmark("m", "all", 1, &["dep.control.shared"])]).with_require(
        Require::new().with_mod(ModVersionConstraint::parse("github.com/acme/dep@^1").unwrap()),
    );
    let dep = mod_with("dep", [control("dep", "shared", 1), control("dep", "unused", 2)])
        .as_dependency(ModDependencyPath::parse("github.com/acme/dep@v1.2.0").unwrap());

    let mut loaded = IndexMap::new();
    loaded.insert("github.com/acme/dep".to_string(), dep);
    let tree = build_resource_tree(&root, &loaded).unwrap();

    assert_eq!(tree.parents("mod.dep"), ["mod.m"]);
    assert_eq!(tree.parents("dep.control.unused"), ["mod.dep"]);
    assert_eq!(
        tree.paths("dep.control.shared"),
        [
            vec!["mod.m", "m.benchmark.all", "dep.control.shared"],
            vec!["mod.m", "mod.dep", "dep.control.shared"],
        ]
    );
}

#[test]
fn dashboard_inputs_and_withs_are_children() {
    init_tracing();
    let mut table = DashboardPanel::new(PanelKind::Table, "m", "t", at(3));
    table.source.withs = vec!["m.with.w".into()];
    let mut d = Dashboard::new("m", "d", at(1))
        .with_children(["m.table.t"])
        .with_inputs(["m.input.i"]);
    d.withs = vec!["m.with.top".into()];

    let m = mod_with(
        "m",
        [
            d.into(),
            table.into(),
            input("i", "d", None, 2),
            DashboardPanel::new(PanelKind::With, "m", "w", at(4)).into(),
            DashboardPanel::new(PanelKind::With, "m", "top", at(5)).into(),
        ],
    );
    let tree = build_resource_tree(&m, &IndexMap::new()).unwrap();

    assert_eq!(tree.children("m.dashboard.d"), ["m.table.t", "m.input.i", "m.with.top"]);
    assert_eq!(tree.children("m.table.t"), ["m.with.w"]);
    assert_eq!(tree.children("mod.m"), ["m.dashboard.d"]);
}

// ═══════════════════════════════════════════════════════════════════════════════
// RUNTIME DEPENDENCIES
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn chart_waits_for_its_input() {
    init_tracing();
    let m = mod_with(
        "m",
        [
            dashboard("d1", &["m.chart.ch1"], &["m.input.i1"], 1),
            input("i1", "d1", None, 2),
            chart("ch1", "self.input.i1.value", 3),
        ],
    );

    let order = validate_runtime_dependencies("m.dashboard.d1", &m.resources).unwrap();

    assert!(order.precedes("m.input.i1", "m.chart.ch1"));
    let deps: Vec<_> = order.dependencies_of("m.chart.ch1").collect();
    assert_eq!(deps.len(), 1);
    assert_eq!(deps[0].dependency.to_string(), "arg.0->self.input.i1.value");
    assert_eq!(deps[0].source, DependencySource::Input("m.input.i1".into()));
}

#[test]
fn mutually_dependent_inputs_fail() {
    init_tracing();
    let m = mod_with(
        "m",
        [
            dashboard("d1", &[], &["m.input.i1", "m.input.i2"], 1),
            input("i1", "d1", Some("self.input.i2.value"), 2),
            input("i2", "d1", Some("self.input.i1.value"), 3),
        ],
    );

    let err = validate_runtime_dependencies("m.dashboard.d1", &m.resources).unwrap_err();
    assert!(err.to_string().starts_with("runtime dependencies cannot be resolved"));
    assert!(matches!(
        validate_input_dependencies("m.dashboard.d1", &m.resources),
        Err(RuntimeDependencyError::Cycle { .. })
    ));
}

#[test]
fn unresolved_path_is_never_ignored() {
    init_tracing();
    let m = mod_with(
        "m",
        [
            dashboard("d1", &["m.chart.ch1"], &[], 1),
            chart("ch1", "self.input.missing.value", 2),
        ],
    );

    assert_eq!(
        validate_runtime_dependencies("m.dashboard.d1", &m.resources).unwrap_err(),
        RuntimeDependencyError::UnresolvedSource {
            resource: "m.chart.ch1".into(),
            path: "self.input.missing.value".into(),
        }
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// PIPELINE
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn broken_dashboard_does_not_fail_its_siblings() {
    init_tracing();
    let m = mod_with(
        "m",
        [
            dashboard("good", &["m.chart.ok"], &["m.input.g"], 1),
            input("g", "good", None, 2),
            chart("ok", "self.input.g.value", 3),
            dashboard("bad", &[], &["m.input.x", "m.input.y"], 4),
            input("x", "bad", Some("self.input.y.value"), 5),
            input("y", "bad", Some("self.input.x.value"), 6),
        ],
    );

    let resolved = resolve_mod(m, IndexMap::new(), &ResolveOptions::default()).unwrap();

    assert!(resolved.is_dashboard_valid("m.dashboard.good"));
    assert!(!resolved.is_dashboard_valid("m.dashboard.bad"));
    assert!(matches!(
        resolved.dashboard_errors.get("m.dashboard.bad"),
        Some(RuntimeDependencyError::Cycle { .. })
    ));
}

#[test]
fn inherited_children_reach_the_tree() {
    init_tracing();
    let mut derived = Benchmark::new("m", "derived", at(2));
    derived.header.base = Some("benchmark.template".into());
    let m = mod_with(
        "m",
        [
            benchmark("m", "template", 1, &["m.control.c"]),
            derived.into(),
            control("m", "c", 3),
        ],
    );

    let resolved = resolve_mod(m, IndexMap::new(), &ResolveOptions::default()).unwrap();

    assert_eq!(
        resolved.tree.parents("m.control.c"),
        ["m.benchmark.template", "m.benchmark.derived"]
    );
}

#[test]
fn dependency_variables_stay_out_of_the_merged_store() {
    init_tracing();
    let root = mod_with("m", [Variable::new("m", "region", at(1)).into()]).with_require(
        Require::new().with_mod(ModVersionConstraint::parse("github.com/acme/dep").unwrap()),
    );
    let dep = mod_with(
        "dep",
        [Variable::new("dep", "region", at(1)).into(), control("dep", "c", 2)],
    );
    let mut loaded = IndexMap::new();
    loaded.insert("github.com/acme/dep".to_string(), dep);

    let resolved = resolve_mod(root, loaded, &ResolveOptions::default()).unwrap();

    assert!(resolved.resources.contains("m.var.region"));
    assert!(!resolved.resources.contains("dep.var.region"));
    assert!(resolved.resources.contains("dep.control.c"));
    assert!(resolved.dependencies["github.com/acme/dep"].resources.contains("dep.var.region"));
}

#[test]
fn missing_dependency_can_be_skipped() {
    init_tracing();
    let root = mod_with("m", [control("m", "c", 1)]).with_require(
        Require::new().with_mod(ModVersionConstraint::parse("github.com/acme/absent").unwrap()),
    );

    assert!(matches!(
        resolve_mod(root.clone(), IndexMap::new(), &ResolveOptions::default()),
        Err(ResolveError::Tree(TreeError::DependencyNotLoaded { .. }))
    ));

    let options = ResolveOptions::new().with_require_loaded_dependencies(false);
    let resolved = resolve_mod(root, IndexMap::new(), &options).unwrap();
    assert!(resolved.tree.contains("m.control.c"));
}

// ═══════════════════════════════════════════════════════════════════════════════
// DIFFS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn reordered_children_change_without_membership_change() {
    let old = benchmark("m", "p", 1, &["m.control.a", "m.control.b"]);
    let new = benchmark("m", "p", 1, &["m.control.b", "m.control.a"]);

    let diffs = Differ::detached().diff(&old, &new);

    assert!(diffs.has_changes());
    assert!(diffs.changed_properties.iter().any(|p| p == "Children"));
    assert!(diffs.added_items.is_empty());
    assert!(diffs.removed_items.is_empty());
}

#[test]
fn reload_diff_reports_what_changed() {
    let old = mod_with("m", [benchmark("m", "b", 1, &["m.control.a"]), control("m", "a", 2)]);
    let mut new = mod_with(
        "m",
        [benchmark("m", "b", 1, &["m.control.a", "m.control.z"]), control("m", "a", 2)],
    );
    new.add_resource(control("m", "z", 3)).unwrap();

    let diff = diff_resource_maps(&old.resources, &new.resources);

    assert_eq!(diff.added, ["m.control.z"]);
    let b = diff.changes_for("m.benchmark.b").unwrap();
    assert_eq!(b.added_items, ["m.control.z"]);
    assert!(diff.changes_for("m.control.a").is_none());
}
