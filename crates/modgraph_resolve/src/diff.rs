//! Structural diffs between two versions of a resource.
//!
//! The execution engine re-renders only what changed between two loads.
//! [`Differ::diff`] compares two versions of one resource field by field and
//! reports the changed property names plus added and removed children;
//! [`diff_resource_maps`] does the same for whole stores.
//!
//! Child order matters for rendering: two child lists of equal length that
//! differ at some index record a `Children` property change even when their
//! membership is identical. Membership changes are reported independently
//! as added and removed items, so one pair of lists can produce both.
//!
//! # Example
//!
//! ```
//! use modgraph_resolve::diff::Differ;
//! use modgraph_resource::prelude::*;
//!
//! let range = DeclRange::line("mod.pp", 1);
//! let old: Resource = Benchmark::new("m", "b", range.clone())
//!     .with_children(["m.control.a", "m.control.b"])
//!     .into();
//! let new: Resource = Benchmark::new("m", "b", range)
//!     .with_children(["m.control.b", "m.control.a"])
//!     .into();
//!
//! let diffs = Differ::detached().diff(&old, &new);
//! assert!(diffs.has_changes());
//! assert_eq!(diffs.changed_properties, ["Children"]);
//! assert!(diffs.added_items.is_empty() && diffs.removed_items.is_empty());
//! ```

use hashbrown::HashSet;
use modgraph_resource::prelude::*;

/// Property name recorded when child order changes.
pub const CHILDREN_PROPERTY: &str = "Children";

// ─────────────────────────────────────────────────────────────────────────────
// DashboardTreeItemDiffs
// ─────────────────────────────────────────────────────────────────────────────

/// The changes between two versions of one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardTreeItemDiffs {
    /// Fully-qualified name of the resource.
    pub name: String,
    /// Names of the properties that changed.
    pub changed_properties: Vec<String>,
    /// Children present only in the new version.
    pub added_items: Vec<String>,
    /// Children present only in the old version.
    pub removed_items: Vec<String>,
}

impl DashboardTreeItemDiffs {
    /// Creates an empty diff for `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            changed_properties: Vec::new(),
            added_items: Vec::new(),
            removed_items: Vec::new(),
        }
    }

    /// Returns `true` if any property, added or removed list is non-empty.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.changed_properties.is_empty()
            || !self.added_items.is_empty()
            || !self.removed_items.is_empty()
    }

    /// Records `property` as changed, once.
    pub fn add_property_diff(&mut self, property: &str) {
        if !self.changed_properties.iter().any(|p| p == property) {
            self.changed_properties.push(property.to_string());
        }
    }

    /// Records `property` as changed if the two values differ.
    pub fn compare<T: PartialEq + ?Sized>(&mut self, property: &str, old: &T, new: &T) {
        if old != new {
            self.add_property_diff(property);
        }
    }

    /// Records added and removed children, and a `Children` change when two
    /// lists of equal length differ at some index.
    pub fn populate_children_diffs(&mut self, old: &[String], new: &[String]) {
        let old_set: HashSet<&str> = old.iter().map(String::as_str).collect();
        let new_set: HashSet<&str> = new.iter().map(String::as_str).collect();

        self.removed_items
            .extend(old.iter().filter(|c| !new_set.contains(c.as_str())).cloned());
        self.added_items
            .extend(new.iter().filter(|c| !old_set.contains(c.as_str())).cloned());

        if old.len() == new.len() && old.iter().zip(new).any(|(a, b)| a != b) {
            self.add_property_diff(CHILDREN_PROPERTY);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Differ
// ─────────────────────────────────────────────────────────────────────────────

/// Compares resources, looking `with` blocks up in the old and new stores
/// when available.
#[derive(Debug, Clone, Copy, Default)]
pub struct Differ<'a> {
    stores: Option<(&'a ResourceMaps, &'a ResourceMaps)>,
}

impl<'a> Differ<'a> {
    /// Creates a differ that resolves `with` blocks in `old` and `new`.
    #[must_use]
    pub fn new(old: &'a ResourceMaps, new: &'a ResourceMaps) -> Self {
        Self {
            stores: Some((old, new)),
        }
    }

    /// Creates a differ without stores; `with` blocks compare by name only.
    #[must_use]
    pub fn detached() -> Self {
        Self::default()
    }

    /// Compares two versions of a resource.
    ///
    /// Versions of different variants differ in their `Type` property.
    #[must_use]
    pub fn diff(&self, old: &Resource, new: &Resource) -> DashboardTreeItemDiffs {
        let mut diffs = DashboardTreeItemDiffs::new(new.name());
        diffs.compare("Type", &old.kind(), &new.kind());
        diff_header(&mut diffs, old.header(), new.header());

        match (old, new) {
            (Resource::Query(_), Resource::Query(_)) => {}
            (Resource::Control(o), Resource::Control(n)) => {
                diffs.compare("Severity", &o.severity, &n.severity);
                diffs.compare("Width", &o.width, &n.width);
                diffs.compare("Display", &o.display, &n.display);
                diffs.compare("ControlType", &o.control_type, &n.control_type);
            }
            (Resource::Benchmark(o), Resource::Benchmark(n)) => {
                diffs.compare("Width", &o.width, &n.width);
                diffs.compare("Display", &o.display, &n.display);
                diffs.compare("BenchmarkType", &o.benchmark_type, &n.benchmark_type);
            }
            (Resource::Dashboard(o), Resource::Dashboard(n)) => {
                diffs.compare("Width", &o.width, &n.width);
                diffs.compare("Display", &o.display, &n.display);
                diffs.compare("Inputs", &o.inputs, &n.inputs);
                diffs.compare("Params", &o.params, &n.params);
                self.diff_withs(&mut diffs, &o.withs, &n.withs);
            }
            (Resource::Panel(o), Resource::Panel(n)) => {
                diffs.compare("Dashboard", &o.dashboard, &n.dashboard);
                diffs.compare("Width", &o.width, &n.width);
                diffs.compare("Display", &o.display, &n.display);
                diffs.compare("PanelType", &o.panel_type, &n.panel_type);
                diff_panel_attributes(&mut diffs, &o.attrs, &n.attrs);
            }
            (Resource::Variable(o), Resource::Variable(n)) => {
                diffs.compare("VarType", &o.var_type, &n.var_type);
                diffs.compare("Default", &o.default, &n.default);
                diffs.compare("Value", &o.value, &n.value);
            }
            (Resource::Local(o), Resource::Local(n)) => {
                diffs.compare("Value", &o.value, &n.value);
            }
            _ => {}
        }

        if let (Some(o), Some(n)) = (old.as_query_provider(), new.as_query_provider()) {
            let (old_source, new_source) = (o.query_source(), n.query_source());
            diff_query_source(&mut diffs, old_source, new_source);
            self.diff_query_reference(
                &mut diffs,
                old_source.query.as_deref(),
                new_source.query.as_deref(),
            );
            self.diff_withs(&mut diffs, &old_source.withs, &new_source.withs);
        }

        diffs.populate_children_diffs(old.child_names(), new.child_names());
        diffs
    }

    /// Compares the named queries two versions run by their own query
    /// fields, so a chart changes when the query it references does.
    ///
    /// A name change is already recorded by [`diff_query_source`].
    fn diff_query_reference(
        &self,
        diffs: &mut DashboardTreeItemDiffs,
        old: Option<&str>,
        new: Option<&str>,
    ) {
        let (Some((old_maps, new_maps)), Some(old_name), Some(new_name)) = (self.stores, old, new)
        else {
            return;
        };
        if old_name != new_name {
            return;
        }
        let old_query = old_maps.get(old_name).and_then(Resource::query_source);
        let new_query = new_maps.get(new_name).and_then(Resource::query_source);
        let changed = match (old_query, new_query) {
            (Some(o), Some(n)) => {
                let mut query_diffs = DashboardTreeItemDiffs::new(new_name);
                diff_query_source(&mut query_diffs, o, n);
                query_diffs.has_changes()
            }
            (o, n) => o.is_some() != n.is_some(),
        };
        if changed {
            diffs.add_property_diff("Query");
        }
    }

    /// Compares `with` lists by length, then pairwise by query fields.
    ///
    /// Nested `with` blocks and children of a `with` are not compared.
    fn diff_withs(&self, diffs: &mut DashboardTreeItemDiffs, old: &[String], new: &[String]) {
        if old.len() != new.len() {
            diffs.add_property_diff("With");
            return;
        }
        for (old_name, new_name) in old.iter().zip(new) {
            let changed = match self.stores {
                Some((old_maps, new_maps)) => {
                    let old_with = old_maps.get(old_name).and_then(Resource::query_source);
                    let new_with = new_maps.get(new_name).and_then(Resource::query_source);
                    match (old_with, new_with) {
                        (Some(o), Some(n)) => {
                            let mut with_diffs = DashboardTreeItemDiffs::new(new_name.as_str());
                            diff_query_source(&mut with_diffs, o, n);
                            with_diffs.has_changes()
                        }
                        (o, n) => o.is_some() != n.is_some() || old_name != new_name,
                    }
                }
                None => old_name != new_name,
            };
            if changed {
                diffs.add_property_diff("With");
                return;
            }
        }
    }
}

fn diff_header(diffs: &mut DashboardTreeItemDiffs, old: &ResourceHeader, new: &ResourceHeader) {
    diffs.compare("Name", &old.full_name, &new.full_name);
    diffs.compare("Title", &old.title, &new.title);
    diffs.compare("Description", &old.description, &new.description);
    diffs.compare("Documentation", &old.documentation, &new.documentation);
    diffs.compare("Tags", &old.tags, &new.tags);
    diffs.compare("Base", &old.base, &new.base);
}

fn diff_query_source(diffs: &mut DashboardTreeItemDiffs, old: &QuerySource, new: &QuerySource) {
    diffs.compare("SQL", &old.sql, &new.sql);
    diffs.compare("Query", &old.query, &new.query);
    if !args_equal(old.args.as_ref(), new.args.as_ref()) {
        diffs.add_property_diff("Args");
    }
    if old.params.len() != new.params.len()
        || old.params.iter().zip(&new.params).any(|(o, n)| {
            o.name != n.name || o.description != n.description || o.default != n.default
        })
    {
        diffs.add_property_diff("Params");
    }
    diffs.compare("SearchPath", &old.search_path, &new.search_path);
    diffs.compare("SearchPathPrefix", &old.search_path_prefix, &new.search_path_prefix);
}

/// Named and positional arguments compare independently; absent and empty
/// argument sets are equal.
fn args_equal(old: Option<&QueryArgs>, new: Option<&QueryArgs>) -> bool {
    let empty = QueryArgs::default();
    let old = old.unwrap_or(&empty);
    let new = new.unwrap_or(&empty);

    let named_equal = old.named.len() == new.named.len()
        && old.named.iter().all(|(k, v)| new.named.get(k) == Some(v));
    let positional_equal = old.positional.len() == new.positional.len()
        && old.positional.iter().zip(&new.positional).all(|(o, n)| o == n);
    named_equal && positional_equal
}

fn diff_panel_attributes(
    diffs: &mut DashboardTreeItemDiffs,
    old: &PanelAttributes,
    new: &PanelAttributes,
) {
    diffs.compare("Label", &old.label, &new.label);
    diffs.compare("Value", &old.value, &new.value);
    diffs.compare("Icon", &old.icon, &new.icon);
    diffs.compare("Href", &old.href, &new.href);
    diffs.compare("Placeholder", &old.placeholder, &new.placeholder);
    diffs.compare("Src", &old.src, &new.src);
    diffs.compare("Alt", &old.alt, &new.alt);
    diffs.compare("Color", &old.color, &new.color);
    diffs.compare("Direction", &old.direction, &new.direction);
    diffs.compare("Grouping", &old.grouping, &new.grouping);
    diffs.compare("Options", &old.options, &new.options);
    diffs.compare("Series", &old.series, &new.series);
    diffs.compare("Columns", &old.columns, &new.columns);
    diffs.compare("Categories", &old.categories, &new.categories);
}

// ─────────────────────────────────────────────────────────────────────────────
// Store-level diff
// ─────────────────────────────────────────────────────────────────────────────

/// The changes between two versions of a store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceMapsDiff {
    /// Resources only in the new store.
    pub added: Vec<String>,
    /// Resources only in the old store.
    pub removed: Vec<String>,
    /// Per-resource diffs of resources in both stores that changed.
    pub changed: Vec<DashboardTreeItemDiffs>,
}

impl ResourceMapsDiff {
    /// Returns `true` if anything was added, removed or changed.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty() || !self.changed.is_empty()
    }

    /// The diff of `name`, if it changed.
    #[must_use]
    pub fn changes_for(&self, name: &str) -> Option<&DashboardTreeItemDiffs> {
        self.changed.iter().find(|d| d.name == name)
    }
}

/// Compares two stores, short-circuiting when they are equal.
#[must_use]
pub fn diff_resource_maps(old: &ResourceMaps, new: &ResourceMaps) -> ResourceMapsDiff {
    if old.equals(new) {
        return ResourceMapsDiff::default();
    }

    let differ = Differ::new(old, new);
    let mut result = ResourceMapsDiff::default();
    for old_resource in old.iter() {
        match new.get(old_resource.name()) {
            None => result.removed.push(old_resource.name().to_string()),
            Some(new_resource) => {
                // an unchanged resource still changes when one of its `with` blocks does
                let diffs = differ.diff(old_resource, new_resource);
                if diffs.has_changes() {
                    result.changed.push(diffs);
                }
            }
        }
    }
    result.added.extend(
        new.iter()
            .filter(|r| !old.contains(r.name()))
            .map(|r| r.name().to_string()),
    );

    tracing::debug!(
        added = result.added.len(),
        removed = result.removed.len(),
        changed = result.changed.len(),
        "resource maps diffed"
    );
    result
}
