//! Field-wise inheritance from a `base` resource.
//!
//! Scalars are copied only when unset. Lists of identifiable entries
//! (options, series, columns, categories) and tag maps keep every own entry
//! and append base entries whose key is missing. Plain name lists (children,
//! `with` blocks, inputs, params) are taken from the base only when empty.

use indexmap::IndexMap;

use crate::resource::benchmark::{Benchmark, Control, Query};
use crate::resource::dashboard::{
    CategoryDef, ColumnDef, Dashboard, DashboardPanel, InputOption, PanelAttributes, SeriesDef,
};
use crate::resource::header::ResourceHeader;
use crate::resource::query::QuerySource;
use crate::resource::traits::Inherit;
use crate::resource::variable::{Local, Variable};

/// An entry identified by a name within a list.
pub trait Keyed {
    /// Returns the identifying key.
    fn key(&self) -> &str;
}

impl Keyed for InputOption {
    fn key(&self) -> &str {
        &self.name
    }
}

impl Keyed for SeriesDef {
    fn key(&self) -> &str {
        &self.name
    }
}

impl Keyed for ColumnDef {
    fn key(&self) -> &str {
        &self.name
    }
}

impl Keyed for CategoryDef {
    fn key(&self) -> &str {
        &self.name
    }
}

fn inherit<T: Clone>(own: &mut Option<T>, base: &Option<T>) {
    if own.is_none() {
        own.clone_from(base);
    }
}

fn inherit_list<T: Clone>(own: &mut Vec<T>, base: &[T]) {
    if own.is_empty() {
        own.extend_from_slice(base);
    }
}

fn merge_tags(own: &mut IndexMap<String, String>, base: &IndexMap<String, String>) {
    for (key, value) in base {
        if !own.contains_key(key) {
            own.insert(key.clone(), value.clone());
        }
    }
}

fn merge_keyed<T: Keyed + Clone>(own: &mut Vec<T>, base: &[T]) {
    for entry in base {
        if !own.iter().any(|o| o.key() == entry.key()) {
            own.push(entry.clone());
        }
    }
}

impl Inherit for ResourceHeader {
    /// Identity, location, `base` and references are never inherited.
    fn inherit_from(&mut self, base: &Self) {
        inherit(&mut self.title, &base.title);
        inherit(&mut self.description, &base.description);
        inherit(&mut self.documentation, &base.documentation);
        merge_tags(&mut self.tags, &base.tags);
    }
}

impl Inherit for QuerySource {
    fn inherit_from(&mut self, base: &Self) {
        inherit(&mut self.sql, &base.sql);
        inherit(&mut self.query, &base.query);
        inherit(&mut self.args, &base.args);
        inherit_list(&mut self.params, &base.params);
        inherit_list(&mut self.withs, &base.withs);
        inherit(&mut self.search_path, &base.search_path);
        inherit(&mut self.search_path_prefix, &base.search_path_prefix);
    }
}

impl Inherit for PanelAttributes {
    fn inherit_from(&mut self, base: &Self) {
        inherit(&mut self.label, &base.label);
        inherit(&mut self.value, &base.value);
        inherit(&mut self.icon, &base.icon);
        inherit(&mut self.href, &base.href);
        inherit(&mut self.placeholder, &base.placeholder);
        inherit(&mut self.src, &base.src);
        inherit(&mut self.alt, &base.alt);
        inherit(&mut self.color, &base.color);
        inherit(&mut self.direction, &base.direction);
        inherit(&mut self.grouping, &base.grouping);
        merge_keyed(&mut self.options, &base.options);
        merge_keyed(&mut self.series, &base.series);
        merge_keyed(&mut self.columns, &base.columns);
        merge_keyed(&mut self.categories, &base.categories);
    }
}

impl Inherit for Query {
    fn inherit_from(&mut self, base: &Self) {
        self.header.inherit_from(&base.header);
        self.source.inherit_from(&base.source);
    }
}

impl Inherit for Control {
    fn inherit_from(&mut self, base: &Self) {
        self.header.inherit_from(&base.header);
        self.source.inherit_from(&base.source);
        inherit(&mut self.severity, &base.severity);
        inherit(&mut self.width, &base.width);
        inherit(&mut self.display, &base.display);
        inherit(&mut self.control_type, &base.control_type);
    }
}

impl Inherit for Benchmark {
    fn inherit_from(&mut self, base: &Self) {
        self.header.inherit_from(&base.header);
        inherit_list(&mut self.children, &base.children);
        inherit(&mut self.width, &base.width);
        inherit(&mut self.display, &base.display);
        inherit(&mut self.benchmark_type, &base.benchmark_type);
    }
}

impl Inherit for Dashboard {
    fn inherit_from(&mut self, base: &Self) {
        self.header.inherit_from(&base.header);
        inherit_list(&mut self.children, &base.children);
        inherit_list(&mut self.inputs, &base.inputs);
        inherit_list(&mut self.withs, &base.withs);
        inherit_list(&mut self.params, &base.params);
        inherit(&mut self.width, &base.width);
        inherit(&mut self.display, &base.display);
    }
}

impl Inherit for DashboardPanel {
    /// The panel kind and owning dashboard are identity, not inherited.
    fn inherit_from(&mut self, base: &Self) {
        self.header.inherit_from(&base.header);
        inherit_list(&mut self.children, &base.children);
        self.source.inherit_from(&base.source);
        inherit(&mut self.width, &base.width);
        inherit(&mut self.display, &base.display);
        inherit(&mut self.panel_type, &base.panel_type);
        self.attrs.inherit_from(&base.attrs);
    }
}

impl Inherit for Variable {
    /// Only the declared type and default are inherited; the value is per-instance.
    fn inherit_from(&mut self, base: &Self) {
        self.header.inherit_from(&base.header);
        inherit(&mut self.var_type, &base.var_type);
        inherit(&mut self.default, &base.default);
    }
}

impl Inherit for Local {
    fn inherit_from(&mut self, base: &Self) {
        self.header.inherit_from(&base.header);
        if self.value.is_null() {
            self.value.clone_from(&base.value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::PanelKind;
    use crate::range::DeclRange;

    fn range(line: usize) -> DeclRange {
        DeclRange::line("mod.pp", line)
    }

    #[test]
    fn scalars_copy_only_when_unset() {
        let mut base =
            Control::new("m", "base", range(1)).with_sql("select 1").with_severity("high");
        base.header.title = Some("Base".into());
        let mut derived = Control::new("m", "derived", range(5)).with_severity("low");

        derived.inherit_from(&base);

        assert_eq!(derived.header.title.as_deref(), Some("Base"));
        assert_eq!(derived.source.sql.as_deref(), Some("select 1"));
        assert_eq!(derived.severity.as_deref(), Some("low"));
        assert_eq!(derived.header.full_name, "m.control.derived");
    }

    #[test]
    fn tags_keep_own_values() {
        let mut base = Query::new("m", "base", range(1));
        base.header.tags.insert("service".into(), "aws".into());
        base.header.tags.insert("category".into(), "cost".into());
        let mut derived = Query::new("m", "derived", range(5));
        derived.header.tags.insert("service".into(), "gcp".into());

        derived.inherit_from(&base);

        assert_eq!(derived.header.tags.len(), 2);
        assert_eq!(derived.header.tags["service"], "gcp");
        assert_eq!(derived.header.tags["category"], "cost");
    }

    #[test]
    fn keyed_lists_append_missing_entries() {
        let mut base = DashboardPanel::new(PanelKind::Chart, "m", "base", range(1));
        base.attrs.series = vec![
            SeriesDef { name: "a".into(), title: Some("A".into()), color: None },
            SeriesDef { name: "b".into(), title: None, color: Some("red".into()) },
        ];
        let mut derived = DashboardPanel::new(PanelKind::Chart, "m", "derived", range(9));
        derived.attrs.series =
            vec![SeriesDef { name: "a".into(), title: Some("own".into()), color: None }];

        derived.inherit_from(&base);

        let names: Vec<_> = derived.attrs.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(derived.attrs.series[0].title.as_deref(), Some("own"));
    }

    #[test]
    fn applying_twice_does_not_duplicate_entries() {
        let mut base = DashboardPanel::new(PanelKind::Table, "m", "base", range(1));
        base.attrs.columns =
            vec![ColumnDef { name: "id".into(), display: None, wrap: None, href: None }];
        let mut derived = DashboardPanel::new(PanelKind::Table, "m", "derived", range(9));

        derived.inherit_from(&base);
        let once = derived.clone();
        derived.inherit_from(&base);

        assert_eq!(derived, once);
    }

    #[test]
    fn benchmark_children_taken_only_when_empty() {
        let base = Benchmark::new("m", "base", range(1)).with_children(["m.control.a"]);
        let mut own = Benchmark::new("m", "own", range(5)).with_children(["m.control.b"]);
        let mut empty = Benchmark::new("m", "empty", range(9));

        own.inherit_from(&base);
        empty.inherit_from(&base);

        assert_eq!(own.children, ["m.control.b"]);
        assert_eq!(empty.children, ["m.control.a"]);
    }
}
