//! Dashboards and dashboard panels.
//!
//! All fourteen panel kinds share [`DashboardPanel`]; the [`PanelKind`]
//! decides which attributes are meaningful and whether the panel provides a
//! query.

use serde::{Deserialize, Serialize};

use crate::kind::{PanelKind, ResourceKind};
use crate::range::DeclRange;
use crate::resource::header::ResourceHeader;
use crate::resource::query::{ParamDef, QuerySource};

/// A dashboard: an ordered layout of panels plus inputs and `with` blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    /// Identity and metadata.
    #[serde(flatten)]
    pub header: ResourceHeader,
    /// Fully-qualified names of the child panels, in render order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
    /// Fully-qualified names of the inputs scoped to this dashboard.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<String>,
    /// Fully-qualified names of the dashboard-level `with` blocks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub withs: Vec<String>,
    /// Declared parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamDef>,
    /// Grid width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Display mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Dashboard {
    /// Creates an empty dashboard `short_name` in `mod_name`.
    #[must_use]
    pub fn new(mod_name: &str, short_name: &str, decl_range: DeclRange) -> Self {
        Self {
            header: ResourceHeader::new(mod_name, ResourceKind::Dashboard, short_name, decl_range),
            children: Vec::new(),
            inputs: Vec::new(),
            withs: Vec::new(),
            params: Vec::new(),
            width: None,
            display: None,
        }
    }

    /// Sets the child panels.
    #[must_use]
    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the scoped inputs.
    #[must_use]
    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }
}

/// An option of a select-style input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputOption {
    /// Option value.
    pub name: String,
    /// Display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Per-series chart settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesDef {
    /// Series (column) name.
    pub name: String,
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Series color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Per-column table settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Display mode (`all`, `none`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    /// Wrap mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap: Option<String>,
    /// Link template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// A node/edge category of a flow, graph or hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDef {
    /// Category name.
    pub name: String,
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Icon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Link template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Kind-specific panel attributes.
///
/// Only the attributes meaningful to a panel's kind are expected to be set;
/// the rest stay `None` or empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelAttributes {
    /// Card/input label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Card/text static value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Card icon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Card link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Input placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Image source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    /// Image alt text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Category color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Graph/flow direction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    /// Chart series grouping (`stack`, `compare`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grouping: Option<String>,
    /// Input options.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<InputOption>,
    /// Chart series.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub series: Vec<SeriesDef>,
    /// Table columns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnDef>,
    /// Node/edge categories.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<CategoryDef>,
}

/// A dashboard panel of any [`PanelKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardPanel {
    /// Identity and metadata.
    #[serde(flatten)]
    pub header: ResourceHeader,
    /// The panel kind.
    pub kind: PanelKind,
    /// Fully-qualified name of the dashboard this panel is scoped to.
    ///
    /// Only meaningful for inputs: unscoped inputs are global to the mod.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<String>,
    /// Fully-qualified names of child panels (containers, and the nodes and
    /// edges of flows, graphs and hierarchies).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
    /// SQL, arguments, parameters and `with` blocks.
    #[serde(flatten)]
    pub source: QuerySource,
    /// Grid width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Display mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    /// Rendering type, e.g. `bar` for a chart.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub panel_type: Option<String>,
    /// Kind-specific attributes.
    #[serde(flatten)]
    pub attrs: PanelAttributes,
}

impl DashboardPanel {
    /// Creates an empty panel of `kind` named `short_name` in `mod_name`.
    #[must_use]
    pub fn new(kind: PanelKind, mod_name: &str, short_name: &str, decl_range: DeclRange) -> Self {
        Self {
            header: ResourceHeader::new(mod_name, kind.into(), short_name, decl_range),
            kind,
            dashboard: None,
            children: Vec::new(),
            source: QuerySource::default(),
            width: None,
            display: None,
            panel_type: None,
            attrs: PanelAttributes::default(),
        }
    }

    /// Sets the SQL text.
    #[must_use]
    pub fn with_sql(mut self, sql: impl Into<String>) -> Self {
        self.source.sql = Some(sql.into());
        self
    }

    /// Scopes the panel (an input) to `dashboard`.
    #[must_use]
    pub fn scoped_to(mut self, dashboard: impl Into<String>) -> Self {
        self.dashboard = Some(dashboard.into());
        self
    }

    /// Sets the child panels.
    #[must_use]
    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }
}
