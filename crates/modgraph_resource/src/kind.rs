//! The closed set of resource kinds.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ResourceError;

/// Every kind of block this engine resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A configuration unit owning other resources.
    Mod,
    /// A named SQL query.
    Query,
    /// A control (a query with a severity).
    Control,
    /// A grouping of controls and benchmarks.
    Benchmark,
    /// A dashboard.
    Dashboard,
    /// A card panel.
    Card,
    /// A chart panel.
    Chart,
    /// A layout container panel.
    Container,
    /// An edge of a flow, graph or hierarchy.
    Edge,
    /// A flow panel.
    Flow,
    /// A graph panel.
    Graph,
    /// A hierarchy panel.
    Hierarchy,
    /// An image panel.
    Image,
    /// A dashboard input.
    Input,
    /// A node of a flow, graph or hierarchy.
    Node,
    /// A table panel.
    Table,
    /// A text panel.
    Text,
    /// A node/edge category.
    Category,
    /// A `with` sub-query scoped to its owner.
    With,
    /// A mod variable.
    Variable,
    /// A mod local.
    Local,
}

impl ResourceKind {
    /// All kinds, in walk order.
    pub const ALL: [ResourceKind; 21] = [
        ResourceKind::Mod,
        ResourceKind::Query,
        ResourceKind::Control,
        ResourceKind::Benchmark,
        ResourceKind::Dashboard,
        ResourceKind::Card,
        ResourceKind::Chart,
        ResourceKind::Container,
        ResourceKind::Edge,
        ResourceKind::Flow,
        ResourceKind::Graph,
        ResourceKind::Hierarchy,
        ResourceKind::Image,
        ResourceKind::Input,
        ResourceKind::Node,
        ResourceKind::Table,
        ResourceKind::Text,
        ResourceKind::Category,
        ResourceKind::With,
        ResourceKind::Variable,
        ResourceKind::Local,
    ];

    /// Returns the name segment used in fully-qualified names.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Mod => "mod",
            ResourceKind::Query => "query",
            ResourceKind::Control => "control",
            ResourceKind::Benchmark => "benchmark",
            ResourceKind::Dashboard => "dashboard",
            ResourceKind::Card => "card",
            ResourceKind::Chart => "chart",
            ResourceKind::Container => "container",
            ResourceKind::Edge => "edge",
            ResourceKind::Flow => "flow",
            ResourceKind::Graph => "graph",
            ResourceKind::Hierarchy => "hierarchy",
            ResourceKind::Image => "image",
            ResourceKind::Input => "input",
            ResourceKind::Node => "node",
            ResourceKind::Table => "table",
            ResourceKind::Text => "text",
            ResourceKind::Category => "category",
            ResourceKind::With => "with",
            ResourceKind::Variable => "var",
            ResourceKind::Local => "local",
        }
    }

    /// Returns the panel kind, if this is a dashboard panel kind.
    #[must_use]
    pub fn as_panel(&self) -> Option<PanelKind> {
        PanelKind::ALL.into_iter().find(|p| ResourceKind::from(*p) == *self)
    }

    /// Returns true if resources of this kind participate in the containment tree.
    #[must_use]
    pub fn is_tree_item(&self) -> bool {
        !matches!(self, ResourceKind::Local)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "variable" {
            return Ok(ResourceKind::Variable);
        }
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ResourceError::UnknownBlockType(s.to_string()))
    }
}

/// The dashboard panel kinds.
///
/// Panels share one struct ([`DashboardPanel`](crate::resource::DashboardPanel));
/// the kind decides which attributes are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    /// A card.
    Card,
    /// A chart.
    Chart,
    /// A layout container.
    Container,
    /// An edge.
    Edge,
    /// A flow.
    Flow,
    /// A graph.
    Graph,
    /// A hierarchy.
    Hierarchy,
    /// An image.
    Image,
    /// An input.
    Input,
    /// A node.
    Node,
    /// A table.
    Table,
    /// A text block.
    Text,
    /// A category.
    Category,
    /// A `with` sub-query.
    With,
}

impl PanelKind {
    /// All panel kinds.
    pub const ALL: [PanelKind; 14] = [
        PanelKind::Card,
        PanelKind::Chart,
        PanelKind::Container,
        PanelKind::Edge,
        PanelKind::Flow,
        PanelKind::Graph,
        PanelKind::Hierarchy,
        PanelKind::Image,
        PanelKind::Input,
        PanelKind::Node,
        PanelKind::Table,
        PanelKind::Text,
        PanelKind::Category,
        PanelKind::With,
    ];

    /// Returns true if panels of this kind carry SQL, args, params and `with` blocks.
    #[must_use]
    pub fn is_query_provider(&self) -> bool {
        !matches!(
            self,
            PanelKind::Container | PanelKind::Text | PanelKind::Category
        )
    }

    /// Returns true if panels of this kind contain other panels.
    #[must_use]
    pub fn has_children(&self) -> bool {
        matches!(
            self,
            PanelKind::Container | PanelKind::Flow | PanelKind::Graph | PanelKind::Hierarchy
        )
    }
}

impl From<PanelKind> for ResourceKind {
    fn from(kind: PanelKind) -> Self {
        match kind {
            PanelKind::Card => ResourceKind::Card,
            PanelKind::Chart => ResourceKind::Chart,
            PanelKind::Container => ResourceKind::Container,
            PanelKind::Edge => ResourceKind::Edge,
            PanelKind::Flow => ResourceKind::Flow,
            PanelKind::Graph => ResourceKind::Graph,
            PanelKind::Hierarchy => ResourceKind::Hierarchy,
            PanelKind::Image => ResourceKind::Image,
            PanelKind::Input => ResourceKind::Input,
            PanelKind::Node => ResourceKind::Node,
            PanelKind::Table => ResourceKind::Table,
            PanelKind::Text => ResourceKind::Text,
            PanelKind::Category => ResourceKind::Category,
            PanelKind::With => ResourceKind::With,
        }
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ResourceKind::from(*self).fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_round_trip_through_str() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.as_str().parse::<ResourceKind>().unwrap(), kind);
        }
    }

    #[test]
    fn variable_accepts_long_form() {
        assert_eq!(
            "variable".parse::<ResourceKind>().unwrap(),
            ResourceKind::Variable
        );
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(matches!(
            "widget".parse::<ResourceKind>(),
            Err(ResourceError::UnknownBlockType(s)) if s == "widget"
        ));
    }

    #[test]
    fn every_panel_kind_maps_to_resource_kind() {
        for panel in PanelKind::ALL {
            assert_eq!(ResourceKind::from(panel).as_panel(), Some(panel));
        }
        assert_eq!(ResourceKind::Benchmark.as_panel(), None);
    }

    #[test]
    fn layout_panels_are_not_query_providers() {
        assert!(!PanelKind::Container.is_query_provider());
        assert!(!PanelKind::Text.is_query_provider());
        assert!(PanelKind::Chart.is_query_provider());
        assert!(PanelKind::With.is_query_provider());
    }
}
