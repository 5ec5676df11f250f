//! The resource model.
//!
//! Every resource kind is a variant of the closed [`Resource`] enum. Shared
//! behavior is expressed by capability traits ([`HclResource`],
//! [`ModTreeItem`], [`QueryProvider`], [`Inherit`]) implemented once per
//! variant struct and dispatched over the enum.
//!
//! Relations between resources (children, `with` blocks, `base`) are held as
//! fully-qualified names and resolved against a
//! [`ResourceMaps`](crate::store::ResourceMaps) by the resolution stages.

mod benchmark;
mod dashboard;
mod header;
mod inherit;
mod query;
mod traits;
mod variable;

pub use benchmark::{Benchmark, Control, Query};
pub use dashboard::{
    CategoryDef, ColumnDef, Dashboard, DashboardPanel, InputOption, PanelAttributes, SeriesDef,
};
pub use header::ResourceHeader;
pub use inherit::Keyed;
pub use query::{ArgValue, ParamDef, QueryArgs, QuerySource};
pub use traits::{HclResource, Inherit, ModTreeItem, QueryProvider};
pub use variable::{Local, Variable};

use serde::{Deserialize, Serialize};

use crate::kind::ResourceKind;

// ─────────────────────────────────────────────────────────────────────────────
// Capability implementations
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! impl_hcl_resource {
    ($($ty:ty => $kind:expr),* $(,)?) => {
        $(
            impl HclResource for $ty {
                fn header(&self) -> &ResourceHeader {
                    &self.header
                }

                fn header_mut(&mut self) -> &mut ResourceHeader {
                    &mut self.header
                }

                fn kind(&self) -> ResourceKind {
                    $kind
                }
            }
        )*
    };
}

macro_rules! impl_query_provider {
    ($ty:ty) => {
        impl QueryProvider for $ty {
            fn query_source(&self) -> &QuerySource {
                &self.source
            }

            fn query_source_mut(&mut self) -> &mut QuerySource {
                &mut self.source
            }
        }
    };
}

impl_hcl_resource!(
    Query => ResourceKind::Query,
    Control => ResourceKind::Control,
    Benchmark => ResourceKind::Benchmark,
    Dashboard => ResourceKind::Dashboard,
    Variable => ResourceKind::Variable,
    Local => ResourceKind::Local,
);

impl HclResource for DashboardPanel {
    fn header(&self) -> &ResourceHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut ResourceHeader {
        &mut self.header
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::from(self.kind)
    }
}

impl_query_provider!(Query);
impl_query_provider!(Control);
impl_query_provider!(DashboardPanel);

impl ModTreeItem for Query {
    fn child_names(&self) -> &[String] {
        &[]
    }

    fn tree_child_names(&self) -> Vec<&str> {
        self.source.withs.iter().map(String::as_str).collect()
    }
}

impl ModTreeItem for Control {
    fn child_names(&self) -> &[String] {
        &[]
    }

    fn tree_child_names(&self) -> Vec<&str> {
        self.source.withs.iter().map(String::as_str).collect()
    }
}

impl ModTreeItem for Benchmark {
    fn child_names(&self) -> &[String] {
        &self.children
    }
}

impl ModTreeItem for Dashboard {
    fn child_names(&self) -> &[String] {
        &self.children
    }

    fn tree_child_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.children.iter().map(String::as_str).collect();
        for name in self.inputs.iter().chain(&self.withs) {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }
}

impl ModTreeItem for DashboardPanel {
    fn child_names(&self) -> &[String] {
        &self.children
    }

    fn tree_child_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.children.iter().map(String::as_str).collect();
        for name in &self.source.withs {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }
}

impl ModTreeItem for Variable {
    fn child_names(&self) -> &[String] {
        &[]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Resource
// ─────────────────────────────────────────────────────────────────────────────

/// A resource of any kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resource_type", rename_all = "snake_case")]
pub enum Resource {
    /// A named query.
    Query(Query),
    /// A control.
    Control(Control),
    /// A benchmark.
    Benchmark(Benchmark),
    /// A dashboard.
    Dashboard(Dashboard),
    /// A dashboard panel of any panel kind.
    Panel(DashboardPanel),
    /// A variable.
    Variable(Variable),
    /// A local.
    Local(Local),
}

macro_rules! dispatch {
    ($self:expr, $r:ident => $body:expr) => {
        match $self {
            Resource::Query($r) => $body,
            Resource::Control($r) => $body,
            Resource::Benchmark($r) => $body,
            Resource::Dashboard($r) => $body,
            Resource::Panel($r) => $body,
            Resource::Variable($r) => $body,
            Resource::Local($r) => $body,
        }
    };
}

impl HclResource for Resource {
    fn header(&self) -> &ResourceHeader {
        dispatch!(self, r => r.header())
    }

    fn header_mut(&mut self) -> &mut ResourceHeader {
        dispatch!(self, r => r.header_mut())
    }

    fn kind(&self) -> ResourceKind {
        dispatch!(self, r => r.kind())
    }
}

impl Resource {
    /// Returns the resource as a tree item, or `None` for locals.
    #[must_use]
    pub fn as_tree_item(&self) -> Option<&dyn ModTreeItem> {
        match self {
            Resource::Query(r) => Some(r),
            Resource::Control(r) => Some(r),
            Resource::Benchmark(r) => Some(r),
            Resource::Dashboard(r) => Some(r),
            Resource::Panel(r) => Some(r),
            Resource::Variable(r) => Some(r),
            Resource::Local(_) => None,
        }
    }

    /// Returns the resource as a query provider.
    ///
    /// Returns `None` for non-query kinds, including container, text and
    /// category panels.
    #[must_use]
    pub fn as_query_provider(&self) -> Option<&dyn QueryProvider> {
        match self {
            Resource::Query(r) => Some(r),
            Resource::Control(r) => Some(r),
            Resource::Panel(r) if r.kind.is_query_provider() => Some(r),
            _ => None,
        }
    }

    /// Returns the declared children, or an empty slice for leaf kinds.
    #[must_use]
    pub fn child_names(&self) -> &[String] {
        match self.as_tree_item() {
            Some(item) => item.child_names(),
            None => &[],
        }
    }

    /// Returns the fully-qualified names of the `with` blocks this resource owns.
    #[must_use]
    pub fn with_names(&self) -> &[String] {
        match self {
            Resource::Dashboard(d) => &d.withs,
            other => match other.as_query_provider() {
                Some(qp) => &qp.query_source().withs,
                None => &[],
            },
        }
    }

    /// Returns the query fields of query providers.
    #[must_use]
    pub fn query_source(&self) -> Option<&QuerySource> {
        self.as_query_provider().map(QueryProvider::query_source)
    }

    /// Returns the inner dashboard.
    #[must_use]
    pub fn as_dashboard(&self) -> Option<&Dashboard> {
        match self {
            Resource::Dashboard(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the inner benchmark.
    #[must_use]
    pub fn as_benchmark(&self) -> Option<&Benchmark> {
        match self {
            Resource::Benchmark(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the inner panel.
    #[must_use]
    pub fn as_panel(&self) -> Option<&DashboardPanel> {
        match self {
            Resource::Panel(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the inner variable.
    #[must_use]
    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Resource::Variable(v) => Some(v),
            _ => None,
        }
    }
}

impl Inherit for Resource {
    /// Dispatches to the variant's field-wise inheritance.
    ///
    /// Mismatched variants are left untouched; callers check kinds first.
    fn inherit_from(&mut self, base: &Self) {
        match (self, base) {
            (Resource::Query(r), Resource::Query(b)) => r.inherit_from(b),
            (Resource::Control(r), Resource::Control(b)) => r.inherit_from(b),
            (Resource::Benchmark(r), Resource::Benchmark(b)) => r.inherit_from(b),
            (Resource::Dashboard(r), Resource::Dashboard(b)) => r.inherit_from(b),
            (Resource::Panel(r), Resource::Panel(b)) => r.inherit_from(b),
            (Resource::Variable(r), Resource::Variable(b)) => r.inherit_from(b),
            (Resource::Local(r), Resource::Local(b)) => r.inherit_from(b),
            (this, base) => {
                tracing::debug!(
                    resource = this.name(),
                    base = base.name(),
                    "skipping inheritance between different variants"
                );
            }
        }
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Resource {
                fn from(value: $ty) -> Self {
                    Resource::$variant(value)
                }
            }
        )*
    };
}

impl_from_variant!(
    Query => Query,
    Control => Control,
    Benchmark => Benchmark,
    Dashboard => Dashboard,
    Panel => DashboardPanel,
    Variable => Variable,
    Local => Local,
);
