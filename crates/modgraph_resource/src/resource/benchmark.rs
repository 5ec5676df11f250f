//! Queries, controls and benchmarks.

use serde::{Deserialize, Serialize};

use crate::kind::ResourceKind;
use crate::range::DeclRange;
use crate::resource::header::ResourceHeader;
use crate::resource::query::QuerySource;

/// A named SQL query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Identity and metadata.
    #[serde(flatten)]
    pub header: ResourceHeader,
    /// SQL, arguments, parameters and `with` blocks.
    #[serde(flatten)]
    pub source: QuerySource,
}

impl Query {
    /// Creates an empty query `short_name` in `mod_name`.
    #[must_use]
    pub fn new(mod_name: &str, short_name: &str, decl_range: DeclRange) -> Self {
        Self {
            header: ResourceHeader::new(mod_name, ResourceKind::Query, short_name, decl_range),
            source: QuerySource::default(),
        }
    }

    /// Sets the SQL text.
    #[must_use]
    pub fn with_sql(mut self, sql: impl Into<String>) -> Self {
        self.source.sql = Some(sql.into());
        self
    }
}

/// A control: a query whose rows report a status, with a severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Control {
    /// Identity and metadata.
    #[serde(flatten)]
    pub header: ResourceHeader,
    /// SQL, arguments, parameters and `with` blocks.
    #[serde(flatten)]
    pub source: QuerySource,
    /// Severity reported with failing rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    /// Grid width when rendered in a dashboard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Display mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    /// Rendering type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub control_type: Option<String>,
}

impl Control {
    /// Creates an empty control `short_name` in `mod_name`.
    #[must_use]
    pub fn new(mod_name: &str, short_name: &str, decl_range: DeclRange) -> Self {
        Self {
            header: ResourceHeader::new(mod_name, ResourceKind::Control, short_name, decl_range),
            source: QuerySource::default(),
            severity: None,
            width: None,
            display: None,
            control_type: None,
        }
    }

    /// Sets the SQL text.
    #[must_use]
    pub fn with_sql(mut self, sql: impl Into<String>) -> Self {
        self.source.sql = Some(sql.into());
        self
    }

    /// Sets the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = Some(severity.into());
        self
    }
}

/// A benchmark: an ordered grouping of controls and other benchmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    /// Identity and metadata.
    #[serde(flatten)]
    pub header: ResourceHeader,
    /// Fully-qualified names of the children, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
    /// Grid width when rendered in a dashboard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Display mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    /// Rendering type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub benchmark_type: Option<String>,
}

impl Benchmark {
    /// Creates an empty benchmark `short_name` in `mod_name`.
    #[must_use]
    pub fn new(mod_name: &str, short_name: &str, decl_range: DeclRange) -> Self {
        Self {
            header: ResourceHeader::new(mod_name, ResourceKind::Benchmark, short_name, decl_range),
            children: Vec::new(),
            width: None,
            display: None,
            benchmark_type: None,
        }
    }

    /// Sets the children.
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
