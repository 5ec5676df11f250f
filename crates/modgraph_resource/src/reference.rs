//! Edges recorded from a resource's attributes to other resources.

use serde::{Deserialize, Serialize};

use crate::range::DeclRange;

/// A reference one resource's attribute makes to another resource.
///
/// References are recorded for introspection (e.g. "which dashboards use this
/// query") and for dependency discovery; they do not drive resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceReference {
    /// Fully-qualified name of the referenced resource.
    pub to: String,
    /// Fully-qualified name of the referencing resource.
    pub from: String,
    /// Block type containing the reference (e.g. `chart`, `args`).
    pub block_type: String,
    /// Name of the block containing the reference.
    pub block_name: String,
    /// Attribute holding the reference.
    pub attribute: String,
    /// Where the reference was declared.
    pub decl_range: DeclRange,
}

impl ResourceReference {
    /// Creates a reference from `from` to `to` made by `attribute`.
    #[must_use]
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        attribute: impl Into<String>,
        decl_range: DeclRange,
    ) -> Self {
        Self {
            to: to.into(),
            from: from.into(),
            block_type: String::new(),
            block_name: String::new(),
            attribute: attribute.into(),
            decl_range,
        }
    }

    /// Sets the enclosing block type and name.
    #[must_use]
    pub fn in_block(
        mut self,
        block_type: impl Into<String>,
        block_name: impl Into<String>,
    ) -> Self {
        self.block_type = block_type.into();
        self.block_name = block_name.into();
        self
    }

    /// Returns true if both references describe the same edge, ignoring where it was declared.
    #[must_use]
    pub fn same_edge(&self, other: &Self) -> bool {
        self.to == other.to
            && self.from == other.from
            && self.block_type == other.block_type
            && self.block_name == other.block_name
            && self.attribute == other.attribute
    }
}
