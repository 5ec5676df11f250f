//! Identity and metadata shared by every resource variant.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::kind::ResourceKind;
use crate::name::ParsedResourceName;
use crate::range::DeclRange;
use crate::reference::ResourceReference;

/// Identity, declaration location and descriptive metadata of a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceHeader {
    /// The name as declared, e.g. `b1`.
    pub short_name: String,
    /// The fully-qualified name, e.g. `m.benchmark.b1`.
    pub full_name: String,
    /// The name without the mod qualifier, e.g. `benchmark.b1`.
    pub unqualified_name: String,
    /// Short name of the owning mod.
    pub mod_name: String,
    /// Where the block was declared.
    pub decl_range: DeclRange,
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Long-form markdown documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    /// Free-form tags.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub tags: IndexMap<String, String>,
    /// Reference to a resource of the same variant to inherit unset fields from.
    ///
    /// Held as a name and re-resolved against the store, never as a copy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// Set once base inheritance has been applied.
    #[serde(skip)]
    pub base_resolved: bool,
    /// References this resource's attributes make to other resources.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<ResourceReference>,
}

impl ResourceHeader {
    /// Creates a header for `kind.short_name` declared in `mod_name`.
    #[must_use]
    pub fn new(
        mod_name: impl Into<String>,
        kind: ResourceKind,
        short_name: impl Into<String>,
        decl_range: DeclRange,
    ) -> Self {
        let mod_name = mod_name.into();
        let short_name = short_name.into();
        let parsed = ParsedResourceName::new(Some(&mod_name), kind, &short_name);
        Self {
            full_name: parsed.full_name(&mod_name),
            unqualified_name: parsed.unqualified_name(),
            short_name,
            mod_name,
            decl_range,
            title: None,
            description: None,
            documentation: None,
            tags: IndexMap::new(),
            base: None,
            base_resolved: false,
            references: Vec::new(),
        }
    }

    /// Returns the parsed base reference qualified with this resource's mod.
    ///
    /// Returns `None` when there is no base or the base is not a valid name.
    #[must_use]
    pub fn parsed_base(&self) -> Option<ParsedResourceName> {
        let base = self.base.as_deref()?;
        ParsedResourceName::parse(base)
            .ok()
            .map(|name| name.qualified(&self.mod_name))
    }

    /// Records a reference, ignoring edges that are already recorded.
    pub fn add_reference(&mut self, reference: ResourceReference) {
        if !self.references.iter().any(|r| r.same_edge(&reference)) {
            self.references.push(reference);
        }
    }
}
