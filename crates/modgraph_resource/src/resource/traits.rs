//! Capability traits shared by the resource variants.

use crate::kind::ResourceKind;
use crate::range::DeclRange;
use crate::resource::header::ResourceHeader;
use crate::resource::query::QuerySource;
use crate::runtime::RuntimeDependency;

/// Identity and metadata every resource exposes.
pub trait HclResource {
    /// Returns the shared header.
    fn header(&self) -> &ResourceHeader;

    /// Returns the shared header mutably.
    fn header_mut(&mut self) -> &mut ResourceHeader;

    /// Returns the resource kind.
    fn kind(&self) -> ResourceKind;

    /// Returns the fully-qualified name.
    fn name(&self) -> &str {
        &self.header().full_name
    }

    /// Returns the short name.
    fn short_name(&self) -> &str {
        &self.header().short_name
    }

    /// Returns where the block was declared.
    fn decl_range(&self) -> &DeclRange {
        &self.header().decl_range
    }

    /// Returns the title, if set.
    fn title(&self) -> Option<&str> {
        self.header().title.as_deref()
    }

    /// Returns the base reference, if set.
    fn base(&self) -> Option<&str> {
        self.header().base.as_deref()
    }
}

/// A resource that participates in the containment hierarchy.
pub trait ModTreeItem: HclResource {
    /// Declared children, in render order.
    fn child_names(&self) -> &[String];

    /// Every child the tree assembler links under this resource.
    ///
    /// Defaults to the declared children; resources owning inputs or `with`
    /// blocks append those.
    fn tree_child_names(&self) -> Vec<&str> {
        self.child_names().iter().map(String::as_str).collect()
    }
}

/// A resource that provides a query: SQL, args, params and `with` blocks.
pub trait QueryProvider: HclResource {
    /// Returns the query fields.
    fn query_source(&self) -> &QuerySource;

    /// Returns the query fields mutably.
    fn query_source_mut(&mut self) -> &mut QuerySource;

    /// Returns the runtime dependencies of this resource's arguments and parameters.
    fn runtime_dependencies(&self) -> Vec<RuntimeDependency> {
        self.query_source().runtime_dependencies(self.name())
    }
}

/// Field-wise defaulting from a base of the same variant.
///
/// Scalars are copied only when unset; keyed collections keep every own
/// entry and append base entries whose key is missing.
pub trait Inherit {
    /// Copies unset fields from `base`.
    fn inherit_from(&mut self, base: &Self);
}
