//! The resource store: every resource of a mod, keyed by kind and
//! fully-qualified name.
//!
//! [`ResourceMaps`] is the arena the resolution stages index into. Relations
//! between resources are names, so a lookup is always against the current
//! store contents rather than a captured copy.
//!
//! # Example
//!
//! ```
//! use modgraph_resource::prelude::*;
//!
//! let mut maps = ResourceMaps::new("m");
//! maps.add(Control::new("m", "c1", DeclRange::line("mod.pp", 1)).with_sql("select 1").into())
//!     .unwrap();
//!
//! assert!(maps.contains("m.control.c1"));
//! assert_eq!(maps.count_of(ResourceKind::Control), 1);
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ResourceError;
use crate::kind::{PanelKind, ResourceKind};
use crate::name::ParsedResourceName;
use crate::resource::{
    Benchmark, Control, Dashboard, DashboardPanel, HclResource, Query, Resource, Variable,
};

/// Access to the store a resource is being decoded against.
pub trait ResourceMapsProvider {
    /// Returns the store.
    fn resource_maps(&self) -> &ResourceMaps;
}

/// Every resource of a mod, one map per kind.
///
/// Equality is structural and ignores insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceMaps {
    /// Short name of the mod these resources were decoded for.
    pub mod_name: String,
    maps: IndexMap<ResourceKind, IndexMap<String, Resource>>,
}

impl ResourceMaps {
    /// Creates an empty store for `mod_name`.
    #[must_use]
    pub fn new(mod_name: impl Into<String>) -> Self {
        Self {
            mod_name: mod_name.into(),
            maps: IndexMap::new(),
        }
    }

    /// Registers a resource.
    ///
    /// Re-adding a name declared at the same range is a no-op, since the
    /// decoder may reprocess a block.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::DuplicateResource`] when the name is already
    /// registered from a different range.
    pub fn add(&mut self, resource: Resource) -> Result<(), ResourceError> {
        let kind = resource.kind();
        let map = self.maps.entry(kind).or_default();
        if let Some(existing) = map.get(resource.name()) {
            if existing.decl_range() == resource.decl_range() {
                tracing::trace!(name = resource.name(), "resource re-added from the same block");
                return Ok(());
            }
            return Err(ResourceError::DuplicateResource {
                name: resource.name().to_string(),
                first: existing.decl_range().clone(),
                second: resource.decl_range().clone(),
            });
        }
        tracing::trace!(name = resource.name(), %kind, "resource registered");
        map.insert(resource.name().to_string(), resource);
        Ok(())
    }

    /// Registers every resource, stopping at the first error.
    ///
    /// # Errors
    ///
    /// See [`ResourceMaps::add`].
    pub fn add_all<I>(&mut self, resources: I) -> Result<(), ResourceError>
    where
        I: IntoIterator<Item = Resource>,
    {
        resources.into_iter().try_for_each(|r| self.add(r))
    }

    /// Looks up a resource by fully-qualified name.
    ///
    /// Unqualified `kind.short` names are qualified with this store's mod.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Resource> {
        let (kind, key) = self.key_for(name)?;
        self.maps.get(&kind)?.get(&key)
    }

    /// Looks up a resource mutably.
    #[must_use]
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Resource> {
        let (kind, key) = self.key_for(name)?;
        self.maps.get_mut(&kind)?.get_mut(&key)
    }

    /// Returns `true` if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Total number of resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.maps.values().map(IndexMap::len).sum()
    }

    /// Returns `true` when no resource is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of resources of `kind`.
    #[must_use]
    pub fn count_of(&self, kind: ResourceKind) -> usize {
        self.maps.get(&kind).map_or(0, IndexMap::len)
    }

    /// Names of the resources of `kind`.
    pub fn names_of(&self, kind: ResourceKind) -> impl Iterator<Item = &str> {
        self.maps.get(&kind).into_iter().flat_map(|m| m.keys().map(String::as_str))
    }

    /// Every resource, grouped by kind.
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.maps.values().flat_map(IndexMap::values)
    }

    /// Resources of `kind`.
    pub fn iter_of(&self, kind: ResourceKind) -> impl Iterator<Item = &Resource> {
        self.maps.get(&kind).into_iter().flat_map(IndexMap::values)
    }

    /// Every registered name.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.maps.values().flat_map(|m| m.keys().cloned()).collect()
    }

    /// Calls `visitor` on every resource until it returns `Ok(false)` or an error.
    ///
    /// # Errors
    ///
    /// Propagates the visitor's error.
    pub fn walk<E, F>(&self, mut visitor: F) -> Result<(), E>
    where
        F: FnMut(&Resource) -> Result<bool, E>,
    {
        for resource in self.iter() {
            if !visitor(resource)? {
                break;
            }
        }
        Ok(())
    }

    /// Merges several stores into one; the first is the root mod's.
    ///
    /// Later sources override earlier ones on a name collision. Variables and
    /// locals are only taken from the root mod's own resources, so dependency
    /// mod variables stay reachable only through their owning mod.
    #[must_use]
    pub fn merge(sources: &[&ResourceMaps]) -> Self {
        let Some(root) = sources.first() else {
            return Self::default();
        };
        let mut merged = Self::new(root.mod_name.clone());
        for source in sources {
            for resource in source.iter() {
                let root_only =
                    matches!(resource.kind(), ResourceKind::Variable | ResourceKind::Local);
                if root_only && resource.header().mod_name != root.mod_name {
                    continue;
                }
                merged
                    .maps
                    .entry(resource.kind())
                    .or_default()
                    .insert(resource.name().to_string(), resource.clone());
            }
        }
        merged
    }

    /// Structural equality over every map.
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        self == other
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Typed iteration
    // ─────────────────────────────────────────────────────────────────────────

    /// Every query.
    pub fn queries(&self) -> impl Iterator<Item = &Query> {
        self.iter_of(ResourceKind::Query).filter_map(|r| match r {
            Resource::Query(q) => Some(q),
            _ => None,
        })
    }

    /// Every control.
    pub fn controls(&self) -> impl Iterator<Item = &Control> {
        self.iter_of(ResourceKind::Control).filter_map(|r| match r {
            Resource::Control(c) => Some(c),
            _ => None,
        })
    }

    /// Every benchmark.
    pub fn benchmarks(&self) -> impl Iterator<Item = &Benchmark> {
        self.iter_of(ResourceKind::Benchmark).filter_map(Resource::as_benchmark)
    }

    /// Every dashboard.
    pub fn dashboards(&self) -> impl Iterator<Item = &Dashboard> {
        self.iter_of(ResourceKind::Dashboard).filter_map(Resource::as_dashboard)
    }

    /// Every variable.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.iter_of(ResourceKind::Variable).filter_map(Resource::as_variable)
    }

    /// Every panel of `kind`.
    pub fn panels(&self, kind: PanelKind) -> impl Iterator<Item = &DashboardPanel> {
        self.iter_of(kind.into()).filter_map(Resource::as_panel)
    }

    /// Inputs not scoped to any dashboard.
    pub fn global_inputs(&self) -> impl Iterator<Item = &DashboardPanel> {
        self.panels(PanelKind::Input).filter(|p| p.dashboard.is_none())
    }

    /// Inputs scoped to `dashboard`.
    pub fn dashboard_inputs<'a>(
        &'a self,
        dashboard: &'a str,
    ) -> impl Iterator<Item = &'a DashboardPanel> {
        self.panels(PanelKind::Input)
            .filter(move |p| p.dashboard.as_deref() == Some(dashboard))
    }

    fn key_for(&self, name: &str) -> Option<(ResourceKind, String)> {
        let parsed = ParsedResourceName::parse(name).ok()?;
        Some((parsed.kind, parsed.full_name(&self.mod_name)))
    }
}

impl ResourceMapsProvider for ResourceMaps {
    fn resource_maps(&self) -> &ResourceMaps {
        self
    }
}
