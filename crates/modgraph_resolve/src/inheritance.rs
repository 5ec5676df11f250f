//! Base-property inheritance.
//!
//! A resource with `base = control.other` copies every field it leaves unset
//! from `other`. Bases are re-fetched from the store by name, never trusted
//! from a decoded copy, and chains resolve depth-first: when the base has a
//! base of its own, that link is applied first.
//!
//! Resolution is a pure function of a snapshot: [`InheritanceResolver::resolve`]
//! reads the input stores and returns a new store, so running it again on new
//! input is just another call.
//!
//! # Example
//!
//! ```
//! use modgraph_resolve::inheritance::resolve_inheritance;
//! use modgraph_resource::prelude::*;
//!
//! let mut maps = ResourceMaps::new("m");
//! let mut base = Control::new("m", "base", DeclRange::line("mod.pp", 1)).with_sql("select 1");
//! base.header.title = Some("Base".into());
//! let mut derived = Control::new("m", "derived", DeclRange::line("mod.pp", 5));
//! derived.header.base = Some("control.base".into());
//! maps.add_all([base.into(), derived.into()]).unwrap();
//!
//! let resolved = resolve_inheritance(&maps).unwrap();
//! let derived = resolved.get("control.derived").unwrap();
//! assert_eq!(derived.title(), Some("Base"));
//! assert_eq!(derived.query_source().and_then(|q| q.sql.as_deref()), Some("select 1"));
//! ```

use hashbrown::HashSet;
use modgraph_resource::prelude::*;

use crate::error::InheritanceError;

/// Resolves every unresolved `base` in `maps`, looking bases up in `maps` only.
///
/// # Errors
///
/// See [`InheritanceResolver::resolve`].
pub fn resolve_inheritance(maps: &ResourceMaps) -> Result<ResourceMaps, InheritanceError> {
    InheritanceResolver::new(maps).resolve()
}

/// Resolves `base` references of one store against it and, optionally, the
/// stores of its dependency mods.
#[derive(Debug, Clone, Copy)]
pub struct InheritanceResolver<'a> {
    maps: &'a ResourceMaps,
    dependencies: &'a [&'a ResourceMaps],
}

impl<'a> InheritanceResolver<'a> {
    /// Creates a resolver for `maps`.
    #[must_use]
    pub fn new(maps: &'a ResourceMaps) -> Self {
        Self {
            maps,
            dependencies: &[],
        }
    }

    /// Also looks bases up in the given dependency mod stores.
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: &'a [&'a ResourceMaps]) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Returns a copy of the store with every base applied.
    ///
    /// Already-resolved resources are left untouched, so resolving a resolved
    /// store again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the first [`InheritanceError`] encountered.
    pub fn resolve(&self) -> Result<ResourceMaps, InheritanceError> {
        let _span =
            tracing::debug_span!("resolve_inheritance", mod_name = %self.maps.mod_name).entered();

        let mut resolved = self.maps.clone();
        let mut count = 0_usize;
        for resource in self.maps.iter() {
            if !needs_resolution(resource) {
                continue;
            }
            let updated = self.resolve_resource(resource.name())?;
            if let Some(slot) = resolved.get_mut(resource.name()) {
                *slot = updated;
                count += 1;
            }
        }

        tracing::debug!(
            mod_name = %self.maps.mod_name,
            resolved = count,
            "base inheritance resolved"
        );
        Ok(resolved)
    }

    /// Returns `name` with its base chain applied.
    ///
    /// # Errors
    ///
    /// - [`InheritanceError::UnresolvedBase`] if a base is not found
    /// - [`InheritanceError::KindMismatch`] if a base names another kind
    /// - [`InheritanceError::Cycle`] if the chain revisits a resource or
    ///   outgrows the number of resources of that kind
    pub fn resolve_resource(&self, name: &str) -> Result<Resource, InheritanceError> {
        let chain = self.base_chain(name)?;
        let Some((deepest, rest)) = chain.split_last() else {
            return Err(InheritanceError::UnresolvedBase {
                resource: name.to_string(),
                base: name.to_string(),
            });
        };

        let mut acc = (*deepest).clone();
        for link in rest.iter().rev() {
            let mut own = (*link).clone();
            own.inherit_from(&acc);
            own.header_mut().base_resolved = true;
            tracing::trace!(resource = own.name(), base = acc.name(), "base applied");
            acc = own;
        }
        Ok(acc)
    }

    /// The resource followed by each base in turn, ending at the first link
    /// without an unresolved base.
    fn base_chain(&self, name: &str) -> Result<Vec<&'a Resource>, InheritanceError> {
        let Some(start) = self.lookup(name) else {
            return Err(InheritanceError::UnresolvedBase {
                resource: name.to_string(),
                base: name.to_string(),
            });
        };
        let bound = self.count_of(start.kind());

        let mut chain = vec![start];
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(start.name());
        let mut current = start;
        while needs_resolution(current) {
            let base_ref = current.base().unwrap_or_default();
            let unresolved = || InheritanceError::UnresolvedBase {
                resource: current.name().to_string(),
                base: base_ref.to_string(),
            };

            let parsed = current.header().parsed_base().ok_or_else(unresolved)?;
            if parsed.kind != current.kind() {
                return Err(InheritanceError::KindMismatch {
                    resource: current.name().to_string(),
                    base: base_ref.to_string(),
                    expected: current.kind(),
                    found: parsed.kind,
                });
            }
            let base = self
                .lookup(&parsed.full_name(&current.header().mod_name))
                .ok_or_else(unresolved)?;

            if !visited.insert(base.name()) || chain.len() > bound {
                let mut names: Vec<String> = chain.iter().map(|r| r.name().to_string()).collect();
                names.push(base.name().to_string());
                return Err(InheritanceError::Cycle {
                    resource: name.to_string(),
                    chain: names,
                });
            }
            chain.push(base);
            current = base;
        }
        Ok(chain)
    }

    fn lookup(&self, name: &str) -> Option<&'a Resource> {
        self.maps
            .get(name)
            .or_else(|| self.dependencies.iter().find_map(|d| d.get(name)))
    }

    fn count_of(&self, kind: ResourceKind) -> usize {
        self.maps.count_of(kind) + self.dependencies.iter().map(|d| d.count_of(kind)).sum::<usize>()
    }
}

fn needs_resolution(resource: &Resource) -> bool {
    resource.base().is_some() && !resource.header().base_resolved
}
