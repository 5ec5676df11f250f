//! The mod: root container of one configuration unit.

use serde::{Deserialize, Serialize};

use crate::error::ResourceError;
use crate::kind::ResourceKind;
use crate::range::DeclRange;
use crate::require::{ModDependencyPath, Require};
use crate::resource::{HclResource, Resource, ResourceHeader};
use crate::store::{ResourceMaps, ResourceMapsProvider};

/// A configuration unit owning a set of resources.
///
/// A mod loaded as a dependency of another carries the path it was installed
/// under; the root mod has none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mod {
    /// Identity and metadata; the full name is `mod.<short>`.
    #[serde(flatten)]
    pub header: ResourceHeader,
    /// Declared requirements.
    #[serde(default, skip_serializing_if = "Require::is_empty")]
    pub require: Require,
    /// Where this mod was installed from, when loaded as a dependency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_path: Option<ModDependencyPath>,
    /// Every resource declared by this mod.
    pub resources: ResourceMaps,
}

impl Mod {
    /// Creates an empty root mod.
    #[must_use]
    pub fn new(short_name: &str, decl_range: DeclRange) -> Self {
        Self {
            header: ResourceHeader::new(short_name, ResourceKind::Mod, short_name, decl_range),
            require: Require::default(),
            dependency_path: None,
            resources: ResourceMaps::new(short_name),
        }
    }

    /// Sets the requirements.
    #[must_use]
    pub fn with_require(mut self, require: Require) -> Self {
        self.require = require;
        self
    }

    /// Marks this mod as loaded from `path`.
    #[must_use]
    pub fn as_dependency(mut self, path: ModDependencyPath) -> Self {
        self.dependency_path = Some(path);
        self
    }

    /// Returns `true` when loaded as a dependency.
    #[must_use]
    pub fn is_dependency(&self) -> bool {
        self.dependency_path.is_some()
    }

    /// The path other mods require this one by, e.g. `github.com/turbot/m`.
    #[must_use]
    pub fn dependency_name(&self) -> Option<&str> {
        self.dependency_path.as_ref().map(|p| p.path.as_str())
    }

    /// Registers a resource.
    ///
    /// # Errors
    ///
    /// See [`ResourceMaps::add`].
    pub fn add_resource(&mut self, resource: Resource) -> Result<(), ResourceError> {
        self.resources.add(resource)
    }

    /// Registers every resource, stopping at the first error.
    ///
    /// # Errors
    ///
    /// See [`ResourceMaps::add`].
    pub fn add_resources<I>(&mut self, resources: I) -> Result<(), ResourceError>
    where
        I: IntoIterator<Item = Resource>,
    {
        self.resources.add_all(resources)
    }
}

impl HclResource for Mod {
    fn header(&self) -> &ResourceHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut ResourceHeader {
        &mut self.header
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Mod
    }
}

impl ResourceMapsProvider for Mod {
    fn resource_maps(&self) -> &ResourceMaps {
        &self.resources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Control;

    #[test]
    fn mod_names() {
        let m = Mod::new("m", DeclRange::line("mod.pp", 1));
        assert_eq!(m.name(), "mod.m");
        assert_eq!(m.resources.mod_name, "m");
        assert!(!m.is_dependency());
    }

    #[test]
    fn dependency_identity() {
        let path = ModDependencyPath::parse("github.com/turbot/dep@v1.0.0").unwrap();
        let m = Mod::new("dep", DeclRange::default()).as_dependency(path);
        assert_eq!(m.dependency_name(), Some("github.com/turbot/dep"));
    }

    #[test]
    fn resources_are_provided() {
        let mut m = Mod::new("m", DeclRange::default());
        m.add_resource(Control::new("m", "c1", DeclRange::line("c.pp", 3)).into())
            .unwrap();
        assert!(m.resource_maps().contains("m.control.c1"));
    }
}
