//! Parsed resource names and property paths.
//!
//! Fully-qualified resource names follow the grammar `mod.kind.short`
//! (3 segments) or `kind.short` (2 segments, mod implied). Property paths
//! address a value of a resource, e.g. `self.input.i1.value` or
//! `with.w1.rows`.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ResourceError;
use crate::kind::ResourceKind;

// ─────────────────────────────────────────────────────────────────────────────
// ParsedResourceName
// ─────────────────────────────────────────────────────────────────────────────

/// A resource name split into its segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedResourceName {
    /// The owning mod, if the name was qualified.
    pub mod_name: Option<String>,
    /// The resource kind.
    pub kind: ResourceKind,
    /// The short name.
    pub name: String,
}

impl ParsedResourceName {
    /// Creates a name from its parts.
    #[must_use]
    pub fn new(mod_name: Option<&str>, kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            mod_name: mod_name.map(str::to_string),
            kind,
            name: name.into(),
        }
    }

    /// Parses `mod.kind.short` or `kind.short`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidName`] if the segment count is wrong or
    /// [`ResourceError::UnknownBlockType`] if the kind segment is not a known kind.
    pub fn parse(s: &str) -> Result<Self, ResourceError> {
        let segments: Vec<&str> = s.split('.').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(ResourceError::InvalidName(s.to_string()));
        }
        match segments.as_slice() {
            [kind, name] => Ok(Self::new(None, kind.parse()?, *name)),
            [mod_name, kind, name] => Ok(Self::new(Some(mod_name), kind.parse()?, *name)),
            _ => Err(ResourceError::InvalidName(s.to_string())),
        }
    }

    /// Returns a copy qualified with `default_mod` unless already qualified.
    #[must_use]
    pub fn qualified(&self, default_mod: &str) -> Self {
        Self {
            mod_name: Some(
                self.mod_name
                    .clone()
                    .unwrap_or_else(|| default_mod.to_string()),
            ),
            kind: self.kind,
            name: self.name.clone(),
        }
    }

    /// Renders the fully-qualified name, using `default_mod` when unqualified.
    ///
    /// Mods themselves are always named `mod.short`.
    #[must_use]
    pub fn full_name(&self, default_mod: &str) -> String {
        if self.kind == ResourceKind::Mod {
            return format!("mod.{}", self.name);
        }
        let mod_name = self.mod_name.as_deref().unwrap_or(default_mod);
        format!("{mod_name}.{}.{}", self.kind, self.name)
    }

    /// Renders `kind.short`.
    #[must_use]
    pub fn unqualified_name(&self) -> String {
        format!("{}.{}", self.kind, self.name)
    }
}

impl fmt::Display for ParsedResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.mod_name {
            Some(mod_name) if self.kind != ResourceKind::Mod => {
                write!(f, "{mod_name}.{}.{}", self.kind, self.name)
            }
            _ => write!(f, "{}.{}", self.kind, self.name),
        }
    }
}

impl FromStr for ParsedResourceName {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ParsedPropertyPath
// ─────────────────────────────────────────────────────────────────────────────

/// Scope qualifier meaning "the immediately enclosing dashboard".
pub const SELF_SCOPE: &str = "self";

/// Item type used by parameter references (`param.p1`).
pub const PARAM_ITEM_TYPE: &str = "param";

/// A reference to a property of a resource, e.g. `self.input.i1.value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParsedPropertyPath {
    /// The mod qualifier, if present.
    pub mod_name: Option<String>,
    /// The scope qualifier, if present (only `self` is recognised).
    pub scope: Option<String>,
    /// The item type: a resource kind segment or `param`.
    pub item_type: String,
    /// The item name.
    pub name: String,
    /// The property segments following the item name.
    pub property: Vec<String>,
    original: String,
}

impl ParsedPropertyPath {
    /// Parses `[mod.][self.]item_type.name[.property...]`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidPropertyPath`] if the path has fewer than
    /// two segments or its item type is unknown.
    pub fn parse(s: &str) -> Result<Self, ResourceError> {
        let invalid = || ResourceError::InvalidPropertyPath(s.to_string());
        let segments: Vec<&str> = s.split('.').collect();
        if segments.len() < 2 || segments.iter().any(|segment| segment.is_empty()) {
            return Err(invalid());
        }

        let mut idx = 0;
        let mut mod_name = None;
        let mut scope = None;
        if segments[0] == SELF_SCOPE {
            scope = Some(SELF_SCOPE.to_string());
            idx = 1;
        } else if !is_item_type(segments[0]) && segments.len() >= 3 {
            mod_name = Some(segments[0].to_string());
            idx = 1;
        }

        let item_type = *segments.get(idx).ok_or_else(invalid)?;
        if !is_item_type(item_type) {
            return Err(invalid());
        }
        let name = *segments.get(idx + 1).ok_or_else(invalid)?;

        Ok(Self {
            mod_name,
            scope,
            item_type: item_type.to_string(),
            name: name.to_string(),
            property: segments[idx + 2..].iter().map(|s| s.to_string()).collect(),
            original: s.to_string(),
        })
    }

    /// Returns the resource kind the path addresses, or `None` for `param` paths.
    #[must_use]
    pub fn kind(&self) -> Option<ResourceKind> {
        self.item_type.parse().ok()
    }

    /// Returns true if the path carries the `self` scope qualifier.
    #[must_use]
    pub fn is_self_scoped(&self) -> bool {
        self.scope.as_deref() == Some(SELF_SCOPE)
    }

    /// Returns true if the path addresses a `with` block.
    #[must_use]
    pub fn is_with(&self) -> bool {
        self.kind() == Some(ResourceKind::With)
    }

    /// Returns true if the path addresses a dashboard input.
    #[must_use]
    pub fn is_input(&self) -> bool {
        self.kind() == Some(ResourceKind::Input)
    }

    /// Returns true if the path addresses a parameter.
    #[must_use]
    pub fn is_param(&self) -> bool {
        self.item_type == PARAM_ITEM_TYPE
    }

    /// Returns `item_type.name`, prefixed with the mod qualifier if present.
    #[must_use]
    pub fn to_resource_name(&self) -> String {
        match &self.mod_name {
            Some(mod_name) => format!("{mod_name}.{}.{}", self.item_type, self.name),
            None => format!("{}.{}", self.item_type, self.name),
        }
    }

    /// Returns the fully-qualified name of the addressed resource within `default_mod`.
    ///
    /// Returns `None` for `param` paths, which do not address a resource.
    #[must_use]
    pub fn to_full_name(&self, default_mod: &str) -> Option<String> {
        let kind = self.kind()?;
        let parsed = ParsedResourceName::new(self.mod_name.as_deref(), kind, &self.name);
        Some(parsed.full_name(default_mod))
    }
}

fn is_item_type(segment: &str) -> bool {
    segment == PARAM_ITEM_TYPE || segment.parse::<ResourceKind>().is_ok()
}

impl fmt::Display for ParsedPropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl FromStr for ParsedPropertyPath {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ParsedPropertyPath {
    type Error = ResourceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ParsedPropertyPath> for String {
    fn from(path: ParsedPropertyPath) -> Self {
        path.original
    }
}
