//! Declared requirements of a mod: minimum platform version, plugins and
//! dependency mods.
//!
//! Versions and constraints are parsed with `semver`. Requirements keep the
//! constraint text as written; [`ModVersionConstraint::matches`] checks an
//! installed version against it.
//!
//! # Example
//!
//! ```
//! use modgraph_resource::require::{ModVersionConstraint, Require};
//!
//! let require = Require::new()
//!     .with_mod(ModVersionConstraint::parse("github.com/turbot/aws-compliance@^1.0").unwrap());
//!
//! assert!(require.contains_mod("github.com/turbot/aws-compliance"));
//! ```

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ResourceError;
use crate::range::DeclRange;

/// The constraint used when none or `latest` is given.
pub const LATEST_CONSTRAINT: &str = "*";

/// The plugin org assumed when a plugin name has none.
pub const DEFAULT_PLUGIN_ORG: &str = "turbot";

const FILE_PREFIX: &str = "file:";
const BRANCH_PREFIX: char = '#';

// ─────────────────────────────────────────────────────────────────────────────
// Version
// ─────────────────────────────────────────────────────────────────────────────

/// A semantic version, optionally written with a leading `v`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(semver::Version);

impl Version {
    /// Creates a `major.minor.patch` version.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(semver::Version::new(major, minor, patch))
    }

    /// Parses `X`, `X.Y` or `X.Y.Z` with optional pre-release and build
    /// suffixes, with or without a leading `v`.
    ///
    /// Missing minor and patch components default to zero.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidVersion`] for anything else.
    pub fn parse(s: &str) -> Result<Self, ResourceError> {
        let trimmed = s.trim();
        let text = trimmed.strip_prefix('v').unwrap_or(trimmed);
        let core_end = text.find(['-', '+']).unwrap_or(text.len());
        let (core, suffix) = text.split_at(core_end);
        let padding = match core.matches('.').count() {
            0 => ".0.0",
            1 => ".0",
            _ => "",
        };
        semver::Version::parse(&format!("{core}{padding}{suffix}"))
            .map(Self)
            .map_err(|_| ResourceError::InvalidVersion(s.to_string()))
    }

    /// Major component.
    #[must_use]
    pub fn major(&self) -> u64 {
        self.0.major
    }

    /// Minor component.
    #[must_use]
    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    /// Patch component.
    #[must_use]
    pub fn patch(&self) -> u64 {
        self.0.patch
    }

    /// The underlying semantic version.
    #[must_use]
    pub fn as_semver(&self) -> &semver::Version {
        &self.0
    }
}

impl From<semver::Version> for Version {
    fn from(version: semver::Version) -> Self {
        Self(version)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Version {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parses a version constraint such as `>=1.2, <2` or `^0.3`.
///
/// Clauses are comma separated. Whitespace between an operator and its
/// version and a `v` before the version are accepted.
///
/// # Errors
///
/// Returns [`ResourceError::InvalidConstraint`] when any clause is malformed.
pub fn parse_constraint(constraint: &str) -> Result<semver::VersionReq, ResourceError> {
    let invalid = || ResourceError::InvalidConstraint(constraint.to_string());
    if constraint.trim().is_empty() {
        return Err(invalid());
    }

    let clauses: Vec<String> = constraint
        .split(',')
        .map(|clause| {
            let clause = clause.trim();
            let op_len = clause
                .find(|c: char| !matches!(c, '<' | '>' | '=' | '~' | '^'))
                .unwrap_or(clause.len());
            let (op, version) = clause.split_at(op_len);
            let version = version.trim_start();
            let version = version.strip_prefix('v').unwrap_or(version);
            format!("{op}{version}")
        })
        .collect();
    semver::VersionReq::parse(&clauses.join(", ")).map_err(|_| invalid())
}

/// Checks the syntax of a version constraint.
///
/// # Errors
///
/// See [`parse_constraint`].
pub fn validate_constraint(constraint: &str) -> Result<(), ResourceError> {
    parse_constraint(constraint).map(|_| ())
}

// ─────────────────────────────────────────────────────────────────────────────
// ModVersionConstraint
// ─────────────────────────────────────────────────────────────────────────────

/// What a dependency mod requirement pins to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionRequirement {
    /// A semantic version constraint; `*` for latest.
    Constraint(String),
    /// A git branch.
    Branch(String),
    /// A local directory.
    FilePath(String),
}

/// A requirement on another mod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModVersionConstraint {
    /// The mod path, e.g. `github.com/turbot/aws-compliance`.
    pub name: String,
    /// The version text as written, before normalization.
    pub version_string: String,
    /// The normalized requirement.
    pub requirement: VersionRequirement,
    /// Where the requirement was declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decl_range: Option<DeclRange>,
}

impl ModVersionConstraint {
    /// Builds a requirement from a mod name and an optional separate version.
    ///
    /// The name may carry the version inline as `name@version`; giving both
    /// is an error. An absent, empty or `latest` version means latest.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::ConflictingVersion`] when both forms are set
    /// - [`ResourceError::InvalidModName`] for an empty name or version after `@`
    /// - [`ResourceError::InvalidConstraint`] for a malformed constraint
    pub fn new(name: &str, version: Option<&str>) -> Result<Self, ResourceError> {
        let (name, version) = match name.split_once('@') {
            Some(_) if version.is_some_and(|v| !v.is_empty()) => {
                return Err(ResourceError::ConflictingVersion(name.to_string()));
            }
            Some((base, inline)) if base.is_empty() || inline.is_empty() => {
                return Err(ResourceError::InvalidModName(name.to_string()));
            }
            Some((base, inline)) => (base, inline),
            None if name.is_empty() => return Err(ResourceError::InvalidModName(name.to_string())),
            None => (name, version.unwrap_or_default()),
        };

        let requirement = if version.is_empty() || version == "latest" {
            VersionRequirement::Constraint(LATEST_CONSTRAINT.to_string())
        } else if let Some(path) = version.strip_prefix(FILE_PREFIX) {
            VersionRequirement::FilePath(path.to_string())
        } else if let Some(branch) = version.strip_prefix(BRANCH_PREFIX) {
            VersionRequirement::Branch(branch.to_string())
        } else {
            validate_constraint(version)?;
            VersionRequirement::Constraint(version.to_string())
        };

        Ok(Self {
            name: name.to_string(),
            version_string: version.to_string(),
            requirement,
            decl_range: None,
        })
    }

    /// Parses `name` or `name@version`.
    ///
    /// # Errors
    ///
    /// See [`ModVersionConstraint::new`].
    pub fn parse(s: &str) -> Result<Self, ResourceError> {
        Self::new(s, None)
    }

    /// Sets the declaration range.
    #[must_use]
    pub fn with_decl_range(mut self, decl_range: DeclRange) -> Self {
        self.decl_range = Some(decl_range);
        self
    }

    /// Returns the constraint string, if this is a version requirement.
    #[must_use]
    pub fn constraint(&self) -> Option<&str> {
        match &self.requirement {
            VersionRequirement::Constraint(c) => Some(c),
            _ => None,
        }
    }

    /// Returns `true` when `version` satisfies this requirement.
    ///
    /// Branch and file requirements match nothing; they are pinned by
    /// location, not by version.
    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        self.constraint()
            .and_then(|c| parse_constraint(c).ok())
            .is_some_and(|req| req.matches(version.as_semver()))
    }

    /// Returns `true` when no specific version was requested.
    #[must_use]
    pub fn is_latest(&self) -> bool {
        self.constraint() == Some(LATEST_CONSTRAINT)
    }

    /// Returns the branch, if pinned to one.
    #[must_use]
    pub fn branch(&self) -> Option<&str> {
        match &self.requirement {
            VersionRequirement::Branch(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the local path, if this is a file requirement.
    #[must_use]
    pub fn file_path(&self) -> Option<&str> {
        match &self.requirement {
            VersionRequirement::FilePath(p) => Some(p),
            _ => None,
        }
    }
}

impl fmt::Display for ModVersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.requirement {
            VersionRequirement::Constraint(c) if c == LATEST_CONSTRAINT => {
                write!(f, "{}", self.name)
            }
            VersionRequirement::Constraint(c) => write!(f, "{}@{c}", self.name),
            VersionRequirement::Branch(b) => write!(f, "{}@{BRANCH_PREFIX}{b}", self.name),
            VersionRequirement::FilePath(p) => write!(f, "{}@{FILE_PREFIX}{p}", self.name),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ModDependencyPath
// ─────────────────────────────────────────────────────────────────────────────

/// The path under which an installed dependency mod is loaded: `path@vX.Y.Z`,
/// or a bare `path` for latest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModDependencyPath {
    /// The mod path.
    pub path: String,
    /// The installed version, absent for latest.
    pub version: Option<Version>,
}

impl ModDependencyPath {
    /// Parses `path@vX.Y.Z` or `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidDependencyPath`] when the version is
    /// not prefixed with `v` or is not a valid version.
    pub fn parse(s: &str) -> Result<Self, ResourceError> {
        let invalid = || ResourceError::InvalidDependencyPath(s.to_string());
        match s.split_once('@') {
            None if s.is_empty() => Err(invalid()),
            None => Ok(Self { path: s.to_string(), version: None }),
            Some((path, version)) => {
                if path.is_empty() || !version.starts_with('v') {
                    return Err(invalid());
                }
                let version = Version::parse(version).map_err(|_| invalid())?;
                Ok(Self { path: path.to_string(), version: Some(version) })
            }
        }
    }
}

impl fmt::Display for ModDependencyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}@v{v}", self.path),
            None => f.write_str(&self.path),
        }
    }
}

impl FromStr for ModDependencyPath {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PluginVersion
// ─────────────────────────────────────────────────────────────────────────────

/// A requirement on a plugin: `[org/]name[@constraint]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginVersion {
    /// The publishing org.
    pub org: String,
    /// The plugin name.
    pub name: String,
    /// The version constraint; `*` for latest.
    pub constraint: String,
}

impl PluginVersion {
    /// Parses a plugin requirement.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::InvalidPluginName`] for empty segments or extra slashes
    /// - [`ResourceError::InvalidConstraint`] for a malformed constraint
    pub fn parse(s: &str) -> Result<Self, ResourceError> {
        let invalid = || ResourceError::InvalidPluginName(s.to_string());
        let (full, constraint) = match s.split_once('@') {
            Some((full, c)) if c.is_empty() || c == "latest" => (full, LATEST_CONSTRAINT),
            Some((full, c)) => {
                validate_constraint(c)?;
                (full, c)
            }
            None => (s, LATEST_CONSTRAINT),
        };
        let (org, name) = match full.split('/').collect::<Vec<_>>().as_slice() {
            [name] => (DEFAULT_PLUGIN_ORG, *name),
            [org, name] => (*org, *name),
            _ => return Err(invalid()),
        };
        if org.is_empty() || name.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            org: org.to_string(),
            name: name.to_string(),
            constraint: constraint.to_string(),
        })
    }

    /// Returns `org/name`.
    #[must_use]
    pub fn short_name(&self) -> String {
        format!("{}/{}", self.org, self.name)
    }
}

impl fmt::Display for PluginVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.org, self.name, self.constraint)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Require
// ─────────────────────────────────────────────────────────────────────────────

/// A mod's declared requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Require {
    /// Minimum platform version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_version: Option<Version>,
    /// Required plugins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<PluginVersion>,
    /// Required mods.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mods: Vec<ModVersionConstraint>,
}

impl Require {
    /// Creates an empty requirement set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum platform version.
    #[must_use]
    pub fn with_min_version(mut self, version: Version) -> Self {
        self.min_version = Some(version);
        self
    }

    /// Adds a plugin requirement.
    #[must_use]
    pub fn with_plugin(mut self, plugin: PluginVersion) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Adds a mod requirement.
    #[must_use]
    pub fn with_mod(mut self, constraint: ModVersionConstraint) -> Self {
        self.mods.push(constraint);
        self
    }

    /// Returns `true` when nothing is required.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min_version.is_none() && self.plugins.is_empty() && self.mods.is_empty()
    }

    /// Checks that no mod or plugin is required twice.
    ///
    /// # Errors
    ///
    /// Returns the first duplicate found, mods before plugins.
    pub fn validate(&self) -> Result<(), ResourceError> {
        for (i, m) in self.mods.iter().enumerate() {
            if self.mods[..i].iter().any(|other| other.name == m.name) {
                return Err(ResourceError::DuplicateModDependency(m.name.clone()));
            }
        }
        for (i, p) in self.plugins.iter().enumerate() {
            if self.plugins[..i].iter().any(|other| other.org == p.org && other.name == p.name) {
                return Err(ResourceError::DuplicatePlugin(p.short_name()));
            }
        }
        Ok(())
    }

    /// Checks the running platform version against `min_version`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::PlatformVersionTooLow`] naming `mod_name`.
    pub fn validate_platform_version(
        &self,
        mod_name: &str,
        current: &Version,
    ) -> Result<(), ResourceError> {
        match &self.min_version {
            Some(required) if current < required => Err(ResourceError::PlatformVersionTooLow {
                mod_name: mod_name.to_string(),
                required: required.to_string(),
                current: current.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Returns `true` when `name` is required.
    #[must_use]
    pub fn contains_mod(&self, name: &str) -> bool {
        self.get_mod_dependency(name).is_some()
    }

    /// Returns the requirement on `name`.
    #[must_use]
    pub fn get_mod_dependency(&self, name: &str) -> Option<&ModVersionConstraint> {
        self.mods.iter().find(|m| m.name == name)
    }

    /// Adds requirements, replacing any existing requirement on the same mod.
    pub fn add_mod_dependencies<I>(&mut self, constraints: I)
    where
        I: IntoIterator<Item = ModVersionConstraint>,
    {
        for constraint in constraints {
            match self.mods.iter_mut().find(|m| m.name == constraint.name) {
                Some(existing) => *existing = constraint,
                None => self.mods.push(constraint),
            }
        }
    }

    /// Removes the requirements on the named mods.
    pub fn remove_mod_dependencies(&mut self, names: &[&str]) {
        self.mods.retain(|m| !names.contains(&m.name.as_str()));
    }

    /// Removes every mod requirement.
    pub fn remove_all_mod_dependencies(&mut self) {
        self.mods.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_parses_with_and_without_prefix() {
        assert_eq!(Version::parse("v1.2.3").unwrap(), Version::new(1, 2, 3));
        assert_eq!(Version::parse("0.20").unwrap(), Version::new(0, 20, 0));
        assert!(Version::parse("1.2.3.4").is_err());
        assert!(Version::parse("one").is_err());
    }

    #[test]
    fn constraint_syntax() {
        assert!(validate_constraint("^1.0").is_ok());
        assert!(validate_constraint(">=1.2, <2.0").is_ok());
        assert!(validate_constraint("1.x").is_ok());
        assert!(validate_constraint("*").is_ok());
        assert!(validate_constraint(">=abc").is_err());
        assert!(validate_constraint("").is_err());
    }

    #[test]
    fn spaced_and_prerelease_constraints() {
        assert!(validate_constraint(">= 1.0").is_ok());
        assert!(validate_constraint("^1.0.0-rc1").is_ok());
        assert!(validate_constraint(">=v1.2, < 2").is_ok());
        assert!(validate_constraint(">=").is_err());

        let spaced = ModVersionConstraint::parse("github.com/turbot/m@>= 1.0").unwrap();
        assert_eq!(spaced.constraint(), Some(">= 1.0"));
        assert!(spaced.matches(&Version::new(1, 4, 0)));
        assert!(!spaced.matches(&Version::new(0, 9, 0)));

        let rc = ModVersionConstraint::parse("m@^1.0.0-rc1").unwrap();
        assert!(rc.matches(&Version::parse("1.0.0-rc2").unwrap()));
        assert!(!ModVersionConstraint::parse("m@#main").unwrap().matches(&Version::new(1, 0, 0)));
    }

    #[test]
    fn prerelease_versions_order_before_release() {
        let rc = Version::parse("v1.0.0-rc1").unwrap();
        assert_eq!(rc.to_string(), "1.0.0-rc1");
        assert!(rc < Version::new(1, 0, 0));
        assert_eq!(Version::parse("2").unwrap(), Version::new(2, 0, 0));
        assert_eq!(Version::parse("1.2.3").unwrap().minor(), 2);
    }

    #[test]
    fn inline_and_separate_version_conflict() {
        let err = ModVersionConstraint::new("github.com/turbot/m@1.0", Some("2.0")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "both 'version' and a version constraint in the mod name are set: \
             'github.com/turbot/m@1.0'"
        );
    }

    #[test]
    fn version_forms() {
        assert!(ModVersionConstraint::new("m", Some("latest")).unwrap().is_latest());
        assert!(ModVersionConstraint::parse("m").unwrap().is_latest());
        assert_eq!(ModVersionConstraint::parse("m@#main").unwrap().branch(), Some("main"));
        let local = ModVersionConstraint::parse("m@file:../local").unwrap();
        assert_eq!(local.file_path(), Some("../local"));
        let caret = ModVersionConstraint::new("m", Some("^1.2")).unwrap();
        assert_eq!(caret.constraint(), Some("^1.2"));
        assert!(ModVersionConstraint::parse("m@").is_err());
        assert!(ModVersionConstraint::parse("@1.0").is_err());
    }

    #[test]
    fn dependency_path_requires_v_prefix() {
        let path = ModDependencyPath::parse("github.com/turbot/m@v1.2.3").unwrap();
        assert_eq!(path.version, Some(Version::new(1, 2, 3)));
        assert_eq!(path.to_string(), "github.com/turbot/m@v1.2.3");
        assert_eq!(ModDependencyPath::parse("github.com/turbot/m").unwrap().version, None);
        assert!(ModDependencyPath::parse("github.com/turbot/m@1.2.3").is_err());
    }

    #[test]
    fn plugin_org_defaults() {
        let plugin = PluginVersion::parse("aws@^0.90").unwrap();
        assert_eq!(plugin.org, DEFAULT_PLUGIN_ORG);
        assert_eq!(plugin.to_string(), "turbot/aws@^0.90");
        assert!(PluginVersion::parse("a/b/c").is_err());
    }

    #[test]
    fn duplicate_requirements_rejected() {
        let require = Require::new()
            .with_mod(ModVersionConstraint::parse("m@1.0").unwrap())
            .with_mod(ModVersionConstraint::parse("m@2.0").unwrap());
        assert_eq!(require.validate(), Err(ResourceError::DuplicateModDependency("m".into())));

        let require = Require::new()
            .with_plugin(PluginVersion::parse("aws").unwrap())
            .with_plugin(PluginVersion::parse("turbot/aws@1").unwrap());
        assert_eq!(require.validate(), Err(ResourceError::DuplicatePlugin("turbot/aws".into())));
    }

    #[test]
    fn mod_dependency_editing() {
        let mut require = Require::new().with_mod(ModVersionConstraint::parse("a@1.0").unwrap());
        require.add_mod_dependencies([
            ModVersionConstraint::parse("a@2.0").unwrap(),
            ModVersionConstraint::parse("b").unwrap(),
        ]);
        assert_eq!(require.mods.len(), 2);
        assert_eq!(require.get_mod_dependency("a").and_then(|m| m.constraint()), Some("2.0"));

        require.remove_mod_dependencies(&["a"]);
        assert!(!require.contains_mod("a"));
        require.remove_all_mod_dependencies();
        assert!(require.is_empty());
    }

    #[test]
    fn platform_version_check() {
        let require = Require::new().with_min_version(Version::new(0, 20, 0));
        assert!(require.validate_platform_version("m", &Version::new(0, 21, 0)).is_ok());
        assert!(matches!(
            require.validate_platform_version("m", &Version::new(0, 19, 5)),
            Err(ResourceError::PlatformVersionTooLow { .. })
        ));
    }
}
