//! Error types for the resource model and store.

use thiserror::Error;

use crate::range::DeclRange;

/// Errors raised while registering resources or building requirement data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    /// Two different blocks declared the same fully-qualified name.
    #[error("duplicate resource name '{name}': declared at {first} and {second}")]
    DuplicateResource {
        /// The colliding fully-qualified name.
        name: String,
        /// Where the name was first declared.
        first: DeclRange,
        /// Where the name was declared again.
        second: DeclRange,
    },

    /// A resource name does not follow `mod.kind.short` or `kind.short`.
    #[error("invalid resource name '{0}': expected 'mod.kind.name' or 'kind.name'")]
    InvalidName(String),

    /// A property path could not be parsed.
    #[error("invalid property path '{0}'")]
    InvalidPropertyPath(String),

    /// A name segment is not a known block type.
    #[error("unknown block type '{0}'")]
    UnknownBlockType(String),

    /// A mod name carried an inline version and a separate version was also given.
    #[error("both 'version' and a version constraint in the mod name are set: '{0}'")]
    ConflictingVersion(String),

    /// A `name@version` string was malformed.
    #[error("invalid mod name '{0}': expected 'name@version'")]
    InvalidModName(String),

    /// A version string was malformed.
    #[error("invalid version '{0}'")]
    InvalidVersion(String),

    /// A version constraint string was malformed.
    #[error("invalid version constraint '{0}'")]
    InvalidConstraint(String),

    /// A dependency path was malformed.
    #[error("invalid mod dependency path '{0}': expected 'path@vX.Y.Z' or 'path'")]
    InvalidDependencyPath(String),

    /// A plugin requirement was malformed.
    #[error("invalid plugin name '{0}': expected 'org/name' or 'name'")]
    InvalidPluginName(String),

    /// The same mod was required twice.
    #[error("mod '{0}' is required more than once")]
    DuplicateModDependency(String),

    /// The same plugin was required twice.
    #[error("plugin '{0}' is required more than once")]
    DuplicatePlugin(String),

    /// The running platform is older than the mod requires.
    #[error("mod '{mod_name}' requires platform version {required}, but {current} is running")]
    PlatformVersionTooLow {
        /// The mod declaring the requirement.
        mod_name: String,
        /// The minimum version declared.
        required: String,
        /// The running version.
        current: String,
    },
}

/// Errors converting between resources and dynamic values.
#[derive(Debug, Error)]
pub enum DynamicValueError {
    /// The resource could not be converted to a dynamic value.
    #[error("failed to convert '{name}' to a dynamic value: {source}")]
    Encode {
        /// The resource being converted.
        name: String,
        /// The underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// A dynamic value could not be decoded into a resource.
    #[error("failed to decode dynamic value: {0}")]
    Decode(#[from] serde_json::Error),
}
