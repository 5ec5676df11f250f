//! Runtime dependencies: values only known when the execution engine runs.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::name::ParsedPropertyPath;

/// The argument a runtime dependency feeds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgTarget {
    /// A named argument or parameter.
    Name(String),
    /// A positional argument.
    Index(usize),
}

impl fmt::Display for ArgTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgTarget::Name(name) => f.write_str(name),
            ArgTarget::Index(idx) => write!(f, "{idx}"),
        }
    }
}

/// "Argument `target` of resource `owner` cannot be resolved until the value at
/// `property_path` is known."
///
/// The source is typically a dashboard input, a `with` sub-query or a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuntimeDependency {
    /// The property the argument waits for.
    pub property_path: ParsedPropertyPath,
    /// Fully-qualified name of the resource owning the argument.
    pub owner: String,
    /// The argument being fed.
    pub target: ArgTarget,
}

impl RuntimeDependency {
    /// Creates a runtime dependency.
    #[must_use]
    pub fn new(
        property_path: ParsedPropertyPath,
        owner: impl Into<String>,
        target: ArgTarget,
    ) -> Self {
        Self {
            property_path,
            owner: owner.into(),
            target,
        }
    }
}

impl fmt::Display for RuntimeDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "arg.{}->{}", self.target, self.property_path)
    }
}
