//! Mod variables and locals.

use serde::{Deserialize, Deserializer, Serialize};

use crate::kind::ResourceKind;
use crate::range::DeclRange;
use crate::resource::header::ResourceHeader;

/// A mod variable, settable by the user or by a depending mod.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Identity and metadata.
    #[serde(flatten)]
    pub header: ResourceHeader,
    /// Declared type constraint, e.g. `string` or `list(number)`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub var_type: Option<String>,
    /// Declared default; `Some(Null)` is an explicit `null` default.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<serde_json::Value>,
    /// The value in effect after variable resolution.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<serde_json::Value>,
}

/// Reads a present field as `Some`, `null` included; absent fields stay `None`.
fn present_value<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

impl Variable {
    /// Creates a variable `short_name` in `mod_name`.
    #[must_use]
    pub fn new(mod_name: &str, short_name: &str, decl_range: DeclRange) -> Self {
        Self {
            header: ResourceHeader::new(mod_name, ResourceKind::Variable, short_name, decl_range),
            var_type: None,
            default: None,
            value: None,
        }
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// A mod local: a named expression value visible only inside its mod.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Local {
    /// Identity and metadata.
    #[serde(flatten)]
    pub header: ResourceHeader,
    /// The evaluated value.
    pub value: serde_json::Value,
}

impl Local {
    /// Creates a local `short_name` in `mod_name` holding `value`.
    #[must_use]
    pub fn new(
        mod_name: &str,
        short_name: &str,
        decl_range: DeclRange,
        value: serde_json::Value,
    ) -> Self {
        Self {
            header: ResourceHeader::new(mod_name, ResourceKind::Local, short_name, decl_range),
            value,
        }
    }
}
