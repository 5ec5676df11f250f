//! Fields shared by query providers: SQL, arguments, parameters and `with` blocks.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ResourceError;
use crate::name::ParsedPropertyPath;
use crate::runtime::{ArgTarget, RuntimeDependency};

/// The value of an argument or parameter default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgValue {
    /// A value known at load time.
    Value(serde_json::Value),
    /// A value only known at runtime, e.g. `self.input.i1.value`.
    Runtime(ParsedPropertyPath),
}

impl ArgValue {
    /// Creates a runtime reference from a property path string.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a valid property path.
    pub fn runtime(path: &str) -> Result<Self, ResourceError> {
        Ok(ArgValue::Runtime(ParsedPropertyPath::parse(path)?))
    }

    /// Returns the referenced property path for runtime values.
    #[must_use]
    pub fn runtime_path(&self) -> Option<&ParsedPropertyPath> {
        match self {
            ArgValue::Runtime(path) => Some(path),
            ArgValue::Value(_) => None,
        }
    }
}

impl From<serde_json::Value> for ArgValue {
    fn from(value: serde_json::Value) -> Self {
        ArgValue::Value(value)
    }
}

/// Arguments passed to a query provider, by name and by position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryArgs {
    /// Named arguments.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub named: IndexMap<String, ArgValue>,
    /// Positional arguments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub positional: Vec<ArgValue>,
}

impl QueryArgs {
    /// Creates an empty argument set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named argument.
    #[must_use]
    pub fn with_named(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.named.insert(name.into(), value.into());
        self
    }

    /// Appends a positional argument.
    #[must_use]
    pub fn with_positional(mut self, value: impl Into<ArgValue>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Returns true if there are no arguments of either form.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.positional.is_empty()
    }

    /// Extracts the runtime dependencies of runtime-valued arguments.
    #[must_use]
    pub fn runtime_dependencies(&self, owner: &str) -> Vec<RuntimeDependency> {
        let named = self.named.iter().filter_map(|(name, value)| {
            value.runtime_path().map(|path| {
                RuntimeDependency::new(path.clone(), owner, ArgTarget::Name(name.clone()))
            })
        });
        let positional = self.positional.iter().enumerate().filter_map(|(idx, value)| {
            value
                .runtime_path()
                .map(|path| RuntimeDependency::new(path.clone(), owner, ArgTarget::Index(idx)))
        });
        named.chain(positional).collect()
    }
}

/// A parameter a query provider declares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDef {
    /// Parameter name.
    pub name: String,
    /// Parameter description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Default value, possibly a runtime reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ArgValue>,
}

impl ParamDef {
    /// Creates a parameter with no description or default.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            default: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<ArgValue>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// SQL, arguments, parameters and `with` blocks of a query provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuerySource {
    /// Inline SQL text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    /// Fully-qualified name of a named query to run instead of inline SQL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Arguments for the SQL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<QueryArgs>,
    /// Declared parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamDef>,
    /// Fully-qualified names of the `with` blocks scoped to this resource.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub withs: Vec<String>,
    /// Search path override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_path: Option<String>,
    /// Search path prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_path_prefix: Option<String>,
}

impl QuerySource {
    /// Returns the parameter named `name`.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&ParamDef> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Returns true if `with_name` (full or short) is one of this resource's `with` blocks.
    #[must_use]
    pub fn has_with(&self, with_name: &str) -> bool {
        self.withs
            .iter()
            .any(|w| w == with_name || w.rsplit('.').next() == Some(with_name))
    }

    /// Extracts runtime dependencies from arguments and parameter defaults.
    #[must_use]
    pub fn runtime_dependencies(&self, owner: &str) -> Vec<RuntimeDependency> {
        let mut deps = self
            .args
            .as_ref()
            .map(|args| args.runtime_dependencies(owner))
            .unwrap_or_default();
        for param in &self.params {
            if let Some(path) = param.default.as_ref().and_then(ArgValue::runtime_path) {
                deps.push(RuntimeDependency::new(
                    path.clone(),
                    owner,
                    ArgTarget::Name(param.name.clone()),
                ));
            }
        }
        deps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn runtime_dependencies_cover_named_positional_and_params() {
        let source = QuerySource {
            sql: Some("select $1".into()),
            args: Some(
                QueryArgs::new()
                    .with_named("region", ArgValue::runtime("self.input.region.value").unwrap())
                    .with_named("limit", json!(10))
                    .with_positional(json!("a"))
                    .with_positional(ArgValue::runtime("with.w1.rows").unwrap()),
            ),
            params: vec![
                ParamDef::new("p1").with_default(ArgValue::runtime("input.global.value").unwrap()),
                ParamDef::new("p2").with_default(json!(1)),
            ],
            ..QuerySource::default()
        };

        let deps: Vec<String> = source
            .runtime_dependencies("m.chart.c1")
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            deps,
            vec![
                "arg.region->self.input.region.value",
                "arg.1->with.w1.rows",
                "arg.p1->input.global.value",
            ]
        );
    }

    #[test]
    fn has_with_matches_full_and_short_names() {
        let source = QuerySource {
            withs: vec!["m.with.w1".into()],
            ..QuerySource::default()
        };
        assert!(source.has_with("m.with.w1"));
        assert!(source.has_with("w1"));
        assert!(!source.has_with("w2"));
    }
}
