//! The bridge between resolved resources and the expression evaluator's
//! dynamic values.
//!
//! A resource converts to a [`DynamicValue`] through its serde
//! representation, so the set of carried fields is exactly the set of
//! serialized fields. Every field round-trips, explicit `null` variable
//! values included, except the `base_resolved` marker, which describes
//! store state rather than the resource. Tree edges
//! are never part of a resource and are therefore never carried.
//!
//! A consumer holding a converted value still looks the authoritative
//! instance up by name before mutating it; the value is a snapshot.
//!
//! # Example
//!
//! ```
//! use modgraph_resource::prelude::*;
//!
//! let control = Control::new("m", "c1", DeclRange::line("mod.pp", 1)).with_sql("select 1");
//! let value = control.to_dynamic_value().unwrap();
//!
//! assert_eq!(value["sql"], "select 1");
//! assert_eq!(DynamicType::infer(&value["sql"]), DynamicType::String);
//! ```

use core::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::DynamicValueError;
use crate::mod_definition::Mod;
use crate::resource::{
    Benchmark, Control, Dashboard, DashboardPanel, HclResource, Local, Query, Resource, Variable,
};

/// The expression evaluator's value representation.
pub type DynamicValue = serde_json::Value;

/// Conversion of a resource into a [`DynamicValue`].
pub trait ToDynamicValue: Serialize + HclResource {
    /// Converts every serialized field.
    ///
    /// # Errors
    ///
    /// Returns [`DynamicValueError::Encode`] naming the resource.
    fn to_dynamic_value(&self) -> Result<DynamicValue, DynamicValueError> {
        serde_json::to_value(self).map_err(|source| DynamicValueError::Encode {
            name: self.name().to_string(),
            source,
        })
    }

    /// Converts every serialized field, degrading to an empty object on failure.
    fn to_dynamic_value_lossy(&self) -> DynamicValue {
        self.to_dynamic_value().unwrap_or_else(|err| {
            tracing::warn!(resource = self.name(), error = %err, "dynamic value conversion failed");
            DynamicValue::Object(serde_json::Map::new())
        })
    }

    /// The implied type of the converted value.
    fn implied_type(&self) -> DynamicType {
        DynamicType::infer(&self.to_dynamic_value_lossy())
    }
}

impl ToDynamicValue for Query {}
impl ToDynamicValue for Control {}
impl ToDynamicValue for Benchmark {}
impl ToDynamicValue for Dashboard {}
impl ToDynamicValue for DashboardPanel {}
impl ToDynamicValue for Variable {}
impl ToDynamicValue for Local {}
impl ToDynamicValue for Resource {}
impl ToDynamicValue for Mod {}

impl Resource {
    /// Decodes a value produced by [`ToDynamicValue::to_dynamic_value`] on a
    /// [`Resource`].
    ///
    /// # Errors
    ///
    /// Returns [`DynamicValueError::Decode`] when the value does not describe a resource.
    pub fn from_dynamic_value(value: &DynamicValue) -> Result<Self, DynamicValueError> {
        Ok(Resource::deserialize(value)?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DynamicType
// ─────────────────────────────────────────────────────────────────────────────

/// The type of a dynamic value, inferred from its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DynamicType {
    /// Unknown; the type of `null` and of elements of an empty list.
    Dynamic,
    /// A boolean.
    Bool,
    /// A number.
    Number,
    /// A string.
    String,
    /// A list whose elements share one type.
    List(Box<DynamicType>),
    /// A list with mixed element types.
    Tuple(Vec<DynamicType>),
    /// An object with typed attributes.
    Object(IndexMap<String, DynamicType>),
}

impl DynamicType {
    /// Infers the type of `value`.
    ///
    /// Lists of uniformly typed elements become [`DynamicType::List`];
    /// anything else becomes a [`DynamicType::Tuple`].
    #[must_use]
    pub fn infer(value: &DynamicValue) -> Self {
        match value {
            DynamicValue::Null => DynamicType::Dynamic,
            DynamicValue::Bool(_) => DynamicType::Bool,
            DynamicValue::Number(_) => DynamicType::Number,
            DynamicValue::String(_) => DynamicType::String,
            DynamicValue::Array(items) => {
                let types: Vec<_> = items.iter().map(Self::infer).collect();
                match types.split_first() {
                    None => DynamicType::List(Box::new(DynamicType::Dynamic)),
                    Some((first, rest)) if rest.iter().all(|t| t == first) => {
                        DynamicType::List(Box::new(first.clone()))
                    }
                    Some(_) => DynamicType::Tuple(types),
                }
            }
            DynamicValue::Object(attrs) => DynamicType::Object(
                attrs.iter().map(|(k, v)| (k.clone(), Self::infer(v))).collect(),
            ),
        }
    }

    /// Returns the attribute type of an object type.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&DynamicType> {
        match self {
            DynamicType::Object(attrs) => attrs.get(name),
            _ => None,
        }
    }
}

impl fmt::Display for DynamicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynamicType::Dynamic => f.write_str("dynamic"),
            DynamicType::Bool => f.write_str("bool"),
            DynamicType::Number => f.write_str("number"),
            DynamicType::String => f.write_str("string"),
            DynamicType::List(elem) => write!(f, "list({elem})"),
            DynamicType::Tuple(elems) => {
                f.write_str("tuple([")?;
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{elem}")?;
                }
                f.write_str("])")
            }
            DynamicType::Object(attrs) => {
                f.write_str("object({")?;
                for (i, (name, ty)) in attrs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{name}={ty}")?;
                }
                f.write_str("})")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::kind::PanelKind;
    use crate::range::DeclRange;
    use crate::resource::{ArgValue, QueryArgs};

    #[test]
    fn infers_nested_types() {
        let ty = DynamicType::infer(&json!({"a": [1, 2], "b": ["x", 1], "c": null, "d": []}));
        assert_eq!(
            ty.to_string(),
            "object({a=list(number),b=tuple([string,number]),c=dynamic,d=list(dynamic)})"
        );
        assert_eq!(ty.attribute("a"), Some(&DynamicType::List(Box::new(DynamicType::Number))));
    }

    #[test]
    fn resource_round_trips_through_dynamic_value() {
        let range = DeclRange::line("d.pp", 4);
        let mut panel = DashboardPanel::new(PanelKind::Chart, "m", "ch1", range)
            .with_sql("select $1")
            .scoped_to("m.dashboard.d1");
        panel.header.title = Some("Chart".into());
        panel.header.tags.insert("service".into(), "aws".into());
        panel.source.args = Some(
            QueryArgs::new()
                .with_positional(ArgValue::runtime("self.input.i1.value").unwrap())
                .with_named("limit", json!(10)),
        );
        panel.width = Some(6);
        let resource = Resource::from(panel);

        let value = resource.to_dynamic_value().unwrap();
        assert_eq!(value["resource_type"], "panel");
        assert_eq!(value["full_name"], "m.chart.ch1");

        let decoded = Resource::from_dynamic_value(&value).unwrap();
        assert_eq!(decoded, resource);
    }

    #[test]
    fn explicit_null_variable_default_survives() {
        let variable = Variable::new("m", "region", DeclRange::line("v.pp", 1));
        let resource = Resource::from(variable.with_default(serde_json::Value::Null));
        let value = resource.to_dynamic_value().unwrap();
        assert!(value["default"].is_null());
        assert!(value.get("value").is_none());

        let decoded = Resource::from_dynamic_value(&value).unwrap();
        assert_eq!(decoded, resource);
        let Resource::Variable(variable) = decoded else {
            panic!("expected a variable");
        };
        assert_eq!(variable.default, Some(serde_json::Value::Null));
        assert_eq!(variable.value, None);
    }

    #[test]
    fn resolved_marker_is_not_carried() {
        let mut query = Query::new("m", "q1", DeclRange::default());
        query.header.base_resolved = true;
        let value = query.to_dynamic_value().unwrap();
        assert!(value.get("base_resolved").is_none());
    }

    #[test]
    fn decoding_garbage_fails() {
        assert!(matches!(
            Resource::from_dynamic_value(&json!({"resource_type": "nonsense"})),
            Err(DynamicValueError::Decode(_))
        ));
    }
}
