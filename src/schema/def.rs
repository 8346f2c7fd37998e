//! Loading schemas from definition documents.
//!
//! ```json
//! {
//!   "properties": {
//!     "id":     { "valueType": "string" },
//!     "tags":   { "valueType": "string[]" },
//!     "items":  { "valueType": "object[]", "properties": { "quantity": { "valueType": "number" } } },
//!     "events": {
//!       "valueType": "object[]",
//!       "typeProperty": "eventType",
//!       "subtypes": { "OPENED": { "properties": { "byWho": { "valueType": "string" } } } }
//!     }
//!   }
//! }
//! ```
//!
//! A `valueType` is one of `string`, `number`, `boolean`, `object` or `any`,
//! optionally suffixed with `[]` for arrays or `{}` for maps.

use super::{Cardinality, Container, Polymorphic, Properties, Property, ValueKind};
use serde::Deserialize;
use std::{collections::BTreeMap, fmt, sync::Arc};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ContainerDef {
    #[serde(default)]
    properties: BTreeMap<String, PropertyDef>,
    #[serde(default)]
    type_property: Option<String>,
    #[serde(default)]
    subtypes: BTreeMap<String, ContainerDef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PropertyDef {
    value_type: String,
    #[serde(default)]
    properties: Option<BTreeMap<String, PropertyDef>>,
    #[serde(default)]
    type_property: Option<String>,
    #[serde(default)]
    subtypes: Option<BTreeMap<String, ContainerDef>>,
}

impl ContainerDef {
    fn build(self, path: &str) -> Result<Container, SchemaError> {
        let mut properties = Properties::default();
        for (name, def) in self.properties {
            properties.insert(def.build(name, path)?);
        }
        let Some(type_property) = self.type_property else {
            if !self.subtypes.is_empty() {
                return Err(SchemaError::SubtypesWithoutTypeProperty {
                    path: path.to_owned(),
                });
            }
            return Ok(Container::Plain(properties));
        };
        let mut poly = Polymorphic::new(type_property);
        poly.properties = properties;
        for (subtype, def) in self.subtypes {
            let container = def.build(&join(path, &subtype))?;
            poly.subtypes.insert(subtype, Arc::new(container));
        }
        Ok(Container::Polymorphic(poly))
    }
}

impl PropertyDef {
    fn build(self, name: String, parent: &str) -> Result<Property, SchemaError> {
        let path = join(parent, &name);
        let (kind, cardinality) = parse_value_type(&self.value_type).ok_or_else(|| {
            SchemaError::UnknownValueType {
                path: path.clone(),
                value_type: self.value_type.clone(),
            }
        })?;
        let has_nested =
            self.properties.is_some() || self.type_property.is_some() || self.subtypes.is_some();
        let mut property = match kind {
            ValueKind::Object => {
                let nested = ContainerDef {
                    properties: self.properties.unwrap_or_default(),
                    type_property: self.type_property,
                    subtypes: self.subtypes.unwrap_or_default(),
                };
                Property::object(name, nested.build(&path)?)
            }
            _ if has_nested => return Err(SchemaError::UnexpectedProperties { path }),
            scalar => Property::scalar(name, scalar),
        };
        property.cardinality = cardinality;
        Ok(property)
    }
}

fn parse_value_type(s: &str) -> Option<(ValueKind, Cardinality)> {
    let (kind, cardinality) = if let Some(kind) = s.strip_suffix("[]") {
        (kind, Cardinality::Array)
    } else if let Some(kind) = s.strip_suffix("{}") {
        (kind, Cardinality::Map)
    } else {
        (s, Cardinality::Single)
    };
    let kind = match kind {
        "string" => ValueKind::String,
        "number" => ValueKind::Number,
        "boolean" => ValueKind::Boolean,
        "object" => ValueKind::Object,
        "any" => ValueKind::Any,
        _ => return None,
    };
    Some((kind, cardinality))
}

fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_owned()
    } else {
        format!("{parent}.{name}")
    }
}

impl Container {
    /// Builds a schema from a JSON definition document.
    ///
    /// ## Errors
    /// Returns [`SchemaError`] if the document is not a valid definition.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, SchemaError> {
        let def: ContainerDef = serde_json::from_value(value)?;
        def.build("")
    }

    /// Builds a schema from JSON definition text.
    ///
    /// ## Errors
    /// Returns [`SchemaError`] if the text is not a valid definition.
    pub fn from_json_str(s: &str) -> Result<Self, SchemaError> {
        let def: ContainerDef = serde_json::from_str(s)?;
        def.build("")
    }

    /// Builds a schema from TOML definition text.
    ///
    /// ## Errors
    /// Returns [`SchemaError`] if the text is not a valid definition.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> Result<Self, SchemaError> {
        let def: ContainerDef = toml::from_str(s)?;
        def.build("")
    }
}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                 SchemaError                                  ║
║                                ¯¯¯¯¯¯¯¯¯¯¯¯¯                                 ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// Indicates that a schema definition document could not be loaded.
#[derive(Debug)]
pub enum SchemaError {
    /// The document could not be deserialized from JSON.
    Json(serde_json::Error),
    /// The document could not be deserialized from TOML.
    #[cfg(feature = "toml")]
    Toml(toml::de::Error),
    /// A `valueType` is not recognized.
    UnknownValueType {
        /// Dotted path of the property.
        path: String,
        /// The unrecognized value type.
        value_type: String,
    },
    /// A non-object property declares nested properties or subtypes.
    UnexpectedProperties {
        /// Dotted path of the property.
        path: String,
    },
    /// `subtypes` were declared without a `typeProperty`.
    SubtypesWithoutTypeProperty {
        /// Dotted path of the object.
        path: String,
    },
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

#[cfg(feature = "toml")]
impl From<toml::de::Error> for SchemaError {
    fn from(err: toml::de::Error) -> Self {
        Self::Toml(err)
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid schema definition: {err}"),
            #[cfg(feature = "toml")]
            Self::Toml(err) => write!(f, "invalid schema definition: {err}"),
            Self::UnknownValueType { path, value_type } => {
                write!(f, "property \"{path}\" has unknown value type \"{value_type}\"")
            }
            Self::UnexpectedProperties { path } => {
                write!(f, "property \"{path}\" is not an object and cannot have nested properties")
            }
            Self::SubtypesWithoutTypeProperty { path } => {
                write!(f, "object \"{path}\" declares subtypes without a type property")
            }
        }
    }
}

impl std::error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            #[cfg(feature = "toml")]
            Self::Toml(err) => Some(err),
            _ => None,
        }
    }
}
