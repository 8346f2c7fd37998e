//! Record-type schemas that pointers are resolved against.
//!
//! A schema is a tree of [`Container`]s. Each container describes the
//! properties of one object shape; properties whose values are objects carry
//! a nested container of their own. A container is either
//! [`Container::Plain`], or [`Container::Polymorphic`] when the concrete shape
//! of the object depends on the value of a discriminator property.
//!
//! ```
//! # use schemaptr::schema::{Container, Polymorphic, Property, ValueKind};
//! let event = Polymorphic::new("eventType")
//!     .with_subtype("OPENED", Container::new().with(Property::scalar("byWho", ValueKind::String)))
//!     .with_subtype("CLOSED", Container::new().with(Property::scalar("reason", ValueKind::String)));
//!
//! let order = Container::new()
//!     .with(Property::scalar("id", ValueKind::String))
//!     .with(Property::object("events", event).array());
//!
//! assert!(order.has_property("events"));
//! assert!(order.property("events").unwrap().is_array());
//! ```

#[cfg(feature = "serde")]
mod def;
#[cfg(feature = "serde")]
pub use def::SchemaError;

use std::{collections::BTreeMap, fmt, sync::Arc};

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                   Property                                   ║
║                                  ¯¯¯¯¯¯¯¯¯¯                                  ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// The kind of a property's (or collection element's) value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// A string.
    String,
    /// A number.
    Number,
    /// A boolean.
    Boolean,
    /// A nested object with its own properties.
    Object,
    /// Any value; not descended into.
    Any,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Any => "any",
        })
    }
}

/// Whether a property holds a single value, an array or a string-keyed map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cardinality {
    /// A single value.
    #[default]
    Single,
    /// An ordered sequence of values.
    Array,
    /// A map of string keys to values.
    Map,
}

/// Describes one property of a [`Container`].
#[derive(Debug, Clone)]
pub struct Property {
    name: String,
    kind: ValueKind,
    cardinality: Cardinality,
    nested: Option<Arc<Container>>,
}

impl Property {
    /// Creates a single-valued property of the given kind.
    ///
    /// A property of kind [`ValueKind::Object`] created this way has no
    /// nested properties; use [`Self::object`] to describe them.
    pub fn scalar(name: impl Into<String>, kind: ValueKind) -> Self {
        let nested = (kind == ValueKind::Object).then(|| Arc::new(Container::new()));
        Self {
            name: name.into(),
            kind,
            cardinality: Cardinality::Single,
            nested,
        }
    }

    /// Creates a single-valued object property described by `container`.
    pub fn object(name: impl Into<String>, container: impl Into<Container>) -> Self {
        Self {
            name: name.into(),
            kind: ValueKind::Object,
            cardinality: Cardinality::Single,
            nested: Some(Arc::new(container.into())),
        }
    }

    /// Turns the property into an array of its value kind.
    pub fn array(mut self) -> Self {
        self.cardinality = Cardinality::Array;
        self
    }

    /// Turns the property into a string-keyed map of its value kind.
    pub fn map(mut self) -> Self {
        self.cardinality = Cardinality::Map;
        self
    }

    /// The property name, as used for the record field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kind of the value, or of each element for collections.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Single, array or map.
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Returns `true` if the property is an array.
    pub fn is_array(&self) -> bool {
        self.cardinality == Cardinality::Array
    }

    /// Returns `true` if the property is a map.
    pub fn is_map(&self) -> bool {
        self.cardinality == Cardinality::Map
    }

    /// The container describing the nested properties, present only for
    /// object-valued properties.
    pub fn nested(&self) -> Option<&Arc<Container>> {
        self.nested.as_ref()
    }
}

/// A set of properties keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Properties(BTreeMap<String, Arc<Property>>);

impl Properties {
    /// Adds a property, replacing any property of the same name.
    pub fn insert(&mut self, property: Property) {
        self.0.insert(property.name.clone(), Arc::new(property));
    }

    /// Looks up a property by name.
    pub fn get(&self, name: &str) -> Option<&Arc<Property>> {
        self.0.get(name)
    }

    /// Iterates over the properties in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Property>> {
        self.0.values()
    }

    /// The number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no properties.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                  Container                                   ║
║                                 ¯¯¯¯¯¯¯¯¯¯¯                                  ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// Describes the properties reachable below a schema node.
#[derive(Debug, Clone)]
pub enum Container {
    /// An object with a fixed set of properties.
    Plain(Properties),
    /// An object whose shape varies by a discriminator property.
    Polymorphic(Polymorphic),
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// Creates an empty plain container.
    pub fn new() -> Self {
        Self::Plain(Properties::default())
    }

    /// Adds a property. For polymorphic containers the property is common to
    /// every subtype.
    pub fn with(mut self, property: Property) -> Self {
        match &mut self {
            Self::Plain(properties) => properties.insert(property),
            Self::Polymorphic(poly) => poly.properties.insert(property),
        }
        self
    }

    /// Returns `true` if `name` is a property of this container.
    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    /// Looks up a property by name.
    ///
    /// Subtype-specific properties of a polymorphic container are not found
    /// here; see [`Polymorphic::subtype`].
    pub fn property(&self, name: &str) -> Option<&Arc<Property>> {
        match self {
            Self::Plain(properties) => properties.get(name),
            Self::Polymorphic(poly) => poly.property(name),
        }
    }

    /// Returns the polymorphic capability of this container, if it has it.
    pub fn as_polymorphic(&self) -> Option<&Polymorphic> {
        match self {
            Self::Plain(_) => None,
            Self::Polymorphic(poly) => Some(poly),
        }
    }

    /// Returns `true` if this container is polymorphic.
    pub fn is_polymorphic(&self) -> bool {
        matches!(self, Self::Polymorphic(_))
    }
}

impl From<Polymorphic> for Container {
    fn from(value: Polymorphic) -> Self {
        Self::Polymorphic(value)
    }
}

/// The polymorphic capability of a [`Container`].
#[derive(Debug, Clone)]
pub struct Polymorphic {
    type_property: Arc<Property>,
    properties: Properties,
    subtypes: BTreeMap<String, Arc<Container>>,
}

impl Polymorphic {
    /// Creates a polymorphic object discriminated by the string property
    /// `type_property`.
    pub fn new(type_property: impl Into<String>) -> Self {
        Self {
            type_property: Arc::new(Property::scalar(type_property, ValueKind::String)),
            properties: Properties::default(),
            subtypes: BTreeMap::new(),
        }
    }

    /// Adds a property common to every subtype.
    pub fn with(mut self, property: Property) -> Self {
        self.properties.insert(property);
        self
    }

    /// Declares a subtype and the properties only it has.
    pub fn with_subtype(mut self, name: impl Into<String>, container: impl Into<Container>) -> Self {
        self.subtypes.insert(name.into(), Arc::new(container.into()));
        self
    }

    /// The discriminator property.
    pub fn type_property(&self) -> &Arc<Property> {
        &self.type_property
    }

    /// Looks up a common property or the discriminator by name.
    pub fn property(&self, name: &str) -> Option<&Arc<Property>> {
        if name == self.type_property.name() {
            Some(&self.type_property)
        } else {
            self.properties.get(name)
        }
    }

    /// The container of the subtype called `name`.
    pub fn subtype(&self, name: &str) -> Option<&Arc<Container>> {
        self.subtypes.get(name)
    }

    /// Iterates over the subtype names in order.
    pub fn subtypes(&self) -> impl Iterator<Item = &str> {
        self.subtypes.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> Polymorphic {
        Polymorphic::new("eventType")
            .with(Property::scalar("happenedOn", ValueKind::String))
            .with_subtype(
                "OPENED",
                Container::new().with(Property::scalar("byWho", ValueKind::String)),
            )
            .with_subtype(
                "CLOSED",
                Container::new().with(Property::scalar("reason", ValueKind::String)),
            )
    }

    #[test]
    fn property_shapes() {
        let tags = Property::scalar("tags", ValueKind::String).array();
        assert!(tags.is_array());
        assert!(!tags.is_map());
        assert!(tags.nested().is_none());

        let attrs = Property::scalar("attrs", ValueKind::Any).map();
        assert_eq!(attrs.cardinality(), Cardinality::Map);

        let meta = Property::scalar("meta", ValueKind::Object);
        assert!(meta.nested().unwrap().property("anything").is_none());

        let item = Property::object(
            "items",
            Container::new().with(Property::scalar("quantity", ValueKind::Number)),
        )
        .array();
        assert_eq!(item.kind(), ValueKind::Object);
        assert!(item.nested().unwrap().has_property("quantity"));
    }

    #[test]
    fn polymorphic_lookup() {
        let container = Container::from(event());
        assert!(container.is_polymorphic());
        assert!(container.has_property("eventType"));
        assert!(container.has_property("happenedOn"));
        assert!(!container.has_property("byWho"));

        let poly = container.as_polymorphic().unwrap();
        assert_eq!(poly.type_property().name(), "eventType");
        assert_eq!(poly.type_property().kind(), ValueKind::String);
        assert_eq!(poly.subtypes().collect::<Vec<_>>(), vec!["CLOSED", "OPENED"]);
        assert!(poly.subtype("OPENED").unwrap().has_property("byWho"));
        assert!(poly.subtype("REOPENED").is_none());
    }

    #[test]
    fn plain_has_no_polymorphic_capability() {
        let container = Container::new().with(Property::scalar("id", ValueKind::String));
        assert!(container.as_polymorphic().is_none());
        let Container::Plain(properties) = &container else {
            panic!("expected a plain container");
        };
        assert_eq!(properties.len(), 1);
        assert_eq!(properties.iter().next().unwrap().name(), "id");
    }
}
