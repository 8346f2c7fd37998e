#[cfg(test)]
mod pointer_test;
mod step;

use crate::{
    schema::{Container, Property},
    Cause, Components, Index, SyntaxError, Token,
};
use core::{
    fmt,
    hash::{Hash, Hasher},
};
use std::sync::Arc;

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                   Pointer                                    ║
║                                  ¯¯¯¯¯¯¯¯¯                                   ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// A JSON Pointer (RFC 6901) resolved against a record-type schema.
///
/// A `Pointer` is one node of an immutable chain running from a root node
/// (bound to the schema's top-level [`Container`]) to the node addressed by
/// the last token. Every node knows the schema [`Property`] it addresses and
/// whether it stands for one element of an array or map. Cloning a `Pointer`
/// is cheap and the chain may be shared between threads; it holds no record
/// data, so it can be applied to any number of records of the same type.
///
/// ## Example
/// ```rust
/// use schemaptr::{schema::{Container, Property, ValueKind}, Pointer};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let schema = Arc::new(Container::new().with(
///     Property::object(
///         "items",
///         Container::new().with(Property::scalar("quantity", ValueKind::Number)),
///     )
///     .array(),
/// ));
///
/// let ptr = Pointer::parse(&schema, "/items/0/quantity").unwrap();
/// assert_eq!(ptr.property_path(), "items.quantity");
///
/// let order = json!({ "items": [{ "quantity": 2 }] });
/// assert_eq!(ptr.get_value(&order).unwrap(), Some(&json!(2)));
/// ```
#[derive(Clone)]
pub struct Pointer(Arc<Node>);

struct Node {
    parent: Option<Pointer>,
    property: Option<Arc<Property>>,
    property_path: String,
    element: Option<Element>,
    children: Option<Arc<Container>>,
    encoded: String,
    depth: usize,
    dash: Dash,
}

/// Whether the `-` array index is accepted while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dash {
    /// `-` may be the last token, addressing the append position.
    #[default]
    Allow,
    /// `-` is rejected with [`Cause::DashNotAllowed`].
    Disallow,
}

/// The element of a collection addressed by a collection element node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Element {
    /// An array index, or `-` for the position after the last element.
    Index(Index),
    /// A map key.
    Key(String),
}

impl Element {
    /// Returns the array index, if this is an array element.
    pub fn as_index(&self) -> Option<Index> {
        match self {
            Self::Index(index) => Some(*index),
            Self::Key(_) => None,
        }
    }

    /// Returns the map key, if this is a map element.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Index(_) => None,
            Self::Key(key) => Some(key),
        }
    }

    /// Returns `true` if this is the `-` array index.
    pub fn is_next(&self) -> bool {
        matches!(self, Self::Index(Index::Next))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => fmt::Display::fmt(index, f),
            Self::Key(key) => f.write_str(key),
        }
    }
}

impl Pointer {
    /// Creates the root pointer (`""`) of `schema`, addressing the whole
    /// record.
    pub fn root(schema: Arc<Container>) -> Self {
        Self::new_root(schema, Dash::Allow)
    }

    fn new_root(schema: Arc<Container>, dash: Dash) -> Self {
        Pointer(Arc::new(Node {
            parent: None,
            property: None,
            property_path: String::new(),
            element: None,
            children: Some(schema),
            encoded: String::new(),
            depth: 0,
            dash,
        }))
    }

    /// Parses `s` against `schema`, accepting `-` as the final array index.
    ///
    /// ## Errors
    /// Returns [`SyntaxError`] if `s` is not a valid pointer or names
    /// something `schema` does not declare.
    pub fn parse(schema: &Arc<Container>, s: &str) -> Result<Self, SyntaxError> {
        Self::parse_with(schema, s, Dash::Allow)
    }

    /// Parses `s` against `schema` with an explicit [`Dash`] policy, which is
    /// inherited by pointers later created with
    /// [`Self::create_child_pointer`].
    ///
    /// ```
    /// # use schemaptr::{schema::{Container, Property, ValueKind}, Cause, Dash, Pointer};
    /// # use std::sync::Arc;
    /// let schema = Arc::new(Container::new().with(Property::scalar("tags", ValueKind::String).array()));
    /// assert!(Pointer::parse_with(&schema, "/tags/-", Dash::Allow).is_ok());
    /// let err = Pointer::parse_with(&schema, "/tags/-", Dash::Disallow).unwrap_err();
    /// assert_eq!(err.cause(), &Cause::DashNotAllowed);
    /// ```
    ///
    /// ## Errors
    /// Returns [`SyntaxError`] if `s` is not a valid pointer or names
    /// something `schema` does not declare.
    pub fn parse_with(schema: &Arc<Container>, s: &str, dash: Dash) -> Result<Self, SyntaxError> {
        let mut ptr = Self::new_root(schema.clone(), dash);
        if s.is_empty() {
            return Ok(ptr);
        }
        let Some(tokens) = s.strip_prefix('/') else {
            return Err(SyntaxError::new(s, 0, Cause::NoLeadingSlash));
        };
        let mut offset = 0;
        for raw in tokens.split('/') {
            let token = Token::from_encoded(raw)
                .map_err(|source| SyntaxError::new(s, offset, Cause::InvalidEncoding(source)))?;
            ptr = ptr
                .step(&token)
                .map_err(|cause| SyntaxError::new(s, offset, cause))?;
            offset += 1 + raw.len();
        }
        Ok(ptr)
    }

    /// Resolves a single unencoded token below this pointer, as if the
    /// pointer string had been parsed with the token appended.
    ///
    /// ```
    /// # use schemaptr::{schema::{Container, Property, ValueKind}, Pointer};
    /// # use std::sync::Arc;
    /// let schema = Arc::new(Container::new().with(Property::scalar("attrs", ValueKind::String).map()));
    /// let attrs = Pointer::parse(&schema, "/attrs").unwrap();
    /// let child = attrs.create_child_pointer("a/b").unwrap();
    /// assert_eq!(child.as_str(), "/attrs/a~1b");
    /// assert!(child.is_child_of(&attrs));
    /// ```
    ///
    /// ## Errors
    /// Returns [`SyntaxError`] under the same rules as [`Self::parse`]; its
    /// pointer is the full string of the would-be child.
    pub fn create_child_pointer(&self, token: &str) -> Result<Self, SyntaxError> {
        let token = Token::new(token);
        self.step(&token).map_err(|cause| {
            let pointer = format!("{}/{}", self.as_str(), token.encoded());
            SyntaxError::new(pointer, self.as_str().len(), cause)
        })
    }

    fn step(&self, token: &Token<'_>) -> Result<Self, Cause> {
        let resolved = step::resolve(self, &token.decoded())?;
        let mut encoded = String::with_capacity(self.0.encoded.len() + 1 + token.encoded().len());
        encoded.push_str(&self.0.encoded);
        encoded.push('/');
        encoded.push_str(token.encoded());
        log::trace!(
            "resolved \"{encoded}\" to property \"{}\"",
            resolved.property_path
        );
        Ok(Pointer(Arc::new(Node {
            parent: Some(self.clone()),
            property: Some(resolved.property),
            property_path: resolved.property_path,
            element: resolved.element,
            children: resolved.children,
            encoded,
            depth: self.0.depth + 1,
            dash: self.0.dash,
        })))
    }

    /// Returns `true` if this pointer addresses the whole record (`""`).
    pub fn is_root(&self) -> bool {
        self.0.parent.is_none()
    }

    /// Returns `true` if `other` is a proper ancestor of this pointer, i.e.
    /// this pointer's tokens extend `other`'s.
    ///
    /// Like equality, this compares pointer strings only; the schemas the
    /// two pointers were parsed against are not consulted.
    pub fn is_child_of(&self, other: &Pointer) -> bool {
        let (this, other) = (self.as_str(), other.as_str());
        this.len() > other.len()
            && this.starts_with(other)
            && this.as_bytes()[other.len()] == b'/'
    }

    /// The pointer one token up the chain, or `None` for the root.
    pub fn parent(&self) -> Option<&Pointer> {
        self.0.parent.as_ref()
    }

    /// The schema property this pointer addresses, or `None` for the root.
    ///
    /// Collection element pointers share the property of their collection.
    pub fn property_descriptor(&self) -> Option<&Arc<Property>> {
        self.0.property.as_ref()
    }

    /// Dotted schema path of the addressed property (`""` for the root).
    ///
    /// Unlike the pointer string, the path carries no array indexes or map
    /// keys: `/items/0/quantity` has the path `items.quantity`.
    pub fn property_path(&self) -> &str {
        &self.0.property_path
    }

    /// Returns `true` if this pointer addresses one element of an array or
    /// map rather than the collection property itself.
    pub fn is_collection_element(&self) -> bool {
        self.0.element.is_some()
    }

    /// The index or key of the addressed element, if
    /// [`Self::is_collection_element`].
    pub fn element_index(&self) -> Option<&Element> {
        self.0.element.as_ref()
    }

    /// The schema container describing properties below this pointer, or
    /// `None` if the addressed value cannot have properties.
    pub fn children_container(&self) -> Option<&Arc<Container>> {
        self.0.children.as_ref()
    }

    /// The RFC 6901 encoded pointer string.
    pub fn as_str(&self) -> &str {
        &self.0.encoded
    }

    /// The number of tokens in the pointer.
    pub fn depth(&self) -> usize {
        self.0.depth
    }

    /// Iterates over the chain from the root to this pointer, inclusive.
    pub fn components(&self) -> Components<'_> {
        Components::new(self)
    }

    pub(crate) fn dash(&self) -> Dash {
        self.0.dash
    }

    /// Name of the record field holding the addressed value, or of the
    /// collection holding the addressed element.
    pub(crate) fn field_name(&self) -> &str {
        self.0.property.as_deref().map_or("", Property::name)
    }
}

/// Pointers are equal when their encoded strings are. Pointers parsed
/// against different schemas, or with different [`Dash`] policies, compare
/// equal if their strings match.
impl PartialEq for Pointer {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Pointer {}

impl PartialEq<str> for Pointer {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Pointer {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Hashes the encoded string, consistent with [`PartialEq`].
impl Hash for Pointer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl AsRef<str> for Pointer {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Debug for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pointer").field(&self.as_str()).finish()
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Pointer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
