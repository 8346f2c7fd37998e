use crate::{schema::Cardinality, DataError, Element, Index, OutOfBoundsError, Pointer};
use serde_json::{Map, Value};

static NULL: Value = Value::Null;

/// The value produced at one node while walking a chain.
#[derive(Debug, Clone, Copy)]
enum Cursor<'v> {
    Found(&'v Value),
    /// A `null` or missing collection stood in for by an empty one so the walk
    /// can continue. Never written to the record.
    EmptyArray,
    EmptyMap,
    /// An array or map element that does not exist.
    Absent,
}

impl<'v> Cursor<'v> {
    fn container(self) -> Option<&'v Value> {
        match self {
            Self::Found(value) => Some(value),
            Self::EmptyArray | Self::EmptyMap | Self::Absent => None,
        }
    }
}

impl Pointer {
    /// Reads the value this pointer addresses in `record`.
    ///
    /// Returns `Some(&Value::Null)` for an unset property and `None` for an
    /// array or map element that does not exist (including the `-` index).
    /// An unset intermediate array or map is read as empty, without changing
    /// `record`.
    ///
    /// ```
    /// # use schemaptr::{schema::{Container, Property, ValueKind}, Pointer};
    /// # use serde_json::{json, Value};
    /// # use std::sync::Arc;
    /// let schema = Arc::new(
    ///     Container::new()
    ///         .with(Property::scalar("note", ValueKind::String))
    ///         .with(Property::scalar("tags", ValueKind::String).array()),
    /// );
    /// let record = json!({ "tags": ["a"] });
    ///
    /// let note = Pointer::parse(&schema, "/note").unwrap();
    /// assert_eq!(note.get_value(&record).unwrap(), Some(&Value::Null));
    ///
    /// let tag = Pointer::parse(&schema, "/tags/1").unwrap();
    /// assert_eq!(tag.get_value(&record).unwrap(), None);
    /// ```
    ///
    /// ## Errors
    /// Returns [`DataError`] if a value required to descend further is
    /// missing, or the record does not have the shape the schema declares.
    pub fn get_value<'v>(&self, record: &'v Value) -> Result<Option<&'v Value>, DataError> {
        self.get_value_with_trace(record, |_, _, _| {})
    }

    /// Like [`Self::get_value`], calling `trace` once for every node of the
    /// chain in order from the root to this pointer.
    ///
    /// `trace` receives the node, the value produced at it and the number of
    /// nodes still to be visited after it (`0` for this pointer).
    ///
    /// ## Errors
    /// Returns [`DataError`] under the same conditions as
    /// [`Self::get_value`]; nodes after the failing one are not traced.
    pub fn get_value_with_trace<'v, F>(
        &self,
        record: &'v Value,
        mut trace: F,
    ) -> Result<Option<&'v Value>, DataError>
    where
        F: FnMut(&Pointer, Option<&Value>, usize),
    {
        let empty_array = Value::Array(Vec::new());
        let empty_map = Value::Object(Map::new());

        let components = self.components();
        let mut remaining = components.len();
        let mut cursor = Cursor::Found(record);
        for node in components {
            remaining -= 1;
            if !node.is_root() {
                cursor = step(cursor, node, remaining == 0)?;
            }
            let traced = match cursor {
                Cursor::Found(value) => Some(value),
                Cursor::EmptyArray => Some(&empty_array),
                Cursor::EmptyMap => Some(&empty_map),
                Cursor::Absent => None,
            };
            trace(node, traced, remaining);
        }
        Ok(cursor.container())
    }

    /// Walks the chain down to the parent of this pointer without changing
    /// `record`.
    ///
    /// Only the array or map holding the leaf element may be `null` or
    /// missing; it is reported as [`Parent::Unset`] so the caller decides
    /// whether to create it.
    pub(crate) fn resolve_parent_mut<'v>(
        &self,
        record: &'v mut Value,
    ) -> Result<Parent<'v>, DataError> {
        let mut current = record;
        let intermediate = self.depth().saturating_sub(1);
        let mut nodes = self.components().skip(1).take(intermediate).peekable();
        while let Some(node) = nodes.next() {
            match descend_mut(current, node)? {
                Descent::Into(value) => current = value,
                Descent::Unset(fields) => {
                    // an element below an empty collection is never there
                    return match nodes.peek() {
                        Some(next) => Err(not_found(next)),
                        None => Ok(Parent::Unset(fields)),
                    };
                }
            }
        }
        Ok(Parent::Found(current))
    }
}

/// The value a write applies to.
pub(crate) enum Parent<'v> {
    Found(&'v mut Value),
    /// The array or map holding the leaf element is `null` or missing from
    /// these fields.
    Unset(&'v mut Map<String, Value>),
}

impl<'v> Parent<'v> {
    /// Returns the parent value, first creating the empty array or map
    /// holding `leaf` if it is unset.
    pub(crate) fn create(self, leaf: &Pointer) -> &'v mut Value {
        match self {
            Self::Found(value) => value,
            Self::Unset(fields) => {
                let empty = match cardinality(leaf) {
                    Cardinality::Map => Value::Object(Map::new()),
                    Cardinality::Array | Cardinality::Single => Value::Array(Vec::new()),
                };
                log::debug!(
                    "Create empty collection at \"{}\"",
                    leaf.parent().map(Pointer::as_str).unwrap_or_default()
                );
                let slot = fields.entry(leaf.field_name()).or_insert(Value::Null);
                *slot = empty;
                slot
            }
        }
    }
}

enum Descent<'v> {
    Into(&'v mut Value),
    /// A `null` or missing array or map field.
    Unset(&'v mut Map<String, Value>),
}

fn step<'v>(cursor: Cursor<'v>, node: &Pointer, is_leaf: bool) -> Result<Cursor<'v>, DataError> {
    let child = lookup(cursor.container(), node)?;
    if is_leaf {
        return Ok(match child {
            Some(value) => Cursor::Found(value),
            None if node.is_collection_element() => Cursor::Absent,
            None => Cursor::Found(&NULL),
        });
    }
    match child {
        Some(value) if !value.is_null() => Ok(Cursor::Found(value)),
        _ if node.is_collection_element() => Err(not_found(node)),
        _ => match cardinality(node) {
            Cardinality::Array => Ok(Cursor::EmptyArray),
            Cardinality::Map => Ok(Cursor::EmptyMap),
            Cardinality::Single => Err(not_found(node)),
        },
    }
}

/// Looks up the value `node` addresses within `container`; a `None`
/// container is an empty collection.
fn lookup<'v>(container: Option<&'v Value>, node: &Pointer) -> Result<Option<&'v Value>, DataError> {
    let Some(container) = container else {
        return Ok(None);
    };
    match (node.element_index(), container) {
        (Some(Element::Index(Index::Num(index))), Value::Array(array)) => Ok(array.get(*index)),
        (Some(Element::Index(Index::Next)), Value::Array(_)) => Ok(None),
        (Some(Element::Key(key)), Value::Object(map)) => Ok(map.get(key)),
        (None, Value::Object(fields)) => Ok(fields.get(node.field_name())),
        _ => Err(unreachable(node)),
    }
}

fn descend_mut<'v>(container: &'v mut Value, node: &Pointer) -> Result<Descent<'v>, DataError> {
    match (node.element_index(), container) {
        (Some(Element::Index(Index::Num(index))), Value::Array(array)) => array
            .get_mut(*index)
            .filter(|value| !value.is_null())
            .map(Descent::Into)
            .ok_or_else(|| not_found(node)),
        (Some(Element::Key(key)), Value::Object(map)) => map
            .get_mut(key)
            .filter(|value| !value.is_null())
            .map(Descent::Into)
            .ok_or_else(|| not_found(node)),
        (None, Value::Object(fields)) => {
            let name = node.field_name();
            if fields.get(name).is_some_and(|value| !value.is_null()) {
                return fields
                    .get_mut(name)
                    .map(Descent::Into)
                    .ok_or_else(|| not_found(node));
            }
            match cardinality(node) {
                Cardinality::Array | Cardinality::Map => Ok(Descent::Unset(fields)),
                Cardinality::Single => Err(not_found(node)),
            }
        }
        // `-` is always the last token, so it is never descended through
        (Some(Element::Index(Index::Next)), _) => Err(not_found(node)),
        _ => Err(unreachable(node)),
    }
}

fn cardinality(node: &Pointer) -> Cardinality {
    node.property_descriptor()
        .map(|property| property.cardinality())
        .unwrap_or_default()
}

pub(crate) fn out_of_bounds(node: &Pointer, source: OutOfBoundsError) -> DataError {
    DataError::OutOfBounds {
        pointer: node.to_string(),
        source,
    }
}

pub(crate) fn not_found(node: &Pointer) -> DataError {
    DataError::NotFound {
        pointer: node.to_string(),
    }
}

/// The value holding `node` is not of the type the schema declares.
pub(crate) fn unreachable(node: &Pointer) -> DataError {
    DataError::Unreachable {
        pointer: node.parent().map(Pointer::to_string).unwrap_or_default(),
    }
}
