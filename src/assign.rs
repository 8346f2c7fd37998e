use crate::{
    resolve::{out_of_bounds, unreachable, Parent},
    schema::ValueKind,
    DataError, Element, Error, Index, Pointer, UsageError,
};
use core::mem;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Insert into arrays, shifting later elements right.
    Add,
    /// Overwrite existing array elements in place.
    Replace,
}

impl Pointer {
    /// Inserts `value` at the location this pointer addresses in `record`.
    ///
    /// For an array index the element is inserted, shifting later elements
    /// right; `-` appends. Map entries and object properties are set,
    /// replacing any existing value. A `null` or missing array or map holding
    /// the element is created in `record`; `record` is unchanged on error.
    ///
    /// Returns what [`Self::get_value`] would have returned before the call.
    ///
    /// ```
    /// # use schemaptr::{schema::{Container, Property, ValueKind}, Pointer};
    /// # use serde_json::json;
    /// # use std::sync::Arc;
    /// let schema = Arc::new(Container::new().with(Property::scalar("tags", ValueKind::String).array()));
    /// let mut record = json!({});
    /// Pointer::parse(&schema, "/tags/-").unwrap().add_value(&mut record, json!("b")).unwrap();
    /// Pointer::parse(&schema, "/tags/0").unwrap().add_value(&mut record, json!("a")).unwrap();
    /// assert_eq!(record, json!({ "tags": ["a", "b"] }));
    /// ```
    ///
    /// ## Errors
    /// - [`UsageError::Root`] if this is the root pointer.
    /// - [`UsageError::NullElement`] if `value` is `null` and this pointer
    ///   addresses an element of an object collection.
    /// - [`DataError`] if the location cannot be reached, or the index is
    ///   beyond the end of the array.
    pub fn add_value(&self, record: &mut Value, value: Value) -> Result<Option<Value>, Error> {
        self.assign(record, value, Mode::Add)
    }

    /// Replaces the value at the location this pointer addresses in `record`.
    ///
    /// Same as [`Self::add_value`] except that an array element is
    /// overwritten in place, and only an existing element can be.
    ///
    /// ## Errors
    /// As [`Self::add_value`], plus [`UsageError::Dash`] if this pointer ends
    /// with `-`.
    pub fn replace_value(&self, record: &mut Value, value: Value) -> Result<Option<Value>, Error> {
        self.assign(record, value, Mode::Replace)
    }

    fn assign(&self, record: &mut Value, value: Value, mode: Mode) -> Result<Option<Value>, Error> {
        if self.is_root() {
            return Err(UsageError::Root.into());
        }
        if mode == Mode::Replace && self.element_index().is_some_and(Element::is_next) {
            return Err(UsageError::Dash {
                pointer: self.to_string(),
            }
            .into());
        }
        let object_element = self.is_collection_element()
            && self
                .property_descriptor()
                .is_some_and(|property| property.kind() == ValueKind::Object);
        if value.is_null() && object_element {
            return Err(UsageError::NullElement {
                pointer: self.to_string(),
            }
            .into());
        }
        log::debug!("{mode:?} value at \"{}\"", self);

        let parent = self.resolve_parent_mut(record)?;
        if let (Parent::Unset(_), Some(Element::Index(index))) = (&parent, self.element_index()) {
            self.bound(index, 0, mode)?;
        }
        match (self.element_index(), parent.create(self)) {
            (Some(Element::Index(index)), Value::Array(array)) => {
                let i = self.bound(index, array.len(), mode)?;
                match mode {
                    Mode::Add => {
                        let prior = array.get(i).cloned();
                        array.insert(i, value);
                        Ok(prior)
                    }
                    Mode::Replace => Ok(Some(mem::replace(&mut array[i], value))),
                }
            }
            (Some(Element::Key(key)), Value::Object(map)) => Ok(map.insert(key.clone(), value)),
            (None, Value::Object(fields)) => Ok(Some(
                fields
                    .insert(self.field_name().to_owned(), value)
                    .unwrap_or(Value::Null),
            )),
            _ => Err(unreachable(self).into()),
        }
    }

    fn bound(&self, index: &Index, len: usize, mode: Mode) -> Result<usize, DataError> {
        match mode {
            Mode::Add => index.for_len_incl(len),
            Mode::Replace => index.for_len(len),
        }
        .map_err(|source| out_of_bounds(self, source))
    }
}
