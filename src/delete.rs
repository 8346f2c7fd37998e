use crate::{
    resolve::{out_of_bounds, unreachable, Parent},
    Element, Error, Pointer, UsageError,
};
use serde_json::Value;

impl Pointer {
    /// Removes the value this pointer addresses from `record`.
    ///
    /// An array element is removed, shifting later elements left; a map entry
    /// or object property is deleted. Removing an entry or property that is
    /// not there is not an error.
    ///
    /// Returns what [`Self::get_value`] would have returned before the call.
    ///
    /// ```
    /// # use schemaptr::{schema::{Container, Property, ValueKind}, Pointer};
    /// # use serde_json::json;
    /// # use std::sync::Arc;
    /// let schema = Arc::new(Container::new().with(Property::scalar("tags", ValueKind::String).array()));
    /// let mut record = json!({ "tags": ["a", "b", "c"] });
    /// let removed = Pointer::parse(&schema, "/tags/0").unwrap().remove_value(&mut record).unwrap();
    /// assert_eq!(removed, Some(json!("a")));
    /// assert_eq!(record, json!({ "tags": ["b", "c"] }));
    /// ```
    ///
    /// ## Errors
    /// - [`UsageError::Root`] if this is the root pointer.
    /// - [`UsageError::Dash`] if this pointer ends with `-`.
    /// - [`DataError`](crate::DataError) if the location cannot be reached,
    ///   or the index is beyond the end of the array.
    pub fn remove_value(&self, record: &mut Value) -> Result<Option<Value>, Error> {
        if self.is_root() {
            return Err(UsageError::Root.into());
        }
        if self.element_index().is_some_and(Element::is_next) {
            return Err(UsageError::Dash {
                pointer: self.to_string(),
            }
            .into());
        }
        log::debug!("Remove value at \"{}\"", self);

        let container = match self.resolve_parent_mut(record)? {
            Parent::Found(container) => container,
            // an unset collection has nothing to remove
            Parent::Unset(_) => {
                if let Some(Element::Index(index)) = self.element_index() {
                    index
                        .for_len(0)
                        .map_err(|source| out_of_bounds(self, source))?;
                }
                return Ok(None);
            }
        };
        match (self.element_index(), container) {
            (Some(Element::Index(index)), Value::Array(array)) => {
                let i = index
                    .for_len(array.len())
                    .map_err(|source| out_of_bounds(self, source))?;
                Ok(Some(array.remove(i)))
            }
            (Some(Element::Key(key)), Value::Object(map)) => Ok(map.remove(key)),
            (None, Value::Object(fields)) => {
                Ok(Some(fields.remove(self.field_name()).unwrap_or(Value::Null)))
            }
            _ => Err(unreachable(self).into()),
        }
    }
}
