//! Resolution of a single token against the node it follows.

use super::{Dash, Element, Pointer};
use crate::{
    schema::{Cardinality, Container, Property},
    Cause, Index,
};
use std::sync::Arc;

/// Schema binding of the node a token resolves to.
pub(super) struct Resolved {
    pub(super) property: Arc<Property>,
    pub(super) property_path: String,
    pub(super) element: Option<Element>,
    pub(super) children: Option<Arc<Container>>,
}

/// What the token following `parent` must name.
enum Expect<'p> {
    /// `parent` is an array property: an index or `-`.
    ArrayElement(&'p Arc<Property>),
    /// `parent` is a map property: any key.
    MapElement(&'p Arc<Property>),
    /// `parent` is an object (root, element of an object collection, or
    /// object property): a property of its children container.
    Property,
    /// `parent` is the `-` array index: nothing.
    Nothing,
}

impl<'p> Expect<'p> {
    fn after(parent: &'p Pointer) -> Self {
        match (parent.property_descriptor(), parent.element_index()) {
            (_, Some(element)) if element.is_next() => Self::Nothing,
            (Some(property), None) => match property.cardinality() {
                Cardinality::Array => Self::ArrayElement(property),
                Cardinality::Map => Self::MapElement(property),
                Cardinality::Single => Self::Property,
            },
            (_, Some(_)) | (None, None) => Self::Property,
        }
    }
}

pub(super) fn resolve(parent: &Pointer, token: &str) -> Result<Resolved, Cause> {
    match Expect::after(parent) {
        Expect::Nothing => Err(Cause::AfterDash),
        Expect::ArrayElement(property) => {
            let index: Index = token.parse().map_err(Cause::InvalidIndex)?;
            if index.is_next() && parent.dash() == Dash::Disallow {
                return Err(Cause::DashNotAllowed);
            }
            Ok(element(parent, property, Element::Index(index)))
        }
        Expect::MapElement(property) => Ok(element(parent, property, Element::Key(token.to_owned()))),
        Expect::Property => property(parent, token),
    }
}

// elements share the schema binding of their collection
fn element(parent: &Pointer, property: &Arc<Property>, element: Element) -> Resolved {
    Resolved {
        property: property.clone(),
        property_path: parent.property_path().to_owned(),
        element: Some(element),
        children: parent.children_container().cloned(),
    }
}

fn property(parent: &Pointer, token: &str) -> Result<Resolved, Cause> {
    let children = parent.children_container().ok_or(Cause::NotAnObject)?;
    if let Some(poly) = children.as_polymorphic() {
        if token == poly.type_property().name() {
            return Ok(Resolved {
                property: poly.type_property().clone(),
                property_path: join(parent.property_path(), token),
                element: None,
                children: None,
            });
        }
        if let Some((subtype, name)) = split_subtype(token) {
            let variant = poly.subtype(subtype).ok_or_else(|| Cause::UnknownSubtype {
                subtype: subtype.to_owned(),
            })?;
            let property = variant
                .property(name)
                .ok_or_else(|| Cause::UnknownSubtypeProperty {
                    subtype: subtype.to_owned(),
                    name: name.to_owned(),
                })?;
            return Ok(named(parent, property, &format!("{subtype}.{name}")));
        }
    }
    let property = children
        .property(token)
        .ok_or_else(|| Cause::UnknownProperty {
            name: token.to_owned(),
        })?;
    Ok(named(parent, property, token))
}

fn named(parent: &Pointer, property: &Arc<Property>, segment: &str) -> Resolved {
    Resolved {
        property: property.clone(),
        property_path: join(parent.property_path(), segment),
        element: None,
        children: property.nested().cloned(),
    }
}

/// Splits `subtype:property`; the colon may be neither first nor last.
fn split_subtype(token: &str) -> Option<(&str, &str)> {
    let colon = token.find(':')?;
    (colon > 0 && colon + 1 < token.len()).then(|| (&token[..colon], &token[colon + 1..]))
}

fn join(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_owned()
    } else {
        format!("{path}.{segment}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtype_split() {
        assert_eq!(split_subtype("OPENED:byWho"), Some(("OPENED", "byWho")));
        assert_eq!(split_subtype("a:b:c"), Some(("a", "b:c")));
        assert_eq!(split_subtype(":byWho"), None);
        assert_eq!(split_subtype("OPENED:"), None);
        assert_eq!(split_subtype(":"), None);
        assert_eq!(split_subtype("plain"), None);
    }

    #[test]
    fn path_join() {
        assert_eq!(join("", "items"), "items");
        assert_eq!(join("items", "quantity"), "items.quantity");
    }
}
