use crate::{
    schema::{Container, Polymorphic, Property, ValueKind},
    Cause, Dash, DataError, Element, Error, Index, ParseIndexError, Pointer, Token, UsageError,
};
use quickcheck_macros::quickcheck;
use serde_json::{json, Value};
use std::sync::Arc;

fn order_schema() -> Arc<Container> {
    let item = Container::new()
        .with(Property::scalar("sku", ValueKind::String))
        .with(Property::scalar("quantity", ValueKind::Number));
    let event = Polymorphic::new("eventType")
        .with(Property::scalar("at", ValueKind::String))
        .with_subtype(
            "OPENED",
            Container::new().with(Property::scalar("byWho", ValueKind::String)),
        )
        .with_subtype(
            "CLOSED",
            Container::new().with(Property::scalar("reason", ValueKind::String)),
        );
    Arc::new(
        Container::new()
            .with(Property::scalar("id", ValueKind::String))
            .with(Property::object("items", item).array())
            .with(Property::scalar("tags", ValueKind::String).array())
            .with(Property::scalar("attrs", ValueKind::String).map())
            .with(Property::object("events", event).array())
            .with(Property::scalar("meta", ValueKind::Object)),
    )
}

fn order() -> Value {
    json!({
        "id": "o-1",
        "items": [
            { "sku": "a", "quantity": 1 },
            { "sku": "b", "quantity": 2 },
        ],
        "tags": ["new"],
        "events": [
            { "eventType": "OPENED", "at": "mon", "byWho": "ann" },
        ],
    })
}

fn parse(s: &str) -> Pointer {
    Pointer::parse(&order_schema(), s).unwrap()
}

fn parse_err(s: &str) -> crate::SyntaxError {
    Pointer::parse(&order_schema(), s).unwrap_err()
}

#[test]
fn root() {
    let root = parse("");
    assert!(root.is_root());
    assert_eq!(root.as_str(), "");
    assert_eq!(root.depth(), 0);
    assert_eq!(root.property_path(), "");
    assert!(root.parent().is_none());
    assert!(root.property_descriptor().is_none());
    assert!(!root.is_collection_element());
    assert_eq!(root, Pointer::root(order_schema()));
}

#[test]
fn round_trip() {
    for s in [
        "",
        "/id",
        "/items",
        "/items/0",
        "/items/1/quantity",
        "/items/-",
        "/attrs/a~1b",
        "/attrs/~0~01",
        "/attrs/",
        "/events/0/eventType",
        "/events/0/OPENED:byWho",
    ] {
        assert_eq!(parse(s).to_string(), s);
    }
}

#[quickcheck]
fn map_key_round_trip(key: Token<'static>) -> bool {
    let attrs = parse("/attrs");
    let child = attrs.create_child_pointer(&key.decoded()).unwrap();
    let reparsed = parse(&format!("/attrs/{}", key.encoded()));
    child == reparsed
        && child.element_index().and_then(Element::as_key) == Some(&*key.decoded())
        && child.is_child_of(&attrs)
}

#[test]
fn chain() {
    let ptr = parse("/items/1/quantity");
    assert_eq!(ptr.depth(), 3);
    assert_eq!(ptr.property_path(), "items.quantity");
    assert_eq!(ptr.property_descriptor().unwrap().kind(), ValueKind::Number);

    let element = ptr.parent().unwrap();
    assert_eq!(element.as_str(), "/items/1");
    assert!(element.is_collection_element());
    assert_eq!(element.element_index(), Some(&Element::Index(Index::Num(1))));
    assert_eq!(element.property_path(), "items");
    assert!(element.property_descriptor().unwrap().is_array());
    assert!(element.children_container().unwrap().has_property("sku"));

    let items = element.parent().unwrap();
    assert!(!items.is_collection_element());
    assert_eq!(items.parent().unwrap(), &parse(""));

    let nodes: Vec<_> = ptr.components().rev().map(Pointer::to_string).collect();
    assert_eq!(nodes, ["/items/1/quantity", "/items/1", "/items", ""]);
}

#[test]
fn create_child_pointer() {
    let items = parse("/items");
    let first = items.create_child_pointer("0").unwrap();
    assert_eq!(first, parse("/items/0"));
    let sku = first.create_child_pointer("sku").unwrap();
    assert_eq!(sku, parse("/items/0/sku"));
    assert_eq!(sku.property_path(), "items.sku");

    let err = first.create_child_pointer("nope").unwrap_err();
    assert_eq!(err.pointer(), "/items/0/nope");
    assert_eq!(err.offset(), "/items/0".len());
    assert_eq!(
        err.cause(),
        &Cause::UnknownProperty {
            name: "nope".into()
        }
    );
}

#[test]
fn is_child_of() {
    let root = parse("");
    let items = parse("/items");
    let first = parse("/items/0");
    let sku = parse("/items/0/sku");
    assert!(first.is_child_of(&items));
    assert!(sku.is_child_of(&first));
    assert!(sku.is_child_of(&items));
    assert!(sku.is_child_of(&root));
    assert!(!items.is_child_of(&items));
    assert!(!items.is_child_of(&first));
    assert!(!root.is_child_of(&root));

    let attrs = parse("/attrs");
    assert!(!parse("/attrs/ab").is_child_of(&parse("/attrs/a")));
    assert!(parse("/attrs/a").is_child_of(&attrs));
}

#[test]
fn get_value() {
    let order = order();
    assert_eq!(parse("/items/1/quantity").get_value(&order).unwrap(), Some(&json!(2)));
    assert_eq!(parse("/id").get_value(&order).unwrap(), Some(&json!("o-1")));
    assert_eq!(parse("").get_value(&order).unwrap(), Some(&order));
    assert_eq!(
        parse("/events/0/OPENED:byWho").get_value(&order).unwrap(),
        Some(&json!("ann"))
    );
    assert_eq!(
        parse("/events/0/eventType").get_value(&order).unwrap(),
        Some(&json!("OPENED"))
    );
    assert_eq!(
        parse("/events/0/at").get_value(&order).unwrap(),
        Some(&json!("mon"))
    );
}

#[test]
fn null_versus_absent() {
    let order = order();
    // unset property
    assert_eq!(parse("/meta").get_value(&order).unwrap(), Some(&Value::Null));
    assert_eq!(parse("/items/0/sku").get_value(&json!({ "items": [{}] })).unwrap(), Some(&Value::Null));
    // missing element
    assert_eq!(parse("/items/5").get_value(&order).unwrap(), None);
    assert_eq!(parse("/attrs/x").get_value(&order).unwrap(), None);
    // present null element
    assert_eq!(
        parse("/tags/0").get_value(&json!({ "tags": [null] })).unwrap(),
        Some(&Value::Null)
    );
}

#[test]
fn add_and_replace() {
    let mut order = order();
    let prior = parse("/items/-")
        .add_value(&mut order, json!({ "sku": "c", "quantity": 3 }))
        .unwrap();
    assert_eq!(prior, None);
    assert_eq!(order["items"].as_array().unwrap().len(), 3);
    assert_eq!(parse("/items/2/sku").get_value(&order).unwrap(), Some(&json!("c")));

    let prior = parse("/items/0")
        .replace_value(&mut order, json!({ "sku": "z", "quantity": 9 }))
        .unwrap();
    assert_eq!(prior, Some(json!({ "sku": "a", "quantity": 1 })));
    assert_eq!(order["items"].as_array().unwrap().len(), 3);

    let prior = parse("/items/1/quantity")
        .replace_value(&mut order, json!(7))
        .unwrap();
    assert_eq!(prior, Some(json!(2)));
    assert_eq!(order["items"][1], json!({ "sku": "b", "quantity": 7 }));

    assert_eq!(
        parse("/items/-")
            .replace_value(&mut order, json!({}))
            .unwrap_err(),
        Error::Usage(UsageError::Dash {
            pointer: "/items/-".into()
        })
    );
}

#[test]
fn remove() {
    let mut order = order();
    let prior = parse("/items/0").remove_value(&mut order).unwrap();
    assert_eq!(prior, Some(json!({ "sku": "a", "quantity": 1 })));
    assert_eq!(parse("/items/0/sku").get_value(&order).unwrap(), Some(&json!("b")));
    assert_eq!(parse("/items/1").get_value(&order).unwrap(), None);

    assert!(matches!(
        parse("/items/-").remove_value(&mut order).unwrap_err(),
        Error::Usage(UsageError::Dash { .. })
    ));
}

#[test]
fn root_is_read_only() {
    let mut order = order();
    let root = parse("");
    for err in [
        root.add_value(&mut order, json!({})).unwrap_err(),
        root.replace_value(&mut order, json!({})).unwrap_err(),
        root.remove_value(&mut order).unwrap_err(),
    ] {
        assert_eq!(err, Error::Usage(UsageError::Root));
    }
    assert_eq!(order, self::order());
}

#[test]
fn writes_create_collections() {
    let mut order = json!({ "tags": null });
    parse("/tags/-").add_value(&mut order, json!("x")).unwrap();
    parse("/items/-")
        .add_value(&mut order, json!({ "sku": "a" }))
        .unwrap();
    parse("/attrs/k").add_value(&mut order, json!("v")).unwrap();
    assert_eq!(
        order,
        json!({ "tags": ["x"], "items": [{ "sku": "a" }], "attrs": { "k": "v" } })
    );
}

#[test]
fn write_errors() {
    let mut order = order();
    let err = parse("/items/7")
        .add_value(&mut order, json!({}))
        .unwrap_err();
    let Error::Data(DataError::OutOfBounds { pointer, source }) = err else {
        panic!("expected out of bounds, got {err:?}");
    };
    assert_eq!(pointer, "/items/7");
    assert_eq!((source.index, source.length), (7, 2));

    let err = parse("/items/5/sku")
        .add_value(&mut order, json!("x"))
        .unwrap_err();
    assert_eq!(
        err,
        Error::Data(DataError::NotFound {
            pointer: "/items/5".into()
        })
    );

    let mut bad = json!({ "items": { "not": "an array" } });
    let err = parse("/items/0").add_value(&mut bad, json!({})).unwrap_err();
    assert_eq!(
        err,
        Error::Data(DataError::Unreachable {
            pointer: "/items".into()
        })
    );
}

#[test]
fn syntax_errors() {
    let err = parse_err("items");
    assert_eq!(err.cause(), &Cause::NoLeadingSlash);
    assert_eq!(err.offset(), 0);

    let err = parse_err("/attrs/a~2");
    assert!(matches!(err.cause(), Cause::InvalidEncoding(_)));
    assert_eq!(err.offset(), 6);
    assert_eq!(err.token(), "a~2");

    let err = parse_err("/items/01/sku");
    assert_eq!(err.cause(), &Cause::InvalidIndex(ParseIndexError::LeadingZeros));
    assert_eq!(err.pointer(), "/items/01/sku");
    assert_eq!(err.offset(), 6);

    let err = parse_err("/items/first");
    assert!(matches!(err.cause(), Cause::InvalidIndex(_)));

    let err = parse_err("/items/-/sku");
    assert_eq!(err.cause(), &Cause::AfterDash);
    assert_eq!(err.offset(), 8);

    let err = parse_err("/id/x");
    assert_eq!(err.cause(), &Cause::NotAnObject);

    let err = parse_err("/tags/0/x");
    assert_eq!(err.cause(), &Cause::NotAnObject);

    let err = parse_err("/nope");
    assert_eq!(
        err.cause(),
        &Cause::UnknownProperty {
            name: "nope".into()
        }
    );
    assert_eq!(err.to_string(), "invalid json pointer \"/nope\": unknown property \"nope\"");

    let err = Pointer::parse_with(&order_schema(), "/items/-", Dash::Disallow).unwrap_err();
    assert_eq!(err.cause(), &Cause::DashNotAllowed);
}

#[test]
fn dash_policy_is_inherited() {
    let items = Pointer::parse_with(&order_schema(), "/items", Dash::Disallow).unwrap();
    let err = items.create_child_pointer("-").unwrap_err();
    assert_eq!(err.cause(), &Cause::DashNotAllowed);
    assert_eq!(err.pointer(), "/items/-");
    assert!(items.create_child_pointer("0").is_ok());
}

#[test]
fn polymorphic() {
    let ptr = parse("/events/0/eventType");
    assert_eq!(ptr.property_path(), "events.eventType");
    assert_eq!(ptr.property_descriptor().unwrap().kind(), ValueKind::String);

    let ptr = parse("/events/0/OPENED:byWho");
    assert_eq!(ptr.property_path(), "events.OPENED.byWho");
    assert_eq!(ptr.property_descriptor().unwrap().name(), "byWho");

    assert_eq!(parse("/events/0/at").property_path(), "events.at");

    let err = parse_err("/events/0/OPENED:missing");
    assert_eq!(
        err.cause(),
        &Cause::UnknownSubtypeProperty {
            subtype: "OPENED".into(),
            name: "missing".into()
        }
    );
    assert_eq!(err.pointer(), "/events/0/OPENED:missing");

    let err = parse_err("/events/0/REOPENED:byWho");
    assert_eq!(
        err.cause(),
        &Cause::UnknownSubtype {
            subtype: "REOPENED".into()
        }
    );

    // a subtype property is not visible without its prefix
    let err = parse_err("/events/0/byWho");
    assert_eq!(
        err.cause(),
        &Cause::UnknownProperty {
            name: "byWho".into()
        }
    );
}

#[test]
fn subtype_syntax_on_plain_container() {
    let err = parse_err("/items/0/OPENED:sku");
    assert_eq!(
        err.cause(),
        &Cause::UnknownProperty {
            name: "OPENED:sku".into()
        }
    );
}

#[test]
fn subtype_write() {
    let mut order = order();
    let prior = parse("/events/-").add_value(
        &mut order,
        json!({ "eventType": "CLOSED", "at": "tue" }),
    );
    assert_eq!(prior, Ok(None));
    parse("/events/1/CLOSED:reason")
        .add_value(&mut order, json!("done"))
        .unwrap();
    assert_eq!(
        order["events"][1],
        json!({ "eventType": "CLOSED", "at": "tue", "reason": "done" })
    );
}

#[test]
fn shared_between_threads() {
    let ptr = parse("/items/1/quantity");
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ptr = ptr.clone();
            std::thread::spawn(move || ptr.get_value(&order()).unwrap().cloned())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some(json!(2)));
    }
}

#[test]
#[cfg(feature = "serde")]
fn serialize() {
    let ptr = parse("/attrs/a~1b");
    assert_eq!(serde_json::to_value(&ptr).unwrap(), json!("/attrs/a~1b"));
}

#[test]
fn polymorphic_root() {
    let schema = Arc::new(Container::from(
        Polymorphic::new("eventType")
            .with(Property::scalar("at", ValueKind::String))
            .with_subtype(
                "OPENED",
                Container::new().with(Property::scalar("byWho", ValueKind::String)),
            ),
    ));
    let event = json!({ "eventType": "OPENED", "at": "mon", "byWho": "ann" });

    let kind = Pointer::parse(&schema, "/eventType").unwrap();
    assert_eq!(kind.property_path(), "eventType");
    assert_eq!(kind.get_value(&event).unwrap(), Some(&json!("OPENED")));

    let by_who = Pointer::parse(&schema, "/OPENED:byWho").unwrap();
    assert_eq!(by_who.property_path(), "OPENED.byWho");
    assert_eq!(by_who.get_value(&event).unwrap(), Some(&json!("ann")));
    assert_eq!(Pointer::root(schema.clone()).create_child_pointer("OPENED:byWho").unwrap(), by_who);

    let err = Pointer::parse(&schema, "/OPENED:missing").unwrap_err();
    assert_eq!(
        err.cause(),
        &Cause::UnknownSubtypeProperty {
            subtype: "OPENED".into(),
            name: "missing".into()
        }
    );
    assert!(Pointer::parse(&schema, "/byWho").is_err());
}

#[test]
fn is_child_of_along_created_chain() {
    let root = Pointer::root(order_schema());
    let items = root.create_child_pointer("items").unwrap();
    let first = items.create_child_pointer("0").unwrap();
    let quantity = first.create_child_pointer("quantity").unwrap();
    assert_eq!(quantity, parse("/items/0/quantity"));

    let chain = [&root, &items, &first, &quantity];
    for (i, descendant) in chain.iter().enumerate() {
        for (j, ancestor) in chain.iter().enumerate() {
            assert_eq!(descendant.is_child_of(ancestor), i > j, "{descendant} / {ancestor}");
        }
    }
}

#[test]
fn equality_ignores_schema() {
    let other = Arc::new(Container::new().with(Property::scalar("id", ValueKind::Number)));
    let a = parse("/id");
    let b = Pointer::parse(&other, "/id").unwrap();
    assert_eq!(a, b);
    assert_ne!(a.property_descriptor().unwrap().kind(), b.property_descriptor().unwrap().kind());
    assert!(b.is_child_of(&parse("")));

    let allow = parse("/items");
    let disallow = Pointer::parse_with(&order_schema(), "/items", Dash::Disallow).unwrap();
    assert_eq!(allow, disallow);
}
