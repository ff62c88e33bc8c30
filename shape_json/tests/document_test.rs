//! A full schema in the shape of a changeset upload: nested tuple objects
//! in storing arrays, a dynamic tag map, validators and finish hooks
//! working together.

use std::cell::RefCell;
use std::rc::Rc;

use shape_json::{
    ErrorKind, Member, ObjectOptions, Parser, Schema, UnknownKeys, Value,
};

fn build_parser(
    actions: Rc<RefCell<Vec<(String, Vec<Value>)>>>,
) -> Parser {
    let mut schema = Schema::new();

    let element_type = schema.string();
    schema
        .validator(element_type, |v| match v.as_str() {
            Some("node" | "way" | "relation") => Ok(()),
            _ => Err(format!("unknown element {v:?}")),
        })
        .unwrap();
    let id = schema.int();
    let lat = schema.optional_double();
    let lon = schema.optional_double();
    let changeset = schema.int();
    let tag = schema.string();
    let tags = schema.map_of(tag).unwrap();
    let node_ref = schema.int();
    let nodes = schema.array_of(node_ref).unwrap();

    let element = schema
        .tuple_object(vec![
            Member::new("type", element_type),
            Member::new("id", id),
            Member::with_default("lat", lat, Value::Null),
            Member::with_default("lon", lon, Value::Null),
            Member::new("changeset", changeset),
            Member::with_default("tags", tags, Value::Object(vec![])),
            Member::with_default("nodes", nodes, Value::Array(vec![])),
        ])
        .unwrap();
    let elements = schema.array_of(element).unwrap();

    let action = schema.string();
    schema
        .validator(action, |v| match v.as_str() {
            Some("create" | "modify" | "delete") => Ok(()),
            _ => Err(format!("unknown action {v:?}")),
        })
        .unwrap();
    let if_unused = schema.boolean();

    let change = schema
        .object_with(
            vec![
                Member::new("action", action),
                Member::new("elements", elements),
                Member::optional("if-unused", if_unused),
            ],
            ObjectOptions::new(UnknownKeys::Ignore),
        )
        .unwrap();
    schema
        .on_finish(change, move |object| {
            let name = object
                .member("action")
                .and_then(|m| m.as_str())
                .ok_or("action missing")?
                .to_string();
            let items = object
                .member("elements")
                .and_then(|m| m.value())
                .and_then(Value::as_array)
                .ok_or("elements missing")?
                .to_vec();
            actions.borrow_mut().push((name, items));
            Ok(())
        })
        .unwrap();

    let osm_change = schema.array(change).unwrap();

    let version = schema.string();
    schema
        .validator(version, |v| {
            if v.as_str() == Some("0.6") {
                Ok(())
            } else {
                Err(format!("unsupported version {v:?}"))
            }
        })
        .unwrap();
    let generator = schema.string();

    let root = schema
        .object_with(
            vec![
                Member::new("version", version),
                Member::optional("generator", generator),
                Member::new("osmChange", osm_change),
            ],
            ObjectOptions::new(UnknownKeys::Ignore),
        )
        .unwrap();

    Parser::new(schema, root).unwrap()
}

const UPLOAD: &str = r#"{
    "version": "0.6",
    "generator": "test suite",
    "osmChange": [
        {
            "action": "create",
            "elements": [
                {
                    "type": "node",
                    "id": -1,
                    "lat": 51.5,
                    "lon": -0.1,
                    "changeset": 100,
                    "tags": {"amenity": "cafe", "name": "Corner"}
                },
                {
                    "type": "way",
                    "id": -2,
                    "changeset": 100,
                    "nodes": [-1, 7, 8]
                }
            ]
        },
        {
            "action": "delete",
            "if-unused": true,
            "elements": [
                {"type": "relation", "id": 4, "changeset": 100}
            ]
        }
    ]
}"#;

#[test]
fn test_changeset_upload_roundtrip() {
    let actions = Rc::new(RefCell::new(Vec::new()));
    let mut parser = build_parser(Rc::clone(&actions));

    // Feed in uneven chunks, the way a request body arrives.
    for chunk in UPLOAD.as_bytes().chunks(13) {
        parser.parse(chunk).unwrap();
    }
    parser.finish().unwrap();

    let actions = actions.borrow();
    assert_eq!(actions.len(), 2);

    let (name, elements) = &actions[0];
    assert_eq!(name, "create");
    assert_eq!(elements.len(), 2);
    assert_eq!(
        elements[0],
        Value::Array(vec![
            Value::String("node".to_string()),
            Value::Int(-1),
            Value::Double(51.5),
            Value::Double(-0.1),
            Value::Int(100),
            Value::Object(vec![
                ("amenity".to_string(), Value::String("cafe".to_string())),
                ("name".to_string(), Value::String("Corner".to_string())),
            ]),
            Value::Array(vec![]),
        ])
    );
    assert_eq!(
        elements[1],
        Value::Array(vec![
            Value::String("way".to_string()),
            Value::Int(-2),
            Value::Null,
            Value::Null,
            Value::Int(100),
            Value::Object(vec![]),
            Value::Array(vec![Value::Int(-1), Value::Int(7), Value::Int(8)]),
        ])
    );

    let (name, elements) = &actions[1];
    assert_eq!(name, "delete");
    assert_eq!(elements.len(), 1);
}

#[test]
fn test_bad_version_fails_before_any_action() {
    let actions = Rc::new(RefCell::new(Vec::new()));
    let mut parser = build_parser(Rc::clone(&actions));
    let e = parser
        .parse(br#"{"version": "0.5", "osmChange": []}"#)
        .unwrap_err();
    assert!(matches!(e.kind, ErrorKind::ValidationFailed(_)));
    assert_eq!(e.path.as_deref(), Some("/version"));
    assert!(actions.borrow().is_empty());
}

#[test]
fn test_unknown_element_type_reports_its_path() {
    let actions = Rc::new(RefCell::new(Vec::new()));
    let mut parser = build_parser(Rc::clone(&actions));
    let e = parser
        .parse(
            br#"{"version": "0.6", "osmChange": [{"action": "create", "elements": [{"type": "turbine", "id": 1, "changeset": 2}]}]}"#,
        )
        .unwrap_err();
    assert!(matches!(e.kind, ErrorKind::ValidationFailed(_)));
    assert_eq!(
        e.path.as_deref(),
        Some("/osmChange/0/elements/0/type")
    );
}
