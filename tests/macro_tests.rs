use hkvn::{encode, hkvn, HkvnMap, Line, Payload, Value};

#[test]
fn test_hkvn_macro_scalars() {
    assert_eq!(hkvn!("hello world"), Value::Scalar(b"hello world".to_vec()));
    assert_eq!(hkvn!(b"\xff"), Value::Scalar(vec![0xff]));
    assert_eq!(hkvn!(""), Value::Scalar(Vec::new()));
}

#[test]
fn test_hkvn_macro_expressions() {
    let name = String::from("dynamic");
    assert_eq!(hkvn!(name), Value::from("dynamic"));
    assert_eq!(hkvn!((format!("{}-{}", 1, 2))), Value::from("1-2"));
}

#[test]
fn test_hkvn_macro_nested() {
    let value = hkvn!({
        "users": [
            { "name": "Alice", "roles": ["admin"] },
            { "name": "Bob", "roles": [] }
        ],
        "empty": {},
    });

    let map = value.as_map().unwrap();
    assert_eq!(map.get("empty"), Some(&Value::Map(HkvnMap::new())));

    let users = map.get("users").and_then(Value::as_list).unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(
        users[1].as_map().unwrap().get("roles"),
        Some(&Value::List(vec![]))
    );
}

#[test]
fn test_hkvn_macro_trailing_commas() {
    assert_eq!(hkvn!(["a", "b",]), hkvn!(["a", "b"]));
    assert_eq!(hkvn!({ "k": "v", }), hkvn!({ "k": "v" }));
}

#[test]
fn test_hkvn_macro_value_encodes() {
    let records = encode(vec![("k".to_string(), hkvn!({ "a": ["x"] }))]).unwrap();
    assert_eq!(
        records,
        vec![
            Line::entry("k", Payload::annotated("M>", "")),
            Line::entry("a", Payload::annotated("L>", "")),
            Line::entry("", "x"),
            Line::End,
            Line::End,
            Line::End,
        ]
    );
}
