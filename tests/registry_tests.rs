use hkvn::{
    decode_with, encode_with, hkvn, Children, Entry, Error, Fallback, Hierarchical, Line,
    Payload, Record, Registry, Value, ValueKind,
};

fn header(key: &str, annotation: &str, value: &str) -> Record {
    Line::entry(key, Payload::annotated(annotation, value))
}

fn point_registry() -> Registry {
    Registry::new()
        .with_decoder(["Point", "P"], |scalar, children| {
            if !scalar.is_empty() {
                return Err(Error::custom("point carries no scalar"));
            }
            let coords = children
                .map(|entry| entry.map(|(_, v)| v))
                .collect::<Result<Vec<_>, Error>>()?;
            if coords.len() != 2 {
                return Err(Error::custom(format!("point needs 2 coordinates, got {}", coords.len())));
            }
            Ok(Value::Hierarchical(Hierarchical::new(
                "P",
                "",
                vec![
                    ("x".to_string(), coords[0].clone()),
                    ("y".to_string(), coords[1].clone()),
                ],
            )))
        })
        .with_encoder(["Point", "P"], |_, children| match children {
            Children::Entries(entries) => Ok(entries),
            Children::Value(_) => Err(Error::custom("points are generic values")),
        })
}

#[test]
fn test_custom_decoder_by_alias() {
    let registry = point_registry();
    for tag in ["Point>", "P>"] {
        let records = vec![
            header("origin", tag, ""),
            Line::entry("a", "0"),
            Line::entry("b", "1"),
            Line::End,
            Line::End,
        ];
        let decoded = decode_with(records, &registry).unwrap();
        let point = decoded[0].1.as_hierarchical().unwrap();
        assert_eq!(point.children[0], ("x".to_string(), Value::from("0")));
        assert_eq!(point.children[1], ("y".to_string(), Value::from("1")));
    }
}

#[test]
fn test_custom_decoder_error_aborts() {
    let registry = point_registry();
    let records = vec![header("p", "P>", ""), Line::entry("x", "0"), Line::End, Line::End];
    let err = decode_with(records, &registry).unwrap_err();
    assert_eq!(err, Error::custom("point needs 2 coordinates, got 1"));
}

#[test]
fn test_custom_encoder_roundtrip() {
    let registry = point_registry();
    let point = Value::Hierarchical(Hierarchical::new(
        "P",
        "",
        vec![
            ("x".to_string(), Value::from("3")),
            ("y".to_string(), Value::from("4")),
        ],
    ));
    let input = vec![("p".to_string(), point)];
    let records = encode_with(input.clone(), &registry).unwrap();
    assert_eq!(records[0], header("p", "P>", ""));
    assert_eq!(decode_with(records, &registry).unwrap(), input);
}

#[test]
fn test_custom_decoders_nest_inside_builtins() {
    let registry = point_registry();
    let records = vec![
        header("shape", "L>", ""),
        header("", "P>", ""),
        Line::entry("x", "0"),
        Line::entry("y", "0"),
        Line::End,
        header("", "P>", ""),
        Line::entry("x", "1"),
        Line::entry("y", "1"),
        Line::End,
        Line::End,
        Line::End,
    ];
    let decoded = decode_with(records, &registry).unwrap();
    let list = decoded[0].1.as_list().unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.iter().all(Value::is_hierarchical));
}

#[test]
fn test_reject_fallback() {
    let registry = Registry::new().with_fallback(Fallback::Reject);
    let records = vec![header("k", "Unknown>", ""), Line::End, Line::End];
    let err = decode_with(records, &registry).unwrap_err();
    assert_eq!(err, Error::UnrecognizedAnnotation("Unknown".to_string()));
}

#[test]
fn test_factory_fallback_receives_materialized_block() {
    let registry = Registry::new().with_fallback(Fallback::factory(|h| {
        Ok(Value::from(format!("{}:{}", h.annotation, h.children.len())))
    }));
    let records = vec![
        header("k", "Thing>", ""),
        Line::entry("a", "1"),
        Line::entry("b", "2"),
        Line::End,
        Line::End,
    ];
    let decoded = decode_with(records, &registry).unwrap();
    assert_eq!(decoded, vec![("k".to_string(), Value::from("Thing:2"))]);
}

#[test]
fn test_decoder_fallback_receives_tag_and_lazy_children() {
    let registry = Registry::new().with_fallback(Fallback::decoder(|tag, scalar, children| {
        let first = children.next().transpose()?;
        let mut out = tag.as_bytes().to_vec();
        out.extend_from_slice(&scalar);
        if let Some((key, _)) = first {
            out.extend_from_slice(key.as_bytes());
        }
        Ok(Value::Scalar(out))
    }));
    let records = vec![
        header("k", "T>", "s"),
        Line::entry("a", "1"),
        Line::entry("b", "2"),
        Line::End,
        Line::entry("after", "ok"),
        Line::End,
    ];
    let decoded = decode_with(records, &registry).unwrap();
    assert_eq!(
        decoded,
        vec![
            ("k".to_string(), Value::from("Tsa")),
            ("after".to_string(), Value::from("ok")),
        ]
    );
}

#[test]
fn test_first_registered_alias_set_wins() {
    let registry = Registry::passthrough()
        .with_decoder(["X", "Y"], |_, _| Ok(Value::from("first")))
        .with_decoder(["Y"], |_, _| Ok(Value::from("second")));
    let records = vec![header("k", "Y>", ""), Line::End, Line::End];
    let decoded = decode_with(records, &registry).unwrap();
    assert_eq!(decoded[0].1, Value::from("first"));
}

#[test]
fn test_types_table_annotates_scalars() {
    let registry = Registry::passthrough()
        .with_type(ValueKind::Scalar, "B")
        .with_encoder("B", |_, children| match children {
            Children::Value(Value::Scalar(bytes)) => Ok(bytes
                .iter()
                .map(|b| (String::new(), Value::annotated("byte", vec![*b])))
                .collect::<Vec<Entry>>()),
            other => other.into_entries("B"),
        });
    let records = encode_with(vec![("k".to_string(), Value::from("ab"))], &registry).unwrap();
    assert_eq!(
        records,
        vec![
            header("k", "B>", ""),
            header("", "byte", "a"),
            header("", "byte", "b"),
            Line::End,
            Line::End,
        ]
    );
}

#[test]
fn test_map_without_type_cannot_be_encoded() {
    let registry = Registry::new().without_types();
    let err = encode_with(vec![("k".to_string(), hkvn!({ "a": "b" }))], &registry).unwrap_err();
    assert!(matches!(err, Error::ChildrenWithoutAnnotation { .. }));
}

#[test]
fn test_map_without_encoder_writes_entries_verbatim() {
    let registry = Registry::new().without_encoders();
    let tree = hkvn!({ "a": "1", "l": ["x"] });
    let records = encode_with(vec![("k".to_string(), tree.clone())], &registry).unwrap();
    assert_eq!(
        decode_with(records, &Registry::new()).unwrap(),
        vec![("k".to_string(), tree)]
    );
}

#[test]
fn test_registry_is_shareable_across_threads() {
    let registry = std::sync::Arc::new(point_registry());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = registry.clone();
            std::thread::spawn(move || {
                let tree = hkvn!({ "n": (i.to_string()) });
                let records = encode_with(vec![("t".to_string(), tree.clone())], &registry)?;
                let decoded = decode_with(records, &registry)?;
                Ok::<_, Error>(decoded == vec![("t".to_string(), tree)])
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap().unwrap());
    }
}

fn pairs_registry() -> Registry {
    Registry::new()
        .with_type(ValueKind::List, "Pairs")
        .with_encoder(["Pairs"], |_, children| {
            let Children::Value(Value::List(pairs)) = children else {
                return Err(Error::malformed("Pairs", "expected a sequence of pairs"));
            };
            pairs
                .into_iter()
                .map(|pair| {
                    let kv = match pair {
                        Value::List(kv) => kv,
                        other => {
                            return Err(Error::malformed("Pairs", format!("not a pair: {}", other)))
                        }
                    };
                    let [key, value] = <[Value; 2]>::try_from(kv)
                        .map_err(|kv| Error::malformed("Pairs", format!("{} items", kv.len())))?;
                    match key.as_str() {
                        Some(k) => Ok((k.to_string(), value)),
                        None => Err(Error::NonStringMapKey(key.to_string())),
                    }
                })
                .collect()
        })
}

#[test]
fn test_custom_encoder_converts_foreign_keys() {
    let registry = pairs_registry();
    let records = encode_with(vec![("t".to_string(), hkvn!([["a", "1"], ["b", "2"]]))], &registry)
        .unwrap();
    assert_eq!(
        records,
        vec![
            header("t", "Pairs>", ""),
            Line::entry("a", "1"),
            Line::entry("b", "2"),
            Line::End,
            Line::End,
        ]
    );
}

#[test]
fn test_custom_encoder_rejects_non_string_keys() {
    let registry = pairs_registry();
    let err = encode_with(vec![("t".to_string(), hkvn!([[b"\xff", "1"]]))], &registry)
        .unwrap_err();
    assert!(matches!(err, Error::NonStringMapKey(_)));
}

#[test]
fn test_block_reports_prefix_and_progress() {
    let registry = Registry::new().with_decoder(["State"], |_, children| {
        let prefix = children.prefix().to_string();
        let before = children.is_finished();
        let count = children.by_ref().collect::<Result<Vec<Entry>, Error>>()?.len();
        let after = children.is_finished();
        Ok(Value::from(format!("{}|{}|{}|{}", prefix, before, count, after)))
    });
    let records = vec![
        header("k", "State>._", ""),
        Line::entry("._a", "1"),
        Line::Skip,
        Line::entry("._b", "2"),
        Line::End,
        Line::End,
    ];
    let decoded = decode_with(records, &registry).unwrap();
    assert_eq!(decoded, vec![("k".to_string(), Value::from("._|false|2|true"))]);
}

#[test]
fn test_block_swallowed_error_still_surfaces() {
    let registry = Registry::new().with_decoder(["State"], |_, children| {
        let ok = children.by_ref().filter(Result::is_ok).count();
        assert!(!children.is_finished());
        Ok(Value::from(ok.to_string()))
    });
    let records = vec![
        header("k", "State>.", ""),
        Line::entry(".a", "1"),
        Line::entry("b", "2"),
        Line::End,
        Line::End,
    ];
    let err = decode_with(records, &registry).unwrap_err();
    assert_eq!(err, Error::prefix_mismatch("b", "."));
}
