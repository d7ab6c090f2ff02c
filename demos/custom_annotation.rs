//! Plugging an application type into the registry.
//!
//! A `Range` block carries its bounds as two children; the decoder turns it
//! into a sequence of every value in between.
//!
//! Run with: cargo run --example custom_annotation

use hkvn::{decode_with, Error, Fallback, Line, Payload, Record, Registry, Value};

fn parse_bound(value: &Value) -> Result<u32, Error> {
    value
        .as_str()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| Error::custom(format!("bad range bound: {}", value)))
}

fn main() -> Result<(), Error> {
    let registry = Registry::new()
        .with_decoder(["Range", "R"], |_, children| {
            let bounds = children.collect::<Result<Vec<_>, Error>>()?;
            let [(_, from), (_, to)] = bounds.as_slice() else {
                return Err(Error::custom("range needs exactly two bounds"));
            };
            let values = (parse_bound(from)?..=parse_bound(to)?)
                .map(|n| Value::from(n.to_string()))
                .collect();
            Ok(Value::List(values))
        })
        .with_fallback(Fallback::Reject);

    let records: Vec<Record> = vec![
        Line::entry("digits", Payload::annotated("R>", "")),
        Line::entry("from", "3"),
        Line::entry("to", "6"),
        Line::End,
        Line::End,
    ];

    for (key, value) in decode_with(records, &registry)? {
        println!("{} = {}", key, value);
    }

    let unknown: Vec<Record> = vec![
        Line::entry("x", Payload::annotated("Mystery>", "")),
        Line::End,
        Line::End,
    ];
    match decode_with(unknown, &registry) {
        Err(err) => println!("rejected: {}", err),
        Ok(entries) => println!("unexpectedly decoded {} entries", entries.len()),
    }

    Ok(())
}
