//! Keeping nested blocks apart with a key prefix, and streaming lazily.
//!
//! Run with: cargo run --example prefixed_blocks

use hkvn::de::read;
use hkvn::ser::write;
use hkvn::{hkvn, Error, Hierarchical, Line, Registry, Value};

fn main() -> Result<(), Error> {
    let registry = Registry::new();

    let unknown = Hierarchical::new(
        "Vendor",
        "v2",
        vec![("serial".to_string(), Value::from("A-17"))],
    );
    let events = vec![
        Line::entry("device", hkvn!({ "name": "probe", "ports": ["eth0", "eth1"] })),
        Line::entry("extension", unknown),
    ];

    // Each nesting level prepends one more "." to its keys.
    let records = write(events, &registry)
        .with_prefix(".")
        .collect::<Result<Vec<_>, _>>()?;
    for record in &records {
        println!("{:?}", record);
    }

    // Pull one top-level item at a time.
    let mut reader = read(records, &registry);
    while let Some(event) = reader.next().transpose()? {
        if let Line::Entry(key, value) = event {
            println!("{} -> {}", key, value);
        }
    }

    Ok(())
}
