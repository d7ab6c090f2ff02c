//! Encoding a value tree into records and decoding it back.
//!
//! Run with: cargo run --example roundtrip

use hkvn::{decode, encode, hkvn, Line, Payload};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let config = hkvn!({
        "host": "localhost",
        "port": "8080",
        "features": ["auth", "logging"],
        "limits": { "rps": "100", "burst": "20" }
    });

    let records = encode(vec![("config".to_string(), config.clone())])?;

    println!("Records:");
    for record in &records {
        match record {
            Line::Entry(key, Payload::Scalar(value)) => {
                println!("  {:<10} {}", key, String::from_utf8_lossy(value))
            }
            Line::Entry(key, Payload::Annotated { annotation, value }) => println!(
                "  {:<10} {} {}",
                key,
                annotation,
                String::from_utf8_lossy(value)
            ),
            Line::End => println!("  <end>"),
            Line::Skip => println!("  <skip>"),
        }
    }

    let decoded = decode(records)?;
    println!("\nDecoded: {}", decoded[0].1);
    assert_eq!(decoded, vec![("config".to_string(), config)]);

    Ok(())
}
