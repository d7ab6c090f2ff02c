/// Builds a [`Value`](crate::Value) tree from a literal.
///
/// Objects become mappings, arrays become sequences, anything else goes
/// through `Value::from` (strings and byte strings become scalars).
///
/// ```rust
/// use hkvn::{hkvn, Value};
///
/// let value = hkvn!({
///     "name": "Alice",
///     "raw": b"\x00\x01",
///     "roles": ["admin", "dev"],
///     "address": { "city": "Paris" }
/// });
///
/// let map = value.as_map().unwrap();
/// assert_eq!(map.get("name"), Some(&Value::from("Alice")));
/// assert_eq!(map.get("raw"), Some(&Value::Scalar(vec![0, 1])));
/// ```
#[macro_export]
macro_rules! hkvn {
    // Handle empty sequence
    ([]) => {
        $crate::Value::List(vec![])
    };

    // Handle non-empty sequence
    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::List(vec![$($crate::hkvn!($elem)),*])
    };

    // Handle empty mapping
    ({}) => {
        $crate::Value::Map($crate::HkvnMap::new())
    };

    // Handle non-empty mapping
    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut map = $crate::HkvnMap::new();
        $(
            map.insert($key.to_string(), $crate::hkvn!($value));
        )*
        $crate::Value::Map(map)
    }};

    // Scalars and anything convertible into a value
    ($other:expr) => {
        $crate::Value::from($other)
    };
}
