pub mod fees;

use std::fmt::Display;

use serde::Serializer;

/// `serialize_with` helper: write a value through its `Display` impl
/// (base58 for pubkeys and signatures).
pub fn serialize_display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.collect_str(value)
}
