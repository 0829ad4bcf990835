//! Tolerant field deserializers for platform bodies.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Count {
    Int(i64),
    Float(f64),
    Other(IgnoredAny),
}

/// A token count that may arrive as an integer, a float, or something else.
///
/// Floats are truncated toward zero. Null, strings and other shapes read as
/// `None` instead of failing the whole body.
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Count::deserialize(deserializer)? {
        Count::Int(n) => Some(n),
        Count::Float(f) if f.is_finite() => Some(f as i64),
        Count::Float(_) | Count::Other(_) => None,
    })
}
