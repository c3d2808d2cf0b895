//! Lenient field decoding for form-built JSON bodies
//!
//! Browser forms send ids and amounts either as numbers or as strings, and
//! flags as booleans or as `"true"`/`"si"` text.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use taller_types::parse_flag;

pub(crate) fn opt_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

pub(crate) fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    })
}

pub(crate) fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

pub(crate) fn opt_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => Some(parse_flag(&s)),
        Some(Value::Number(n)) => Some(n.as_i64() == Some(1)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "opt_u64")]
        id: Option<u64>,
        #[serde(default, deserialize_with = "opt_string")]
        km: Option<String>,
        #[serde(default, deserialize_with = "opt_bool")]
        admin: Option<bool>,
    }

    #[test]
    fn test_numbers_as_strings() {
        let b: Body = serde_json::from_str(r#"{"id":"12","km":95000,"admin":"si"}"#).unwrap();
        assert_eq!(b.id, Some(12));
        assert_eq!(b.km.as_deref(), Some("95000"));
        assert_eq!(b.admin, Some(true));
    }

    #[test]
    fn test_missing_and_garbage() {
        let b: Body = serde_json::from_str(r#"{"id":"doce"}"#).unwrap();
        assert_eq!(b.id, None);
        assert_eq!(b.admin, None);
    }
}
