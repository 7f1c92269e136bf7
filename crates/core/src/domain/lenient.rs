//! Field decoders that never fail on odd backend values.
//!
//! Any numeric field may arrive as `null`, a string such as `"N/A"`, or be missing
//! entirely. Those are presentation gaps, not decode errors, so they collapse to `None`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn number<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(de)?;
    Ok(v.as_ref().and_then(Value::as_f64).filter(|n| n.is_finite()))
}

pub fn text<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(de)?;
    Ok(v.and_then(value_to_text))
}

pub fn text_list<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(de)?;
    Ok(match v {
        Some(Value::Array(items)) => items.into_iter().filter_map(value_to_text).collect(),
        Some(other) => value_to_text(other).into_iter().collect(),
        None => Vec::new(),
    })
}

fn value_to_text(v: Value) -> Option<String> {
    match v {
        Value::String(s) => {
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "number")]
        n: Option<f64>,
        #[serde(default, deserialize_with = "text")]
        t: Option<String>,
        #[serde(default, deserialize_with = "text_list")]
        l: Vec<String>,
    }

    #[test]
    fn numbers_tolerate_junk() {
        let p: Sample = serde_json::from_value(json!({"n": "N/A", "t": 12, "l": "one"})).unwrap();
        assert_eq!(p.n, None);
        assert_eq!(p.t.as_deref(), Some("12"));
        assert_eq!(p.l, vec!["one".to_string()]);

        let p: Sample = serde_json::from_value(json!({"n": null, "t": {"x": 1}, "l": [1, null, "b"]})).unwrap();
        assert_eq!(p.n, None);
        assert_eq!(p.t, None);
        assert_eq!(p.l, vec!["1".to_string(), "b".to_string()]);
    }

    #[test]
    fn missing_fields_default() {
        let p: Sample = serde_json::from_value(json!({})).unwrap();
        assert_eq!(p.n, None);
        assert!(p.l.is_empty());

        let p: Sample = serde_json::from_value(json!({"n": 42.5})).unwrap();
        assert_eq!(p.n, Some(42.5));
    }
}
