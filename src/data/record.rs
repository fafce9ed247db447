//! Record Module
//! Typed row values shared by the loader and the statistics engine.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A single cell after coercion.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// Coerce a raw cell: finite numbers become `Number`, everything else stays text.
///
/// Surrounding whitespace is ignored for the numeric check; empty cells are text.
pub fn parse_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Text(raw.to_string());
    }

    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Value::Number(n),
        _ => Value::Text(raw.to_string()),
    }
}

/// Column names of one source, in header order.
#[derive(Debug)]
pub struct Header {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Header {
    pub fn new(names: Vec<String>) -> Self {
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            // First occurrence wins on duplicate column names
            index.entry(name.clone()).or_insert(i);
        }
        Self { names, index }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    fn len(&self) -> usize {
        self.names.len()
    }
}

/// One parsed row. The header is shared by every record of the same source.
#[derive(Debug, Clone)]
pub struct Record {
    header: Arc<Header>,
    values: Vec<Value>,
}

impl Record {
    /// Build a record against a shared header.
    ///
    /// Missing trailing values are filled with empty text so that every
    /// header column is present.
    pub fn new(header: Arc<Header>, mut values: Vec<Value>) -> Self {
        values.resize(header.len(), Value::Text(String::new()));
        Self { header, values }
    }

    /// Build a standalone record from `(name, value)` pairs.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let (names, values): (Vec<String>, Vec<Value>) =
            pairs.into_iter().map(|(k, v)| (k.into(), v)).unzip();
        Self::new(Arc::new(Header::new(names)), values)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.header.position(name).and_then(|i| self.values.get(i))
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_number)
    }

    /// Numeric view used by the statistics: absent or non-numeric reads as 0.
    pub fn number_or_zero(&self, name: &str) -> f64 {
        self.number(name).unwrap_or(0.0)
    }

    /// Text rendering of a field; absent fields render as empty.
    pub fn text(&self, name: &str) -> String {
        self.get(name).map(|v| v.to_string()).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.header
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_numbers() {
        assert_eq!(parse_value("15"), Value::Number(15.0));
        assert_eq!(parse_value(" 2.5 "), Value::Number(2.5));
        assert_eq!(parse_value("-3"), Value::Number(-3.0));
    }

    #[test]
    fn test_parse_value_text() {
        assert_eq!(parse_value("GP"), Value::Text("GP".to_string()));
        assert_eq!(parse_value(""), Value::Text(String::new()));
        assert_eq!(parse_value("   "), Value::Text("   ".to_string()));
        assert_eq!(parse_value("NaN"), Value::Text("NaN".to_string()));
        assert_eq!(parse_value("inf"), Value::Text("inf".to_string()));
    }

    #[test]
    fn test_record_lookup() {
        let record = Record::from_pairs([
            ("school", Value::Text("GP".to_string())),
            ("G3", Value::Number(12.0)),
        ]);

        assert_eq!(record.number("G3"), Some(12.0));
        assert_eq!(record.number("school"), None);
        assert_eq!(record.number_or_zero("school"), 0.0);
        assert_eq!(record.number_or_zero("absent"), 0.0);
        assert_eq!(record.text("school"), "GP");
        assert_eq!(record.text("G3"), "12");
        assert_eq!(record.text("absent"), "");
    }

    #[test]
    fn test_record_pads_short_rows() {
        let header = Arc::new(Header::new(vec!["a".into(), "b".into()]));
        let record = Record::new(header, vec![Value::Number(1.0)]);
        assert_eq!(record.get("b"), Some(&Value::Text(String::new())));
    }

    #[test]
    fn test_record_serializes_in_header_order() {
        let record = Record::from_pairs([
            ("sex", Value::Text("F".to_string())),
            ("age", Value::Number(17.0)),
        ]);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"sex":"F","age":17.0}"#);
    }
}
