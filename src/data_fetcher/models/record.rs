use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One observation row as returned by HAPI.
///
/// Field sets differ per subcategory, so the row is kept as an ordered JSON
/// object and read through typed accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// The field as a borrowed string, only when it is a JSON string.
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// The field rendered as text. Numbers and booleans are stringified,
    /// `null`, arrays and objects count as missing.
    pub fn text(&self, field: &str) -> Option<String> {
        match self.0.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// The field as a float. Numeric strings are parsed.
    pub fn number(&self, field: &str) -> Option<f64> {
        match self.0.get(field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn reference_period_start(&self) -> Option<&str> {
        self.str_field("reference_period_start")
    }

    pub fn reference_period_end(&self) -> Option<&str> {
        self.str_field("reference_period_end")
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_accessors() {
        let row = record(json!({
            "market_code": "M1",
            "price": 12.5,
            "lat": "34.52",
            "admin_level": 2,
            "has_hrp": true,
            "admin2_name": null,
        }));

        assert_eq!(row.str_field("market_code"), Some("M1"));
        assert_eq!(row.str_field("price"), None);
        assert_eq!(row.text("admin_level"), Some("2".to_string()));
        assert_eq!(row.text("has_hrp"), Some("true".to_string()));
        assert_eq!(row.text("admin2_name"), None);
        assert_eq!(row.number("price"), Some(12.5));
        assert_eq!(row.number("lat"), Some(34.52));
        assert_eq!(row.number("market_code"), None);
        assert_eq!(row.text("missing"), None);
    }

    #[test]
    fn test_record_keeps_field_order() {
        let row = record(json!({"z": 1, "a": 2, "m": 3}));
        let keys: Vec<&String> = row.fields().keys().collect();
        assert_eq!(keys, ["z", "a", "m"]);
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"{"z":1,"a":2,"m":3}"#);
    }

    #[test]
    fn test_reference_periods() {
        let row = record(json!({
            "reference_period_start": "2024-01-01T00:00:00",
            "reference_period_end": "2024-01-31T23:59:59",
        }));
        assert_eq!(row.reference_period_start(), Some("2024-01-01T00:00:00"));
        assert_eq!(row.reference_period_end(), Some("2024-01-31T23:59:59"));
    }
}
