//! Row types listed by admin views.

use crate::{error::Result, Error, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Stable identifier of a row.
///
/// Admin collections use both numeric ids (designations, price lists) and
/// string ids (buyers, KYC requests), so both are accepted on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Number(i64),
    Text(String),
}

impl RowId {
    /// Read an id from a JSON value. Only numbers and non-empty strings
    /// qualify; strings are read with [`RowId::parse`].
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(RowId::Number),
            Value::String(s) if !s.is_empty() => Some(RowId::parse(s)),
            _ => None,
        }
    }

    /// Parse an id from a path segment.
    ///
    /// Only integers written the way they display (`42`, `-3`) become
    /// numeric ids, so `parse(id.to_string()) == id` for every id this
    /// returns. `007` and `+5` stay text.
    pub fn parse(segment: &str) -> Self {
        match segment.parse::<i64>() {
            Ok(n) if n.to_string() == segment => RowId::Number(n),
            _ => RowId::Text(segment.to_string()),
        }
    }

    /// The same id in the form [`RowId::parse`] would produce.
    pub fn canonical(self) -> Self {
        match self {
            RowId::Text(s) => RowId::parse(&s),
            number => number,
        }
    }

    /// The id as a JSON value.
    pub fn to_value(&self) -> Value {
        match self {
            RowId::Number(n) => Value::from(*n),
            RowId::Text(s) => Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Number(n) => write!(f, "{}", n),
            RowId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        RowId::Text(s.to_string())
    }
}

impl From<String> for RowId {
    fn from(s: String) -> Self {
        RowId::Text(s)
    }
}

impl From<i32> for RowId {
    fn from(n: i32) -> Self {
        RowId::Number(n as i64)
    }
}

impl From<i64> for RowId {
    fn from(n: i64) -> Self {
        RowId::Number(n)
    }
}

impl From<u32> for RowId {
    fn from(n: u32) -> Self {
        RowId::Number(n as i64)
    }
}

/// A row that can be listed, searched, sorted and exported.
///
/// Rows are values: edits produce copies through [`Row::with_field`] or by
/// building a new row, never by mutating the one held by a collection.
pub trait Row: Clone {
    /// Stable unique id.
    fn id(&self) -> RowId;

    /// Field value by name, `None` when the row has no such field.
    fn field(&self, name: &str) -> Option<Value>;

    /// The row as a JSON object, used for form validation.
    fn to_payload(&self) -> Value;

    /// A copy of this row with one field replaced.
    fn with_field(&self, name: &str, _value: Value) -> Result<Self> {
        Err(Error::FieldNotWritable(name.to_string()))
    }
}

/// A JSON-backed row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Unique identifier for this row
    pub id: RowId,
    /// The row fields (JSON object)
    pub payload: Value,
    /// When the row was created (milliseconds since epoch)
    pub created_at: Timestamp,
    /// When the row was last updated (milliseconds since epoch)
    pub updated_at: Timestamp,
}

impl Record {
    /// Create a new record.
    pub fn new(id: impl Into<RowId>, payload: Value, timestamp: Timestamp) -> Self {
        Self {
            id: id.into(),
            payload,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// A copy of this record with a new payload.
    pub fn with_payload(&self, payload: Value, timestamp: Timestamp) -> Self {
        Self {
            id: self.id.clone(),
            payload,
            created_at: self.created_at,
            updated_at: timestamp,
        }
    }
}

impl Row for Record {
    fn id(&self) -> RowId {
        self.id.clone()
    }

    fn field(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.payload.get(name) {
            return Some(value.clone());
        }
        match name {
            "id" => Some(self.id.to_value()),
            "createdAt" => Some(Value::from(self.created_at)),
            "updatedAt" => Some(Value::from(self.updated_at)),
            _ => None,
        }
    }

    fn to_payload(&self) -> Value {
        self.payload.clone()
    }

    fn with_field(&self, name: &str, value: Value) -> Result<Self> {
        let mut payload = self.payload.clone();
        let obj = payload
            .as_object_mut()
            .ok_or_else(|| Error::InvalidPayload("payload must be an object".into()))?;
        obj.insert(name.to_string(), value);
        Ok(Self {
            id: self.id.clone(),
            payload,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_record() {
        let record = Record::new("buyer-1", json!({"name": "Acme Traders"}), 1000);

        assert_eq!(record.id, RowId::from("buyer-1"));
        assert_eq!(record.payload, json!({"name": "Acme Traders"}));
        assert_eq!(record.created_at, 1000);
        assert_eq!(record.updated_at, 1000);
    }

    #[test]
    fn field_lookup_falls_back_to_metadata() {
        let record = Record::new(7, json!({"name": "Sales Manager"}), 1000);

        assert_eq!(record.field("name"), Some(json!("Sales Manager")));
        assert_eq!(record.field("id"), Some(json!(7)));
        assert_eq!(record.field("createdAt"), Some(json!(1000)));
        assert_eq!(record.field("missing"), None);
    }

    #[test]
    fn with_field_copies() {
        let record = Record::new(1, json!({"status": "pending"}), 1000);
        let approved = record.with_field("status", json!("approved")).unwrap();

        assert_eq!(record.field("status"), Some(json!("pending")));
        assert_eq!(approved.field("status"), Some(json!("approved")));
        assert_eq!(approved.id, record.id);
    }

    #[test]
    fn with_field_rejects_non_object_payload() {
        let record = Record::new(1, json!("not an object"), 1000);
        assert!(matches!(
            record.with_field("status", json!("approved")),
            Err(Error::InvalidPayload(_))
        ));
    }

    #[test]
    fn with_payload_keeps_created_at() {
        let record = Record::new(1, json!({"title": "Old"}), 1000);
        let edited = record.with_payload(json!({"title": "New"}), 2000);

        assert_eq!(edited.created_at, 1000);
        assert_eq!(edited.updated_at, 2000);
        assert_eq!(record.payload, json!({"title": "Old"}));
    }

    #[test]
    fn row_id_parse_and_wire_format() {
        assert_eq!(RowId::parse("42"), RowId::Number(42));
        assert_eq!(RowId::parse("kyc-9"), RowId::Text("kyc-9".into()));
        assert_eq!(RowId::parse("007"), RowId::Text("007".into()));
        assert_eq!(RowId::parse("+5"), RowId::Text("+5".into()));
        assert_eq!(RowId::parse("-3"), RowId::Number(-3));

        let ids: Vec<RowId> = serde_json::from_str(r#"[3, "d-1"]"#).unwrap();
        assert_eq!(ids, vec![RowId::Number(3), RowId::Text("d-1".into())]);
        assert_eq!(serde_json::to_string(&ids).unwrap(), r#"[3,"d-1"]"#);
    }

    #[test]
    fn body_ids_match_path_ids() {
        for raw in ["42", "007", "kyc-9"] {
            let from_body = RowId::from_value(&json!(raw)).unwrap();
            let from_path = RowId::parse(&from_body.to_string());
            assert_eq!(from_body, from_path, "{}", raw);
        }
        assert_eq!(RowId::from_value(&json!("42")), Some(RowId::Number(42)));
        assert_eq!(RowId::from_value(&json!("")), None);
        assert_eq!(RowId::from("42").canonical(), RowId::Number(42));
        assert_eq!(RowId::from("007").canonical(), RowId::Text("007".into()));
    }

    #[test]
    fn serialization_format() {
        let record = Record::new("s-1", json!({"title": "Summer sale"}), 1000);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("createdAt")); // camelCase
        assert!(json.contains("updatedAt"));

        let parsed: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(record, parsed);
    }
}
