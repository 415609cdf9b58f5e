//! Configuration items and lenient parsing of submitted item lists

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Reserved `item_type` marking a group (container) item.
pub const ITEM_GROUP: &str = "item_group";

/// A configuration item.
///
/// The same record is used for flat lists and for trees. In a flat list
/// `children` is always empty; in a tree only groups carry children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    #[serde(default)]
    pub item_type: String,
    #[serde(default)]
    pub pid: Option<i64>,
    #[serde(default)]
    pub weight: i64,
    /// Opaque payload, carried along untouched
    #[serde(default)]
    pub config: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Item>,
}

impl Item {
    pub fn new(id: i64, item_type: impl Into<String>, pid: Option<i64>, weight: i64) -> Self {
        Self {
            id,
            item_type: item_type.into(),
            pid,
            weight,
            config: Value::Null,
            children: Vec::new(),
        }
    }

    pub fn group(id: i64, weight: i64) -> Self {
        Self::new(id, ITEM_GROUP, None, weight)
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }

    pub fn with_children(mut self, children: Vec<Item>) -> Self {
        self.children = children;
        self
    }

    /// Items without a type take no part in any conversion.
    pub fn is_valid(&self) -> bool {
        !self.item_type.is_empty()
    }

    pub fn is_group(&self) -> bool {
        self.item_type == ITEM_GROUP
    }

    /// Build an item from one entry of a submitted list.
    ///
    /// Returns `None` for entries that are not objects or lack a numeric `id`.
    /// Numbers may arrive as strings.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let Some(id) = obj.get("id").and_then(lenient_int) else {
            debug!("dropping item without numeric id: {}", value);
            return None;
        };
        // untyped items are kept; the conversions skip them
        let item_type = obj
            .get("item_type")
            .and_then(Value::as_str)
            .unwrap_or_default();

        let children = obj
            .get("children")
            .map(entries)
            .unwrap_or_default()
            .into_iter()
            .filter_map(Item::from_value)
            .collect();

        Some(Self {
            id,
            item_type: item_type.to_string(),
            pid: obj.get("pid").and_then(lenient_int),
            weight: obj.get("weight").and_then(lenient_int).unwrap_or(0),
            config: obj.get("config").cloned().unwrap_or(Value::Null),
            children,
        })
    }
}

/// Error for documents that cannot hold an item list at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemParseError {
    pub message: String,
}

/// Parse a submitted item list.
///
/// Accepts a JSON array or an object keyed by index (form payloads).
/// Malformed entries are dropped; only an unusable document is an error.
pub fn parse_items(content: &str) -> Result<Vec<Item>, ItemParseError> {
    let doc: Value = serde_json::from_str(content).map_err(|e| ItemParseError {
        message: e.to_string(),
    })?;
    if !(doc.is_array() || doc.is_object()) {
        return Err(ItemParseError {
            message: "expected an array or an object of items".to_string(),
        });
    }

    let values = entries(&doc);
    let total = values.len();
    let items: Vec<Item> = values.into_iter().filter_map(Item::from_value).collect();
    debug!("parsed {} of {} items", items.len(), total);
    Ok(items)
}

/// Entries of an array, the values of an index-keyed object, or a single
/// item object as a one-entry list.
fn entries(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(list) => list.iter().collect(),
        Value::Object(map) if is_item_object(map) => vec![value],
        Value::Object(map) => object_values(map),
        _ => Vec::new(),
    }
}

fn is_item_object(map: &Map<String, Value>) -> bool {
    map.contains_key("id") || map.contains_key("item_type")
}

fn object_values(map: &Map<String, Value>) -> Vec<&Value> {
    map.iter()
        .sorted_by_key(|(key, _)| key.parse::<i64>().unwrap_or(i64::MAX))
        .map(|(_, value)| value)
        .collect()
}

/// Integers as sent by forms: JSON numbers or numeric strings.
fn lenient_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| fits_i64(*f)).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Whole floats inside the `i64` range; `i64::MAX as f64` is 2^63, one past it.
fn fits_i64(f: f64) -> bool {
    f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_string_numbers_when_parsing_then_converts_them() {
        let item = Item::from_value(&json!({
            "id": "7", "item_type": "link", "pid": "3", "weight": "-2"
        }))
        .unwrap();

        assert_eq!(item.id, 7);
        assert_eq!(item.pid, Some(3));
        assert_eq!(item.weight, -2);
        assert_eq!(item.config, Value::Null);
    }

    #[test]
    fn given_missing_item_type_when_parsing_then_keeps_invalid_item() {
        let item = Item::from_value(&json!({"id": 1, "weight": 0})).unwrap();
        assert!(!item.is_valid());

        let item = Item::from_value(&json!({"id": 2, "item_type": 5})).unwrap();
        assert!(!item.is_valid());
    }

    #[test]
    fn given_non_numeric_id_when_parsing_then_drops_item() {
        assert!(Item::from_value(&json!({"id": "abc", "item_type": "link"})).is_none());
        assert!(Item::from_value(&json!({"item_type": "link"})).is_none());
    }

    #[test]
    fn given_non_numeric_pid_when_parsing_then_pid_is_none() {
        let item = Item::from_value(&json!({"id": 1, "item_type": "link", "pid": ""})).unwrap();
        assert_eq!(item.pid, None);
    }

    #[test]
    fn given_index_keyed_object_when_parsing_then_reads_values() {
        let content = r#"{
            "0": {"id": 1, "item_type": "item_group", "weight": 0},
            "1": {"id": 2, "item_type": "link", "pid": 1, "weight": 1, "config": {"label": "x"}}
        }"#;

        let items = parse_items(content).unwrap();

        assert_eq!(items.len(), 2);
        assert!(items[0].is_group());
        assert_eq!(items[1].config, json!({"label": "x"}));
    }

    #[test]
    fn given_numeric_keys_when_parsing_then_orders_by_index() {
        let content = r#"{
            "10": {"id": 11, "item_type": "link"},
            "2": {"id": 3, "item_type": "link"}
        }"#;

        let ids: Vec<i64> = parse_items(content).unwrap().iter().map(|i| i.id).collect();

        assert_eq!(ids, vec![3, 11]);
    }

    #[test]
    fn given_nested_children_when_parsing_then_parses_recursively() {
        let content = r#"[{"id": 1, "item_type": "item_group", "children": [
            {"id": 2, "item_type": "link", "weight": 1},
            {"id": "bad", "item_type": "link"}
        ]}]"#;

        let items = parse_items(content).unwrap();

        assert_eq!(items[0].children.len(), 1);
        assert_eq!(items[0].children[0].id, 2);
    }

    #[test]
    fn given_single_item_object_when_parsing_then_one_item_list() {
        let items = parse_items(r#"{"id": 1, "item_type": "item_group"}"#).unwrap();

        assert_eq!(items.len(), 1);
        assert!(items[0].is_group());
    }

    #[test]
    fn given_single_child_object_when_parsing_then_keeps_child() {
        let content = r#"[{"id": 1, "item_type": "item_group",
            "children": {"id": 2, "item_type": "link", "weight": 4}}]"#;

        let items = parse_items(content).unwrap();

        assert_eq!(items[0].children.len(), 1);
        assert_eq!(items[0].children[0].weight, 4);
    }

    #[test]
    fn given_numbers_outside_i64_when_parsing_then_treated_as_missing() {
        assert!(Item::from_value(&json!({"id": u64::MAX, "item_type": "link"})).is_none());
        assert!(Item::from_value(&json!({"id": 1.0e19, "item_type": "link"})).is_none());

        let item = Item::from_value(&json!({"id": 1, "item_type": "link", "pid": 1.0e19}))
            .unwrap();
        assert_eq!(item.pid, None);
    }

    #[test]
    fn given_whole_float_when_parsing_then_converts_it() {
        let item = Item::from_value(&json!({"id": 3.0, "item_type": "link"})).unwrap();
        assert_eq!(item.id, 3);
    }

    #[test]
    fn given_scalar_document_when_parsing_then_fails() {
        assert!(parse_items("42").is_err());
        assert!(parse_items("not json").is_err());
    }

    #[test]
    fn given_children_when_serializing_flat_item_then_omits_children_key() {
        let value = serde_json::to_value(Item::new(3, "link", Some(1), 0)).unwrap();
        assert!(value.get("children").is_none());
        assert_eq!(value["pid"], json!(1));
    }
}
