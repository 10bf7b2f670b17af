//! Bulk response models

use super::traits::{BulkItemOutcome, BulkWriteResult};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Body of a `_bulk` response
#[derive(Debug, Deserialize)]
pub struct BulkResponse {
    #[serde(default)]
    pub took: u64,

    #[serde(default)]
    pub errors: bool,

    #[serde(default)]
    pub items: Vec<Map<String, Value>>,
}

/// Inner object of one bulk item, keyed by the action name in the response
#[derive(Debug, Deserialize)]
struct BulkItemBody {
    #[serde(rename = "_id", default)]
    id: String,

    #[serde(default)]
    status: u16,

    #[serde(default)]
    error: Option<Value>,
}

fn describe_error(error: Value) -> String {
    match error {
        Value::String(message) => message,
        Value::Object(ref fields) => {
            let kind = fields.get("type").and_then(Value::as_str);
            let reason = fields.get("reason").and_then(Value::as_str);
            match (kind, reason) {
                (Some(kind), Some(reason)) => format!("{kind}: {reason}"),
                (Some(kind), None) => kind.to_string(),
                (None, Some(reason)) => reason.to_string(),
                (None, None) => error.to_string(),
            }
        }
        other => other.to_string(),
    }
}

impl BulkResponse {
    /// Convert into per-item outcomes
    pub fn into_result(self) -> BulkWriteResult {
        let items = self
            .items
            .into_iter()
            .filter_map(|item| item.into_iter().next())
            .map(|(_, body)| match serde_json::from_value::<BulkItemBody>(body) {
                Ok(body) => BulkItemOutcome {
                    id: body.id,
                    status: body.status,
                    error: body.error.map(describe_error),
                },
                Err(e) => BulkItemOutcome {
                    id: String::new(),
                    status: 0,
                    error: Some(format!("Unreadable bulk item: {e}")),
                },
            })
            .collect();

        BulkWriteResult {
            took_ms: self.took,
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_bulk_response_with_item_errors() {
        let response: BulkResponse = serde_json::from_value(json!({
            "took": 7,
            "errors": true,
            "items": [
                {"index": {"_index": "shop", "_type": "product", "_id": "1", "status": 201}},
                {"index": {"_index": "shop", "_type": "product", "_id": "2", "status": 400,
                           "error": {"type": "mapper_parsing_exception", "reason": "failed to parse [price]"}}},
                {"index": {"_index": "shop", "_type": "product", "_id": "3", "status": 400,
                           "error": "MapperParsingException[failed to parse]"}}
            ]
        }))
        .unwrap();

        assert!(response.errors);
        let result = response.into_result();

        assert_eq!(result.took_ms, 7);
        assert_eq!(result.items.len(), 3);
        assert!(result.items[0].is_success());
        assert_eq!(
            result.items[1].error.as_deref(),
            Some("mapper_parsing_exception: failed to parse [price]")
        );
        assert_eq!(
            result.items[2].error.as_deref(),
            Some("MapperParsingException[failed to parse]")
        );
        assert_eq!(result.failures().len(), 2);
    }

    #[test]
    fn test_parse_create_action_key() {
        let response: BulkResponse = serde_json::from_value(json!({
            "took": 1,
            "errors": false,
            "items": [{"create": {"_id": "a", "status": 201}}]
        }))
        .unwrap();

        let result = response.into_result();
        assert_eq!(result.items[0].id, "a");
        assert!(!result.has_failures());
    }
}
