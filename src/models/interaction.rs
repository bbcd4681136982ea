use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of user-item interaction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    View,
    Click,
    Purchase,
    Rating,
}

impl InteractionType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            InteractionType::View => "view",
            InteractionType::Click => "click",
            InteractionType::Purchase => "purchase",
            InteractionType::Rating => "rating",
        }
    }
}

/// A recorded interaction between a user and an item
///
/// `user_id` / `item_id` are not checked against their collections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: String,
    pub user_id: String,
    pub item_id: String,
    #[serde(rename = "type")]
    pub kind: InteractionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Partial update of an interaction
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_interaction_type_wire_name() {
        let interaction: Interaction = serde_json::from_value(json!({
            "id": "x1",
            "userId": "u1",
            "itemId": "i1",
            "type": "purchase",
            "timestamp": "2024-03-10T12:00:00Z"
        }))
        .unwrap();

        assert_eq!(interaction.kind, InteractionType::Purchase);
        assert_eq!(interaction.rating, None);

        let json = serde_json::to_value(&interaction).unwrap();
        assert_eq!(json["type"], "purchase");
        assert!(json.get("rating").is_none());
    }

    #[test]
    fn test_unknown_interaction_type_rejected() {
        let result: Result<Interaction, _> = serde_json::from_value(json!({
            "id": "x1",
            "userId": "u1",
            "itemId": "i1",
            "type": "share"
        }));
        assert!(result.is_err());
    }
}
