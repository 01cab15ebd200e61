use super::document::{explicit_null, DocumentId, Fields};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Assignment definition. Only `level` is inspected by the catalog; title,
/// marks, thumbnail and anything else the author sends ride along in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    /// `Some(None)` is a level sent as `null`, stored and returned as such
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub level: Option<Option<String>>,
    #[serde(flatten)]
    pub extra: Fields,
}

impl Assignment {
    pub fn title(&self) -> Option<&str> {
        self.extra.get("title").and_then(|v| v.as_str())
    }

    pub fn level(&self) -> Option<&str> {
        self.level.as_ref().and_then(|l| l.as_deref())
    }

    /// Field map as it is written to storage, without `_id`.
    pub fn into_fields(self) -> Fields {
        let mut fields = self.extra;
        if let Some(level) = self.level {
            fields.insert(
                "level".to_string(),
                level.map(Value::String).unwrap_or(Value::Null),
            );
        }
        fields
    }
}
