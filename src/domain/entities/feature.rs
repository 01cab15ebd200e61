use super::document::{DocumentId, Fields};
use serde::{Deserialize, Serialize};

/// Static display item. Opaque, never mutated through the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(flatten)]
    pub fields: Fields,
}
