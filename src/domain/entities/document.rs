use crate::domain::errors::{DomainError, DomainResult};
use bson::oid::ObjectId;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Field map of a schemaless document.
pub type Fields = Map<String, Value>;

/// Key under which the identifier is exposed on every returned document.
pub const ID_FIELD: &str = "_id";

/// Storage-assigned identifier in ObjectId format (24 hex characters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(ObjectId);

impl DocumentId {
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    /// Parse a client-supplied identifier. Malformed input never reaches storage.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        ObjectId::parse_str(raw).map(Self).map_err(|_| {
            DomainError::InvalidIdentifier(format!(
                "'{}' must be a 24 character hex string",
                raw
            ))
        })
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl FromStr for DocumentId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Deserializer for typed fields that must keep an explicit `null`:
/// absent is `None`, `null` is `Some(None)`. Pair with `#[serde(default)]`.
pub(crate) fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// The three logical record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Features,
    Assignments,
    SubmittedAssignments,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Features => "features",
            Collection::Assignments => "assignments",
            Collection::SubmittedAssignments => "submittedAssignments",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dotted path into a document, e.g. `examinee.email`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn parse(dotted: &str) -> DomainResult<Self> {
        let segments: Vec<String> = dotted.split('.').map(str::to_string).collect();
        for segment in &segments {
            validate_field_name(segment)?;
        }
        Ok(Self(segments))
    }

    /// Single top-level key. Dots are kept literally.
    pub fn key(name: &str) -> DomainResult<Self> {
        validate_field_name(name)?;
        Ok(Self(vec![name.to_string()]))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// SQLite JSON path, every label quoted: `$."examinee"."email"`.
    pub fn to_json_path(&self) -> String {
        let mut path = String::from("$");
        for segment in &self.0 {
            path.push_str(".\"");
            path.push_str(segment);
            path.push('"');
        }
        path
    }
}

fn validate_field_name(name: &str) -> DomainResult<()> {
    if name.is_empty() {
        return Err(DomainError::InvalidDocument(
            "field names must not be empty".to_string(),
        ));
    }
    if name.starts_with('$') {
        return Err(DomainError::InvalidDocument(format!(
            "field name '{}' must not start with '$'",
            name
        )));
    }
    if name.contains('"') {
        return Err(DomainError::InvalidDocument(format!(
            "field name '{}' must not contain '\"'",
            name
        )));
    }
    Ok(())
}

/// Query description handed to the storage layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentFilter {
    All,
    Id(DocumentId),
    FieldEquals { path: FieldPath, value: String },
}

impl DocumentFilter {
    pub fn field_equals(path: FieldPath, value: impl Into<String>) -> Self {
        DocumentFilter::FieldEquals {
            path,
            value: value.into(),
        }
    }

    /// Equality filter when `value` is present and non-empty, otherwise everything.
    pub fn optional_field(path: FieldPath, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => Self::field_equals(path, v),
            _ => DocumentFilter::All,
        }
    }
}

/// Validated `$set` payload: top-level keys overwrite, everything else survives.
#[derive(Debug, Clone, PartialEq)]
pub struct SetFields(Vec<(FieldPath, Value)>);

impl SetFields {
    /// `_id` is immutable and silently dropped from the set.
    pub fn from_fields(fields: Fields) -> DomainResult<Self> {
        let mut entries = Vec::with_capacity(fields.len());
        for (key, value) in fields {
            if key == ID_FIELD {
                continue;
            }
            entries.push((FieldPath::key(&key)?, value));
        }
        Ok(Self(entries))
    }

    pub fn entries(&self) -> &[(FieldPath, Value)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A document as read back from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub fields: Fields,
}

impl StoredDocument {
    /// JSON object with `_id` merged in.
    pub fn into_value(self) -> Value {
        let mut fields = self.fields;
        fields.insert(ID_FIELD.to_string(), Value::String(self.id.to_hex()));
        Value::Object(fields)
    }

    /// Typed view of the stored document. A mismatch means the row was
    /// written outside this API and is reported as a storage fault.
    pub fn into_model<T: DeserializeOwned>(self) -> DomainResult<T> {
        let id = self.id;
        serde_json::from_value(self.into_value()).map_err(|e| {
            DomainError::Storage(format!("document {} does not match its model: {}", id, e))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: DocumentId,
}

impl InsertOneResult {
    pub fn new(inserted_id: DocumentId) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<DocumentId>,
    pub upserted_count: u64,
}

impl UpdateResult {
    pub fn matched(modified: bool) -> Self {
        Self {
            acknowledged: true,
            matched_count: 1,
            modified_count: u64::from(modified),
            upserted_id: None,
            upserted_count: 0,
        }
    }

    pub fn upserted(id: DocumentId) -> Self {
        Self {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_id: Some(id),
            upserted_count: 1,
        }
    }

    pub fn unmatched() -> Self {
        Self {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_id: None,
            upserted_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}
