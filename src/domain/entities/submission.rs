use super::document::{explicit_null, DocumentId, Fields};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Learner who submitted the work. `email` is the lookup key for
/// "my submissions"; name, photo and the like stay in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Examinee {
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<Option<String>>,
    #[serde(flatten)]
    pub extra: Fields,
}

/// Mark as sent by the grading form: a number, or the raw text of the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Mark {
    Points(serde_json::Number),
    Text(String),
}

/// Known fields are `Option<Option<_>>`: absent stays absent, and an explicit
/// `null` (as written by grading) is kept and returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedAssignment {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub examinee: Option<Option<Examinee>>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub obtained_mark: Option<Option<Mark>>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub feedback: Option<Option<String>>,
    #[serde(
        rename = "examinerEmail",
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub examiner_email: Option<Option<String>>,
    #[serde(flatten)]
    pub extra: Fields,
}

impl SubmittedAssignment {
    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().and_then(|s| s.as_deref())
    }

    pub fn examinee(&self) -> Option<&Examinee> {
        self.examinee.as_ref().and_then(Option::as_ref)
    }

    pub fn examinee_email(&self) -> Option<&str> {
        self.examinee()
            .and_then(|e| e.email.as_ref())
            .and_then(|email| email.as_deref())
    }

    pub fn obtained_mark(&self) -> Option<&Mark> {
        self.obtained_mark.as_ref().and_then(Option::as_ref)
    }

    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_ref().and_then(|f| f.as_deref())
    }

    pub fn examiner_email(&self) -> Option<&str> {
        self.examiner_email.as_ref().and_then(|e| e.as_deref())
    }

    /// Field map as it is written to storage, without `_id`.
    pub fn into_fields(self) -> Result<Fields, serde_json::Error> {
        let mut fields = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => Fields::new(),
        };
        fields.remove("_id");
        Ok(fields)
    }
}

/// Grading payload for `PUT /submittedAssignments/:id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradeRequest {
    #[serde(default)]
    pub obtained_mark: Option<Mark>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(rename = "markStatus", default)]
    pub mark_status: Option<String>,
    #[serde(rename = "examinerEmail", default)]
    pub examiner_email: Option<String>,
}

impl GradeRequest {
    /// Exactly the four graded fields. Missing inputs are written as `null`.
    pub fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.insert(
            "obtained_mark".to_string(),
            serde_json::to_value(self.obtained_mark).unwrap_or(Value::Null),
        );
        fields.insert(
            "feedback".to_string(),
            self.feedback.map(Value::String).unwrap_or(Value::Null),
        );
        fields.insert(
            "status".to_string(),
            self.mark_status.map(Value::String).unwrap_or(Value::Null),
        );
        fields.insert(
            "examinerEmail".to_string(),
            self.examiner_email.map(Value::String).unwrap_or(Value::Null),
        );
        fields
    }
}
