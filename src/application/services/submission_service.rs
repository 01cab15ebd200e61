use crate::application::services::policy::UpsertPolicy;
use crate::domain::entities::{
    Collection, DocumentFilter, DocumentId, FieldPath, GradeRequest, InsertOneResult, Principal,
    SetFields, SubmittedAssignment, UpdateResult,
};
use crate::domain::errors::DomainResult;
use crate::domain::ports::{AccessPolicy, Action, DocumentRepository};
use std::sync::Arc;

/// Service for submissions and their grading
#[derive(Clone)]
pub struct SubmissionService {
    document_repo: Arc<dyn DocumentRepository>,
    access_policy: Arc<dyn AccessPolicy>,
    upsert_policy: UpsertPolicy,
}

impl SubmissionService {
    pub fn new(
        document_repo: Arc<dyn DocumentRepository>,
        access_policy: Arc<dyn AccessPolicy>,
        upsert_policy: UpsertPolicy,
    ) -> Self {
        Self {
            document_repo,
            access_policy,
            upsert_policy,
        }
    }

    async fn find(&self, filter: DocumentFilter) -> DomainResult<Vec<SubmittedAssignment>> {
        let documents = self
            .document_repo
            .find(Collection::SubmittedAssignments, &filter)
            .await?;

        documents.into_iter().map(|doc| doc.into_model()).collect()
    }

    pub async fn list_by_status(
        &self,
        principal: Option<&Principal>,
        status: &str,
    ) -> DomainResult<Vec<SubmittedAssignment>> {
        self.access_policy
            .authorize(principal, &Action::ListSubmissionsByStatus(status))?;

        self.find(DocumentFilter::field_equals(FieldPath::key("status")?, status))
            .await
    }

    pub async fn list_by_examinee(
        &self,
        principal: Option<&Principal>,
        email: &str,
    ) -> DomainResult<Vec<SubmittedAssignment>> {
        self.access_policy
            .authorize(principal, &Action::ListSubmissionsByExaminee(email))?;

        self.find(DocumentFilter::field_equals(
            FieldPath::parse("examinee.email")?,
            email,
        ))
        .await
    }

    /// Store the submission as sent. The caller supplies `status`.
    pub async fn submit(
        &self,
        principal: Option<&Principal>,
        submission: SubmittedAssignment,
    ) -> DomainResult<InsertOneResult> {
        self.access_policy
            .authorize(principal, &Action::SubmitAssignment)?;

        tracing::info!(
            "New submission from {:?} with status {:?}",
            submission.examinee_email(),
            submission.status()
        );

        self.document_repo
            .insert_one(Collection::SubmittedAssignments, submission.into_fields()?)
            .await
    }

    /// Record a grade: sets `obtained_mark`, `feedback`, `status` and
    /// `examinerEmail`, nothing else.
    pub async fn grade(
        &self,
        principal: Option<&Principal>,
        id: &str,
        grade: GradeRequest,
    ) -> DomainResult<UpdateResult> {
        let id = DocumentId::parse(id)?;
        self.access_policy
            .authorize(principal, &Action::GradeSubmission(&id))?;

        tracing::info!(
            "Grading submission {} as {:?} by {:?}",
            id,
            grade.mark_status,
            grade.examiner_email
        );

        let set = SetFields::from_fields(grade.into_fields())?;
        self.document_repo
            .update_one(
                Collection::SubmittedAssignments,
                &id,
                &set,
                self.upsert_policy.upserts(),
            )
            .await
    }
}
