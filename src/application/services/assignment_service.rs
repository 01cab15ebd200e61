use crate::application::services::policy::UpsertPolicy;
use crate::domain::entities::{
    Assignment, Collection, DeleteResult, DocumentFilter, DocumentId, FieldPath, InsertOneResult,
    Principal, SetFields, UpdateResult,
};
use crate::domain::errors::DomainResult;
use crate::domain::ports::{AccessPolicy, Action, DocumentRepository};
use std::sync::Arc;

/// Service for the assignment catalog
#[derive(Clone)]
pub struct AssignmentService {
    document_repo: Arc<dyn DocumentRepository>,
    access_policy: Arc<dyn AccessPolicy>,
    upsert_policy: UpsertPolicy,
}

impl AssignmentService {
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

    /// Filter for the catalog listing: exact `level` match, or everything
    /// when `sort_by` is absent or empty.
    pub fn level_filter(sort_by: Option<&str>) -> DomainResult<DocumentFilter> {
        Ok(DocumentFilter::optional_field(
            FieldPath::key("level")?,
            sort_by,
        ))
    }

    pub async fn list_assignments(
        &self,
        principal: Option<&Principal>,
        sort_by: Option<&str>,
    ) -> DomainResult<Vec<Assignment>> {
        self.access_policy
            .authorize(principal, &Action::ListAssignments)?;

        let filter = Self::level_filter(sort_by)?;
        let documents = self
            .document_repo
            .find(Collection::Assignments, &filter)
            .await?;

        documents.into_iter().map(|doc| doc.into_model()).collect()
    }

    pub async fn get_assignment(
        &self,
        principal: Option<&Principal>,
        id: &str,
    ) -> DomainResult<Option<Assignment>> {
        let id = DocumentId::parse(id)?;
        self.access_policy
            .authorize(principal, &Action::ReadAssignment(&id))?;

        let document = self
            .document_repo
            .find_one(Collection::Assignments, &DocumentFilter::Id(id))
            .await?;

        document.map(|doc| doc.into_model()).transpose()
    }

    pub async fn create_assignment(
        &self,
        principal: Option<&Principal>,
        assignment: Assignment,
    ) -> DomainResult<InsertOneResult> {
        self.access_policy
            .authorize(principal, &Action::CreateAssignment)?;

        tracing::info!(
            "Creating assignment {:?} (level {:?})",
            assignment.title(),
            assignment.level()
        );

        self.document_repo
            .insert_one(Collection::Assignments, assignment.into_fields())
            .await
    }

    /// `$set` every field of `assignment` on the stored document. Fields the
    /// body leaves out are kept.
    pub async fn update_assignment(
        &self,
        principal: Option<&Principal>,
        id: &str,
        assignment: Assignment,
    ) -> DomainResult<UpdateResult> {
        let id = DocumentId::parse(id)?;
        self.access_policy
            .authorize(principal, &Action::UpdateAssignment(&id))?;

        let set = SetFields::from_fields(assignment.into_fields())?;
        let result = self
            .document_repo
            .update_one(
                Collection::Assignments,
                &id,
                &set,
                self.upsert_policy.upserts(),
            )
            .await?;

        if result.upserted_id.is_some() {
            tracing::info!("Assignment {} did not exist and was created by update", id);
        }
        Ok(result)
    }

    pub async fn delete_assignment(
        &self,
        principal: Option<&Principal>,
        id: &str,
    ) -> DomainResult<DeleteResult> {
        let id = DocumentId::parse(id)?;
        self.access_policy
            .authorize(principal, &Action::DeleteAssignment(&id))?;

        self.document_repo
            .delete_one(Collection::Assignments, &id)
            .await
    }
}
