use crate::domain::entities::{DocumentId, Principal};
use crate::domain::errors::DomainResult;

/// Operation a caller is about to perform, checked before the storage call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action<'a> {
    ListFeatures,
    ListAssignments,
    ReadAssignment(&'a DocumentId),
    CreateAssignment,
    UpdateAssignment(&'a DocumentId),
    DeleteAssignment(&'a DocumentId),
    ListSubmissionsByStatus(&'a str),
    ListSubmissionsByExaminee(&'a str),
    SubmitAssignment,
    GradeSubmission(&'a DocumentId),
}

impl Action<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Action::ListFeatures => "features:list",
            Action::ListAssignments => "assignments:list",
            Action::ReadAssignment(_) => "assignments:read",
            Action::CreateAssignment => "assignments:create",
            Action::UpdateAssignment(_) => "assignments:update",
            Action::DeleteAssignment(_) => "assignments:delete",
            Action::ListSubmissionsByStatus(_) => "submissions:list_by_status",
            Action::ListSubmissionsByExaminee(_) => "submissions:list_by_examinee",
            Action::SubmitAssignment => "submissions:create",
            Action::GradeSubmission(_) => "submissions:grade",
        }
    }

    /// Catalog reads any visitor may perform
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Action::ListFeatures | Action::ListAssignments | Action::ReadAssignment(_)
        )
    }
}

/// Authorization capability evaluated by every service before it touches storage.
pub trait AccessPolicy: Send + Sync {
    fn authorize(&self, principal: Option<&Principal>, action: &Action<'_>) -> DomainResult<()>;
}
