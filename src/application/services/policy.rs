use crate::domain::entities::Principal;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::{AccessPolicy, Action};
use std::str::FromStr;
use std::sync::Arc;

/// Allows every action, signed in or not.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAccessPolicy;

impl AccessPolicy for OpenAccessPolicy {
    fn authorize(&self, _principal: Option<&Principal>, _action: &Action<'_>) -> DomainResult<()> {
        Ok(())
    }
}

/// Catalog reads stay public. Everything else needs a verified session, and
/// a learner may only list their own submissions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionAccessPolicy;

impl AccessPolicy for SessionAccessPolicy {
    fn authorize(&self, principal: Option<&Principal>, action: &Action<'_>) -> DomainResult<()> {
        if action.is_public() {
            return Ok(());
        }

        let principal = principal.ok_or_else(|| {
            tracing::debug!("Anonymous request for {} rejected", action.name());
            DomainError::Unauthorized
        })?;

        if let Action::ListSubmissionsByExaminee(email) = action {
            if principal.email() != Some(*email) {
                tracing::warn!(
                    "Access denied: {:?} attempted {} for {}",
                    principal.email(),
                    action.name(),
                    email
                );
                return Err(DomainError::Forbidden(
                    "Submissions can only be listed by their examinee".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicyKind {
    Open,
    Session,
}

impl AccessPolicyKind {
    pub fn build(self) -> Arc<dyn AccessPolicy> {
        match self {
            AccessPolicyKind::Open => Arc::new(OpenAccessPolicy),
            AccessPolicyKind::Session => Arc::new(SessionAccessPolicy),
        }
    }
}

impl FromStr for AccessPolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(AccessPolicyKind::Open),
            "session" => Ok(AccessPolicyKind::Session),
            other => Err(format!("unknown access policy '{}'", other)),
        }
    }
}

/// What an update does when no document carries the requested identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertPolicy {
    /// Create the document under the requested identifier
    Upsert,
    /// Report `matchedCount = 0` and create nothing
    MatchOnly,
}

impl UpsertPolicy {
    pub fn from_flag(upsert: bool) -> Self {
        if upsert {
            UpsertPolicy::Upsert
        } else {
            UpsertPolicy::MatchOnly
        }
    }

    pub fn upserts(self) -> bool {
        self == UpsertPolicy::Upsert
    }
}
