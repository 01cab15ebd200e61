use crate::domain::entities::{Collection, DocumentFilter, Feature, Fields, Principal};
use crate::domain::errors::DomainResult;
use crate::domain::ports::{AccessPolicy, Action, DocumentRepository};
use std::sync::Arc;

#[derive(Clone)]
pub struct FeatureService {
    document_repo: Arc<dyn DocumentRepository>,
    access_policy: Arc<dyn AccessPolicy>,
}

impl FeatureService {
    pub fn new(
        document_repo: Arc<dyn DocumentRepository>,
        access_policy: Arc<dyn AccessPolicy>,
    ) -> Self {
        Self {
            document_repo,
            access_policy,
        }
    }

    /// Every feature in storage order
    pub async fn list_features(&self, principal: Option<&Principal>) -> DomainResult<Vec<Feature>> {
        self.access_policy
            .authorize(principal, &Action::ListFeatures)?;

        let documents = self
            .document_repo
            .find(Collection::Features, &DocumentFilter::All)
            .await?;

        documents.into_iter().map(|doc| doc.into_model()).collect()
    }

    /// Load the initial feature set. Does nothing once any feature exists.
    pub async fn seed_features(&self, features: Vec<Fields>) -> DomainResult<usize> {
        if self.document_repo.count(Collection::Features).await? > 0 {
            tracing::debug!("Features already present, skipping seed");
            return Ok(0);
        }

        let mut inserted = 0;
        for mut feature in features {
            feature.remove("_id");
            self.document_repo
                .insert_one(Collection::Features, feature)
                .await?;
            inserted += 1;
        }

        tracing::info!("Seeded {} features", inserted);
        Ok(inserted)
    }
}
