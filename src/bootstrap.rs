use crate::application::services::*;
use crate::config::Config;
use crate::domain::entities::Fields;
use crate::domain::ports::DocumentRepository;
use crate::infrastructure::http::middleware::AppState;
use crate::infrastructure::persistence::Database;
use std::sync::Arc;

pub fn build_app_state(db: Database, config: &Config) -> AppState {
    let document_repo: Arc<dyn DocumentRepository> = Arc::new(db);

    let access_policy = config.access_policy.build();
    tracing::info!("Access policy: {:?}", config.access_policy);
    tracing::info!("Update policy: {:?}", config.upsert_policy);

    let token_service = TokenService::new(&config.access_token_secret);

    let feature_service = FeatureService::new(document_repo.clone(), access_policy.clone());

    let assignment_service = AssignmentService::new(
        document_repo.clone(),
        access_policy.clone(),
        config.upsert_policy,
    );

    let submission_service =
        SubmissionService::new(document_repo, access_policy, config.upsert_policy);

    AppState {
        production: config.production,
        token_service,
        feature_service,
        assignment_service,
        submission_service,
    }
}

/// Load features from a JSON array file into an empty collection
pub async fn seed_features(state: &AppState, path: &str) -> anyhow::Result<usize> {
    let raw = tokio::fs::read_to_string(path).await?;
    let features: Vec<Fields> = serde_json::from_str(&raw)?;

    let inserted = state.feature_service.seed_features(features).await?;
    if inserted > 0 {
        tracing::info!("Seeded {} features from {}", inserted, path);
    }
    Ok(inserted)
}
