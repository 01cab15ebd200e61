use crate::application::services::{AccessPolicyKind, UpsertPolicy};
use std::env;

/// Front-end origins allowed when `CORS_ALLOWED_ORIGINS` is unset
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "http://localhost:5173",
    "https://assignment-11-9bd1a.web.app",
    "https://assignment-11-9bd1a.firebaseapp.com",
];

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub access_token_secret: String,
    pub production: bool,
    pub allowed_origins: Vec<String>,
    pub access_policy: AccessPolicyKind,
    pub upsert_policy: UpsertPolicy,
    pub features_seed_path: Option<String>,
    pub otel_exporter_endpoint: Option<String>,
    pub service_name: String,
    pub metrics_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://gradebook.db?mode=rwc".to_string());

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let server_port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let access_token_secret = env::var("ACCESS_TOKEN_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingTokenSecret)?;

        let production = env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let allowed_origins = match env::var("CORS_ALLOWED_ORIGINS") {
            Ok(list) => parse_origins(&list),
            Err(_) => DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        let access_policy = env::var("ACCESS_POLICY")
            .unwrap_or_else(|_| "session".to_string())
            .parse()
            .map_err(ConfigError::InvalidAccessPolicy)?;

        let upsert_on_update = env::var("UPSERT_ON_UPDATE")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .map_err(|_| ConfigError::InvalidUpsertFlag)?;

        let features_seed_path = env::var("FEATURES_SEED_PATH").ok();

        let otel_exporter_endpoint = env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok();

        let service_name = env::var("SERVICE_NAME").unwrap_or_else(|_| "gradebook".to_string());

        let metrics_port = env::var("METRICS_PORT")
            .unwrap_or_else(|_| "9000".to_string())
            .parse()
            .unwrap_or(9000);

        Ok(Config {
            database_url,
            server_host,
            server_port,
            access_token_secret,
            production,
            allowed_origins,
            access_policy,
            upsert_policy: UpsertPolicy::from_flag(upsert_on_update),
            features_seed_path,
            otel_exporter_endpoint,
            service_name,
            metrics_port,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_origins(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("ACCESS_TOKEN_SECRET environment variable not set")]
    MissingTokenSecret,

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid ACCESS_POLICY: {0}")]
    InvalidAccessPolicy(String),

    #[error("UPSERT_ON_UPDATE must be true or false")]
    InvalidUpsertFlag,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_trims_and_drops_empty_entries() {
        let origins = parse_origins(" http://localhost:5173/ ,, https://app.example.com");
        assert_eq!(
            origins,
            vec![
                "http://localhost:5173".to_string(),
                "https://app.example.com".to_string()
            ]
        );
    }
}
