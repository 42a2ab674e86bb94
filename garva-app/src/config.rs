use garva_errors::AppError;
use std::env;

const DEFAULT_SITE_URL: &str = "https://garva.se";

/// Settings read from the environment (after `.env` is loaded).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub admin_username: String,
    pub admin_password: String,
    pub site_url: String,
    pub run_migrations: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| AppError::Internal(format!("{key} must be set")))
        };

        let site_url = lookup("SITE_URL").unwrap_or_else(|| {
            tracing::info!("SITE_URL not set, using default: {}", DEFAULT_SITE_URL);
            DEFAULT_SITE_URL.to_string()
        });

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            admin_username: required("ADMIN_USERNAME")?,
            admin_password: required("ADMIN_PASSWORD")?,
            site_url: site_url.trim_end_matches('/').to_string(),
            run_migrations: lookup("RUN_MIGRATIONS").is_some_and(|v| v == "1" || v == "true"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/garva"),
            ("ADMIN_USERNAME", "admin"),
            ("ADMIN_PASSWORD", "secret"),
        ])
        .unwrap();
        assert_eq!(config.site_url, "https://garva.se");
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_missing_required_value() {
        let result = config(&[("DATABASE_URL", "postgres://localhost/garva"), ("ADMIN_USERNAME", "admin")]);
        assert!(matches!(result, Err(AppError::Internal(msg)) if msg.contains("ADMIN_PASSWORD")));
    }

    #[test]
    fn test_site_url_trailing_slash() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/garva"),
            ("ADMIN_USERNAME", "admin"),
            ("ADMIN_PASSWORD", "secret"),
            ("SITE_URL", "https://example.se/"),
            ("RUN_MIGRATIONS", "true"),
        ])
        .unwrap();
        assert_eq!(config.site_url, "https://example.se");
        assert!(config.run_migrations);
    }
}
