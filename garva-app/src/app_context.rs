use crate::application::{CastVote, ManageJokes};
use crate::config::AppConfig;
use crate::infrastructure::auth::AdminAuth;
use crate::infrastructure::db::{self, JokeRepository};
use garva_errors::AppError;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext {
    pub cast_vote: Arc<CastVote>,
    pub manage_jokes: Arc<ManageJokes>,
    pub admin: Arc<AdminAuth>,
    pub site_url: String,
}

impl AppContext {
    pub fn new(db: DatabaseConnection, config: &AppConfig) -> Self {
        let jokes = JokeRepository::new(db);
        Self {
            cast_vote: Arc::new(CastVote::new(jokes.clone())),
            manage_jokes: Arc::new(ManageJokes::new(jokes)),
            admin: Arc::new(AdminAuth::new(
                config.admin_username.clone(),
                config.admin_password.clone(),
            )),
            site_url: config.site_url.clone(),
        }
    }

    pub async fn connect(config: &AppConfig) -> Result<Self, AppError> {
        let db = db::create_connection(&config.database_url)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        tracing::info!("Connected to database");

        if config.run_migrations {
            db::run_migrations(&db)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            tracing::info!("Migrations applied");
        }

        Ok(Self::new(db, config))
    }
}
