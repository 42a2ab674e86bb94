use crate::domain::{Joke, JokeDraft, JokeQuery, StoredJoke};
use crate::infrastructure::db::JokeRepository;
use garva_errors::AppError;
use sea_orm::DbErr;

fn db_error(context: &str, e: DbErr) -> AppError {
    tracing::error!("[{}] {}", context, e);
    AppError::Database(e.to_string())
}

/// Catalog reads for the deck and CRUD for the admin panel.
pub struct ManageJokes {
    jokes: JokeRepository,
}

impl ManageJokes {
    pub fn new(jokes: JokeRepository) -> Self {
        Self { jokes }
    }

    /// The deck's candidate set, ascending by id.
    pub async fn catalog(&self) -> Result<Vec<Joke>, AppError> {
        let jokes = self
            .jokes
            .find_all()
            .await
            .map_err(|e| db_error("jokes", e))?;
        tracing::info!("[jokes] Fetched {} jokes", jokes.len());
        Ok(jokes.into_iter().map(Joke::from).collect())
    }

    pub async fn list(&self, query: &JokeQuery) -> Result<Vec<StoredJoke>, AppError> {
        let jokes = self
            .jokes
            .search(query)
            .await
            .map_err(|e| db_error("admin/jokes", e))?;
        Ok(jokes.into_iter().map(StoredJoke::from).collect())
    }

    pub async fn create(&self, draft: JokeDraft) -> Result<StoredJoke, AppError> {
        let draft = draft.validate()?;
        let created = self
            .jokes
            .create(&draft)
            .await
            .map_err(|e| db_error("admin/jokes", e))?;
        tracing::info!("[admin/jokes] Created joke {}", created.id);
        Ok(created.into())
    }

    pub async fn update(&self, id: i32, draft: JokeDraft) -> Result<StoredJoke, AppError> {
        let draft = draft.validate()?;
        let updated = self
            .jokes
            .update(id, &draft)
            .await
            .map_err(|e| db_error("admin/jokes", e))?
            .ok_or(AppError::NotFound)?;
        tracing::info!("[admin/jokes] Updated joke {}", id);
        Ok(updated.into())
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        let deleted = self
            .jokes
            .delete(id)
            .await
            .map_err(|e| db_error("admin/jokes", e))?;
        if !deleted {
            return Err(AppError::NotFound);
        }
        tracing::info!("[admin/jokes] Deleted joke {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_create_rejects_blank_content_before_touching_db() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let manage = ManageJokes::new(JokeRepository::new(db));

        let result = manage.create(JokeDraft::new("   ")).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_joke() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let manage = ManageJokes::new(JokeRepository::new(db));

        assert_eq!(manage.delete(3).await, Err(AppError::NotFound));
    }
}
