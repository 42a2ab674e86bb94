use crate::domain::{VoteRequest, VoteResult};
use crate::infrastructure::db::JokeRepository;
use garva_errors::AppError;

pub fn parse_joke_id(raw: &str) -> Result<i32, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::InvalidJokeId(raw.to_string()))
}

/// Server half of the vote protocol: turns `{action, previousVote}` into a
/// counter delta and returns the authoritative counts.
pub struct CastVote {
    jokes: JokeRepository,
}

impl CastVote {
    pub fn new(jokes: JokeRepository) -> Self {
        Self { jokes }
    }

    pub async fn execute(&self, joke_id: i32, request: VoteRequest) -> Result<VoteResult, AppError> {
        let delta = request.delta();

        let updated = self
            .jokes
            .apply_vote_delta(joke_id, delta)
            .await
            .map_err(|e| {
                tracing::error!("[vote] joke {}: {}", joke_id, e);
                AppError::Database(e.to_string())
            })?
            .ok_or(AppError::NotFound)?;

        tracing::debug!(
            joke_id,
            action = ?request.action,
            previous = ?request.previous_vote,
            upvotes = updated.upvotes,
            downvotes = updated.downvotes,
            "Vote applied"
        );

        Ok(VoteResult {
            success: true,
            upvotes: updated.upvotes,
            downvotes: updated.downvotes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{VoteAction, VoteKind};
    use crate::infrastructure::db::entities::joke;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[test]
    fn test_parse_joke_id() {
        assert_eq!(parse_joke_id("42"), Ok(42));
        assert!(matches!(parse_joke_id("abc"), Err(AppError::InvalidJokeId(_))));
        assert!(matches!(parse_joke_id(""), Err(AppError::InvalidJokeId(_))));
    }

    #[tokio::test]
    async fn test_missing_joke_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let cast_vote = CastVote::new(JokeRepository::new(db));

        let request = VoteRequest {
            action: VoteAction::Upvote,
            previous_vote: None,
        };
        assert_eq!(cast_vote.execute(5, request).await, Err(AppError::NotFound));
    }

    #[tokio::test]
    async fn test_switch_returns_server_counts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([vec![joke::Model {
                id: 5,
                content: "<p>Skämt</p>".to_string(),
                upvotes: 3,
                downvotes: 9,
                created_at: None,
            }]])
            .into_connection();
        let cast_vote = CastVote::new(JokeRepository::new(db));

        let request = VoteRequest {
            action: VoteAction::Downvote,
            previous_vote: Some(VoteKind::Upvote),
        };
        let result = cast_vote.execute(5, request).await.unwrap();
        assert_eq!(
            result,
            VoteResult {
                success: true,
                upvotes: 3,
                downvotes: 9
            }
        );
    }
}
