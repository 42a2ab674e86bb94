use super::entities::{joke, Joke};
use crate::domain::{JokeDraft, JokeQuery, SortField, SortOrder, VoteDelta};
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr, Order};
use std::sync::Arc;

/// Escape character for `LIKE` patterns built from admin input.
const LIKE_ESCAPE: char = '\\';

#[derive(Clone)]
pub struct JokeRepository {
    db: Arc<DatabaseConnection>,
}

impl JokeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db: Arc::new(db) }
    }

    /// Every joke, ascending by id.
    pub async fn find_all(&self) -> Result<Vec<joke::Model>, DbErr> {
        Joke::find()
            .order_by_asc(joke::Column::Id)
            .all(self.db.as_ref())
            .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<joke::Model>, DbErr> {
        Joke::find_by_id(id).one(self.db.as_ref()).await
    }

    pub async fn search(&self, query: &JokeQuery) -> Result<Vec<joke::Model>, DbErr> {
        search_select(query).all(self.db.as_ref()).await
    }

    pub async fn create(&self, draft: &JokeDraft) -> Result<joke::Model, DbErr> {
        let active = joke::ActiveModel {
            id: NotSet,
            content: Set(draft.content.clone()),
            upvotes: Set(draft.upvotes.unwrap_or(0)),
            downvotes: Set(draft.downvotes.unwrap_or(0)),
            created_at: Set(Some(chrono::Utc::now())),
        };
        active.insert(self.db.as_ref()).await
    }

    /// Counters left as `None` in the draft keep their stored values.
    pub async fn update(&self, id: i32, draft: &JokeDraft) -> Result<Option<joke::Model>, DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut active: joke::ActiveModel = existing.into();
        active.content = Set(draft.content.clone());
        if let Some(upvotes) = draft.upvotes {
            active.upvotes = Set(upvotes);
        }
        if let Some(downvotes) = draft.downvotes {
            active.downvotes = Set(downvotes);
        }
        active.update(self.db.as_ref()).await.map(Some)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = Joke::delete_by_id(id).exec(self.db.as_ref()).await?;
        Ok(result.rows_affected > 0)
    }

    /// Applies a vote delta as one increment so concurrent voters don't lose
    /// updates. Returns `None` if the joke doesn't exist.
    pub async fn apply_vote_delta(&self, id: i32, delta: VoteDelta) -> Result<Option<joke::Model>, DbErr> {
        let result = Joke::update_many()
            .col_expr(joke::Column::Upvotes, clamped_add(joke::Column::Upvotes, delta.upvotes))
            .col_expr(joke::Column::Downvotes, clamped_add(joke::Column::Downvotes, delta.downvotes))
            .filter(joke::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }
}

/// Case-insensitive substring filter plus ordering, ties broken by id.
fn search_select(query: &JokeQuery) -> Select<Joke> {
    let mut select = Joke::find();

    if !query.search.is_empty() {
        let pattern = LikeExpr::new(like_pattern(&query.search)).escape(LIKE_ESCAPE);
        select = select.filter(Expr::expr(Func::lower(Expr::col(joke::Column::Content))).like(pattern));
    }

    let column = match query.sort_by {
        SortField::Id => joke::Column::Id,
        SortField::Upvotes => joke::Column::Upvotes,
        SortField::Downvotes => joke::Column::Downvotes,
        SortField::CreatedAt => joke::Column::CreatedAt,
    };
    let order = match query.sort_order {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    };

    select.order_by(column, order).order_by_asc(joke::Column::Id)
}

/// `%needle%` with `LIKE` wildcards in the needle matched literally.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.to_lowercase().chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn clamped_add(column: joke::Column, amount: i32) -> SimpleExpr {
    Func::greatest([Expr::col(column).add(amount), Expr::val(0).into()]).into()
}
