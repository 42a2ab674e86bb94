use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "jokes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub upvotes: i32,
    pub downvotes: i32,
    pub created_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::Joke {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            content: model.content,
            upvotes: model.upvotes,
            downvotes: model.downvotes,
        }
    }
}

impl From<Model> for crate::domain::StoredJoke {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            content: model.content,
            upvotes: model.upvotes,
            downvotes: model.downvotes,
            created_at: model.created_at,
        }
    }
}
