use serde::{Deserialize, Serialize};

/// A joke as the deck sees it. The external store owns the counters; this is a cached copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joke {
    pub id: i32,
    pub content: String,
    pub upvotes: i32,
    pub downvotes: i32,
}

impl Joke {
    pub fn new(id: i32, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
            upvotes: 0,
            downvotes: 0,
        }
    }

    pub fn with_counts(mut self, upvotes: i32, downvotes: i32) -> Self {
        self.upvotes = upvotes;
        self.downvotes = downvotes;
        self
    }
}

/// Joke with admin-only details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredJoke {
    pub id: i32,
    pub content: String,
    pub upvotes: i32,
    pub downvotes: i32,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<StoredJoke> for Joke {
    fn from(stored: StoredJoke) -> Self {
        Self {
            id: stored.id,
            content: stored.content,
            upvotes: stored.upvotes,
            downvotes: stored.downvotes,
        }
    }
}
