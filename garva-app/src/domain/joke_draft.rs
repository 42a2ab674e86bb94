use garva_errors::AppError;
use serde::{Deserialize, Serialize};

const MAX_CONTENT_LENGTH: usize = 10_000;

/// Admin input for creating or editing a joke.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JokeDraft {
    pub content: String,
    #[serde(default)]
    pub upvotes: Option<i32>,
    #[serde(default)]
    pub downvotes: Option<i32>,
}

impl JokeDraft {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            upvotes: None,
            downvotes: None,
        }
    }

    pub fn with_counts(mut self, upvotes: i32, downvotes: i32) -> Self {
        self.upvotes = Some(upvotes);
        self.downvotes = Some(downvotes);
        self
    }

    /// Trims the content and checks the counters.
    pub fn validate(self) -> Result<Self, AppError> {
        let content = self.content.trim();

        if content.is_empty() {
            return Err(AppError::InvalidInput("content is required".to_string()));
        }

        if content.len() > MAX_CONTENT_LENGTH {
            return Err(AppError::InvalidInput("content is too long".to_string()));
        }

        for (name, value) in [("upvotes", self.upvotes), ("downvotes", self.downvotes)] {
            if value.is_some_and(|v| v < 0) {
                return Err(AppError::InvalidInput(format!("{name} must not be negative")));
            }
        }

        Ok(Self {
            content: content.to_string(),
            upvotes: self.upvotes,
            downvotes: self.downvotes,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    #[default]
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "upvotes")]
    Upvotes,
    #[serde(rename = "downvotes")]
    Downvotes,
    #[serde(rename = "createdAt")]
    CreatedAt,
}

impl SortField {
    /// Unknown fields fall back to sorting by id.
    pub fn parse(value: &str) -> Self {
        match value {
            "upvotes" => Self::Upvotes,
            "downvotes" => Self::Downvotes,
            "createdAt" => Self::CreatedAt,
            _ => Self::Id,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Upvotes => "upvotes",
            Self::Downvotes => "downvotes",
            Self::CreatedAt => "createdAt",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Self {
        if value == "desc" {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Admin listing filter. Built from loose query-string values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JokeQuery {
    pub search: String,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl JokeQuery {
    pub fn from_params(search: Option<&str>, sort_by: Option<&str>, sort_order: Option<&str>) -> Self {
        Self {
            search: search.unwrap_or_default().trim().to_string(),
            sort_by: sort_by.map(SortField::parse).unwrap_or_default(),
            sort_order: sort_order.map(SortOrder::parse).unwrap_or_default(),
        }
    }
}
