use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum AppError {
    #[error("Inga skämt finns i katalogen")]
    EmptyCatalog,

    #[error("Ogiltigt skämt-ID: {0}")]
    InvalidJokeId(String),

    #[error("Ogiltig röst: {0}")]
    InvalidAction(String),

    #[error("Ogiltig indata: {0}")]
    InvalidInput(String),

    #[error("Skämtet hittades inte")]
    NotFound,

    #[error("Obehörig")]
    Unauthorized,

    #[error("Lagringsfel: {0}")]
    Storage(String),

    #[error("Databasfel: {0}")]
    Database(String),

    #[error("Internt fel: {0}")]
    Internal(String),
}

impl FromStr for AppError {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("Inga skämt") {
            Ok(AppError::EmptyCatalog)
        } else if s.starts_with("Ogiltigt skämt-ID") {
            Ok(AppError::InvalidJokeId(s.to_string()))
        } else if s.starts_with("Ogiltig röst") {
            Ok(AppError::InvalidAction(s.to_string()))
        } else if s.starts_with("Ogiltig indata") {
            Ok(AppError::InvalidInput(s.to_string()))
        } else if s.contains("hittades inte") {
            Ok(AppError::NotFound)
        } else if s.starts_with("Obehörig") {
            Ok(AppError::Unauthorized)
        } else {
            Ok(AppError::Internal(s.to_string()))
        }
    }
}

impl AppError {
    pub fn user_message(&self) -> &str {
        match self {
            Self::EmptyCatalog => "Garva behöver minst ett skämt i databasen. Lägg till några och ladda om.",
            Self::InvalidJokeId(_) => "Ogiltigt skämt-ID.",
            Self::InvalidAction(_) => "Rösten måste vara 'upvote', 'downvote' eller 'unvote'.",
            Self::InvalidInput(_) => "Innehåll krävs.",
            Self::NotFound => "Skämtet hittades inte.",
            Self::Unauthorized => "Du måste logga in först.",
            Self::Storage(_) => "Kunde inte spara din röst lokalt.",
            Self::Database(_) | Self::Internal(_) => "Något gick fel. Försök igen senare.",
        }
    }
}

#[cfg(feature = "ssr")]
mod ssr_impl {
    use super::AppError;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::Json;

    #[derive(serde::Serialize)]
    struct ErrorResponse {
        error: String,
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = match &self {
                AppError::InvalidJokeId(_) | AppError::InvalidAction(_) | AppError::InvalidInput(_) => {
                    StatusCode::BAD_REQUEST
                }
                AppError::Unauthorized => StatusCode::UNAUTHORIZED,
                AppError::NotFound | AppError::EmptyCatalog => StatusCode::NOT_FOUND,
                AppError::Storage(_) | AppError::Database(_) | AppError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            let error = self.user_message().to_string();
            (status, Json(ErrorResponse { error })).into_response()
        }
    }
}
