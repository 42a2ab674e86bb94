use garva_errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A vote the user currently holds on a joke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Upvote,
    Downvote,
}

impl VoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upvote => "upvote",
            Self::Downvote => "downvote",
        }
    }
}

impl FromStr for VoteKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upvote" => Ok(Self::Upvote),
            "downvote" => Ok(Self::Downvote),
            other => Err(AppError::InvalidAction(other.to_string())),
        }
    }
}

impl fmt::Display for VoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the vote endpoint is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteAction {
    Upvote,
    Downvote,
    Unvote,
}

impl VoteAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upvote => "upvote",
            Self::Downvote => "downvote",
            Self::Unvote => "unvote",
        }
    }

    /// The vote held after this action is applied.
    pub fn resulting_vote(&self) -> Option<VoteKind> {
        match self {
            Self::Upvote => Some(VoteKind::Upvote),
            Self::Downvote => Some(VoteKind::Downvote),
            Self::Unvote => None,
        }
    }
}

impl From<Option<VoteKind>> for VoteAction {
    fn from(vote: Option<VoteKind>) -> Self {
        match vote {
            Some(VoteKind::Upvote) => Self::Upvote,
            Some(VoteKind::Downvote) => Self::Downvote,
            None => Self::Unvote,
        }
    }
}

impl FromStr for VoteAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upvote" => Ok(Self::Upvote),
            "downvote" => Ok(Self::Downvote),
            "unvote" => Ok(Self::Unvote),
            other => Err(AppError::InvalidAction(other.to_string())),
        }
    }
}

/// Body of a vote submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub action: VoteAction,
    #[serde(default)]
    pub previous_vote: Option<VoteKind>,
}

impl VoteRequest {
    pub fn delta(&self) -> VoteDelta {
        VoteDelta::between(self.previous_vote, self.action.resulting_vote())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCounts {
    pub upvotes: i32,
    pub downvotes: i32,
}

impl VoteCounts {
    pub fn new(upvotes: i32, downvotes: i32) -> Self {
        Self { upvotes, downvotes }
    }

    /// Applies a delta, never letting a counter drop below zero.
    pub fn apply(self, delta: VoteDelta) -> Self {
        Self {
            upvotes: (self.upvotes + delta.upvotes).max(0),
            downvotes: (self.downvotes + delta.downvotes).max(0),
        }
    }
}

/// Net change to the server-side counters, each component in -1..=1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteDelta {
    pub upvotes: i32,
    pub downvotes: i32,
}

impl VoteDelta {
    pub fn between(previous: Option<VoteKind>, next: Option<VoteKind>) -> Self {
        let mut delta = Self::default();
        match previous {
            Some(VoteKind::Upvote) => delta.upvotes -= 1,
            Some(VoteKind::Downvote) => delta.downvotes -= 1,
            None => {}
        }
        match next {
            Some(VoteKind::Upvote) => delta.upvotes += 1,
            Some(VoteKind::Downvote) => delta.downvotes += 1,
            None => {}
        }
        delta
    }

    pub fn is_zero(&self) -> bool {
        self.upvotes == 0 && self.downvotes == 0
    }
}

/// Response of the vote endpoint: the authoritative counters after the update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResult {
    pub success: bool,
    pub upvotes: i32,
    pub downvotes: i32,
}

impl VoteResult {
    pub fn counts(&self) -> VoteCounts {
        VoteCounts::new(self.upvotes, self.downvotes)
    }
}
