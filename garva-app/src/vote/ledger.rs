use crate::domain::VoteKind;
use garva_errors::AppError;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

/// Single key holding every vote as `{"joke-<id>": "upvote" | "downvote"}`.
pub const STORAGE_KEY: &str = "garva-votes";

/// A durable string store scoped to the user agent.
pub trait VoteStorage {
    fn read(&self, key: &str) -> Result<Option<String>, AppError>;
    fn write(&self, key: &str, value: &str) -> Result<(), AppError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::default();
        if let Ok(mut items) = storage.items.lock() {
            items.insert(key.to_string(), value.to_string());
        }
        storage
    }
}

impl VoteStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, AppError> {
        let items = self
            .items
            .lock()
            .map_err(|e| AppError::Storage(e.to_string()))?;
        Ok(items.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut items = self
            .items
            .lock()
            .map_err(|e| AppError::Storage(e.to_string()))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The current user's vote per joke.
///
/// Anything unreadable in storage counts as "no vote": a corrupt blob never
/// stops the deck from loading.
#[derive(Debug, Clone)]
pub struct VoteLedger<S> {
    storage: S,
}

impl<S: VoteStorage> VoteLedger<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn get(&self, joke_id: i32) -> Option<VoteKind> {
        self.load().remove(&entry_key(joke_id)).and_then(parse_vote)
    }

    pub fn all(&self) -> BTreeMap<i32, VoteKind> {
        self.load()
            .into_iter()
            .filter_map(|(key, value)| {
                let id = key.strip_prefix("joke-")?.parse().ok()?;
                Some((id, parse_vote(value)?))
            })
            .collect()
    }

    /// Stores `vote`, or removes the entry when `None`.
    pub fn set(&self, joke_id: i32, vote: Option<VoteKind>) -> Result<(), AppError> {
        let mut votes = self.load();
        let key = entry_key(joke_id);

        match vote {
            Some(vote) => {
                votes.insert(key, Value::String(vote.as_str().to_string()));
            }
            None => {
                votes.remove(&key);
            }
        }

        let raw = serde_json::to_string(&votes).map_err(|e| AppError::Storage(e.to_string()))?;
        self.storage.write(STORAGE_KEY, &raw)
    }

    fn load(&self) -> Map<String, Value> {
        let raw = match self.storage.read(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Map::new(),
            Err(e) => {
                tracing::warn!("Error reading votes from storage: {}", e);
                return Map::new();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(votes)) => votes,
            Ok(other) => {
                tracing::warn!("Ignoring stored votes that are not an object: {}", other);
                Map::new()
            }
            Err(e) => {
                tracing::warn!("Ignoring malformed stored votes: {}", e);
                Map::new()
            }
        }
    }
}

fn entry_key(joke_id: i32) -> String {
    format!("joke-{joke_id}")
}

fn parse_vote(value: Value) -> Option<VoteKind> {
    value.as_str()?.parse().ok()
}
