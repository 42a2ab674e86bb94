mod joke;
mod joke_draft;
mod vote;

pub use joke::{Joke, StoredJoke};
pub use joke_draft::{JokeDraft, JokeQuery, SortField, SortOrder};
pub use vote::{VoteAction, VoteCounts, VoteDelta, VoteKind, VoteRequest, VoteResult};
