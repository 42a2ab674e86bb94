mod cast_vote;
mod manage_jokes;

pub use cast_vote::{parse_joke_id, CastVote};
pub use manage_jokes::ManageJokes;
