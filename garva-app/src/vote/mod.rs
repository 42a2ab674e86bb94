mod ledger;
mod reconciler;
mod scheduler;

pub use ledger::{MemoryStorage, VoteLedger, VoteStorage, STORAGE_KEY};
pub use reconciler::{VoteOutcome, VoteReconciler, VoteSubmission, VoteTransition, VOTE_DEBOUNCE};
pub use scheduler::{ManualScheduler, Scheduler, TaskHandle};
