use super::ledger::{VoteLedger, VoteStorage};
use super::scheduler::{Scheduler, TaskHandle};
use crate::domain::{VoteAction, VoteCounts, VoteDelta, VoteKind, VoteRequest, VoteResult};
use garva_errors::AppError;
use std::collections::HashMap;
use std::time::Duration;

/// Quiet period after the last press before a vote is sent.
pub const VOTE_DEBOUNCE: Duration = Duration::from_millis(300);

/// Result of pressing a vote button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTransition {
    pub previous: Option<VoteKind>,
    pub next: Option<VoteKind>,
}

impl VoteTransition {
    /// Pressing the active button undoes it; any other press switches to it.
    pub fn press(current: Option<VoteKind>, pressed: VoteKind) -> Self {
        let next = if current == Some(pressed) {
            None
        } else {
            Some(pressed)
        };
        Self {
            previous: current,
            next,
        }
    }

    pub fn delta(&self) -> VoteDelta {
        VoteDelta::between(self.previous, self.next)
    }
}

/// A vote submission waiting for (or sent to) the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteSubmission {
    pub joke_id: i32,
    pub sequence: u64,
    pub request: VoteRequest,
}

/// What the UI should show right after a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
    pub vote: Option<VoteKind>,
    pub counts: VoteCounts,
    pub submission: TaskHandle,
}

#[derive(Debug, Clone, Copy)]
struct PendingVote {
    handle: TaskHandle,
    sequence: u64,
    /// Vote the server last knew about, i.e. before the first press of the burst.
    baseline: Option<VoteKind>,
}

/// Keeps the ledger, the displayed counters and the server in step.
///
/// Presses are applied locally at once and sent after [`VOTE_DEBOUNCE`] of
/// quiet. A burst of presses on one joke becomes a single submission whose
/// `previousVote` is the vote from before the burst, so the server applies
/// exactly the net change. Every submission gets a per-joke sequence number;
/// a response to anything but the latest one is dropped so it cannot clobber
/// newer optimistic counts.
///
/// The in-memory vote map is authoritative for this session. The ledger is
/// read once per joke and written best-effort, so a storage that rejects
/// writes cannot desync the displayed counts.
pub struct VoteReconciler<S, T> {
    ledger: VoteLedger<S>,
    scheduler: T,
    debounce: Duration,
    votes: HashMap<i32, Option<VoteKind>>,
    pending: HashMap<i32, PendingVote>,
    latest: HashMap<i32, u64>,
    next_sequence: u64,
}

impl<S, T> VoteReconciler<S, T>
where
    S: VoteStorage,
    T: Scheduler<VoteSubmission>,
{
    pub fn new(ledger: VoteLedger<S>, scheduler: T) -> Self {
        Self {
            ledger,
            scheduler,
            debounce: VOTE_DEBOUNCE,
            votes: HashMap::new(),
            pending: HashMap::new(),
            latest: HashMap::new(),
            next_sequence: 1,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn ledger(&self) -> &VoteLedger<S> {
        &self.ledger
    }

    pub fn scheduler(&self) -> &T {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut T {
        &mut self.scheduler
    }

    pub fn current_vote(&self, joke_id: i32) -> Option<VoteKind> {
        match self.votes.get(&joke_id) {
            Some(vote) => *vote,
            None => self.ledger.get(joke_id),
        }
    }

    pub fn has_pending(&self, joke_id: i32) -> bool {
        self.pending.contains_key(&joke_id)
    }

    /// Applies a button press optimistically and (re)schedules the submission.
    pub fn press(&mut self, joke_id: i32, pressed: VoteKind, displayed: VoteCounts) -> VoteOutcome {
        let transition = VoteTransition::press(self.current_vote(joke_id), pressed);
        let counts = displayed.apply(transition.delta());

        self.votes.insert(joke_id, transition.next);
        if let Err(e) = self.ledger.set(joke_id, transition.next) {
            tracing::warn!("Error saving vote for joke {}: {}", joke_id, e);
        }

        let baseline = match self.pending.remove(&joke_id) {
            Some(pending) => {
                self.scheduler.cancel(pending.handle);
                pending.baseline
            }
            None => transition.previous,
        };

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.latest.insert(joke_id, sequence);

        let submission = VoteSubmission {
            joke_id,
            sequence,
            request: VoteRequest {
                action: VoteAction::from(transition.next),
                previous_vote: baseline,
            },
        };
        let handle = self.scheduler.schedule(self.debounce, submission);
        self.pending.insert(
            joke_id,
            PendingVote {
                handle,
                sequence,
                baseline,
            },
        );

        tracing::debug!(
            joke_id,
            sequence,
            previous = ?transition.previous,
            next = ?transition.next,
            "Vote pressed"
        );

        VoteOutcome {
            vote: transition.next,
            counts,
            submission: handle,
        }
    }

    /// Marks a fired submission as in flight. The next press on the joke
    /// starts a new burst from the vote that was just sent.
    pub fn dispatched(&mut self, submission: &VoteSubmission) {
        let is_current = self
            .pending
            .get(&submission.joke_id)
            .is_some_and(|pending| pending.sequence == submission.sequence);
        if !is_current {
            return;
        }
        if let Some(pending) = self.pending.remove(&submission.joke_id) {
            self.scheduler.complete(pending.handle);
        }
    }

    /// Server-confirmed counts for a submission, or `None` if a newer press
    /// has happened since and the response is stale.
    pub fn confirm(&mut self, submission: &VoteSubmission, result: VoteResult) -> Option<VoteCounts> {
        if self.latest.get(&submission.joke_id) != Some(&submission.sequence) {
            tracing::debug!(
                joke_id = submission.joke_id,
                sequence = submission.sequence,
                "Discarding stale vote response"
            );
            return None;
        }
        Some(result.counts())
    }

    /// A failed submission leaves the optimistic state in place.
    pub fn fail(&mut self, submission: &VoteSubmission, error: &AppError) {
        tracing::error!(
            joke_id = submission.joke_id,
            sequence = submission.sequence,
            "Error saving vote: {}",
            error
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vote::{ManualScheduler, MemoryStorage, STORAGE_KEY};

    /// Storage that reads empty and rejects every write, like a full quota.
    struct RejectingStorage;

    impl VoteStorage for RejectingStorage {
        fn read(&self, _key: &str) -> Result<Option<String>, AppError> {
            Ok(None)
        }

        fn write(&self, _key: &str, _value: &str) -> Result<(), AppError> {
            Err(AppError::Storage("QuotaExceededError".to_string()))
        }
    }

    type TestReconciler = VoteReconciler<MemoryStorage, ManualScheduler<VoteSubmission>>;

    fn reconciler() -> TestReconciler {
        VoteReconciler::new(VoteLedger::new(MemoryStorage::new()), ManualScheduler::new())
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn result(upvotes: i32, downvotes: i32) -> VoteResult {
        VoteResult {
            success: true,
            upvotes,
            downvotes,
        }
    }

    #[test]
    fn test_transitions() {
        use VoteKind::*;
        assert_eq!(VoteTransition::press(None, Upvote).next, Some(Upvote));
        assert_eq!(VoteTransition::press(None, Downvote).next, Some(Downvote));
        assert_eq!(VoteTransition::press(Some(Upvote), Upvote).next, None);
        assert_eq!(VoteTransition::press(Some(Upvote), Downvote).next, Some(Downvote));
        assert_eq!(VoteTransition::press(Some(Downvote), Downvote).next, None);
        assert_eq!(VoteTransition::press(Some(Downvote), Upvote).next, Some(Upvote));
    }

    #[test]
    fn test_upvote_then_undo() {
        let mut votes = reconciler();

        let outcome = votes.press(1, VoteKind::Upvote, VoteCounts::new(5, 2));
        assert_eq!(outcome.counts, VoteCounts::new(6, 2));
        assert_eq!(outcome.vote, Some(VoteKind::Upvote));
        assert_eq!(votes.current_vote(1), Some(VoteKind::Upvote));

        let outcome = votes.press(1, VoteKind::Upvote, outcome.counts);
        assert_eq!(outcome.counts, VoteCounts::new(5, 2));
        assert_eq!(outcome.vote, None);
        assert_eq!(votes.current_vote(1), None);

        let raw = votes.ledger().storage().read(STORAGE_KEY).unwrap().unwrap();
        assert!(!raw.contains("joke-1"));
    }

    #[test]
    fn test_double_press_undoes_when_storage_rejects_writes() {
        let mut votes = VoteReconciler::new(
            VoteLedger::new(RejectingStorage),
            ManualScheduler::<VoteSubmission>::new(),
        );

        let outcome = votes.press(1, VoteKind::Upvote, VoteCounts::new(5, 0));
        assert_eq!(outcome.vote, Some(VoteKind::Upvote));
        assert_eq!(outcome.counts, VoteCounts::new(6, 0));
        assert_eq!(votes.current_vote(1), Some(VoteKind::Upvote));

        let outcome = votes.press(1, VoteKind::Upvote, outcome.counts);
        assert_eq!(outcome.vote, None);
        assert_eq!(outcome.counts, VoteCounts::new(5, 0));

        let fired = votes.scheduler_mut().advance_by(VOTE_DEBOUNCE);
        assert_eq!(
            fired[0].request,
            VoteRequest {
                action: VoteAction::Unvote,
                previous_vote: None,
            }
        );
    }

    #[test]
    fn test_stored_vote_seeds_first_press() {
        let storage = MemoryStorage::with_item(STORAGE_KEY, r#"{"joke-4":"downvote"}"#);
        let mut votes = VoteReconciler::new(VoteLedger::new(storage), ManualScheduler::<VoteSubmission>::new());
        assert_eq!(votes.current_vote(4), Some(VoteKind::Downvote));

        let outcome = votes.press(4, VoteKind::Downvote, VoteCounts::new(2, 3));
        assert_eq!(outcome.vote, None);
        assert_eq!(outcome.counts, VoteCounts::new(2, 2));
    }

    #[test]
    fn test_switching_moves_the_vote() {
        let mut votes = reconciler();
        let outcome = votes.press(1, VoteKind::Downvote, VoteCounts::new(3, 3));
        assert_eq!(outcome.counts, VoteCounts::new(3, 4));
        let outcome = votes.press(1, VoteKind::Upvote, outcome.counts);
        assert_eq!(outcome.counts, VoteCounts::new(4, 3));
    }

    #[test]
    fn test_any_press_sequence_nets_to_final_state() {
        use VoteKind::*;
        let sequences: &[&[VoteKind]] = &[
            &[Upvote, Upvote],
            &[Upvote, Downvote, Upvote],
            &[Downvote, Downvote, Downvote],
            &[Upvote, Downvote, Downvote, Upvote, Upvote],
            &[Downvote, Upvote, Upvote, Downvote],
        ];

        for presses in sequences {
            let mut votes = reconciler();
            let start = VoteCounts::new(10, 10);
            let mut counts = start;
            for &pressed in presses.iter() {
                counts = votes.press(7, pressed, counts).counts;
            }

            let expected = start.apply(VoteDelta::between(None, votes.current_vote(7)));
            assert_eq!(counts, expected, "{presses:?}");
        }
    }

    #[test]
    fn test_burst_coalesces_into_one_submission() {
        let mut votes = reconciler();
        let counts = VoteCounts::new(5, 5);

        let counts = votes.press(1, VoteKind::Upvote, counts).counts;
        assert!(votes.scheduler_mut().advance_to(ms(100)).is_empty());
        let counts = votes.press(1, VoteKind::Downvote, counts).counts;
        assert!(votes.scheduler_mut().advance_to(ms(150)).is_empty());
        votes.press(1, VoteKind::Upvote, counts);

        assert!(votes.scheduler_mut().advance_to(ms(449)).is_empty());
        let fired = votes.scheduler_mut().advance_to(ms(450));
        assert_eq!(fired.len(), 1);
        assert_eq!(
            fired[0].request,
            VoteRequest {
                action: VoteAction::Upvote,
                previous_vote: None,
            }
        );
        assert_eq!(votes.scheduler().pending(), 0);
    }

    #[test]
    fn test_double_press_sends_net_zero() {
        let mut votes = reconciler();
        let counts = votes.press(1, VoteKind::Upvote, VoteCounts::new(0, 0)).counts;
        votes.press(1, VoteKind::Upvote, counts);

        let fired = votes.scheduler_mut().advance_by(VOTE_DEBOUNCE);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].request.action, VoteAction::Unvote);
        assert_eq!(fired[0].request.previous_vote, None);
        assert!(fired[0].request.delta().is_zero());
    }

    #[test]
    fn test_next_burst_starts_from_dispatched_vote() {
        let mut votes = reconciler();
        votes.press(1, VoteKind::Upvote, VoteCounts::new(1, 1));
        let fired = votes.scheduler_mut().advance_by(VOTE_DEBOUNCE);
        votes.dispatched(&fired[0]);
        assert!(!votes.has_pending(1));

        votes.press(1, VoteKind::Downvote, VoteCounts::new(2, 1));
        let fired = votes.scheduler_mut().advance_by(VOTE_DEBOUNCE);
        assert_eq!(
            fired[0].request,
            VoteRequest {
                action: VoteAction::Downvote,
                previous_vote: Some(VoteKind::Upvote),
            }
        );
    }

    #[test]
    fn test_jokes_are_debounced_independently() {
        let mut votes = reconciler();
        votes.press(1, VoteKind::Upvote, VoteCounts::default());
        votes.scheduler_mut().advance_to(ms(200));
        votes.press(2, VoteKind::Downvote, VoteCounts::default());

        let fired = votes.scheduler_mut().advance_to(ms(300));
        assert_eq!(fired.iter().map(|s| s.joke_id).collect::<Vec<_>>(), vec![1]);
        let fired = votes.scheduler_mut().advance_to(ms(500));
        assert_eq!(fired.iter().map(|s| s.joke_id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_confirmed_counts_apply() {
        let mut votes = reconciler();
        votes.press(1, VoteKind::Upvote, VoteCounts::new(5, 0));
        let fired = votes.scheduler_mut().advance_by(VOTE_DEBOUNCE);
        votes.dispatched(&fired[0]);

        // Someone else voted meanwhile; the server's numbers win.
        assert_eq!(votes.confirm(&fired[0], result(8, 1)), Some(VoteCounts::new(8, 1)));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut votes = reconciler();
        votes.press(1, VoteKind::Upvote, VoteCounts::new(5, 0));
        let fired = votes.scheduler_mut().advance_by(VOTE_DEBOUNCE);
        votes.dispatched(&fired[0]);

        // A newer press lands while the first request is in flight.
        votes.press(1, VoteKind::Upvote, VoteCounts::new(6, 0));
        assert_eq!(votes.confirm(&fired[0], result(6, 0)), None);

        let newer = votes.scheduler_mut().advance_by(VOTE_DEBOUNCE);
        assert_eq!(votes.confirm(&newer[0], result(5, 0)), Some(VoteCounts::new(5, 0)));
    }

    #[test]
    fn test_failure_keeps_optimistic_vote() {
        let mut votes = reconciler();
        votes.press(1, VoteKind::Downvote, VoteCounts::new(0, 0));
        let fired = votes.scheduler_mut().advance_by(VOTE_DEBOUNCE);
        votes.dispatched(&fired[0]);
        votes.fail(&fired[0], &AppError::Internal("503".to_string()));

        assert_eq!(votes.current_vote(1), Some(VoteKind::Downvote));
        assert_eq!(votes.scheduler().pending(), 0);
    }

    #[test]
    fn test_custom_debounce() {
        let mut votes = reconciler().with_debounce(ms(50));
        votes.press(1, VoteKind::Upvote, VoteCounts::default());
        assert_eq!(votes.scheduler_mut().advance_to(ms(50)).len(), 1);
    }
}
