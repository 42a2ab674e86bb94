use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskHandle(u64);

impl TaskHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Runs a payload once after a delay unless cancelled first.
pub trait Scheduler<P> {
    fn schedule(&mut self, delay: Duration, payload: P) -> TaskHandle;

    /// Cancelling a task that already fired or was never scheduled does nothing.
    fn cancel(&mut self, handle: TaskHandle);

    /// Lets the scheduler forget a task whose payload has been handled.
    fn complete(&mut self, _handle: TaskHandle) {}
}

/// Scheduler driven by an explicit clock. Due payloads are handed back from
/// `advance_to` instead of being run.
#[derive(Debug)]
pub struct ManualScheduler<P> {
    now: Duration,
    next_id: u64,
    tasks: BTreeMap<TaskHandle, (Duration, P)>,
}

impl<P> Default for ManualScheduler<P> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            tasks: BTreeMap::new(),
        }
    }
}

impl<P> ManualScheduler<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Moves the clock to `at` (never backwards) and returns every payload
    /// that came due, earliest first.
    pub fn advance_to(&mut self, at: Duration) -> Vec<P> {
        self.now = self.now.max(at);

        let mut due: Vec<(Duration, TaskHandle)> = self
            .tasks
            .iter()
            .filter(|(_, (deadline, _))| *deadline <= self.now)
            .map(|(handle, (deadline, _))| (*deadline, *handle))
            .collect();
        due.sort();

        due.into_iter()
            .filter_map(|(_, handle)| self.tasks.remove(&handle))
            .map(|(_, payload)| payload)
            .collect()
    }

    pub fn advance_by(&mut self, by: Duration) -> Vec<P> {
        self.advance_to(self.now + by)
    }
}

impl<P> Scheduler<P> for ManualScheduler<P> {
    fn schedule(&mut self, delay: Duration, payload: P) -> TaskHandle {
        let handle = TaskHandle::new(self.next_id);
        self.next_id += 1;
        self.tasks.insert(handle, (self.now + delay, payload));
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) {
        self.tasks.remove(&handle);
    }
}
