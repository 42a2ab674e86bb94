use garva_app::vote::{Scheduler, TaskHandle, VoteStorage, VoteSubmission};
use garva_errors::AppError;
use leptos::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

/// `localStorage` of the current browser. On the server there is nothing to
/// read, so every vote reads as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

#[cfg(feature = "hydrate")]
impl VoteStorage for BrowserStorage {
    fn read(&self, key: &str) -> Result<Option<String>, AppError> {
        use gloo_storage::{LocalStorage, Storage};
        LocalStorage::raw()
            .get_item(key)
            .map_err(|e| AppError::Storage(format!("{e:?}")))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), AppError> {
        use gloo_storage::{LocalStorage, Storage};
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| AppError::Storage(format!("{e:?}")))
    }
}

#[cfg(not(feature = "hydrate"))]
impl VoteStorage for BrowserStorage {
    fn read(&self, _key: &str) -> Result<Option<String>, AppError> {
        Ok(None)
    }

    fn write(&self, _key: &str, _value: &str) -> Result<(), AppError> {
        Ok(())
    }
}

/// Debounce timers on `window.setTimeout`.
pub struct BrowserScheduler {
    next_id: u64,
    timers: HashMap<TaskHandle, TimeoutHandle>,
    on_fire: Callback<VoteSubmission>,
}

impl BrowserScheduler {
    pub fn new(on_fire: Callback<VoteSubmission>) -> Self {
        Self {
            next_id: 0,
            timers: HashMap::new(),
            on_fire,
        }
    }
}

impl Scheduler<VoteSubmission> for BrowserScheduler {
    fn schedule(&mut self, delay: Duration, payload: VoteSubmission) -> TaskHandle {
        let handle = TaskHandle::new(self.next_id);
        self.next_id += 1;

        let on_fire = self.on_fire;
        match set_timeout_with_handle(move || on_fire.run(payload), delay) {
            Ok(timer) => {
                self.timers.insert(handle, timer);
            }
            Err(e) => tracing::error!("Failed to schedule vote submission: {:?}", e),
        }
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) {
        if let Some(timer) = self.timers.remove(&handle) {
            timer.clear();
        }
    }

    fn complete(&mut self, handle: TaskHandle) {
        self.timers.remove(&handle);
    }
}
