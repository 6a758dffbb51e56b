pub mod session_worker;

use std::collections::HashMap;
use std::future::Future;
use tokio::task::JoinHandle;

/// Tracks running background tasks and provides cancellation support
pub struct BackgroundTaskManager {
    tasks: HashMap<String, JoinHandle<()>>,
}

impl BackgroundTaskManager {
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
        }
    }

    /// Spawn a background task
    /// If a task with the same ID already exists, it will be cancelled first
    pub fn spawn_task<F>(&mut self, task_id: String, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        // Cancel existing task with same ID (prevents stale results)
        if let Some(handle) = self.tasks.remove(&task_id) {
            handle.abort();
        }

        self.tasks.retain(|_, handle| !handle.is_finished());

        let handle = tokio::spawn(future);
        self.tasks.insert(task_id, handle);
    }

    pub fn is_running(&self, task_id: &str) -> bool {
        self.tasks
            .get(task_id)
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Cancel all running tasks (used on shutdown)
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

impl Default for BackgroundTaskManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BackgroundTaskManager {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
