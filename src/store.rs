// Task store synchronized with a remote backend

use crate::filter::Filter;
use crate::http::{HttpClient, TASKS_PATH, task_path};
use crate::models::{Task, TaskDraft, TaskId, TaskPatch};
use crate::record::{normalize_list, normalize_value};
use eyre::{Context, Report, Result};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub const FETCH_FAILED: &str = "Failed to load tasks. Please try again later.";
pub const CREATE_FAILED: &str = "Failed to create task.";
pub const UPDATE_FAILED: &str = "Failed to update task.";
pub const DELETE_FAILED: &str = "Failed to delete task.";

/// Owned copy of the store state at one instant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub tasks: Vec<Task>,
    pub loading: bool,
    pub error: Option<String>,
    pub filter: Filter,
}

impl StoreSnapshot {
    pub fn filtered_tasks(&self) -> Vec<&Task> {
        self.filter.apply(&self.tasks)
    }

    pub fn active_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }
}

#[derive(Debug, Default)]
struct State {
    tasks: Vec<Task>,
    in_flight: usize,
    error: Option<String>,
    filter: Filter,
}

impl State {
    fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            tasks: self.tasks.clone(),
            loading: self.in_flight > 0,
            error: self.error.clone(),
            filter: self.filter.clone(),
        }
    }
}

/// Authoritative in-memory task collection backed by a remote service
///
/// Every mutation goes to the backend first; local state changes only once
/// the backend confirms. Operations take `&self` so one store can be shared
/// (e.g. behind an `Arc`) by every caller. The state lock is never held
/// across an await, so concurrent operations interleave and apply in
/// completion order.
pub struct TaskStore<C> {
    client: C,
    state: Mutex<State>,
    changes: watch::Sender<StoreSnapshot>,
}

/// Marks one request in flight; released on drop, including on cancellation
struct InFlight<'a, C> {
    store: &'a TaskStore<C>,
}

impl<C> Drop for InFlight<'_, C> {
    fn drop(&mut self) {
        self.store.mutate(|state| state.in_flight = state.in_flight.saturating_sub(1));
    }
}

impl<C> TaskStore<C> {
    pub fn new(client: C) -> Self {
        let (changes, _) = watch::channel(StoreSnapshot::default());
        Self {
            client,
            state: Mutex::new(State::default()),
            changes,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    // ========================================================================
    // Observable state
    // ========================================================================

    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().tasks.clone()
    }

    /// True while at least one request is in flight
    pub fn loading(&self) -> bool {
        self.state.lock().in_flight > 0
    }

    /// Message of the most recent failed operation
    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    pub fn filter(&self) -> Filter {
        self.state.lock().filter.clone()
    }

    pub fn find(&self, id: &TaskId) -> Option<Task> {
        self.state.lock().tasks.iter().find(|t| t.id == *id).cloned()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.state.lock().snapshot()
    }

    /// Receive a fresh snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.changes.subscribe()
    }

    // ========================================================================
    // Derived views
    // ========================================================================

    pub fn filtered_tasks(&self) -> Vec<Task> {
        let state = self.state.lock();
        state.filter.apply(&state.tasks).into_iter().cloned().collect()
    }

    pub fn active_count(&self) -> usize {
        self.state.lock().tasks.iter().filter(|t| !t.completed).count()
    }

    pub fn completed_count(&self) -> usize {
        self.state.lock().tasks.iter().filter(|t| t.completed).count()
    }

    /// Change the display filter. Unknown values are stored as given.
    pub fn set_filter(&self, filter: impl Into<Filter>) {
        let filter = filter.into();
        debug!(%filter, "Setting filter");
        self.mutate(|state| state.filter = filter);
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Apply `f` and publish the resulting snapshot
    ///
    /// The snapshot is sent before the lock is released so publications
    /// happen in the same order as the state changes they describe.
    fn mutate<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        let mut state = self.state.lock();
        let result = f(&mut state);
        self.changes.send_replace(state.snapshot());
        result
    }

    fn begin(&self, operation: &'static str) -> InFlight<'_, C> {
        debug!(operation, "Starting request");
        self.mutate(|state| {
            state.in_flight += 1;
            state.error = None;
        });
        InFlight { store: self }
    }

    fn record_failure(&self, message: &'static str, error: &Report) {
        warn!("{}: {:#}", message, error);
        self.mutate(|state| state.error = Some(message.to_string()));
    }

    fn fail(&self, message: &'static str, error: Report) -> Report {
        self.record_failure(message, &error);
        error.wrap_err(message)
    }
}

impl<C: HttpClient> TaskStore<C> {
    /// Replace the collection with the backend's
    ///
    /// Failure is recorded in [`TaskStore::error`] only; previous tasks stay.
    pub async fn fetch(&self) {
        let _in_flight = self.begin("fetch");

        match self.request_all().await {
            Ok(tasks) => {
                let count = tasks.len();
                self.mutate(|state| state.tasks = tasks);
                info!(count, "Fetched tasks");
            }
            Err(e) => self.record_failure(FETCH_FAILED, &e),
        }
    }

    /// Create a task and append the backend's copy once confirmed
    pub async fn create(&self, draft: TaskDraft) -> Result<Task> {
        let _in_flight = self.begin("create");

        let task = match self.request_create(&draft).await {
            Ok(task) => task,
            Err(e) => return Err(self.fail(CREATE_FAILED, e)),
        };

        self.mutate(|state| match state.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => {
                warn!(id = %task.id, "Created task id already present, replacing");
                *existing = task.clone();
            }
            None => state.tasks.push(task.clone()),
        });
        info!(id = %task.id, title = %task.title, "Created task");
        Ok(task)
    }

    /// Send the updatable fields and replace the local entry with the response
    ///
    /// If the task is no longer in the local collection the response is not
    /// inserted; the inconsistency is logged and the backend's task returned.
    pub async fn update(&self, id: &TaskId, patch: TaskPatch) -> Result<Task> {
        let _in_flight = self.begin("update");

        let task = match self.request_update(id, &patch).await {
            Ok(task) => task,
            Err(e) => return Err(self.fail(UPDATE_FAILED, e)),
        };

        let replaced = self.mutate(|state| match state.tasks.iter_mut().find(|t| t.id == *id) {
            Some(existing) => {
                *existing = task.clone();
                true
            }
            None => false,
        });

        if replaced {
            info!(%id, completed = task.completed, "Updated task");
        } else {
            warn!(%id, "Updated task is not in the local collection");
        }
        Ok(task)
    }

    /// Flip a task's completion flag through [`TaskStore::update`]
    ///
    /// Returns `Ok(None)` without touching state when the id is unknown.
    pub async fn toggle_completion(&self, id: &TaskId) -> Result<Option<Task>> {
        let Some(current) = self.find(id) else {
            warn!(%id, "Cannot toggle unknown task");
            return Ok(None);
        };

        self.update(id, TaskPatch::toggled(&current)).await.map(Some)
    }

    /// Delete a task and drop it locally once confirmed
    pub async fn delete(&self, id: &TaskId) -> Result<()> {
        let _in_flight = self.begin("delete");

        if let Err(e) = self.client.delete(&task_path(id)).await {
            return Err(self.fail(DELETE_FAILED, e.into()));
        }

        let removed = self.mutate(|state| {
            let before = state.tasks.len();
            state.tasks.retain(|t| t.id != *id);
            before - state.tasks.len()
        });
        info!(%id, removed, "Deleted task");
        Ok(())
    }

    async fn request_all(&self) -> Result<Vec<Task>> {
        let body = self.client.get(TASKS_PATH).await?;
        let tasks = normalize_list(body)?;
        Ok(dedupe(tasks))
    }

    async fn request_create(&self, draft: &TaskDraft) -> Result<Task> {
        let body = serde_json::to_value(draft.to_body()).context("Failed to serialize task")?;
        let response = self.client.post(TASKS_PATH, &body).await?;
        normalize_value(response)
    }

    async fn request_update(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task> {
        let body = serde_json::to_value(patch).context("Failed to serialize task")?;
        let response = self.client.put(&task_path(id), &body).await?;
        normalize_value(response)
    }
}

/// Keep the first occurrence of each id
fn dedupe(tasks: Vec<Task>) -> Vec<Task> {
    let mut unique: Vec<Task> = Vec::with_capacity(tasks.len());
    for task in tasks {
        if unique.iter().any(|t| t.id == task.id) {
            warn!(id = %task.id, "Dropping duplicate task id from response");
            continue;
        }
        unique.push(task);
    }
    unique
}
