//! Keyed fetch lifecycle shared by every view.
//!
//! Each activation takes a fresh generation number. A result is written only
//! while its generation is still the newest one, so a slow response for an
//! old key can never overwrite state that belongs to a newer activation, and
//! nothing lands in a view after [`ResourceView::invalidate`]. The generation
//! check and the write happen under the watch channel's lock.

use crate::core::views::load_state::LoadState;
use crate::error::ApiError;
use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Observable state of a view: which resource it is bound to and what it holds.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot<T> {
    pub key: Option<String>,
    pub state: LoadState<T>,
}

impl<T> Default for ViewSnapshot<T> {
    fn default() -> Self {
        Self {
            key: None,
            state: LoadState::Idle,
        }
    }
}

impl<T> ViewSnapshot<T> {
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn data(&self) -> Option<&T> {
        self.state.data()
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.state.error()
    }
}

/// Identifies one activation of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

pub struct ResourceView<T> {
    generation: AtomicU64,
    state: watch::Sender<ViewSnapshot<T>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<T> Default for ResourceView<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResourceView<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        let (state, _) = watch::channel(ViewSnapshot::default());
        Self {
            generation: AtomicU64::new(0),
            state,
            task: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot<T>> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ViewSnapshot<T> {
        self.state.borrow().clone()
    }

    /// The current activation and the key it is bound to.
    pub fn current(&self) -> (Generation, Option<String>) {
        let snapshot = self.state.borrow();
        (
            Generation(self.generation.load(Ordering::SeqCst)),
            snapshot.key.clone(),
        )
    }

    /// Start a new activation for `key` and mark the view as loading.
    pub fn begin(&self, key: &str) -> Generation {
        let mut token = Generation(0);
        self.state.send_modify(|snapshot| {
            token = Generation(self.generation.fetch_add(1, Ordering::SeqCst) + 1);
            snapshot.key = Some(key.to_string());
            snapshot.state = LoadState::Loading;
        });
        token
    }

    /// Record the outcome of a fetch. Returns false if the result was stale.
    pub fn commit(&self, token: Generation, result: Result<T, ApiError>) -> bool {
        let committed = self.modify_if_current(token, |state| *state = result.into());
        if !committed {
            log::debug!("discarding stale response for generation {}", token.0);
        }
        committed
    }

    /// Apply `f` if `token` is still the newest activation.
    pub fn modify_if_current<F>(&self, token: Generation, f: F) -> bool
    where
        F: FnOnce(&mut LoadState<T>),
    {
        self.state.send_if_modified(|snapshot| {
            if self.generation.load(Ordering::SeqCst) != token.0 {
                return false;
            }
            f(&mut snapshot.state);
            true
        })
    }

    /// Like [`modify_if_current`](Self::modify_if_current), but also retires
    /// `token` so that a fetch still in flight for it is discarded.
    pub fn supersede<F>(&self, token: Generation, f: F) -> bool
    where
        F: FnOnce(&mut LoadState<T>),
    {
        self.state.send_if_modified(|snapshot| {
            if self.generation.load(Ordering::SeqCst) != token.0 {
                return false;
            }
            self.generation.fetch_add(1, Ordering::SeqCst);
            f(&mut snapshot.state);
            true
        })
    }

    /// Run a fetch inline: loading, fetch, commit.
    pub async fn load<F, Fut>(&self, key: &str, fetch: F) -> bool
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let token = self.begin(key);
        let result = fetch(key.to_string()).await;
        self.commit(token, result)
    }

    /// Start a background activation for `key`.
    ///
    /// `spawn` receives the new token and returns the task that fetches and
    /// commits for it. Taking the token, spawning and replacing the previous
    /// task all happen under the task lock, so the task left running always
    /// belongs to the newest token.
    pub fn start<F>(&self, key: &str, spawn: F) -> Generation
    where
        F: FnOnce(Generation) -> JoinHandle<()>,
    {
        let mut slot = self.task_slot();
        let token = self.begin(key);
        if let Some(previous) = slot.replace(spawn(token)) {
            previous.abort();
        }
        token
    }

    /// Tear the view down: abort the in-flight task, retire every
    /// outstanding generation and drop whatever is held.
    pub fn invalidate(&self) {
        let mut slot = self.task_slot();
        if let Some(handle) = slot.take() {
            handle.abort();
        }

        self.state.send_modify(|snapshot| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            snapshot.key = None;
            snapshot.state = LoadState::Idle;
        });
    }

    fn task_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.task.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
