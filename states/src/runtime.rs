use std::{collections::HashMap, fmt::Debug, future::Future, hash::Hash};

use flume::{Receiver, Sender};
use tokio::task::JoinSet;

use crate::{LatestOnlyUpdater, TaskId};

/// Owns the channel that background tasks report through, and the tasks themselves.
///
/// Tasks never touch the owner's state. They send `(TaskId, E)` messages which
/// the owner pulls with [`StateRuntime::drain`] and applies itself, so every
/// mutation happens on the owner's side of the channel.
#[derive(Debug)]
pub struct StateRuntime<K, E> {
    send: Sender<(TaskId<K>, E)>,
    recv: Receiver<(TaskId<K>, E)>,

    // latest generation per key; a key missing here has been forgotten
    latest: HashMap<K, u64>,
    next_generation: u64,

    tasks: JoinSet<()>,
}

impl<K, E> Default for StateRuntime<K, E>
where
    K: Copy + Eq + Hash + Debug + Send + 'static,
    E: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, E> StateRuntime<K, E>
where
    K: Copy + Eq + Hash + Debug + Send + 'static,
    E: Send + 'static,
{
    pub fn new() -> Self {
        let (send, recv) = flume::unbounded();
        Self {
            send,
            recv,
            latest: HashMap::new(),
            next_generation: 1,
            tasks: JoinSet::new(),
        }
    }

    /// Register a new generation for `key` and return an updater bound to it.
    ///
    /// Any updater handed out earlier for the same key becomes stale.
    pub fn updater(&mut self, key: K) -> LatestOnlyUpdater<K, E> {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.latest.insert(key, generation);

        LatestOnlyUpdater::new(TaskId::new(key, generation), self.send.clone())
    }

    /// Spawn a task reporting on `key`, superseding any earlier task for it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F, Fut>(&mut self, key: K, task: F) -> TaskId<K>
    where
        F: FnOnce(LatestOnlyUpdater<K, E>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let updater = self.updater(key);
        let id = updater.task_id();
        log::debug!("spawning task {id:?}");
        self.tasks.spawn(task(updater));
        id
    }

    /// Whether `id` is still the latest task for its key.
    pub fn is_current(&self, id: &TaskId<K>) -> bool {
        self.latest.get(id.key()) == Some(&id.generation())
    }

    /// Stop delivering events for `key`. Tasks already running are left alone.
    pub fn forget(&mut self, key: &K) {
        self.latest.remove(key);
    }

    /// Pull every queued event, dropping those from stale or forgotten tasks.
    pub fn drain(&mut self) -> Vec<(K, E)> {
        let mut events = Vec::new();
        for (id, event) in self.recv.try_iter() {
            if self.latest.get(id.key()) == Some(&id.generation()) {
                events.push((*id.key(), event));
            } else {
                log::debug!("dropping stale event from {id:?}");
            }
        }
        events
    }

    /// Number of tasks that have not been joined yet.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Wait for the next task to finish. Returns `false` when none are left.
    pub async fn join_next(&mut self) -> bool {
        match self.tasks.join_next().await {
            Some(Ok(())) => true,
            Some(Err(e)) => {
                log::warn!("background task ended abnormally: {e}");
                true
            }
            None => false,
        }
    }

    /// Wait for every spawned task to finish.
    pub async fn wait_idle(&mut self) {
        while self.join_next().await {}
    }
}
