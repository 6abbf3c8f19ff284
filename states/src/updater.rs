use std::fmt::Debug;

use flume::Sender;

use crate::TaskId;

/// Sending half handed to a spawned task.
///
/// Every event is tagged with the task's [`TaskId`]; the owning
/// [`StateRuntime`](crate::StateRuntime) drops events whose generation is no
/// longer the latest one for their key.
#[derive(Debug)]
pub struct LatestOnlyUpdater<K, E> {
    id: TaskId<K>,
    send: Sender<(TaskId<K>, E)>,
}

impl<K, E> LatestOnlyUpdater<K, E>
where
    K: Copy + Debug,
{
    pub(crate) fn new(id: TaskId<K>, send: Sender<(TaskId<K>, E)>) -> Self {
        Self { id, send }
    }

    pub fn task_id(&self) -> TaskId<K> {
        self.id
    }

    /// Queue an event for the owner. Events sent after the runtime is gone are discarded.
    pub fn set(&self, event: E) {
        if self.send.send((self.id, event)).is_err() {
            log::debug!("runtime closed, dropping event for {:?}", self.id);
        }
    }
}

impl<K: Copy, E> Clone for LatestOnlyUpdater<K, E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            send: self.send.clone(),
        }
    }
}
