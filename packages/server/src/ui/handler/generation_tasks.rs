//! Per-connection tracking of in-flight AI generations.

use std::{collections::HashMap, future::Future};

use tokio::task::{AbortHandle, JoinSet};

use crate::domain::MessageId;

/// Generations spawned by one connection, keyed by the prompt message they answer.
#[derive(Default)]
pub struct GenerationTasks {
    tasks: JoinSet<()>,
    handles: HashMap<MessageId, AbortHandle>,
}

impl GenerationTasks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn<F>(&mut self, prompt_message_id: MessageId, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.reap();
        let handle = self.tasks.spawn(task);
        self.handles.insert(prompt_message_id, handle);
    }

    /// Abort the generation for a prompt. Returns false if none is running.
    ///
    /// Hook for cancelling a generation; no client message triggers it yet.
    pub fn cancel(&mut self, prompt_message_id: &MessageId) -> bool {
        match self.handles.remove(prompt_message_id) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Drop bookkeeping for generations that have finished.
    pub fn reap(&mut self) {
        while let Some(result) = self.tasks.try_join_next() {
            if let Err(e) = result
                && e.is_panic()
            {
                tracing::error!("Generation task panicked: {}", e);
            }
        }
        self.handles.retain(|_, handle| !handle.is_finished());
    }

    /// Number of generations still running. Used alongside [`Self::cancel`].
    pub fn len(&mut self) -> usize {
        self.reap();
        self.handles.len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    /// Let running generations finish on their own.
    pub fn detach(mut self) {
        self.handles.clear();
        self.tasks.detach_all();
    }
}
