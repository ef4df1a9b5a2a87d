//! In-memory store of active jobs.
//!
//! Holds job records keyed by job id, the messages with a job in flight, and a
//! bounded record of messages whose request already ended. A message is claimed
//! before dispatch so that duplicate Slack deliveries of the same event (including
//! the `app_mention` and `file_share` pair for one message) cannot run it twice.

use std::collections::{HashMap, HashSet, VecDeque};
use tokio::sync::RwLock;

use super::models::MessageRef;
use super::status::Job;

/// How many ended messages are remembered for deduplication.
pub const HANDLED_CAPACITY: usize = 4096;

#[derive(Debug, Default)]
struct Inner {
    jobs: HashMap<String, Job>,
    claimed: HashSet<MessageRef>,
    handled: HashSet<MessageRef>,
    handled_order: VecDeque<MessageRef>,
}

impl Inner {
    fn retire(&mut self, message: &MessageRef) {
        self.claimed.remove(message);
        if !self.handled.insert(message.clone()) {
            return;
        }
        self.handled_order.push_back(message.clone());
        if self.handled_order.len() > HANDLED_CAPACITY
            && let Some(oldest) = self.handled_order.pop_front()
        {
            self.handled.remove(&oldest);
        }
    }
}

#[derive(Debug, Default)]
pub struct JobRegistry {
    inner: RwLock<Inner>,
}

impl JobRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `message` as having a job in flight.
    ///
    /// Returns `false` if it already has one or its request has already ended.
    pub async fn claim(&self, message: &MessageRef) -> bool {
        let mut inner = self.inner.write().await;
        if inner.handled.contains(message) {
            return false;
        }
        inner.claimed.insert(message.clone())
    }

    /// Ends a claim whose dispatch did not produce a job. The message stays handled.
    pub async fn retire(&self, message: &MessageRef) {
        self.inner.write().await.retire(message);
    }

    pub async fn insert(&self, job: Job) {
        let mut inner = self.inner.write().await;
        inner.claimed.insert(job.message.clone());
        inner.jobs.insert(job.job_id.clone(), job);
    }

    pub async fn get(&self, job_id: &str) -> Option<Job> {
        self.inner.read().await.jobs.get(job_id).cloned()
    }

    /// Applies `f` to the job record, returning its result, or `None` if the job is unknown.
    pub async fn update<F, T>(&self, job_id: &str, f: F) -> Option<T>
    where
        F: FnOnce(&mut Job) -> T,
    {
        self.inner.write().await.jobs.get_mut(job_id).map(f)
    }

    /// Drops a finished job. Its message stays handled.
    pub async fn remove(&self, job_id: &str) -> Option<Job> {
        let mut inner = self.inner.write().await;
        let job = inner.jobs.remove(job_id)?;
        inner.retire(&job.message);
        Some(job)
    }

    /// Whether `message` has a job in flight.
    pub async fn is_claimed(&self, message: &MessageRef) -> bool {
        self.inner.read().await.claimed.contains(message)
    }

    pub async fn active_jobs(&self) -> usize {
        self.inner.read().await.jobs.len()
    }
}
