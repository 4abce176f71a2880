//! Completion sinks.
//!
//! The scheduler hands every finished [`ExecutionRecord`] to a
//! [`CompletionSink`] once progress accounting for the update is done.
//! Provides a bounded in-memory log and a shared variant for engines that
//! collect results from several resources.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::task::{ExecutionRecord, ExecutionStatus};
use crate::util::serde::{ResourceId, SimTime, TaskId};

/// Result of a finished task, as reported to the broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishedTask {
    /// Task identifier.
    pub task_id: TaskId,
    /// Resource the task ran on.
    pub resource_id: ResourceId,
    /// Final status.
    pub status: ExecutionStatus,
    /// Admission time.
    pub start_time: SimTime,
    /// Completion time.
    pub finish_time: SimTime,
    /// Instruction units executed.
    pub executed: u64,
}

impl FinishedTask {
    /// Wall-clock simulation time spent on the resource.
    pub fn cpu_time(&self) -> SimTime {
        self.finish_time - self.start_time
    }
}

impl From<&ExecutionRecord> for FinishedTask {
    fn from(record: &ExecutionRecord) -> Self {
        Self {
            task_id: record.id(),
            resource_id: record.resource_id(),
            status: record.status(),
            start_time: record.start_time(),
            finish_time: record.finish_time().unwrap_or(record.start_time()),
            executed: record.executed(),
        }
    }
}

/// Receives records that transitioned to finished.
pub trait CompletionSink {
    /// Called once per finished record.
    fn on_finish(&mut self, record: ExecutionRecord);
}

impl<F> CompletionSink for F
where
    F: FnMut(ExecutionRecord),
{
    fn on_finish(&mut self, record: ExecutionRecord) {
        self(record);
    }
}

/// In-memory completion log with a bounded buffer.
#[derive(Debug)]
pub struct InMemoryCompletionLog {
    finished: VecDeque<FinishedTask>,
    max_entries: usize,
}

impl InMemoryCompletionLog {
    /// Create a log that keeps at most `max_entries`, dropping the oldest.
    pub fn new(max_entries: usize) -> Self {
        Self {
            finished: VecDeque::with_capacity(max_entries.min(1024)),
            max_entries,
        }
    }

    /// Snapshot of stored results, oldest first.
    pub fn finished(&self) -> Vec<FinishedTask> {
        self.finished.iter().cloned().collect()
    }

    /// Number of stored results.
    pub fn len(&self) -> usize {
        self.finished.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.finished.is_empty()
    }

    fn push(&mut self, entry: FinishedTask) {
        if self.max_entries == 0 {
            return;
        }
        if self.finished.len() >= self.max_entries {
            self.finished.pop_front();
        }
        self.finished.push_back(entry);
    }
}

impl CompletionSink for InMemoryCompletionLog {
    fn on_finish(&mut self, record: ExecutionRecord) {
        self.push(FinishedTask::from(&record));
    }
}

/// Completion log shared between several schedulers.
#[derive(Debug, Clone)]
pub struct SharedCompletionLog {
    inner: Arc<Mutex<InMemoryCompletionLog>>,
}

impl SharedCompletionLog {
    /// Create a shared log with a bounded buffer.
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(InMemoryCompletionLog::new(max_entries))),
        }
    }

    /// Snapshot of stored results, oldest first.
    pub fn finished(&self) -> Vec<FinishedTask> {
        self.inner.lock().finished()
    }
}

impl CompletionSink for SharedCompletionLog {
    fn on_finish(&mut self, record: ExecutionRecord) {
        self.inner.lock().on_finish(record);
    }
}
