//! Task map plus the worker limit that gates scan jobs.

use anyhow::Result;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Semaphore;

use super::{TaskId, TaskStatus};
use crate::scanner::{ImportSummary, ScanProgress};

/// Cheaply cloneable handle to the shared task map.
#[derive(Clone)]
pub struct TaskRegistry {
    tasks: Arc<RwLock<HashMap<TaskId, TaskStatus>>>,
    permits: Arc<Semaphore>,
}

/// Given to a running job so it can publish progress.
pub struct TaskReporter {
    id: TaskId,
    registry: TaskRegistry,
}

impl TaskReporter {
    pub fn progress(&self, current: usize, total: usize) {
        self.registry
            .set(self.id, TaskStatus::Running { current, total });
    }

    /// Publish a scanner event as `running` progress. Completion is left to
    /// the registry, which records the job's result.
    pub fn scan_progress(&self, event: ScanProgress) {
        match event {
            ScanProgress::Started { total_files } => self.progress(0, total_files),
            ScanProgress::Scanning { current, total, .. } => self.progress(current, total),
            ScanProgress::Completed { .. } => {}
        }
    }
}

impl TaskRegistry {
    pub fn new(max_workers: usize) -> Self {
        Self {
            tasks: Arc::new(RwLock::new(HashMap::new())),
            permits: Arc::new(Semaphore::new(max_workers.max(1))),
        }
    }

    /// Register a task as pending and start it once a worker slot frees up.
    /// Must be called from within a tokio runtime.
    pub fn submit<F>(&self, job: F) -> TaskId
    where
        F: FnOnce(TaskReporter) -> Result<ImportSummary> + Send + 'static,
    {
        let id = TaskId::new();
        self.set(id, TaskStatus::Pending);

        let registry = self.clone();
        tokio::spawn(async move {
            let permit = Arc::clone(&registry.permits).acquire_owned().await;
            let reporter = TaskReporter {
                id,
                registry: registry.clone(),
            };

            let outcome = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                job(reporter)
            })
            .await;

            let status = match outcome {
                Ok(Ok(summary)) => {
                    tracing::info!(task_id = %id, album_id = summary.album_id, "Task done");
                    TaskStatus::Done(summary)
                }
                Ok(Err(e)) => {
                    tracing::error!(task_id = %id, error = ?e, "Task failed");
                    TaskStatus::Error {
                        message: e.to_string(),
                        trace: format!("{e:?}"),
                    }
                }
                Err(join_error) => {
                    tracing::error!(task_id = %id, error = %join_error, "Task panicked");
                    TaskStatus::Error {
                        message: "Task aborted unexpectedly".to_string(),
                        trace: join_error.to_string(),
                    }
                }
            };
            registry.set(id, status);
        });

        id
    }

    pub fn get(&self, id: TaskId) -> Option<TaskStatus> {
        self.tasks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    fn set(&self, id: TaskId, status: TaskStatus) {
        self.tasks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, status);
    }

    /// Number of tasks tracked, finished ones included.
    pub fn count(&self) -> usize {
        self.tasks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
