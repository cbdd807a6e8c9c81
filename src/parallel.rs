use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::error::{DocGenError, Result};

/// Executes tasks concurrently with a fixed limit on tasks in flight
pub struct ParallelProcessor {
    max_concurrent: usize,
    semaphore: Arc<Semaphore>,
}

impl ParallelProcessor {
    /// Creates a pool allowing `max_concurrent` tasks at once (at least one)
    pub fn new(max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            max_concurrent,
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    /// Concurrency limit
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Runs all tasks and returns their results in task order.
    ///
    /// Tasks complete in any order; a panicking task yields an error in its
    /// own slot without affecting the others.
    pub async fn process<F, T>(&self, tasks: Vec<F>) -> Vec<Result<T>>
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let mut handles = Vec::with_capacity(tasks.len());

        for task in tasks {
            let permit = match self.semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    handles.push(Err(DocGenError::Message(format!("task pool closed: {}", e))));
                    continue;
                }
            };
            handles.push(Ok(tokio::spawn(async move {
                let result = task.await;
                drop(permit);
                result
            })));
        }

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            let result = match handle {
                Ok(handle) => handle
                    .await
                    .unwrap_or_else(|e| Err(DocGenError::Message(format!("task failed: {}", e)))),
                Err(e) => Err(e),
            };
            results.push(result);
        }
        results
    }
}
