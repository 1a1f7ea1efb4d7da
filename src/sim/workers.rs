/*!
 * Worker Threads
 * Named OS threads carrying the run span, joined as a group
 */

use crate::core::errors::{CoordError, CoordResult};
use std::thread::{self, JoinHandle};
use tracing::{error, Span};

/// One spawned worker
pub struct Worker<T> {
    name: String,
    handle: JoinHandle<T>,
}

impl<T: Send + 'static> Worker<T> {
    /// Spawn `f` on a thread called `name`, inside `span`
    pub fn spawn<F>(name: impl Into<String>, span: &Span, f: F) -> CoordResult<Self>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let name = name.into();
        let span = span.clone();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                let _entered = span.enter();
                f()
            })
            .map_err(|e| CoordError::WorkerSpawn {
                name: name.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self { name, handle })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Block until the worker returns
    pub fn join(self) -> CoordResult<T> {
        self.handle.join().map_err(|_| {
            error!(worker = %self.name, "worker panicked");
            CoordError::WorkerPanicked(self.name)
        })
    }
}

/// Workers of one role, joined in spawn order
pub struct WorkerSet<T> {
    workers: Vec<Worker<T>>,
}

impl<T: Send + 'static> WorkerSet<T> {
    pub fn new() -> Self {
        Self {
            workers: Vec::new(),
        }
    }

    pub fn spawn<F>(&mut self, name: impl Into<String>, span: &Span, f: F) -> CoordResult<()>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        self.workers.push(Worker::spawn(name, span, f)?);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Join every worker, even after one has panicked
    ///
    /// Returns the first panic as an error once all threads are joined.
    pub fn join_all(self) -> CoordResult<Vec<T>> {
        let mut results = Vec::with_capacity(self.workers.len());
        let mut first_error = None;

        for worker in self.workers {
            match worker.join() {
                Ok(value) => results.push(value),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(results),
        }
    }
}

impl<T: Send + 'static> Default for WorkerSet<T> {
    fn default() -> Self {
        Self::new()
    }
}
