//! Execution handlers run the tasks of a batch.
//!
//! [`SequentialHandler`] runs every task on the calling thread as it is
//! submitted. [`ParallelHandler`] opens a [`WorkerPool`] of scoped threads
//! which drain a bounded queue, so tasks may borrow the sequences and the
//! algorithm of the caller.

use crossbeam_channel::{Receiver, Sender, bounded};
use log::{debug, trace, warn};
use std::{
    num::NonZeroUsize,
    thread::{Scope, ScopedJoinHandle},
};

/// A type-erased unit of work: one chunk of pairs, the algorithm, and where
/// its results go.
pub type Task<'env> = Box<dyn FnOnce() + Send + 'env>;

/// Runs tasks.
pub trait ExecutionHandler<'env> {
    /// Submits a task. May block while the handler is saturated.
    fn execute(&mut self, task: Task<'env>);

    /// Returns once every submitted task has finished.
    fn wait(&mut self);
}

/// Runs every task immediately on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialHandler;

impl<'env> ExecutionHandler<'env> for SequentialHandler {
    #[inline]
    fn execute(&mut self, task: Task<'env>) {
        task();
    }

    #[inline]
    fn wait(&mut self) {}
}

/// The lifecycle of a [`WorkerPool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolState {
    /// Workers are taking tasks from the queue
    Running,
    /// The queue is closed and the workers finish what is left in it
    Draining,
    /// Every worker has been joined
    Stopped,
}

/// Worker threads draining a bounded task queue within a thread scope.
///
/// Submitting blocks while the queue is full. Shutting the pool down closes
/// the queue, lets the workers finish every queued task and joins them. This
/// happens at the latest when the pool is dropped, and is idempotent.
///
/// Tasks must be submitted from one thread only.
pub struct WorkerPool<'scope, 'env: 'scope> {
    sender:  Option<Sender<Task<'env>>>,
    workers: Vec<ScopedJoinHandle<'scope, ()>>,
    state:   PoolState,
}

impl<'scope, 'env> WorkerPool<'scope, 'env> {
    /// Spawns `threads` workers into `scope`, sharing a queue of `capacity`
    /// tasks.
    #[must_use]
    pub fn new(scope: &'scope Scope<'scope, 'env>, threads: NonZeroUsize, capacity: usize) -> Self {
        let (sender, receiver): (Sender<Task<'env>>, Receiver<Task<'env>>) = bounded(capacity);
        let workers = (0..threads.get())
            .map(|id| {
                let receiver = receiver.clone();
                scope.spawn(move || {
                    trace!("Worker {id} started");
                    while let Ok(task) = receiver.recv() {
                        task();
                    }
                    trace!("Worker {id} finished");
                })
            })
            .collect();
        debug!("Started a worker pool with {threads} threads and a queue of {capacity} tasks");

        WorkerPool {
            sender: Some(sender),
            workers,
            state: PoolState::Running,
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> PoolState {
        self.state
    }

    /// Closes the queue and joins every worker once the queue is drained.
    ///
    /// ## Panics
    ///
    /// Resumes the panic of a task that panicked on a worker.
    pub fn shutdown(&mut self) {
        if self.state == PoolState::Stopped {
            return;
        }
        self.state = PoolState::Draining;
        self.sender = None;

        let mut panic = None;
        for worker in self.workers.drain(..) {
            if let Err(payload) = worker.join() {
                panic.get_or_insert(payload);
            }
        }
        self.state = PoolState::Stopped;
        debug!("Worker pool stopped");

        if let Some(payload) = panic
            && !std::thread::panicking()
        {
            std::panic::resume_unwind(payload);
        }
    }
}

impl<'env> ExecutionHandler<'env> for WorkerPool<'_, 'env> {
    /// Queues `task`, blocking while the queue is full. Once the pool is
    /// shut down, tasks run on the calling thread instead.
    fn execute(&mut self, task: Task<'env>) {
        let task = match &self.sender {
            Some(sender) => match sender.send(task) {
                Ok(()) => return,
                // Every worker has died, so shutting down reports the panic
                Err(returned) => {
                    self.shutdown();
                    returned.into_inner()
                }
            },
            None => task,
        };
        task();
    }

    #[inline]
    fn wait(&mut self) {
        self.shutdown();
    }
}

impl Drop for WorkerPool<'_, '_> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for WorkerPool<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.workers.len())
            .field("state", &self.state)
            .finish()
    }
}

/// Creates a [`WorkerPool`] for the duration of a closure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParallelHandler {
    thread_count: NonZeroUsize,
    capacity:     usize,
}

impl ParallelHandler {
    /// The number of tasks that may wait in the queue.
    pub const DEFAULT_CAPACITY: usize = 10_000;

    #[must_use]
    pub fn new(thread_count: NonZeroUsize) -> Self {
        if let Ok(available) = std::thread::available_parallelism()
            && thread_count > available
        {
            warn!("Using {thread_count} threads, but only {available} are available in parallel");
        }
        ParallelHandler {
            thread_count,
            capacity: Self::DEFAULT_CAPACITY,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    #[inline]
    #[must_use]
    pub fn thread_count(&self) -> NonZeroUsize {
        self.thread_count
    }

    /// Runs `f` with a fresh pool, which is shut down before returning.
    pub fn run<'env, R>(&self, f: impl for<'scope> FnOnce(&mut WorkerPool<'scope, 'env>) -> R) -> R {
        std::thread::scope(|scope| {
            let mut pool = WorkerPool::new(scope, self.thread_count, self.capacity);
            let result = f(&mut pool);
            pool.shutdown();
            result
        })
    }
}
