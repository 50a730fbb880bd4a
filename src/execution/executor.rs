use crate::{
    alignment::{AlignmentAlgorithm, AlignmentResult, OutputSelection},
    execution::{ExecutionHandler, IndexedPair, ParallelHandler, SequentialHandler},
};
use std::{
    num::NonZeroUsize,
    sync::{Mutex, PoisonError},
};

type Bucket<O> = Mutex<Vec<AlignmentResult<O>>>;

/// Splits `pairs` into chunks and submits one task per chunk to `handler`.
/// The results of chunk `i` are written to `buckets[i]`.
fn dispatch<'env, 'a: 'env, O, H>(
    handler: &mut H, algorithm: &'env AlignmentAlgorithm<O>, pairs: &'env [IndexedPair<'a>], chunk_size: usize,
    buckets: &'env [Bucket<O>],
) where
    O: OutputSelection,
    H: ExecutionHandler<'env>, {
    debug_assert_eq!(pairs.len().div_ceil(chunk_size), buckets.len());
    for (chunk, bucket) in pairs.chunks(chunk_size).zip(buckets) {
        handler.execute(Box::new(move || {
            let mut results = Vec::with_capacity(chunk.len());
            algorithm.run(chunk, &mut |result| results.push(result));
            *bucket.lock().unwrap_or_else(PoisonError::into_inner) = results;
        }));
    }
    handler.wait();
}

/// Runs a validated batch with its configured algorithm.
///
/// Sequential batches are computed one chunk at a time as results are
/// pulled. Parallel batches are computed by a worker pool all at once, with
/// every task writing into the bucket of its chunk so that results are still
/// delivered in input order.
pub struct BatchExecutor<'a, O: OutputSelection> {
    pairs:     Vec<IndexedPair<'a>>,
    algorithm: AlignmentAlgorithm<O>,
    /// The first pair not yet computed
    next:      usize,
}

impl<'a, O: OutputSelection> BatchExecutor<'a, O> {
    #[must_use]
    pub fn new(pairs: Vec<IndexedPair<'a>>, algorithm: AlignmentAlgorithm<O>) -> Self {
        BatchExecutor {
            pairs,
            algorithm,
            next: 0,
        }
    }

    /// The number of pairs not yet computed.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pairs.len() - self.next
    }

    #[inline]
    #[must_use]
    pub fn algorithm(&self) -> &AlignmentAlgorithm<O> {
        &self.algorithm
    }

    #[inline]
    fn chunk_size(&self) -> usize {
        self.algorithm.traits().chunk_size.max(1)
    }

    #[inline]
    fn threads(&self) -> Option<NonZeroUsize> {
        self.algorithm.traits().thread_count.and_then(NonZeroUsize::new)
    }

    /// Computes the next results in input order: one chunk when sequential,
    /// or all remaining pairs when parallel. Returns `None` once the batch is
    /// exhausted.
    pub fn next_results(&mut self) -> Option<Vec<AlignmentResult<O>>> {
        if self.next >= self.pairs.len() {
            return None;
        }
        let chunk_size = self.chunk_size();
        let threads = self.threads();
        let pending = match threads {
            Some(_) => &self.pairs[self.next..],
            None => &self.pairs[self.next..(self.next + chunk_size).min(self.pairs.len())],
        };
        self.next += pending.len();

        let buckets: Vec<Bucket<O>> = (0..pending.len().div_ceil(chunk_size))
            .map(|_| Mutex::new(Vec::new()))
            .collect();
        match threads {
            Some(threads) => ParallelHandler::new(threads).run(|pool| {
                dispatch(pool, &self.algorithm, pending, chunk_size, &buckets);
            }),
            None => dispatch(&mut SequentialHandler, &self.algorithm, pending, chunk_size, &buckets),
        }

        Some(
            buckets
                .into_iter()
                .flat_map(|bucket| bucket.into_inner().unwrap_or_else(PoisonError::into_inner))
                .collect(),
        )
    }

    /// Computes every remaining pair and passes each result to `callback`.
    /// When parallel, the callback runs on the worker threads.
    pub fn for_each<F>(self, callback: &F)
    where
        F: Fn(AlignmentResult<O>) + Send + Sync, {
        let pending = &self.pairs[self.next..];
        let chunk_size = self.chunk_size();
        let algorithm = &self.algorithm;

        match self.threads() {
            Some(threads) => ParallelHandler::new(threads).run(|pool| {
                for chunk in pending.chunks(chunk_size) {
                    pool.execute(Box::new(move || algorithm.run(chunk, &mut |result| callback(result))));
                }
                pool.wait();
            }),
            None => {
                for chunk in pending.chunks(chunk_size) {
                    algorithm.run(chunk, &mut |result| callback(result));
                }
            }
        }
    }
}

impl<O: OutputSelection> std::fmt::Debug for BatchExecutor<'_, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchExecutor")
            .field("pairs", &self.pairs.len())
            .field("next", &self.next)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

/// A lazy iterator over the results of a batch, in input order.
///
/// Nothing is computed until the first result is requested.
#[derive(Debug)]
pub struct AlignmentRange<'a, O: OutputSelection> {
    executor: BatchExecutor<'a, O>,
    buffer:   std::vec::IntoIter<AlignmentResult<O>>,
}

impl<'a, O: OutputSelection> AlignmentRange<'a, O> {
    #[inline]
    #[must_use]
    pub fn new(executor: BatchExecutor<'a, O>) -> Self {
        AlignmentRange {
            executor,
            buffer: Vec::new().into_iter(),
        }
    }

    /// The next result, computing more of the batch if the buffer is empty.
    #[inline]
    pub fn next_result(&mut self) -> Option<AlignmentResult<O>> {
        loop {
            if let Some(result) = self.buffer.next() {
                return Some(result);
            }
            self.buffer = self.executor.next_results()?.into_iter();
        }
    }
}

impl<O: OutputSelection> Iterator for AlignmentRange<'_, O> {
    type Item = AlignmentResult<O>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.next_result()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len() + self.executor.remaining();
        (remaining, Some(remaining))
    }
}

impl<O: OutputSelection> ExactSizeIterator for AlignmentRange<'_, O> {}
