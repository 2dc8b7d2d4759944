//! Fork-join helpers shared by the kernels.

use crate::error::KernelResult;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::marker::PhantomData;

/// Fixed-size rayon pool. Zero requested threads means one worker.
pub struct WorkerPool {
    pool: ThreadPool,
    threads: usize,
}

impl WorkerPool {
    pub fn new(threads: usize) -> KernelResult<Self> {
        let threads = threads.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("gp-kernel-{}", i))
            .build()?;
        log::debug!("Worker pool ready with {} threads", threads);
        Ok(Self { pool, threads })
    }

    pub fn single() -> KernelResult<Self> {
        Self::new(1)
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Contiguous chunk length for `items` work items: `max(items / threads / 16, 1)`.
    #[inline]
    pub fn chunk_size(&self, items: usize) -> usize {
        (items / self.threads / 16).max(1)
    }

    /// Runs `op` inside the pool so nested rayon iterators use its workers.
    pub fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        self.pool.install(op)
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("threads", &self.threads)
            .finish()
    }
}

/// Shared write handle over a slice whose elements are written by at most
/// one work item each.
///
/// Used for scatter writes indexed through the net CSR arrays, where a
/// validated topology ensures no pin is reachable from two nets.
pub struct DisjointSlice<'a, T> {
    ptr: *mut T,
    len: usize,
    _marker: PhantomData<&'a mut [T]>,
}

unsafe impl<T: Send> Send for DisjointSlice<'_, T> {}
unsafe impl<T: Send> Sync for DisjointSlice<'_, T> {}

impl<'a, T> DisjointSlice<'a, T> {
    pub fn new(slice: &'a mut [T]) -> Self {
        Self {
            ptr: slice.as_mut_ptr(),
            len: slice.len(),
            _marker: PhantomData,
        }
    }

    /// # Safety
    /// No other work item may read or write index `i` while this one runs.
    #[inline(always)]
    pub unsafe fn write(&self, i: usize, value: T) {
        assert!(i < self.len, "index {} out of bounds ({})", i, self.len);
        unsafe { *self.ptr.add(i) = value };
    }

    /// # Safety
    /// Same exclusivity requirement as [`DisjointSlice::write`].
    #[inline(always)]
    pub unsafe fn update(&self, i: usize, f: impl FnOnce(&mut T)) {
        assert!(i < self.len, "index {} out of bounds ({})", i, self.len);
        unsafe { f(&mut *self.ptr.add(i)) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn zero_threads_falls_back_to_one() {
        let pool = WorkerPool::new(0).unwrap();
        assert_eq!(pool.threads(), 1);
        assert_eq!(pool.install(rayon::current_num_threads), 1);
    }

    #[test]
    fn chunk_size_never_zero() {
        let pool = WorkerPool::new(4).unwrap();
        assert_eq!(pool.chunk_size(0), 1);
        assert_eq!(pool.chunk_size(10), 1);
        assert_eq!(pool.chunk_size(6400), 100);
    }

    #[test]
    fn disjoint_scatter_writes_every_slot() {
        let pool = WorkerPool::new(3).unwrap();
        let mut out = vec![0usize; 1000];
        let perm: Vec<usize> = (0..1000).map(|i| (i * 7) % 1000).collect();
        {
            let shared = DisjointSlice::new(&mut out);
            pool.install(|| {
                perm.par_iter().enumerate().for_each(|(i, &p)| {
                    // perm is a bijection, so each slot has one writer
                    unsafe { shared.write(p, i) };
                })
            });
        }
        for (i, &p) in perm.iter().enumerate() {
            assert_eq!(out[p], i);
        }
    }
}
