//! Waiting on async work from a sync caller.

use std::future::Future;

use tokio::runtime::{Builder, Handle, RuntimeFlavor};
use tokio::sync::{Mutex, MutexGuard};

use crate::error::{DiError, DiResult};

/// Drives `fut` to completion from synchronous code.
///
/// Inside a multi-threaded runtime the worker is handed off with
/// `block_in_place`. Outside any runtime a throwaway single-worker runtime
/// runs the future; it is multi-threaded so producers reading further async
/// entries through this same path can block in place too. A current-thread
/// runtime cannot make progress while its only thread is blocked, so that
/// case is an error.
pub(crate) fn wait_for<F: Future>(service: &'static str, fut: F) -> DiResult<F::Output> {
    match Handle::try_current() {
        Ok(handle) => match handle.runtime_flavor() {
            RuntimeFlavor::CurrentThread => Err(DiError::BlockingInAsyncContext(service)),
            _ => Ok(tokio::task::block_in_place(|| handle.block_on(fut))),
        },
        Err(_) => {
            let runtime = Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .map_err(DiError::producer)?;
            Ok(runtime.block_on(fut))
        }
    }
}

/// Acquires a tokio mutex from synchronous code.
pub(crate) fn lock_blocking<'a, T>(
    mutex: &'a Mutex<T>,
    service: &'static str,
) -> DiResult<MutexGuard<'a, T>> {
    if let Ok(guard) = mutex.try_lock() {
        return Ok(guard);
    }
    match Handle::try_current() {
        Ok(_) => wait_for(service, mutex.lock()),
        Err(_) => Ok(mutex.blocking_lock()),
    }
}
