//! Re-entrant resolution detection.
//!
//! Sync resolution tracks its path in a thread-local stack; async resolution
//! carries it in a task-local so the path survives hops between worker
//! threads. Each side consults the other, since an async producer may call a
//! sync accessor and the reverse.

use std::cell::RefCell;
use std::future::Future;

use crate::error::{DiError, DiResult};

const MAX_DEPTH: usize = 1024;

thread_local! {
    static RESOLUTION_STACK: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
}

tokio::task_local! {
    static ASYNC_PATH: Vec<&'static str>;
}

fn async_path() -> Vec<&'static str> {
    ASYNC_PATH.try_with(|path| path.clone()).unwrap_or_default()
}

fn check(path: &[&'static str], name: &'static str) -> DiResult<()> {
    if path.contains(&name) {
        let mut cycle = path.to_vec();
        cycle.push(name);
        return Err(DiError::Circular(cycle));
    }
    if path.len() >= MAX_DEPTH {
        return Err(DiError::DepthExceeded(path.len()));
    }
    Ok(())
}

/// Marks one type as being resolved on the current thread.
///
/// Entering the same type twice before the first guard drops means the
/// producer graph loops back on itself. Without this check the nested call
/// would wait on a cell or gate its own thread already holds.
pub(crate) struct ResolutionGuard {
    name: &'static str,
}

impl ResolutionGuard {
    pub(crate) fn enter(name: &'static str) -> DiResult<Self> {
        let mut path = async_path();
        RESOLUTION_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            path.extend(stack.iter().copied());
            check(&path, name)?;
            stack.push(name);
            Ok(Self { name })
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLUTION_STACK.with(|stack| {
            let last = stack.borrow_mut().pop();
            debug_assert_eq!(last, Some(self.name));
        });
    }
}

/// Runs `fut` with `name` appended to the task's resolution path.
pub(crate) async fn with_async_guard<T, F>(name: &'static str, fut: F) -> DiResult<T>
where
    F: Future<Output = DiResult<T>>,
{
    let mut path = async_path();
    RESOLUTION_STACK.with(|stack| path.extend(stack.borrow().iter().copied()));
    check(&path, name)?;
    path.push(name);
    ASYNC_PATH.scope(path, fut).await
}
