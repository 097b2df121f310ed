//! Internal implementation details.

pub(crate) mod blocking;
pub(crate) mod circular;

pub(crate) use blocking::{lock_blocking, wait_for};
pub(crate) use circular::{with_async_guard, ResolutionGuard};
