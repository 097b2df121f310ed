//! Observer hooks for registry events.
//!
//! Observers see every registration, producer invocation and reset. They are
//! the registry's logging surface: attach [`LoggingObserver`] during
//! development, or implement [`RegistryObserver`] to forward events to your
//! own tracing pipeline.

use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::key::TypeKey;
use crate::policy::RegistrationPolicy;

/// Observer trait for registry events.
///
/// Calls are made synchronously on the resolving thread. Keep implementations
/// cheap.
///
/// # Examples
///
/// ```
/// use ferrous_autowire::{Registry, RegistryObserver, RegistrationPolicy, TypeKey};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct ProducerCounter(AtomicUsize);
///
/// impl RegistryObserver for ProducerCounter {
///     fn produced(&self, _key: &TypeKey, _duration: Duration) {
///         self.0.fetch_add(1, Ordering::SeqCst);
///     }
/// }
///
/// let counter = Arc::new(ProducerCounter::default());
/// let registry = Registry::builder().add_observer(counter.clone()).build();
/// registry.get_or_register(RegistrationPolicy::Factory, |_| Ok(1u32)).unwrap();
/// registry.get::<u32>().unwrap();
/// assert_eq!(counter.0.load(Ordering::SeqCst), 2);
/// ```
pub trait RegistryObserver: Send + Sync {
    /// An entry moved out of `Unregistered`.
    fn registered(&self, key: &TypeKey, policy: RegistrationPolicy) {
        let _ = (key, policy);
    }

    /// A producer is about to run.
    fn producing(&self, key: &TypeKey) {
        let _ = key;
    }

    /// A producer returned an instance.
    fn produced(&self, key: &TypeKey, duration: Duration) {
        let _ = (key, duration);
    }

    /// A producer returned an error.
    fn producer_failed(&self, key: &TypeKey, error: &DiError) {
        let _ = (key, error);
    }

    /// `reset()` dropped `entries` registrations.
    fn reset(&self, entries: usize) {
        let _ = entries;
    }
}

/// Registered observers.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn RegistryObserver>>,
}

impl Observers {
    pub(crate) fn new(observers: Vec<Arc<dyn RegistryObserver>>) -> Self {
        Self { observers }
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn registered(&self, key: &TypeKey, policy: RegistrationPolicy) {
        for observer in &self.observers {
            observer.registered(key, policy);
        }
    }

    #[inline]
    pub(crate) fn producing(&self, key: &TypeKey) {
        for observer in &self.observers {
            observer.producing(key);
        }
    }

    #[inline]
    pub(crate) fn produced(&self, key: &TypeKey, duration: Duration) {
        for observer in &self.observers {
            observer.produced(key, duration);
        }
    }

    #[inline]
    pub(crate) fn producer_failed(&self, key: &TypeKey, error: &DiError) {
        for observer in &self.observers {
            observer.producer_failed(key, error);
        }
    }

    #[inline]
    pub(crate) fn reset(&self, entries: usize) {
        for observer in &self.observers {
            observer.reset(entries);
        }
    }
}

/// Built-in observer that logs events to stdout.
///
/// Failures go to stderr.
///
/// # Examples
///
/// ```
/// use ferrous_autowire::{LoggingObserver, Registry};
/// use std::sync::Arc;
///
/// let registry = Registry::builder()
///     .add_observer(Arc::new(LoggingObserver::with_prefix("[app]")))
///     .build();
/// assert!(registry.is_empty());
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    /// Creates a logging observer with the default prefix.
    pub fn new() -> Self {
        Self {
            prefix: "[ferrous-autowire]".to_string(),
        }
    }

    /// Creates a logging observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryObserver for LoggingObserver {
    fn registered(&self, key: &TypeKey, policy: RegistrationPolicy) {
        println!("{} Registered: {} as {}", self.prefix, key.display_name(), policy);
    }

    fn producing(&self, key: &TypeKey) {
        println!("{} Producing: {}", self.prefix, key.display_name());
    }

    fn produced(&self, key: &TypeKey, duration: Duration) {
        println!("{} Produced: {} in {:?}", self.prefix, key.display_name(), duration);
    }

    fn producer_failed(&self, key: &TypeKey, error: &DiError) {
        eprintln!("{} PRODUCER FAILED for {}: {}", self.prefix, key.display_name(), error);
    }

    fn reset(&self, entries: usize) {
        println!("{} Reset: {} entries cleared", self.prefix, entries);
    }
}
