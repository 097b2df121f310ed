//! The lazy service registry driven by generated accessors.
//!
//! A [`Registry`] maps each type to at most one registration. The first
//! registration for a type wins; later attempts get the existing resolution
//! and their producers are dropped without running. Producers for one entry
//! run at most once per creation the policy calls for, no matter how many
//! threads or tasks race on it.

mod entry;

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{DiError, DiResult, EntryPoint};
use crate::internal::{lock_blocking, with_async_guard, ResolutionGuard};
use crate::key::{key_of_type, TypeKey};
use crate::observer::{Observers, RegistryObserver};
use crate::policy::RegistrationPolicy;

pub use entry::EntryState;
pub(crate) use entry::{AnyArc, AsyncProducer, BoxFuture, EntrySlot, RegistryEntry, Resolution, SyncProducer};

/// A type whose accessor resolves it through the sync registry path.
///
/// Generated accessors implement this so dependants can reach them by type
/// with [`Registry::resolve`].
pub trait Autowired: Send + Sync + Sized + 'static {
    /// Policy the accessor registers with.
    const POLICY: RegistrationPolicy;

    /// Resolves (registering on first use) the shared or fresh instance.
    fn autowire(registry: &Registry) -> DiResult<Arc<Self>>;
}

/// A type whose accessor resolves it through the async registry path.
#[async_trait]
pub trait AutowiredAsync: Send + Sync + Sized + 'static {
    /// Policy the accessor registers with.
    const POLICY: RegistrationPolicy;

    /// Resolves (registering on first use) the shared or fresh instance.
    async fn autowire_async(registry: &Registry) -> DiResult<Arc<Self>>;
}

/// Service registry with six lifecycle policies.
///
/// Cloning is cheap and every clone shares the same entries, which is how
/// async producers receive the registry by value.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::{Registry, RegistrationPolicy};
/// use std::sync::Arc;
///
/// struct Config { port: u16 }
/// struct Server { config: Arc<Config> }
///
/// let registry = Registry::new();
/// registry
///     .get_or_register(RegistrationPolicy::Singleton, |_| Ok(Config { port: 8080 }))
///     .unwrap();
///
/// let server = registry
///     .get_or_register(RegistrationPolicy::Factory, |r| {
///         Ok(Server { config: r.get::<Config>()? })
///     })
///     .unwrap();
/// assert_eq!(server.config.port, 8080);
/// ```
#[derive(Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

struct RegistryInner {
    slots: RwLock<HashMap<TypeKey, Arc<EntrySlot>>>,
    observers: Observers,
}

impl Registry {
    /// Creates an empty registry without observers.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts a builder for attaching observers.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Sync entry point: registers `T` if needed and resolves it.
    ///
    /// - `Singleton` runs `producer` now and caches the instance.
    /// - `LazySingleton` runs it on the first resolution and caches.
    /// - `Factory` runs it on every resolution.
    ///
    /// If `T` is already registered, `producer` and `policy` are ignored and
    /// the existing registration resolves. Async policies fail with
    /// [`DiError::PolicyMismatch`].
    pub fn get_or_register<T, F>(&self, policy: RegistrationPolicy, producer: F) -> DiResult<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: Fn(&Registry) -> DiResult<T> + Send + Sync + 'static,
    {
        let key = key_of_type::<T>();
        if policy.is_async() {
            return Err(DiError::PolicyMismatch {
                service: key.display_name(),
                policy,
                entry_point: EntryPoint::Sync,
            });
        }

        let _guard = ResolutionGuard::enter(key.display_name())?;
        let slot = self.slot(key);
        let entry = match slot.registered() {
            Some(entry) => entry,
            None => {
                let producer: SyncProducer =
                    Arc::new(move |registry: &Registry| producer(registry).map(|value| Arc::new(value) as AnyArc));
                self.register_sync(&slot, key, policy, producer)?
            }
        };
        downcast(&key, entry.resolve(self)?)
    }

    /// Async entry point: registers `T` if needed and resolves it.
    ///
    /// - `SingletonAsync` awaits `producer` now; afterwards both [`get`] and
    ///   [`get_async`] return the cached instance without waiting.
    /// - `LazySingletonAsync` awaits it on the first resolution and caches.
    /// - `FactoryAsync` awaits it on every resolution.
    ///
    /// If `T` is already registered the existing registration resolves. Sync
    /// policies fail with [`DiError::PolicyMismatch`].
    ///
    /// [`get`]: Registry::get
    /// [`get_async`]: Registry::get_async
    pub async fn get_or_register_async<T, F, Fut>(
        &self,
        policy: RegistrationPolicy,
        producer: F,
    ) -> DiResult<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: Fn(Registry) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = DiResult<T>> + Send + 'static,
    {
        let key = key_of_type::<T>();
        if !policy.is_async() {
            return Err(DiError::PolicyMismatch {
                service: key.display_name(),
                policy,
                entry_point: EntryPoint::Async,
            });
        }

        with_async_guard(key.display_name(), async {
            let slot = self.slot(key);
            let entry = match slot.registered() {
                Some(entry) => entry,
                None => {
                    let producer: AsyncProducer = Arc::new(move |registry: Registry| {
                        let fut = producer(registry);
                        Box::pin(async move { fut.await.map(|value| Arc::new(value) as AnyArc) })
                            as BoxFuture<DiResult<AnyArc>>
                    });
                    self.register_async(&slot, key, policy, producer).await?
                }
            };
            downcast(&key, entry.resolve_async(self).await?)
        })
        .await
    }

    /// Resolves an already-registered `T` without registering.
    ///
    /// Blocks until a pending async producer finishes.
    pub fn get<T: Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        let key = key_of_type::<T>();
        let _guard = ResolutionGuard::enter(key.display_name())?;
        let entry = self.entry(&key).ok_or(DiError::NotRegistered(key.display_name()))?;
        downcast(&key, entry.resolve(self)?)
    }

    /// Resolves an already-registered `T` without registering.
    pub async fn get_async<T: Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        let key = key_of_type::<T>();
        with_async_guard(key.display_name(), async {
            let entry = self.entry(&key).ok_or(DiError::NotRegistered(key.display_name()))?;
            downcast(&key, entry.resolve_async(self).await?)
        })
        .await
    }

    /// Resolves `T` through its generated accessor.
    pub fn resolve<T: Autowired>(&self) -> DiResult<Arc<T>> {
        T::autowire(self)
    }

    /// Resolves `T` through its generated async accessor.
    pub async fn resolve_async<T: AutowiredAsync>(&self) -> DiResult<Arc<T>> {
        T::autowire_async(self).await
    }

    /// Current state of `T`'s entry.
    pub fn state<T: 'static>(&self) -> EntryState {
        self.entry(&key_of_type::<T>())
            .map(|entry| entry.state())
            .unwrap_or(EntryState::Unregistered)
    }

    /// Policy `T` was registered with, if any.
    pub fn policy_of<T: 'static>(&self) -> Option<RegistrationPolicy> {
        self.entry(&key_of_type::<T>()).map(|entry| entry.policy)
    }

    /// Whether `T` is registered.
    pub fn contains<T: 'static>(&self) -> bool {
        self.entry(&key_of_type::<T>()).is_some()
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.inner
            .slots
            .read()
            .values()
            .filter(|slot| slot.registered().is_some())
            .count()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry, returning all types to `Unregistered`.
    ///
    /// Meant for test teardown. Resolutions already in flight finish against
    /// the entries they started with.
    pub fn reset(&self) {
        let cleared = {
            let mut slots = self.inner.slots.write();
            let registered = slots.values().filter(|slot| slot.registered().is_some()).count();
            slots.clear();
            registered
        };
        self.inner.observers.reset(cleared);
    }

    fn slot(&self, key: TypeKey) -> Arc<EntrySlot> {
        if let Some(slot) = self.inner.slots.read().get(&key) {
            return slot.clone();
        }
        self.inner.slots.write().entry(key).or_default().clone()
    }

    fn entry(&self, key: &TypeKey) -> Option<Arc<RegistryEntry>> {
        self.inner.slots.read().get(key).and_then(|slot| slot.registered())
    }

    fn register_sync(
        &self,
        slot: &EntrySlot,
        key: TypeKey,
        policy: RegistrationPolicy,
        producer: SyncProducer,
    ) -> DiResult<Arc<RegistryEntry>> {
        let _gate = lock_blocking(&slot.gate, key.display_name())?;
        if let Some(existing) = slot.registered() {
            return Ok(existing);
        }

        let resolution = match policy {
            RegistrationPolicy::Factory => Resolution::Factory(producer),
            RegistrationPolicy::Singleton => Resolution::Singleton(self.run_sync(&key, &producer)?),
            RegistrationPolicy::LazySingleton => Resolution::LazySingleton {
                producer,
                instance: Default::default(),
            },
            asynchronous => {
                return Err(DiError::PolicyMismatch {
                    service: key.display_name(),
                    policy: asynchronous,
                    entry_point: EntryPoint::Sync,
                })
            }
        };
        Ok(self.publish(slot, RegistryEntry { key, policy, resolution }))
    }

    async fn register_async(
        &self,
        slot: &EntrySlot,
        key: TypeKey,
        policy: RegistrationPolicy,
        producer: AsyncProducer,
    ) -> DiResult<Arc<RegistryEntry>> {
        let _gate = slot.gate.lock().await;
        if let Some(existing) = slot.registered() {
            return Ok(existing);
        }

        let resolution = match policy {
            RegistrationPolicy::FactoryAsync => Resolution::FactoryAsync(producer),
            RegistrationPolicy::SingletonAsync => {
                Resolution::SingletonAsync(self.run_async(&key, &producer).await?)
            }
            RegistrationPolicy::LazySingletonAsync => Resolution::LazySingletonAsync {
                producer,
                instance: Default::default(),
            },
            synchronous => {
                return Err(DiError::PolicyMismatch {
                    service: key.display_name(),
                    policy: synchronous,
                    entry_point: EntryPoint::Async,
                })
            }
        };
        Ok(self.publish(slot, RegistryEntry { key, policy, resolution }))
    }

    // Caller holds the slot gate, so the cell is still empty.
    fn publish(&self, slot: &EntrySlot, entry: RegistryEntry) -> Arc<RegistryEntry> {
        let (key, policy) = (entry.key, entry.policy);
        let entry = slot.entry.get_or_init(|| Arc::new(entry)).clone();
        self.inner.observers.registered(&key, policy);
        entry
    }

    pub(crate) fn run_sync(&self, key: &TypeKey, producer: &SyncProducer) -> DiResult<AnyArc> {
        let observers = &self.inner.observers;
        if !observers.has_observers() {
            return producer(self);
        }

        observers.producing(key);
        let started = Instant::now();
        let result = producer(self);
        match &result {
            Ok(_) => observers.produced(key, started.elapsed()),
            Err(err) => observers.producer_failed(key, err),
        }
        result
    }

    pub(crate) async fn run_async(&self, key: &TypeKey, producer: &AsyncProducer) -> DiResult<AnyArc> {
        let observers = &self.inner.observers;
        if !observers.has_observers() {
            return producer(self.clone()).await;
        }

        observers.producing(key);
        let started = Instant::now();
        let result = producer(self.clone()).await;
        match &result {
            Ok(_) => observers.produced(key, started.elapsed()),
            Err(err) => observers.producer_failed(key, err),
        }
        result
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("entries", &self.len())
            .finish()
    }
}

/// Builder for a [`Registry`] with observers attached.
#[derive(Default)]
pub struct RegistryBuilder {
    observers: Vec<Arc<dyn RegistryObserver>>,
}

impl RegistryBuilder {
    /// Adds an observer that sees every registry event.
    pub fn add_observer(mut self, observer: Arc<dyn RegistryObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Builds the registry.
    pub fn build(self) -> Registry {
        Registry {
            inner: Arc::new(RegistryInner {
                slots: RwLock::new(HashMap::new()),
                observers: Observers::new(self.observers),
            }),
        }
    }
}

fn downcast<T: Send + Sync + 'static>(key: &TypeKey, instance: AnyArc) -> DiResult<Arc<T>> {
    instance
        .downcast::<T>()
        .map_err(|_| DiError::TypeMismatch(key.display_name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Widget(usize);

    #[test]
    fn lazy_singleton_caches_first_resolution() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = Registry::new();
        let counter = calls.clone();

        let first = registry
            .get_or_register(RegistrationPolicy::LazySingleton, move |_| {
                Ok(Widget(counter.fetch_add(1, Ordering::SeqCst)))
            })
            .unwrap();
        let second = registry.get::<Widget>().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(registry.state::<Widget>(), EntryState::RegisteredSync);
    }

    #[test]
    fn failed_eager_registration_leaves_type_unregistered() {
        let registry = Registry::new();
        let err = registry
            .get_or_register::<Widget, _>(RegistrationPolicy::Singleton, |_| Err(DiError::producer("boom")))
            .unwrap_err();

        assert_eq!(err, DiError::Producer("boom".to_string()));
        assert_eq!(registry.state::<Widget>(), EntryState::Unregistered);
        assert!(registry.is_empty());
    }

    #[test]
    fn self_dependency_is_reported_as_circular() {
        let registry = Registry::new();
        let result = registry.get_or_register(RegistrationPolicy::Singleton, |r| {
            r.get_or_register(RegistrationPolicy::Singleton, |_| Ok(Widget(0)))
                .map(|inner| Widget(inner.0 + 1))
        });

        match result {
            Err(DiError::Circular(path)) => {
                assert_eq!(path.len(), 2);
                assert!(path[0].contains("Widget"));
            }
            other => panic!("expected circular error, got {:?}", other.map(|w| w.0)),
        }
    }

    #[test]
    fn policy_of_reports_first_registration() {
        let registry = Registry::new();
        registry
            .get_or_register(RegistrationPolicy::Factory, |_| Ok(Widget(1)))
            .unwrap();
        registry
            .get_or_register(RegistrationPolicy::Singleton, |_| Ok(Widget(2)))
            .unwrap();
        assert_eq!(registry.policy_of::<Widget>(), Some(RegistrationPolicy::Factory));
        assert_eq!(registry.len(), 1);
    }
}
