//! Registry entries and their resolution state machine.

use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::DiResult;
use crate::internal::wait_for;
use crate::key::TypeKey;
use crate::policy::RegistrationPolicy;
use crate::registry::Registry;

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

pub(crate) type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

pub(crate) type SyncProducer = Arc<dyn Fn(&Registry) -> DiResult<AnyArc> + Send + Sync>;

pub(crate) type AsyncProducer = Arc<dyn Fn(Registry) -> BoxFuture<DiResult<AnyArc>> + Send + Sync>;

/// Observable state of one type key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// No registration exists.
    Unregistered,
    /// Registered with a sync policy.
    RegisteredSync,
    /// Registered with an async policy and no cached instance yet.
    ///
    /// `FactoryAsync` entries stay here for good; every resolution awaits
    /// the producer again.
    RegisteredAsyncPending,
    /// Registered with an async policy and the instance is cached.
    RegisteredAsyncResolved,
}

/// What an entry holds for its policy.
pub(crate) enum Resolution {
    Factory(SyncProducer),
    Singleton(AnyArc),
    LazySingleton {
        producer: SyncProducer,
        instance: OnceCell<AnyArc>,
    },
    FactoryAsync(AsyncProducer),
    SingletonAsync(AnyArc),
    LazySingletonAsync {
        producer: AsyncProducer,
        instance: tokio::sync::OnceCell<AnyArc>,
    },
}

/// One registration: a key bound to its policy and producer.
pub(crate) struct RegistryEntry {
    pub(crate) key: TypeKey,
    pub(crate) policy: RegistrationPolicy,
    pub(crate) resolution: Resolution,
}

impl RegistryEntry {
    pub(crate) fn state(&self) -> EntryState {
        match &self.resolution {
            Resolution::Factory(_) | Resolution::Singleton(_) | Resolution::LazySingleton { .. } => {
                EntryState::RegisteredSync
            }
            Resolution::FactoryAsync(_) => EntryState::RegisteredAsyncPending,
            Resolution::SingletonAsync(_) => EntryState::RegisteredAsyncResolved,
            Resolution::LazySingletonAsync { instance, .. } => {
                if instance.initialized() {
                    EntryState::RegisteredAsyncResolved
                } else {
                    EntryState::RegisteredAsyncPending
                }
            }
        }
    }

    /// Sync read. Blocks on async producers that have not resolved yet.
    ///
    /// The caller holds the `ResolutionGuard` for this key.
    pub(crate) fn resolve(&self, registry: &Registry) -> DiResult<AnyArc> {
        let name = self.key.display_name();
        match &self.resolution {
            Resolution::Factory(producer) => registry.run_sync(&self.key, producer),
            Resolution::Singleton(instance) | Resolution::SingletonAsync(instance) => Ok(instance.clone()),
            Resolution::LazySingleton { producer, instance } => instance
                .get_or_try_init(|| registry.run_sync(&self.key, producer))
                .cloned(),
            Resolution::FactoryAsync(producer) => {
                wait_for(name, registry.run_async(&self.key, producer)).and_then(|result| result)
            }
            Resolution::LazySingletonAsync { producer, instance } => {
                if let Some(cached) = instance.get() {
                    return Ok(cached.clone());
                }
                let init = instance.get_or_try_init(|| registry.run_async(&self.key, producer));
                wait_for(name, init).and_then(|result| result.cloned())
            }
        }
    }

    /// Async read. Sync policies resolve inline.
    ///
    /// The caller runs this inside `with_async_guard` for this key.
    pub(crate) async fn resolve_async(&self, registry: &Registry) -> DiResult<AnyArc> {
        match &self.resolution {
            Resolution::FactoryAsync(producer) => registry.run_async(&self.key, producer).await,
            Resolution::SingletonAsync(instance) => Ok(instance.clone()),
            Resolution::LazySingletonAsync { producer, instance } => instance
                .get_or_try_init(|| registry.run_async(&self.key, producer))
                .await
                .cloned(),
            _ => self.resolve(registry),
        }
    }
}

/// Per-key storage.
///
/// `entry` is written only while `gate` is held, so a filled cell is final
/// and readers never take the gate.
#[derive(Default)]
pub(crate) struct EntrySlot {
    pub(crate) entry: OnceCell<Arc<RegistryEntry>>,
    pub(crate) gate: tokio::sync::Mutex<()>,
}

impl EntrySlot {
    pub(crate) fn registered(&self) -> Option<Arc<RegistryEntry>> {
        self.entry.get().cloned()
    }
}
