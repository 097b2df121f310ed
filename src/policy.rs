//! Registration policy definitions.

use std::fmt;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Registration policies controlling when instances are created and whether
/// they are shared.
///
/// Each policy fixes two things: the creation contract (a plain producer or an
/// async one) and the timing (eagerly at registration, lazily on first
/// request, or on every request).
///
/// | Policy | Created | Shared | Producer |
/// |---|---|---|---|
/// | `Factory` | every request | no | sync |
/// | `Singleton` | at registration | yes | sync |
/// | `LazySingleton` | first request | yes | sync |
/// | `FactoryAsync` | every request | no | async |
/// | `SingletonAsync` | at registration | yes | async |
/// | `LazySingletonAsync` | first request | yes | async |
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::{Registry, RegistrationPolicy};
/// use std::sync::Arc;
///
/// struct Clock { ticks: u64 }
///
/// let registry = Registry::new();
/// let a = registry
///     .get_or_register(RegistrationPolicy::LazySingleton, |_| Ok(Clock { ticks: 1 }))
///     .unwrap();
/// let b = registry.get::<Clock>().unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// assert_eq!(b.ticks, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub enum RegistrationPolicy {
    /// New instance per resolution, never cached.
    #[default]
    Factory,
    /// Created once, immediately when registered.
    Singleton,
    /// Created once, on the first resolution.
    LazySingleton,
    /// New instance per resolution from an awaited producer.
    FactoryAsync,
    /// Awaited once at registration; later reads are synchronous.
    SingletonAsync,
    /// Awaited once on the first resolution.
    LazySingletonAsync,
}

impl RegistrationPolicy {
    /// All policies in declaration order.
    pub const ALL: [RegistrationPolicy; 6] = [
        RegistrationPolicy::Factory,
        RegistrationPolicy::Singleton,
        RegistrationPolicy::LazySingleton,
        RegistrationPolicy::FactoryAsync,
        RegistrationPolicy::SingletonAsync,
        RegistrationPolicy::LazySingletonAsync,
    ];

    /// Whether the producer for this policy is async.
    pub fn is_async(self) -> bool {
        matches!(
            self,
            RegistrationPolicy::FactoryAsync
                | RegistrationPolicy::SingletonAsync
                | RegistrationPolicy::LazySingletonAsync
        )
    }

    /// Whether resolutions share one cached instance.
    pub fn is_shared(self) -> bool {
        !matches!(self, RegistrationPolicy::Factory | RegistrationPolicy::FactoryAsync)
    }

    /// Whether the producer runs at registration time.
    pub fn is_eager(self) -> bool {
        matches!(self, RegistrationPolicy::Singleton | RegistrationPolicy::SingletonAsync)
    }

    /// The sync policy with the same timing and sharing.
    pub fn sync_counterpart(self) -> RegistrationPolicy {
        match self {
            RegistrationPolicy::FactoryAsync => RegistrationPolicy::Factory,
            RegistrationPolicy::SingletonAsync => RegistrationPolicy::Singleton,
            RegistrationPolicy::LazySingletonAsync => RegistrationPolicy::LazySingleton,
            sync => sync,
        }
    }

    /// The async policy with the same timing and sharing.
    pub fn async_counterpart(self) -> RegistrationPolicy {
        match self {
            RegistrationPolicy::Factory => RegistrationPolicy::FactoryAsync,
            RegistrationPolicy::Singleton => RegistrationPolicy::SingletonAsync,
            RegistrationPolicy::LazySingleton => RegistrationPolicy::LazySingletonAsync,
            asynchronous => asynchronous,
        }
    }

    /// Variant name, as written in generated code.
    pub fn as_str(self) -> &'static str {
        match self {
            RegistrationPolicy::Factory => "Factory",
            RegistrationPolicy::Singleton => "Singleton",
            RegistrationPolicy::LazySingleton => "LazySingleton",
            RegistrationPolicy::FactoryAsync => "FactoryAsync",
            RegistrationPolicy::SingletonAsync => "SingletonAsync",
            RegistrationPolicy::LazySingletonAsync => "LazySingletonAsync",
        }
    }
}

impl fmt::Display for RegistrationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
