//! # ferrous-autowire
//!
//! Generated dependency accessors backed by a lazy, thread-safe service registry.
//!
//! ## Features
//!
//! - **Six registration policies**: eager, lazy and per-call creation, each in a sync and an async flavor
//! - **Idempotent registration**: the first registration for a type wins, later producers never run
//! - **Single-flight creation**: concurrent first resolutions of one entry invoke the producer once
//! - **Accessor generation**: annotated classes become accessor functions that wire their own dependencies
//! - **Circular dependency detection**: re-entrant resolution fails with the full path instead of deadlocking
//!
//! ## Quick Start
//!
//! Accessors are normally generated (see [`codegen`]); this one is written by
//! hand in the same shape.
//!
//! ```rust
//! use ferrous_autowire::{Autowired, DiResult, Registry, RegistrationPolicy};
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! fn database(registry: &Registry) -> DiResult<Arc<Database>> {
//!     registry.get_or_register(RegistrationPolicy::Singleton, |_: &Registry| {
//!         Ok(Database { url: String::from("postgres://localhost") })
//!     })
//! }
//!
//! impl Autowired for Database {
//!     const POLICY: RegistrationPolicy = RegistrationPolicy::Singleton;
//!
//!     fn autowire(registry: &Registry) -> DiResult<Arc<Self>> {
//!         database(registry)
//!     }
//! }
//!
//! fn user_service(registry: &Registry) -> DiResult<Arc<UserService>> {
//!     registry.get_or_register(RegistrationPolicy::Factory, |registry: &Registry| {
//!         Ok(UserService { db: registry.resolve::<Database>()? })
//!     })
//! }
//!
//! let registry = Registry::new();
//! let a = user_service(&registry).unwrap();
//! let b = user_service(&registry).unwrap();
//! assert!(!Arc::ptr_eq(&a, &b));
//! assert!(Arc::ptr_eq(&a.db, &b.db));
//! assert_eq!(a.db.url, "postgres://localhost");
//! ```
//!
//! ## Registration Policies
//!
//! - **Factory** / **FactoryAsync**: a fresh instance on every resolution
//! - **Singleton** / **SingletonAsync**: created once at registration and shared
//! - **LazySingleton** / **LazySingletonAsync**: created on first resolution and shared
//!
//! Sync policies go through [`Registry::get_or_register`], async ones through
//! [`Registry::get_or_register_async`]. Crossing them is a
//! [`DiError::PolicyMismatch`].
//!
//! ## Async Services
//!
//! ```rust
//! use ferrous_autowire::{Registry, RegistrationPolicy};
//!
//! struct Pool {
//!     size: usize,
//! }
//!
//! # #[tokio::main]
//! # async fn main() {
//! let registry = Registry::new();
//! let pool = registry
//!     .get_or_register_async(RegistrationPolicy::SingletonAsync, |_| async {
//!         Ok(Pool { size: 4 })
//!     })
//!     .await
//!     .unwrap();
//! assert_eq!(pool.size, 4);
//! assert_eq!(registry.get_async::<Pool>().await.unwrap().size, 4);
//! # }
//! ```
//!
//! ## Observability
//!
//! Attach a [`RegistryObserver`] (for example [`LoggingObserver`]) through
//! [`Registry::builder`] to see registrations and producer runs.

pub mod codegen;
pub mod config;
pub mod error;
pub mod key;
pub mod observer;
pub mod policy;
pub mod registry;

mod internal;

pub use codegen::{BuildPass, GenerationReport, Generator};
pub use config::{ConfigError, GeneratorConfig};
pub use error::{DiError, DiResult, EmitError, EntryPoint, GenerationError};
pub use key::{key_of_type, TypeKey};
pub use observer::{LoggingObserver, RegistryObserver};
pub use policy::RegistrationPolicy;
pub use registry::{Autowired, AutowiredAsync, EntryState, Registry, RegistryBuilder};

// Generated async accessors name the attribute through this crate.
pub use async_trait::async_trait;
