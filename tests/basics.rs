use ferrous_autowire::{DiError, EntryPoint, EntryState, Registry, RegistrationPolicy};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ===== Test Services =====

#[derive(Debug)]
struct Service {
    id: usize,
}

#[derive(Debug)]
struct Label(&'static str);

fn counting(calls: &Arc<AtomicUsize>) -> impl Fn(&Registry) -> ferrous_autowire::DiResult<Service> + Send + Sync {
    let calls = calls.clone();
    move |_| {
        Ok(Service {
            id: calls.fetch_add(1, Ordering::SeqCst),
        })
    }
}

// ===== Sync Policies =====

#[test]
fn test_factory_returns_fresh_instances() {
    let registry = Registry::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let a = registry
        .get_or_register(RegistrationPolicy::Factory, counting(&calls))
        .unwrap();
    let b = registry.get::<Service>().unwrap();
    let c = registry.get::<Service>().unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&b, &c));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_ne!(a.id, b.id);
}

#[test]
fn test_singleton_runs_producer_at_registration() {
    let registry = Registry::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let a = registry
        .get_or_register(RegistrationPolicy::Singleton, counting(&calls))
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let b = registry.get::<Service>().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_lazy_singleton_defers_until_first_resolution() {
    let registry = Registry::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let a = registry
        .get_or_register(RegistrationPolicy::LazySingleton, counting(&calls))
        .unwrap();
    let b = registry.get::<Service>().unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(registry.state::<Service>(), EntryState::RegisteredSync);
}

// ===== Async Policies =====

#[tokio::test]
async fn test_factory_async_returns_fresh_instances() {
    let registry = Registry::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let a = registry
        .get_or_register_async(RegistrationPolicy::FactoryAsync, move |_| {
            let id = counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok(Service { id }) }
        })
        .await
        .unwrap();
    let b = registry.get_async::<Service>().await.unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(registry.state::<Service>(), EntryState::RegisteredAsyncPending);
}

#[tokio::test]
async fn test_singleton_async_is_visible_to_sync_readers() {
    let registry = Registry::new();

    let a = registry
        .get_or_register_async(RegistrationPolicy::SingletonAsync, |_| async { Ok(Service { id: 7 }) })
        .await
        .unwrap();
    assert_eq!(registry.state::<Service>(), EntryState::RegisteredAsyncResolved);

    // Resolved already, so the sync read never blocks, even on this
    // current-thread runtime.
    let b = registry.get::<Service>().unwrap();
    let c = registry.get_async::<Service>().await.unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&b, &c));
}

#[tokio::test]
async fn test_lazy_singleton_async_caches_first_result() {
    let registry = Registry::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let a = registry
        .get_or_register_async(RegistrationPolicy::LazySingletonAsync, move |_| {
            let id = counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok(Service { id }) }
        })
        .await
        .unwrap();
    let b = registry.get_async::<Service>().await.unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(registry.state::<Service>(), EntryState::RegisteredAsyncResolved);
}

// ===== Idempotent Registration =====

#[test]
fn test_first_registration_wins() {
    let registry = Registry::new();
    let second_ran = Arc::new(AtomicUsize::new(0));
    let flag = second_ran.clone();

    let first = registry
        .get_or_register(RegistrationPolicy::Singleton, |_| Ok(Label("first")))
        .unwrap();
    let second = registry
        .get_or_register(RegistrationPolicy::Singleton, move |_| {
            flag.fetch_add(1, Ordering::SeqCst);
            Ok(Label("second"))
        })
        .unwrap();

    assert_eq!(first.0, "first");
    assert_eq!(second.0, "first");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second_ran.load(Ordering::SeqCst), 0);
}

#[test]
fn test_existing_registration_keeps_its_policy() {
    let registry = Registry::new();
    registry
        .get_or_register(RegistrationPolicy::Singleton, |_| Ok(Label("first")))
        .unwrap();

    // A later Factory registration resolves through the existing Singleton.
    let a = registry
        .get_or_register(RegistrationPolicy::Factory, |_| Ok(Label("second")))
        .unwrap();
    let b = registry
        .get_or_register(RegistrationPolicy::Factory, |_| Ok(Label("second")))
        .unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(registry.policy_of::<Label>(), Some(RegistrationPolicy::Singleton));
}

// ===== Policy Mismatch =====

#[test]
fn test_async_policy_through_sync_entry_point_fails() {
    let registry = Registry::new();
    for policy in RegistrationPolicy::ALL.into_iter().filter(|p| p.is_async()) {
        let err = registry.get_or_register(policy, |_| Ok(Label("x"))).unwrap_err();
        match err {
            DiError::PolicyMismatch {
                policy: reported,
                entry_point,
                ..
            } => {
                assert_eq!(reported, policy);
                assert_eq!(entry_point, EntryPoint::Sync);
            }
            other => panic!("expected policy mismatch, got {}", other),
        }
    }
    assert!(!registry.contains::<Label>());
}

#[tokio::test]
async fn test_sync_policy_through_async_entry_point_fails() {
    let registry = Registry::new();
    for policy in RegistrationPolicy::ALL.into_iter().filter(|p| !p.is_async()) {
        let err = registry
            .get_or_register_async(policy, |_| async { Ok(Label("x")) })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DiError::PolicyMismatch {
                entry_point: EntryPoint::Async,
                ..
            }
        ));
    }
    assert_eq!(registry.state::<Label>(), EntryState::Unregistered);
}

// ===== Reads, Failures and Reset =====

#[test]
fn test_get_unregistered_fails() {
    let registry = Registry::new();
    match registry.get::<Service>() {
        Err(DiError::NotRegistered(name)) => assert!(name.contains("Service")),
        other => panic!("expected NotRegistered, got {:?}", other.map(|s| s.id)),
    }
}

#[test]
fn test_producer_error_propagates() {
    let registry = Registry::new();
    let err = registry
        .get_or_register::<Service, _>(RegistrationPolicy::LazySingleton, |_| {
            Err(DiError::producer("connection refused"))
        })
        .unwrap_err();
    assert_eq!(err, DiError::Producer("connection refused".to_string()));

    // The registration stands; the cell stays empty and the next read retries.
    assert!(registry.contains::<Service>());
    assert!(registry.get::<Service>().is_err());
}

#[test]
fn test_reset_returns_singletons_to_unregistered() {
    let registry = Registry::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let before = registry
        .get_or_register(RegistrationPolicy::Singleton, counting(&calls))
        .unwrap();
    assert_eq!(registry.len(), 1);

    registry.reset();
    assert_eq!(registry.state::<Service>(), EntryState::Unregistered);
    assert!(registry.is_empty());

    let after = registry
        .get_or_register(RegistrationPolicy::Singleton, counting(&calls))
        .unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_clones_share_entries() {
    let registry = Registry::new();
    let clone = registry.clone();
    registry
        .get_or_register(RegistrationPolicy::Singleton, |_| Ok(Label("shared")))
        .unwrap();

    assert!(clone.contains::<Label>());
    assert_eq!(clone.get::<Label>().unwrap().0, "shared");
}
