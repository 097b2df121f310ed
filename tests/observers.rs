use ferrous_autowire::{DiError, LoggingObserver, Registry, RegistryObserver, RegistrationPolicy, TypeKey};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }
}

impl RegistryObserver for Recorder {
    fn registered(&self, key: &TypeKey, policy: RegistrationPolicy) {
        self.events.lock().push(format!("registered {} {}", key.short_name(), policy));
    }

    fn producing(&self, key: &TypeKey) {
        self.events.lock().push(format!("producing {}", key.short_name()));
    }

    fn produced(&self, key: &TypeKey, _duration: Duration) {
        self.events.lock().push(format!("produced {}", key.short_name()));
    }

    fn producer_failed(&self, key: &TypeKey, error: &DiError) {
        self.events.lock().push(format!("failed {} {}", key.short_name(), error));
    }

    fn reset(&self, entries: usize) {
        self.events.lock().push(format!("reset {}", entries));
    }
}

struct Database;
struct Broken;

#[test]
fn test_singleton_events_in_order() {
    let recorder = Arc::new(Recorder::default());
    let registry = Registry::builder().add_observer(recorder.clone()).build();

    registry
        .get_or_register(RegistrationPolicy::Singleton, |_| Ok(Database))
        .unwrap();
    registry.get::<Database>().unwrap();

    assert_eq!(
        recorder.events(),
        vec![
            "producing Database".to_string(),
            "produced Database".to_string(),
            "registered Database Singleton".to_string(),
        ]
    );
}

#[test]
fn test_failed_producer_and_reset_are_reported() {
    let recorder = Arc::new(Recorder::default());
    let registry = Registry::builder()
        .add_observer(recorder.clone())
        .add_observer(Arc::new(LoggingObserver::new()))
        .build();

    let _ = registry.get_or_register::<Broken, _>(RegistrationPolicy::Singleton, |_| {
        Err(DiError::producer("disk full"))
    });
    registry
        .get_or_register(RegistrationPolicy::Factory, |_| Ok(Database))
        .unwrap();
    registry.reset();

    let events = recorder.events();
    assert_eq!(events[0], "producing Broken");
    assert_eq!(events[1], "failed Broken Producer failed: disk full");
    assert!(events.contains(&"registered Database Factory".to_string()));
    assert_eq!(events.last().unwrap(), "reset 1");
}

#[tokio::test]
async fn test_async_producers_are_observed() {
    let recorder = Arc::new(Recorder::default());
    let registry = Registry::builder().add_observer(recorder.clone()).build();

    registry
        .get_or_register_async(RegistrationPolicy::LazySingletonAsync, |_| async { Ok(Database) })
        .await
        .unwrap();
    registry.get_async::<Database>().await.unwrap();

    assert_eq!(
        recorder.events(),
        vec![
            "registered Database LazySingletonAsync".to_string(),
            "producing Database".to_string(),
            "produced Database".to_string(),
        ]
    );
}
