/// Unit tests for TypeKey

use ferrous_autowire::{key_of_type, TypeKey};
use std::collections::HashMap;

mod app {
    pub struct UserService;
    pub struct Wrapper<T>(pub T);
}

#[test]
fn test_key_equality_follows_type() {
    assert_eq!(key_of_type::<app::UserService>(), key_of_type::<app::UserService>());
    assert_ne!(key_of_type::<app::UserService>(), key_of_type::<String>());
    assert_ne!(key_of_type::<app::Wrapper<u8>>(), key_of_type::<app::Wrapper<u16>>());
}

#[test]
fn test_key_names() {
    let key = key_of_type::<app::UserService>();
    assert!(key.display_name().ends_with("app::UserService"));
    assert_eq!(key.short_name(), "UserService");
    assert_eq!(key.to_string(), key.display_name());

    let generic = key_of_type::<app::Wrapper<String>>();
    assert_eq!(generic.short_name(), "Wrapper");
}

#[test]
fn test_key_as_map_key() {
    let mut map: HashMap<TypeKey, &str> = HashMap::new();
    map.insert(key_of_type::<u32>(), "first");
    map.insert(key_of_type::<u32>(), "second");
    map.insert(key_of_type::<u64>(), "other");
    assert_eq!(map.len(), 2);
    assert_eq!(map[&key_of_type::<u32>()], "second");
}
