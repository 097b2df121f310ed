// @generated by ferrous-autowire from `src/services.rs`. Do not edit.

/// Accessor for `Config` (Singleton).
pub fn config(registry: &::ferrous_autowire::Registry) -> ::ferrous_autowire::DiResult<::std::sync::Arc<Config>> {
    registry.get_or_register(::ferrous_autowire::RegistrationPolicy::Singleton, |_: &::ferrous_autowire::Registry| {
        Ok(Config {
            api_key: String::from("your-api-key"),
            verbose: true,
            ..Default::default()
        })
    })
}

impl ::ferrous_autowire::Autowired for Config {
    const POLICY: ::ferrous_autowire::RegistrationPolicy = ::ferrous_autowire::RegistrationPolicy::Singleton;

    fn autowire(registry: &::ferrous_autowire::Registry) -> ::ferrous_autowire::DiResult<::std::sync::Arc<Self>> {
        config(registry)
    }
}

/// Accessor for `Database` (LazySingleton).
pub fn database(registry: &::ferrous_autowire::Registry) -> ::ferrous_autowire::DiResult<::std::sync::Arc<Database>> {
    registry.get_or_register(::ferrous_autowire::RegistrationPolicy::LazySingleton, |registry: &::ferrous_autowire::Registry| {
        Database::connect(
            registry.resolve::<Config>()?,
            String::from("https://example.com"),
        ).map_err(::ferrous_autowire::DiError::producer)
    })
}

impl ::ferrous_autowire::Autowired for Database {
    const POLICY: ::ferrous_autowire::RegistrationPolicy = ::ferrous_autowire::RegistrationPolicy::LazySingleton;

    fn autowire(registry: &::ferrous_autowire::Registry) -> ::ferrous_autowire::DiResult<::std::sync::Arc<Self>> {
        database(registry)
    }
}

/// Accessor for `UserRepository` (Factory).
pub fn user_repository(registry: &::ferrous_autowire::Registry) -> ::ferrous_autowire::DiResult<::std::sync::Arc<UserRepository>> {
    registry.get_or_register(::ferrous_autowire::RegistrationPolicy::Factory, |registry: &::ferrous_autowire::Registry| {
        Ok(UserRepository::new(
            registry.resolve::<Database>()?,
        ))
    })
}

impl ::ferrous_autowire::Autowired for UserRepository {
    const POLICY: ::ferrous_autowire::RegistrationPolicy = ::ferrous_autowire::RegistrationPolicy::Factory;

    fn autowire(registry: &::ferrous_autowire::Registry) -> ::ferrous_autowire::DiResult<::std::sync::Arc<Self>> {
        user_repository(registry)
    }
}

/// Accessor for `Cache` (SingletonAsync).
pub async fn cache(registry: &::ferrous_autowire::Registry) -> ::ferrous_autowire::DiResult<::std::sync::Arc<Cache>> {
    registry
        .get_or_register_async(::ferrous_autowire::RegistrationPolicy::SingletonAsync, |registry: ::ferrous_autowire::Registry| async move {
            Ok::<_, ::ferrous_autowire::DiError>(Cache::connect(
                registry.resolve::<Database>()?,
                ::std::time::Duration::ZERO,
            ).await)
        })
        .await
}

#[ferrous_autowire::async_trait]
impl ::ferrous_autowire::AutowiredAsync for Cache {
    const POLICY: ::ferrous_autowire::RegistrationPolicy = ::ferrous_autowire::RegistrationPolicy::SingletonAsync;

    async fn autowire_async(registry: &::ferrous_autowire::Registry) -> ::ferrous_autowire::DiResult<::std::sync::Arc<Self>> {
        cache(registry).await
    }
}

/// Accessor for `SessionService` (LazySingletonAsync).
pub async fn session_service(registry: &::ferrous_autowire::Registry) -> ::ferrous_autowire::DiResult<::std::sync::Arc<SessionService>> {
    registry
        .get_or_register_async(::ferrous_autowire::RegistrationPolicy::LazySingletonAsync, |registry: ::ferrous_autowire::Registry| async move {
            Ok::<_, ::ferrous_autowire::DiError>(SessionService::new(
                registry.resolve_async::<Cache>().await?,
                registry.resolve::<UserRepository>()?,
                Default::default(),
            ))
        })
        .await
}

#[ferrous_autowire::async_trait]
impl ::ferrous_autowire::AutowiredAsync for SessionService {
    const POLICY: ::ferrous_autowire::RegistrationPolicy = ::ferrous_autowire::RegistrationPolicy::LazySingletonAsync;

    async fn autowire_async(registry: &::ferrous_autowire::Registry) -> ::ferrous_autowire::DiResult<::std::sync::Arc<Self>> {
        session_service(registry).await
    }
}
