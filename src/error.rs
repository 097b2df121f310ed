//! Error types for the registry and the accessor generator.

use std::fmt;

use crate::codegen::SourceLocation;
use crate::policy::RegistrationPolicy;

/// The registry operation a caller went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    /// `Registry::get_or_register`
    Sync,
    /// `Registry::get_or_register_async`
    Async,
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryPoint::Sync => f.write_str("get_or_register"),
            EntryPoint::Async => f.write_str("get_or_register_async"),
        }
    }
}

/// Registry errors.
///
/// Returned from registration and resolution. None of them is retried by the
/// registry; they propagate to the code that asked for the service.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::{DiError, Registry, RegistrationPolicy};
///
/// let registry = Registry::new();
/// let err = registry
///     .get_or_register(RegistrationPolicy::SingletonAsync, |_| Ok(5u8))
///     .unwrap_err();
/// assert!(matches!(err, DiError::PolicyMismatch { .. }));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum DiError {
    /// A sync-only policy reached the async entry point or the reverse.
    PolicyMismatch {
        service: &'static str,
        policy: RegistrationPolicy,
        entry_point: EntryPoint,
    },
    /// Nothing registered for the type.
    NotRegistered(&'static str),
    /// Stored instance could not be downcast to the requested type.
    TypeMismatch(&'static str),
    /// Re-entrant resolution (includes path).
    Circular(Vec<&'static str>),
    /// Maximum nesting depth exceeded.
    DepthExceeded(usize),
    /// A sync read needs to wait on an async producer but the current thread
    /// drives a single-threaded runtime.
    BlockingInAsyncContext(&'static str),
    /// The producer itself failed.
    Producer(String),
}

impl DiError {
    /// Wraps a producer failure.
    pub fn producer(err: impl fmt::Display) -> Self {
        DiError::Producer(err.to_string())
    }
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::PolicyMismatch { service, policy, entry_point } => write!(
                f,
                "Policy mismatch for {}: {} cannot be registered through {}",
                service, policy, entry_point
            ),
            DiError::NotRegistered(name) => write!(f, "Service not registered: {}", name),
            DiError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            DiError::Circular(path) => write!(f, "Circular dependency: {}", path.join(" -> ")),
            DiError::DepthExceeded(depth) => write!(f, "Max depth {} exceeded", depth),
            DiError::BlockingInAsyncContext(name) => write!(
                f,
                "Cannot block on async resolution of {} inside a current-thread runtime",
                name
            ),
            DiError::Producer(msg) => write!(f, "Producer failed: {}", msg),
        }
    }
}

impl std::error::Error for DiError {}

/// Result type for registry operations.
pub type DiResult<T> = Result<T, DiError>;

/// Accessor generation errors.
///
/// Local to one class: the pass keeps generating the remaining classes and
/// reports these as diagnostics at the class's source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The class has no constructor the generator can call.
    NoUsableConstructor {
        class: String,
        location: SourceLocation,
        reason: String,
    },
    /// A sync-policy class takes an async-policy dependency.
    AsyncDependencyInSyncAccessor {
        class: String,
        location: SourceLocation,
        parameter: String,
        dependency: String,
    },
    /// Another class in the same file already generated this accessor name.
    DuplicateAccessor {
        class: String,
        location: SourceLocation,
        function: String,
        existing: String,
    },
}

impl GenerationError {
    /// Name of the class the error belongs to.
    pub fn class(&self) -> &str {
        match self {
            GenerationError::NoUsableConstructor { class, .. } => class,
            GenerationError::AsyncDependencyInSyncAccessor { class, .. } => class,
            GenerationError::DuplicateAccessor { class, .. } => class,
        }
    }

    /// Where the diagnostic should be attached.
    pub fn location(&self) -> &SourceLocation {
        match self {
            GenerationError::NoUsableConstructor { location, .. } => location,
            GenerationError::AsyncDependencyInSyncAccessor { location, .. } => location,
            GenerationError::DuplicateAccessor { location, .. } => location,
        }
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::NoUsableConstructor { class, location, reason } => {
                write!(f, "{}: {} has no usable constructor: {}", location, class, reason)
            }
            GenerationError::AsyncDependencyInSyncAccessor { class, location, parameter, dependency } => write!(
                f,
                "{}: {} has a sync policy but parameter `{}` depends on async service {}",
                location, class, parameter, dependency
            ),
            GenerationError::DuplicateAccessor { class, location, function, existing } => write!(
                f,
                "{}: accessor `{}` for {} is already generated for {} in this file",
                location, function, class, existing
            ),
        }
    }
}

impl std::error::Error for GenerationError {}

/// Failure writing a primary artifact.
#[derive(Debug)]
pub struct EmitError {
    pub artifact: String,
    pub source: std::io::Error,
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to write {}: {}", self.artifact, self.source)
    }
}

impl std::error::Error for EmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
