//! Type keys for registry storage.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Key identifying one registry entry.
///
/// The `TypeId` decides equality; the type name is carried for diagnostics
/// only.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::key_of_type;
///
/// let a = key_of_type::<String>();
/// let b = key_of_type::<String>();
/// assert_eq!(a, b);
/// assert_eq!(a.display_name(), "alloc::string::String");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// The full type name, for error messages and observers.
    pub fn display_name(&self) -> &'static str {
        self.name
    }

    /// The last path segment of the type name.
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl PartialEq for TypeKey {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

// TypeId only, to agree with Eq
impl Hash for TypeKey {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Builds the key for `T`.
#[inline(always)]
pub fn key_of_type<T: ?Sized + 'static>() -> TypeKey {
    TypeKey {
        id: TypeId::of::<T>(),
        name: std::any::type_name::<T>(),
    }
}
