//! Constructor parameter classification.

use crate::codegen::model::{ConstructorParameter, ManagedTypes, TypeRef};
use crate::policy::RegistrationPolicy;

/// A parameter the accessor resolves through the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Type name as written in source.
    pub type_name: String,
    /// Policy of the dependency's own accessor.
    pub policy: RegistrationPolicy,
    /// Declared nullable with an explicit default; the resolved instance is
    /// passed as `Some(..)`.
    pub optional: bool,
}

/// Outcome of classifying one parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamClass {
    Dependency(Dependency),
    Value,
}

impl ParamClass {
    pub fn is_dependency(&self) -> bool {
        matches!(self, ParamClass::Dependency(_))
    }
}

/// Classifies `param` against the managed type map.
///
/// Only a named type listed in `managed` becomes a dependency. Well-known
/// value kinds, bare generic parameters and nullable parameters without an
/// explicit default are values. Named types nobody manages are values too,
/// filled with `Default::default()`, so the generator never emits a call to
/// an accessor that does not exist.
pub fn classify(param: &ConstructorParameter, managed: &ManagedTypes) -> ParamClass {
    let (ty, optional) = match &param.ty {
        TypeRef::Optional(_) if param.default.is_none() => return ParamClass::Value,
        TypeRef::Optional(inner) => (inner.as_ref(), true),
        other => (other, false),
    };

    match ty {
        TypeRef::Named(name) => match managed.policy_of(name) {
            Some(policy) => ParamClass::Dependency(Dependency {
                type_name: name.clone(),
                policy,
                optional,
            }),
            None => ParamClass::Value,
        },
        _ => ParamClass::Value,
    }
}
