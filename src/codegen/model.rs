//! Input records supplied by source introspection.
//!
//! Everything here is plain data produced fresh for each build pass. The
//! generator never parses source text; the introspection collaborator
//! resolves declared types into [`TypeRef`] values and annotations into
//! [`Annotation`] values before handing them over.

use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::policy::RegistrationPolicy;

/// A position in an input file, used to attach diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// A declared parameter type.
///
/// The closed set of well-known value kinds replaces matching on type-name
/// strings. Each variant has one canonical Rust rendering, see
/// [`TypeRef::rust_type`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(tag = "kind", content = "of", rename_all = "snake_case"))]
pub enum TypeRef {
    Text,
    Integer,
    Float,
    Boolean,
    Sequence(Box<TypeRef>),
    Mapping(Box<TypeRef>, Box<TypeRef>),
    Set(Box<TypeRef>),
    Duration,
    Timestamp,
    Uri,
    Pattern,
    Dynamic,
    Void,
    Null,
    /// A bare generic type parameter such as `T`.
    Generic(String),
    /// A user type, written the way the generated code should name it.
    Named(String),
    /// The nullable marker.
    Optional(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(path: impl Into<String>) -> Self {
        TypeRef::Named(path.into())
    }

    pub fn generic(name: impl Into<String>) -> Self {
        TypeRef::Generic(name.into())
    }

    pub fn optional(inner: TypeRef) -> Self {
        TypeRef::Optional(Box::new(inner))
    }

    pub fn sequence(item: TypeRef) -> Self {
        TypeRef::Sequence(Box::new(item))
    }

    pub fn set(item: TypeRef) -> Self {
        TypeRef::Set(Box::new(item))
    }

    pub fn mapping(key: TypeRef, value: TypeRef) -> Self {
        TypeRef::Mapping(Box::new(key), Box::new(value))
    }

    /// Text and URI values, which get name-based placeholders.
    pub fn is_string_like(&self) -> bool {
        matches!(self, TypeRef::Text | TypeRef::Uri)
    }

    /// Canonical Rust spelling of the type.
    pub fn rust_type(&self) -> String {
        match self {
            TypeRef::Text | TypeRef::Uri | TypeRef::Pattern => "String".to_string(),
            TypeRef::Integer => "i64".to_string(),
            TypeRef::Float => "f64".to_string(),
            TypeRef::Boolean => "bool".to_string(),
            TypeRef::Sequence(item) => format!("Vec<{}>", item.rust_type()),
            TypeRef::Mapping(key, value) => format!(
                "::std::collections::HashMap<{}, {}>",
                key.rust_type(),
                value.rust_type()
            ),
            TypeRef::Set(item) => format!("::std::collections::HashSet<{}>", item.rust_type()),
            TypeRef::Duration => "::std::time::Duration".to_string(),
            TypeRef::Timestamp => "::std::time::SystemTime".to_string(),
            TypeRef::Dynamic => "Box<dyn ::std::any::Any + Send + Sync>".to_string(),
            TypeRef::Void => "()".to_string(),
            TypeRef::Null => "Option<()>".to_string(),
            TypeRef::Generic(name) | TypeRef::Named(name) => name.clone(),
            TypeRef::Optional(inner) => format!("Option<{}>", inner.rust_type()),
        }
    }
}

/// How a parameter is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum ParamKind {
    Positional,
    Named,
}

/// One constructor parameter as declared in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct ConstructorParameter {
    pub name: String,
    pub ty: TypeRef,
    pub kind: ParamKind,
    pub required: bool,
    /// Literal default expression, copied verbatim into generated code.
    #[cfg_attr(feature = "config", serde(default))]
    pub default: Option<String>,
}

impl ConstructorParameter {
    /// A required positional parameter.
    pub fn positional(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            kind: ParamKind::Positional,
            required: true,
            default: None,
        }
    }

    /// A required named parameter (a struct field).
    pub fn named(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            kind: ParamKind::Named,
            ..Self::positional(name, ty)
        }
    }

    /// Marks the parameter optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Attaches a literal default expression.
    pub fn with_default(mut self, expr: impl Into<String>) -> Self {
        self.default = Some(expr.into());
        self
    }
}

/// How the constructor is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum ConstructorStyle {
    /// `Type::name(args..)` with arguments in declaration order.
    Function(String),
    /// `Type { field: value, .. }`.
    StructLiteral,
}

/// The constructor the accessor will call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct Constructor {
    pub style: ConstructorStyle,
    /// Call site is `.await`ed.
    #[cfg_attr(feature = "config", serde(default))]
    pub is_async: bool,
    /// Returns `Result<Self, E>` with `E: Display`.
    #[cfg_attr(feature = "config", serde(default))]
    pub is_fallible: bool,
    pub params: Vec<ConstructorParameter>,
}

impl Constructor {
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            style: ConstructorStyle::Function(name.into()),
            is_async: false,
            is_fallible: false,
            params: Vec::new(),
        }
    }

    pub fn struct_literal() -> Self {
        Self {
            style: ConstructorStyle::StructLiteral,
            is_async: false,
            is_fallible: false,
            params: Vec::new(),
        }
    }

    pub fn param(mut self, param: ConstructorParameter) -> Self {
        self.params.push(param);
        self
    }

    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }

    pub fn fallible(mut self) -> Self {
        self.is_fallible = true;
        self
    }
}

/// The registration directive on a class.
///
/// `policy` is `None` when the directive names no policy; the class is then
/// registered as a `Factory`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct Annotation {
    #[cfg_attr(feature = "config", serde(default))]
    pub policy: Option<RegistrationPolicy>,
    #[cfg_attr(feature = "config", serde(default))]
    pub location: SourceLocation,
}

impl Annotation {
    pub fn new(policy: RegistrationPolicy) -> Self {
        Self {
            policy: Some(policy),
            location: SourceLocation::default(),
        }
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }
}

/// Identity of a class across one pass: its file and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId {
    pub file: String,
    pub name: String,
}

/// A class carrying the registration directive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct AnnotatedClass {
    pub name: String,
    pub location: SourceLocation,
    #[cfg_attr(feature = "config", serde(default))]
    pub annotation: Annotation,
    /// `None` when introspection found no usable constructor.
    #[cfg_attr(feature = "config", serde(default))]
    pub constructor: Option<Constructor>,
}

impl AnnotatedClass {
    pub fn new(name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            location,
            annotation: Annotation::default(),
            constructor: None,
        }
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotation = annotation;
        self
    }

    pub fn policy(&self) -> RegistrationPolicy {
        self.annotation.policy.unwrap_or_default()
    }

    pub fn with_policy(mut self, policy: RegistrationPolicy) -> Self {
        self.annotation.policy = Some(policy);
        self
    }

    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    pub fn id(&self) -> ClassId {
        ClassId {
            file: self.location.file.clone(),
            name: self.name.clone(),
        }
    }
}

/// Types the generator may wire as dependencies, with their policies.
///
/// Built from the classes of the current pass plus anything declared
/// externally (classes generated by another pass, hand-written accessors).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(transparent))]
pub struct ManagedTypes {
    types: BTreeMap<String, RegistrationPolicy>,
}

impl ManagedTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every class in `classes`, keyed by name.
    pub fn from_classes<'a>(classes: impl IntoIterator<Item = &'a AnnotatedClass>) -> Self {
        let mut managed = Self::new();
        for class in classes {
            managed.types.entry(class.name.clone()).or_insert_with(|| class.policy());
        }
        managed
    }

    pub fn insert(&mut self, name: impl Into<String>, policy: RegistrationPolicy) {
        self.types.insert(name.into(), policy);
    }

    /// Adds everything from `other` that is not already present.
    pub fn extend_from(&mut self, other: &ManagedTypes) {
        for (name, policy) in &other.types {
            self.types.entry(name.clone()).or_insert(*policy);
        }
    }

    pub fn policy_of(&self, name: &str) -> Option<RegistrationPolicy> {
        self.types.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Everything one generator invocation consumes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct BuildPass {
    pub classes: Vec<AnnotatedClass>,
    /// Managed types defined outside this pass.
    #[cfg_attr(feature = "config", serde(default))]
    pub external: ManagedTypes,
}

impl BuildPass {
    pub fn new(classes: Vec<AnnotatedClass>) -> Self {
        Self {
            classes,
            external: ManagedTypes::new(),
        }
    }

    pub fn with_external(mut self, external: ManagedTypes) -> Self {
        self.external = external;
        self
    }

    /// Classes of this pass plus the external declarations.
    pub fn managed_types(&self) -> ManagedTypes {
        let mut managed = ManagedTypes::from_classes(&self.classes);
        managed.extend_from(&self.external);
        managed
    }

    /// Parses a pass from the JSON form the introspection tool writes.
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> Result<Self, crate::config::ConfigError> {
        serde_json::from_str(json).map_err(|e| crate::config::ConfigError::Parse(e.to_string()))
    }
}
