//! Literal defaults for value parameters.

use crate::codegen::model::{ConstructorParameter, TypeRef};

const GENERIC_TEXT: &str = "placeholder";
const GENERIC_URI: &str = "https://example.com";

// Checked in order; the first substring found in the lowercased name wins.
const NAME_HINTS: [(&str, &str); 6] = [
    ("api", "your-api-key"),
    ("secret", "your-secret"),
    ("url", "https://example.com"),
    ("connection", "postgres://localhost:5432/app"),
    ("token", "your-token"),
    ("id", "default-id"),
];

/// Placeholder text suggested by a parameter name, if any.
pub fn placeholder_for(name: &str) -> Option<&'static str> {
    let lowered = name.to_lowercase();
    NAME_HINTS
        .iter()
        .find(|(hint, _)| lowered.contains(hint))
        .map(|(_, placeholder)| *placeholder)
}

/// The expression passed for a value parameter.
///
/// An explicit default is reused verbatim. Otherwise the literal follows the
/// declared type. With `heuristics` on, required string-like parameters whose
/// name matches a hint get a more descriptive placeholder.
pub fn synthesize_default(param: &ConstructorParameter, heuristics: bool) -> String {
    if let Some(expr) = &param.default {
        return expr.clone();
    }

    match &param.ty {
        ty if ty.is_string_like() => {
            let hinted = if heuristics && param.required {
                placeholder_for(&param.name)
            } else {
                None
            };
            let fallback = if *ty == TypeRef::Uri { GENERIC_URI } else { GENERIC_TEXT };
            string_literal(hinted.unwrap_or(fallback))
        }
        TypeRef::Pattern => string_literal(".*"),
        TypeRef::Optional(_) | TypeRef::Null => "None".to_string(),
        other => zero_value(other),
    }
}

fn zero_value(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Integer => "0".to_string(),
        TypeRef::Float => "0.0".to_string(),
        TypeRef::Boolean => "false".to_string(),
        TypeRef::Sequence(_) => "Vec::new()".to_string(),
        TypeRef::Mapping(_, _) => "::std::collections::HashMap::new()".to_string(),
        TypeRef::Set(_) => "::std::collections::HashSet::new()".to_string(),
        TypeRef::Duration => "::std::time::Duration::ZERO".to_string(),
        TypeRef::Timestamp => "::std::time::SystemTime::UNIX_EPOCH".to_string(),
        TypeRef::Dynamic => format!("Box::new(()) as {}", ty.rust_type()),
        TypeRef::Void => "()".to_string(),
        _ => "Default::default()".to_string(),
    }
}

fn string_literal(text: &str) -> String {
    format!("String::from({:?})", text)
}
