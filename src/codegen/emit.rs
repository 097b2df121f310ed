//! Accessor text rendering.

use crate::codegen::model::{AnnotatedClass, Constructor, ConstructorStyle};
use crate::policy::RegistrationPolicy;

const INDENT: &str = "    ";

const KEYWORDS: [&str; 34] = [
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern", "false", "fn", "for", "if",
    "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static", "struct", "trait",
    "true", "type", "unsafe", "use", "where", "while",
];

// Keywords that cannot be raw identifiers.
const RESERVED_PATHS: [&str; 3] = ["crate", "self", "super"];

/// One generated accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAccessor {
    pub class: String,
    pub function: String,
    pub policy: RegistrationPolicy,
    /// Managed types the accessor resolves, in parameter order.
    pub dependencies: Vec<String>,
    pub code: String,
}

/// One rendered constructor argument.
#[derive(Debug, Clone)]
pub(crate) struct Argument {
    pub(crate) name: String,
    /// `None` leaves a struct field to `..Default::default()`.
    pub(crate) expr: Option<String>,
}

/// Accessor function name for a class: snake case, keywords escaped.
///
/// ```rust
/// use ferrous_autowire::codegen::accessor_name;
///
/// assert_eq!(accessor_name("UserService"), "user_service");
/// assert_eq!(accessor_name("HTTPClient"), "http_client");
/// assert_eq!(accessor_name("Type"), "r#type");
/// ```
pub fn accessor_name(class: &str) -> String {
    let chars: Vec<char> = class.chars().collect();
    let mut name = String::with_capacity(class.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).map_or(false, |n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                name.push('_');
            }
        }
        name.extend(c.to_lowercase());
    }
    if KEYWORDS.contains(&name.as_str()) {
        name.insert_str(0, "r#");
    } else if RESERVED_PATHS.contains(&name.as_str()) {
        name.push('_');
    }
    name
}

pub(crate) fn render(
    class: &AnnotatedClass,
    ctor: &Constructor,
    args: &[Argument],
    uses_registry: bool,
    runtime: &str,
) -> String {
    let policy = class.policy();
    let function = accessor_name(&class.name);
    let policy_path = format!("{}::RegistrationPolicy::{}", runtime, policy.as_str());
    let arc = "::std::sync::Arc";
    let param = if uses_registry { "registry" } else { "_" };

    let mut out = String::new();
    out.push_str(&format!("/// Accessor for `{}` ({}).\n", class.name, policy));
    if policy.is_async() {
        out.push_str(&format!(
            "pub async fn {}(registry: &{rt}::Registry) -> {rt}::DiResult<{}<{}>> {{\n",
            function,
            arc,
            class.name,
            rt = runtime
        ));
        out.push_str(&format!("{}registry\n", INDENT));
        out.push_str(&format!(
            "{}{}.get_or_register_async({}, |{}: {}::Registry| async move {{\n",
            INDENT, INDENT, policy_path, param, runtime
        ));
        out.push_str(&indent(&construct(class, ctor, args, true, runtime), 3));
        out.push_str(&format!("{}{}}})\n", INDENT, INDENT));
        out.push_str(&format!("{}{}.await\n", INDENT, INDENT));
        out.push_str("}\n\n");

        out.push_str(&format!("#[{}::async_trait]\n", runtime.trim_start_matches("::")));
        out.push_str(&format!("impl {}::AutowiredAsync for {} {{\n", runtime, class.name));
        out.push_str(&format!(
            "{}const POLICY: {}::RegistrationPolicy = {};\n\n",
            INDENT, runtime, policy_path
        ));
        out.push_str(&format!(
            "{}async fn autowire_async(registry: &{rt}::Registry) -> {rt}::DiResult<{}<Self>> {{\n",
            INDENT,
            arc,
            rt = runtime
        ));
        out.push_str(&format!("{}{}{}(registry).await\n", INDENT, INDENT, function));
    } else {
        out.push_str(&format!(
            "pub fn {}(registry: &{rt}::Registry) -> {rt}::DiResult<{}<{}>> {{\n",
            function,
            arc,
            class.name,
            rt = runtime
        ));
        out.push_str(&format!(
            "{}registry.get_or_register({}, |{}: &{}::Registry| {{\n",
            INDENT, policy_path, param, runtime
        ));
        out.push_str(&indent(&construct(class, ctor, args, false, runtime), 2));
        out.push_str(&format!("{}}})\n", INDENT));
        out.push_str("}\n\n");

        out.push_str(&format!("impl {}::Autowired for {} {{\n", runtime, class.name));
        out.push_str(&format!(
            "{}const POLICY: {}::RegistrationPolicy = {};\n\n",
            INDENT, runtime, policy_path
        ));
        out.push_str(&format!(
            "{}fn autowire(registry: &{rt}::Registry) -> {rt}::DiResult<{}<Self>> {{\n",
            INDENT,
            arc,
            rt = runtime
        ));
        out.push_str(&format!("{}{}{}(registry)\n", INDENT, INDENT, function));
    }
    out.push_str(&format!("{}}}\n", INDENT));
    out.push_str("}\n");
    out
}

// The producer body: the constructor call wrapped into a DiResult.
fn construct(class: &AnnotatedClass, ctor: &Constructor, args: &[Argument], in_async: bool, runtime: &str) -> String {
    let mut call = match &ctor.style {
        ConstructorStyle::Function(name) => {
            let passed: Vec<&str> = args.iter().filter_map(|arg| arg.expr.as_deref()).collect();
            if passed.is_empty() {
                format!("{}::{}()", class.name, name)
            } else {
                let mut call = format!("{}::{}(\n", class.name, name);
                for expr in passed {
                    call.push_str(&format!("{}{},\n", INDENT, expr));
                }
                call.push(')');
                call
            }
        }
        ConstructorStyle::StructLiteral => {
            let mut call = format!("{} {{\n", class.name);
            for arg in args {
                if let Some(expr) = &arg.expr {
                    call.push_str(&format!("{}{}: {},\n", INDENT, arg.name, expr));
                }
            }
            if args.iter().any(|arg| arg.expr.is_none()) {
                call.push_str(&format!("{}..Default::default()\n", INDENT));
            }
            call.push('}');
            call
        }
    };

    if ctor.is_async {
        call.push_str(".await");
    }
    if ctor.is_fallible {
        format!("{}.map_err({}::DiError::producer)", call, runtime)
    } else if in_async {
        format!("Ok::<_, {}::DiError>({})", runtime, call)
    } else {
        format!("Ok({})", call)
    }
}

fn indent(text: &str, levels: usize) -> String {
    let prefix = INDENT.repeat(levels);
    let mut out = String::with_capacity(text.len() + 16);
    for line in text.lines() {
        out.push_str(&prefix);
        out.push_str(line);
        out.push('\n');
    }
    out
}
