//! Accessor generation.
//!
//! The generator turns the annotated classes of one build pass into accessor
//! functions, one artifact per input file. Generated text is meant to be
//! pulled into the declaring module with `include!`:
//!
//! ```rust,ignore
//! // src/services.rs
//! include!(concat!(env!("OUT_DIR"), "/services.autowire.rs"));
//! ```
//!
//! Each accessor takes the [`Registry`](crate::Registry) explicitly and
//! registers its class under the policy named by the annotation. Constructor
//! parameters whose type is managed become registry lookups; everything else
//! gets a synthesized literal.
//!
//! ```rust
//! use ferrous_autowire::codegen::*;
//! use ferrous_autowire::RegistrationPolicy;
//!
//! let db = AnnotatedClass::new("Database", SourceLocation::new("src/db.rs", 3, 1))
//!     .with_policy(RegistrationPolicy::Singleton)
//!     .with_constructor(Constructor::function("new").param(ConstructorParameter::positional("url", TypeRef::Uri)));
//! let repo = AnnotatedClass::new("UserRepository", SourceLocation::new("src/db.rs", 20, 1))
//!     .with_constructor(
//!         Constructor::function("new").param(ConstructorParameter::positional("db", TypeRef::named("Database"))),
//!     );
//!
//! let output = Generator::default().generate(&BuildPass::new(vec![db, repo]));
//! assert!(output.errors.is_empty());
//! assert_eq!(output.artifacts.len(), 1);
//! assert!(output.artifacts[0].contents.contains("registry.resolve::<Database>()?"));
//! ```

mod classify;
mod defaults;
mod emit;
mod model;
mod sink;

pub use classify::{classify, Dependency, ParamClass};
pub use defaults::{placeholder_for, synthesize_default};
pub use emit::{accessor_name, GeneratedAccessor};
pub use model::{
    AnnotatedClass, Annotation, BuildPass, ClassId, Constructor, ConstructorParameter, ConstructorStyle,
    ManagedTypes, ParamKind, SourceLocation, TypeRef,
};
pub use sink::{Artifact, EmissionSink, FsSink, MemorySink};

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use crate::config::GeneratorConfig;
use crate::error::{EmitError, GenerationError};
use emit::Argument;

/// Everything one pass produced, before emission.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    /// One per input file that yielded at least one accessor, sorted by file.
    pub artifacts: Vec<Artifact>,
    /// Accessors in pass order.
    pub accessors: Vec<GeneratedAccessor>,
    /// Classes skipped, in pass order.
    pub errors: Vec<GenerationError>,
}

/// Outcome of [`Generator::run`].
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Names of the artifacts emitted.
    pub artifacts: Vec<String>,
    /// Number of accessors generated.
    pub accessors: usize,
    /// Classes that produced no accessor.
    pub errors: Vec<GenerationError>,
    /// Non-fatal emission problems.
    pub warnings: Vec<String>,
}

impl GenerationReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// The accessor generator.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// See [`classify`].
    pub fn classify(&self, param: &ConstructorParameter, managed: &ManagedTypes) -> ParamClass {
        classify(param, managed)
    }

    /// See [`synthesize_default`]; heuristics follow the configuration.
    pub fn synthesize_default(&self, param: &ConstructorParameter) -> String {
        synthesize_default(param, self.config.placeholder_heuristics)
    }

    /// Name of the artifact generated for `source_file`.
    pub fn artifact_name(&self, source_file: &str) -> String {
        let stem = Path::new(source_file)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("autowire");
        format!("{}{}", stem, self.config.artifact_suffix)
    }

    /// A filesystem sink configured from the cache directory and mirror flag.
    pub fn fs_sink(&self) -> FsSink {
        FsSink::new(self.config.cache_dir.clone()).with_mirror(self.config.mirror_beside_inputs)
    }

    /// Builds the accessor for one class.
    pub fn build_accessor(
        &self,
        class: &AnnotatedClass,
        managed: &ManagedTypes,
    ) -> Result<GeneratedAccessor, GenerationError> {
        let no_constructor = |reason: String| GenerationError::NoUsableConstructor {
            class: class.name.clone(),
            location: class.location.clone(),
            reason,
        };

        let ctor = class
            .constructor
            .as_ref()
            .ok_or_else(|| no_constructor("no accessible constructor".to_string()))?;

        if ctor.style == ConstructorStyle::StructLiteral {
            if ctor.is_async || ctor.is_fallible {
                return Err(no_constructor("a struct literal cannot be async or fallible".to_string()));
            }
            if let Some(param) = ctor.params.iter().find(|p| p.kind == ParamKind::Positional) {
                return Err(no_constructor(format!(
                    "struct literal field `{}` is positional",
                    param.name
                )));
            }
        }

        let policy = class.policy();
        let runtime = self.config.runtime_crate.as_str();
        let mut dependencies = Vec::new();
        let mut args = Vec::with_capacity(ctor.params.len());

        for param in &ctor.params {
            let expr = match classify(param, managed) {
                ParamClass::Dependency(dep) => {
                    let lookup = if dep.policy.is_async() {
                        if !policy.is_async() {
                            return Err(GenerationError::AsyncDependencyInSyncAccessor {
                                class: class.name.clone(),
                                location: class.location.clone(),
                                parameter: param.name.clone(),
                                dependency: dep.type_name,
                            });
                        }
                        format!("registry.resolve_async::<{}>().await?", dep.type_name)
                    } else {
                        format!("registry.resolve::<{}>()?", dep.type_name)
                    };
                    dependencies.push(dep.type_name);
                    Some(if dep.optional { format!("Some({})", lookup) } else { lookup })
                }
                ParamClass::Value => {
                    let omitted = ctor.style == ConstructorStyle::StructLiteral
                        && !param.required
                        && param.default.is_none();
                    if omitted {
                        None
                    } else {
                        Some(self.synthesize_default(param))
                    }
                }
            };
            args.push(Argument {
                name: param.name.clone(),
                expr,
            });
        }

        let code = emit::render(class, ctor, &args, !dependencies.is_empty(), runtime);
        Ok(GeneratedAccessor {
            class: class.name.clone(),
            function: accessor_name(&class.name),
            policy,
            dependencies,
            code,
        })
    }

    /// Generates every accessor of the pass.
    ///
    /// A class that fails is reported and skipped; the rest of the pass
    /// continues. A class seen twice with the same annotation is generated
    /// once. Two classes of one file whose names map to the same accessor
    /// keep the first; the later one is reported.
    pub fn generate(&self, pass: &BuildPass) -> Generation {
        let managed = pass.managed_types();
        let mut seen: HashSet<(ClassId, SourceLocation)> = HashSet::new();
        let mut by_file: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut functions: HashMap<(String, String), String> = HashMap::new();
        let mut output = Generation::default();

        for class in &pass.classes {
            if !seen.insert((class.id(), class.annotation.location.clone())) {
                continue;
            }
            match self.build_accessor(class, &managed) {
                Ok(accessor) => {
                    let file = class.location.file.clone();
                    if let Some(existing) = functions.get(&(file.clone(), accessor.function.clone())) {
                        output.errors.push(GenerationError::DuplicateAccessor {
                            class: class.name.clone(),
                            location: class.location.clone(),
                            function: accessor.function,
                            existing: existing.clone(),
                        });
                        continue;
                    }
                    functions.insert((file, accessor.function.clone()), class.name.clone());
                    by_file
                        .entry(class.location.file.clone())
                        .or_default()
                        .push(accessor.code.clone());
                    output.accessors.push(accessor);
                }
                Err(err) => output.errors.push(err),
            }
        }

        for (source, blocks) in by_file {
            let mut contents = format!("// @generated by ferrous-autowire from `{}`. Do not edit.\n", source);
            for block in blocks {
                contents.push('\n');
                contents.push_str(&block);
            }
            output.artifacts.push(Artifact {
                name: self.artifact_name(&source),
                source,
                contents,
            });
        }
        output
    }

    /// Generates the pass and writes its artifacts through `sink`.
    ///
    /// Only a failed primary write aborts; mirror failures become warnings.
    pub fn run(&self, pass: &BuildPass, sink: &mut dyn EmissionSink) -> Result<GenerationReport, EmitError> {
        let generation = self.generate(pass);
        let mut report = GenerationReport {
            accessors: generation.accessors.len(),
            errors: generation.errors,
            ..GenerationReport::default()
        };

        for artifact in &generation.artifacts {
            sink.emit(artifact).map_err(|source| EmitError {
                artifact: artifact.name.clone(),
                source,
            })?;
            if self.config.mirror_beside_inputs {
                if let Err(err) = sink.mirror(artifact) {
                    report
                        .warnings
                        .push(format!("could not mirror {} beside {}: {}", artifact.name, artifact.source, err));
                }
            }
            report.artifacts.push(artifact.name.clone());
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::RegistrationPolicy;

    fn at(line: u32) -> SourceLocation {
        SourceLocation::new("src/services.rs", line, 1)
    }

    #[test]
    fn missing_constructor_is_reported() {
        let class = AnnotatedClass::new("Orphan", at(4));
        let err = Generator::default()
            .build_accessor(&class, &ManagedTypes::new())
            .unwrap_err();
        assert!(matches!(err, GenerationError::NoUsableConstructor { .. }));
        assert_eq!(err.location(), &at(4));
    }

    #[test]
    fn positional_struct_literal_is_rejected() {
        let class = AnnotatedClass::new("Point", at(1)).with_constructor(
            Constructor::struct_literal().param(ConstructorParameter::positional("x", TypeRef::Integer)),
        );
        let err = Generator::default()
            .build_accessor(&class, &ManagedTypes::new())
            .unwrap_err();
        assert!(err.to_string().contains("positional"));
    }

    #[test]
    fn artifact_name_uses_the_file_stem() {
        let generator = Generator::default();
        assert_eq!(generator.artifact_name("src/app/services.rs"), "services.autowire.rs");
        assert_eq!(generator.artifact_name("lib"), "lib.autowire.rs");
    }

    #[test]
    fn optional_struct_fields_fall_back_to_default() {
        let class = AnnotatedClass::new("Settings", at(1)).with_constructor(
            Constructor::struct_literal()
                .param(ConstructorParameter::named("name", TypeRef::Text))
                .param(ConstructorParameter::named("retries", TypeRef::Integer).optional())
                .param(ConstructorParameter::named("verbose", TypeRef::Boolean).optional().with_default("true")),
        );
        let accessor = Generator::default()
            .build_accessor(&class, &ManagedTypes::new())
            .unwrap();
        assert!(accessor.code.contains("name: String::from(\"placeholder\"),"));
        assert!(accessor.code.contains("verbose: true,"));
        assert!(!accessor.code.contains("retries"));
        assert!(accessor.code.contains("..Default::default()"));
        assert_eq!(accessor.policy, RegistrationPolicy::Factory);
    }
}
