//! Where generated artifacts go.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One generated file: every accessor declared in one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name of the artifact, e.g. `services.autowire.rs`.
    pub name: String,
    /// Input file the accessors were generated from.
    pub source: String,
    pub contents: String,
}

/// Destination for generated artifacts.
pub trait EmissionSink {
    /// Writes the primary copy. A failure here fails the artifact.
    fn emit(&mut self, artifact: &Artifact) -> io::Result<()>;

    /// Writes a secondary copy next to the input. Failures are reported as
    /// warnings.
    fn mirror(&mut self, _artifact: &Artifact) -> io::Result<()> {
        Ok(())
    }
}

/// Keeps artifacts in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub artifacts: Vec<Artifact>,
    /// Names of artifacts that were mirrored.
    pub mirrored: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|artifact| artifact.name == name)
    }
}

impl EmissionSink for MemorySink {
    fn emit(&mut self, artifact: &Artifact) -> io::Result<()> {
        self.artifacts.push(artifact.clone());
        Ok(())
    }

    fn mirror(&mut self, artifact: &Artifact) -> io::Result<()> {
        self.mirrored.push(artifact.name.clone());
        Ok(())
    }
}

/// Writes artifacts under a cache directory and, optionally, beside the
/// input file they came from.
#[derive(Debug, Clone)]
pub struct FsSink {
    root: PathBuf,
    mirror: bool,
}

impl FsSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mirror: false,
        }
    }

    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path the primary copy of `artifact` is written to.
    pub fn artifact_path(&self, artifact: &Artifact) -> PathBuf {
        self.root.join(&artifact.name)
    }

    /// Path of the mirrored copy, beside the input file.
    pub fn mirror_path(&self, artifact: &Artifact) -> PathBuf {
        Path::new(&artifact.source).with_file_name(&artifact.name)
    }
}

impl EmissionSink for FsSink {
    fn emit(&mut self, artifact: &Artifact) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        write_if_changed(&self.artifact_path(artifact), &artifact.contents)
    }

    fn mirror(&mut self, artifact: &Artifact) -> io::Result<()> {
        if !self.mirror {
            return Ok(());
        }
        write_if_changed(&self.mirror_path(artifact), &artifact.contents)
    }
}

// Leaves identical files untouched so mtimes stay stable across rebuilds.
fn write_if_changed(path: &Path, contents: &str) -> io::Result<()> {
    match fs::read_to_string(path) {
        Ok(existing) if existing == contents => Ok(()),
        _ => fs::write(path, contents),
    }
}
