//! Named pipeline configurations
//!
//! Two pipelines are registered by default:
//! 1. `full` for test-harness sources: visibility, doc-log and annotation
//! 2. `source-under-test` (alias `sut`) for production sources: annotation only

use std::collections::HashMap;
use std::fmt;

/// A rewrite stage that can appear in a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Access labels rewritten to public
    Visibility,

    /// Tagged doc comments turned into log statements
    DocLog,

    /// `[[...]]` attributes wrapped into compiler annotations
    Annotation,
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StageId::Visibility => "visibility",
            StageId::DocLog => "doc-log",
            StageId::Annotation => "annotation",
        };
        f.write_str(name)
    }
}

/// A named, ordered list of stages run after the merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSpec {
    pub name: String,
    pub description: String,
    pub aliases: Vec<String>,
    pub stages: Vec<StageId>,
}

/// Registry of pipeline configurations
#[derive(Debug, Clone)]
pub struct PipelineRegistry {
    pipelines: HashMap<String, PipelineSpec>,
    aliases: HashMap<String, String>,
}

impl PipelineRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        PipelineRegistry {
            pipelines: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    /// Register a pipeline, replacing any previous one of the same name
    pub fn register(&mut self, spec: PipelineSpec) {
        for alias in &spec.aliases {
            self.aliases.insert(alias.clone(), spec.name.clone());
        }
        self.pipelines.insert(spec.name.clone(), spec);
    }

    /// Get a pipeline by name or alias
    pub fn get(&self, name: &str) -> Option<&PipelineSpec> {
        self.pipelines.get(name).or_else(|| {
            self.aliases
                .get(name)
                .and_then(|target| self.pipelines.get(target))
        })
    }

    /// List all pipelines (sorted by name)
    pub fn list_all(&self) -> Vec<&PipelineSpec> {
        let mut pipelines: Vec<_> = self.pipelines.values().collect();
        pipelines.sort_by(|a, b| a.name.cmp(&b.name));
        pipelines
    }

    /// Create registry with the standard pipelines
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(PipelineSpec {
            name: "full".into(),
            description: "Test harness: visibility + doc-log + annotation".into(),
            aliases: Vec::new(),
            stages: vec![StageId::Visibility, StageId::DocLog, StageId::Annotation],
        });

        registry.register(PipelineSpec {
            name: "source-under-test".into(),
            description: "Production source: annotation only".into(),
            aliases: vec!["sut".into()],
            stages: vec![StageId::Annotation],
        });

        registry
    }
}

impl Default for PipelineRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
