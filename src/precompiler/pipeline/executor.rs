//! Pipeline executor that merges a root file and runs the selected stages

use crate::precompiler::error::PipelineError;
use crate::precompiler::merging::{HeaderMerger, MergeReport, SearchPaths};
use crate::precompiler::pipeline::config::{PipelineRegistry, PipelineSpec, StageId};
use crate::precompiler::rewriting::{
    AnnotationRewriter, DocLogTransformer, RewriteStage, VisibilityNormalizer,
};
use crate::precompiler::settings::Settings;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Output from pipeline execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutput {
    /// The merged and rewritten translation unit
    pub text: String,
    pub report: MergeReport,
}

/// Executes named pipelines
#[derive(Debug, Clone, Default)]
pub struct PipelineExecutor {
    registry: PipelineRegistry,
    settings: Settings,
}

impl PipelineExecutor {
    /// Create executor with the default pipelines and settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create executor with the default pipelines and custom settings
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            registry: PipelineRegistry::with_defaults(),
            settings,
        }
    }

    /// Create executor with a custom registry
    pub fn with_registry(registry: PipelineRegistry, settings: Settings) -> Self {
        Self { registry, settings }
    }

    pub fn registry(&self) -> &PipelineRegistry {
        &self.registry
    }

    /// Merge `root` and run the named pipeline over the result.
    pub fn execute(
        &self,
        pipeline: &str,
        root: &Path,
        search: &SearchPaths,
    ) -> Result<ExecutionOutput, PipelineError> {
        let spec = self.lookup(pipeline)?;
        log::info!("pipeline '{}' on {}", spec.name, root.display());

        let merged = HeaderMerger::new(search, &self.settings.markers).merge(root)?;
        let text = self.run_stages(spec, merged.text)?;
        Ok(ExecutionOutput {
            text,
            report: merged.report,
        })
    }

    /// Like [`execute`](Self::execute), then write the result to `output`.
    ///
    /// Nothing is written unless every step succeeded. The optional merge
    /// report is written as pretty-printed JSON.
    pub fn execute_to_file(
        &self,
        pipeline: &str,
        root: &Path,
        search: &SearchPaths,
        output: &Path,
        report: Option<&Path>,
    ) -> Result<ExecutionOutput, PipelineError> {
        let result = self.execute(pipeline, root, search)?;

        let report_json = report
            .map(|_| serde_json::to_string_pretty(&result.report))
            .transpose()?;
        write_atomically(output, &result.text)?;
        if let (Some(path), Some(json)) = (report, report_json) {
            write_atomically(path, &json)?;
        }
        Ok(result)
    }

    /// Run the stages of `spec` over already-merged `text`.
    pub fn run_stages(&self, spec: &PipelineSpec, text: String) -> Result<String, PipelineError> {
        let mut text = text;
        for &id in &spec.stages {
            let stage = self.build_stage(id);
            log::debug!("running stage '{}'", stage.name());
            text = stage.rewrite(&text)?;
        }
        Ok(text)
    }

    /// Instantiate the stage behind `id` from the current settings.
    pub fn build_stage(&self, id: StageId) -> Box<dyn RewriteStage> {
        match id {
            StageId::Visibility => Box::new(VisibilityNormalizer::new(&self.settings.visibility)),
            StageId::DocLog => Box::new(DocLogTransformer::new(&self.settings.doc_log)),
            StageId::Annotation => Box::new(AnnotationRewriter::new(&self.settings.annotation)),
        }
    }

    fn lookup(&self, pipeline: &str) -> Result<&PipelineSpec, PipelineError> {
        self.registry
            .get(pipeline)
            .ok_or_else(|| PipelineError::UnknownPipeline(pipeline.to_string()))
    }
}

/// Write `contents` next to `path` first and rename it into place.
fn write_atomically(path: &Path, contents: &str) -> Result<(), PipelineError> {
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    let to_error = |source: io::Error| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    };
    fs::write(&staging, contents).map_err(to_error)?;
    fs::rename(&staging, path).map_err(|source| {
        let _ = fs::remove_file(&staging);
        to_error(source)
    })
}
