mod detail;

pub use detail::{detail_records, route_output_name, DetailRecord};

use crate::context::build_context;
use crate::engine::LiquidEngine;
use crate::error::{PreviewError, ProcessingOutcome, ProcessingState};
use crate::sample_data::{MenusData, NavigationMenuModel, SampleDataDocument};
use crate::templates::{TemplateLookup, TemplateStore};
use std::path::{Path, PathBuf};

pub const OUTPUT_EXTENSION: &str = ".html";

/// Files written for one sample data document.
#[derive(Debug, Clone)]
pub struct RenderReport {
    pub sample_data: PathBuf,
    pub main_output: PathBuf,
    pub detail_outputs: Vec<PathBuf>,
    pub state: ProcessingState,
}

impl RenderReport {
    pub fn outcome(&self) -> ProcessingOutcome {
        ProcessingOutcome::from_state(self.state.clone())
    }
}

#[derive(Debug, Clone)]
pub struct BatchFailure {
    pub sample_data: PathBuf,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub reports: Vec<RenderReport>,
    pub failures: Vec<BatchFailure>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.reports.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct ProcessorBuilder {
    templates_dir: PathBuf,
    output_path: PathBuf,
    register_partials: bool,
}

impl ProcessorBuilder {
    pub fn new<P: Into<PathBuf>>(templates_dir: P, output_path: P) -> Self {
        Self {
            templates_dir: templates_dir.into(),
            output_path: output_path.into(),
            register_partials: true,
        }
    }

    /// Make every template in the templates directory available to
    /// `include` / `render`. On by default.
    pub fn register_partials(mut self, enabled: bool) -> Self {
        self.register_partials = enabled;
        self
    }

    pub async fn build(self) -> Result<Processor, PreviewError> {
        let templates = TemplateStore::new(self.templates_dir);
        let engine = if self.register_partials {
            LiquidEngine::for_store(&templates).await?
        } else {
            LiquidEngine::new()?
        };
        tokio::fs::create_dir_all(&self.output_path)
            .await
            .map_err(|source| PreviewError::Write {
                path: self.output_path.clone(),
                source,
            })?;
        tracing::info!(
            "Creating processor with templates {:?} and output {:?}",
            templates.root(),
            self.output_path
        );
        Ok(Processor {
            templates,
            engine,
            output_path: self.output_path,
        })
    }
}

/// Renders sample data documents into HTML files.
pub struct Processor {
    templates: TemplateStore,
    engine: LiquidEngine,
    output_path: PathBuf,
}

impl Processor {
    pub async fn new<P: Into<PathBuf>>(
        templates_dir: P,
        output_path: P,
    ) -> Result<Self, PreviewError> {
        ProcessorBuilder::new(templates_dir, output_path)
            .build()
            .await
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Render one sample data file: its main page plus any detail pages.
    /// The main page is named after the file, e.g. `posts.json` -> `posts.html`.
    pub async fn render_file(&self, sample_data: &Path) -> Result<RenderReport, PreviewError> {
        let document = SampleDataDocument::from_file(sample_data).await?;
        let output_stem = sample_data
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| {
                PreviewError::InvalidSampleData(format!(
                    "Cannot derive an output name from {}",
                    sample_data.display()
                ))
            })?;

        let mut state = ProcessingState::new();
        let navigation_menus = match sample_data.parent() {
            Some(dir) => match MenusData::from_dir(dir).await {
                Ok(menus) => menus.map(MenusData::into_menus).unwrap_or_default(),
                Err(e) => {
                    state.add_warning(
                        format!("Ignoring navigation menus: {}", e.chain().join(": ")),
                        Some("menus".to_string()),
                    );
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let mut report = self
            .render_document(&document, &output_stem, navigation_menus)
            .await?;
        report.sample_data = sample_data.to_path_buf();
        state.merge(report.state);
        report.state = state;
        Ok(report)
    }

    /// Render an already parsed document, writing the main page to
    /// `<output_stem>.html`.
    pub async fn render_document(
        &self,
        document: &SampleDataDocument,
        output_stem: &str,
        navigation_menus: Vec<NavigationMenuModel>,
    ) -> Result<RenderReport, PreviewError> {
        document.validate()?;

        let main_output = self
            .render_main(document, output_stem, navigation_menus.clone())
            .await?;

        let mut state = ProcessingState::new();
        let detail_outputs = self
            .render_detail_pages(document, &navigation_menus, &mut state)
            .await?;

        Ok(RenderReport {
            sample_data: PathBuf::new(),
            main_output,
            detail_outputs,
            state,
        })
    }

    async fn render_main(
        &self,
        document: &SampleDataDocument,
        output_stem: &str,
        navigation_menus: Vec<NavigationMenuModel>,
    ) -> Result<PathBuf, PreviewError> {
        let template = match self.templates.lookup(&document.liquid_file).await? {
            TemplateLookup::Found(template) => template,
            TemplateLookup::Missing(path) => return Err(PreviewError::TemplateNotFound(path)),
        };
        let parsed = self.engine.parse(&template.file_name, &template.source)?;
        let context = build_context(document).with_navigation_menus(navigation_menus);

        tracing::info!("Rendering list/main template {}...", template.file_name);
        let html = self.engine.render(&template.file_name, &parsed, context)?;

        let path = self
            .write_output(&format!("{output_stem}{OUTPUT_EXTENSION}"), &html)
            .await?;
        tracing::info!("Output written to: {}", path.display());
        Ok(path)
    }

    /// Write one rendered page below the output directory, replacing any
    /// existing file.
    async fn write_output(&self, file_name: &str, html: &str) -> Result<PathBuf, PreviewError> {
        let path = self.output_path.join(file_name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| PreviewError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::write(&path, html)
            .await
            .map_err(|source| PreviewError::Write {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }

    /// Render each file in order. A failing file is logged and counted; the
    /// remaining files still render.
    pub async fn render_batch(&self, files: &[PathBuf]) -> BatchSummary {
        tracing::info!("Found {} sample data file(s) to render", files.len());

        let mut summary = BatchSummary::default();
        for file in files {
            match self.render_file(file).await {
                Ok(report) => summary.reports.push(report),
                Err(e) => {
                    e.report();
                    summary.failures.push(BatchFailure {
                        sample_data: file.clone(),
                        messages: e.chain(),
                    });
                }
            }
        }

        tracing::info!(
            "Rendering complete: {} succeeded, {} failed",
            summary.succeeded(),
            summary.failed()
        );
        summary
    }
}
