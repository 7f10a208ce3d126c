mod loops;
mod view;

use crate::context::RenderingContext;
use crate::error::PreviewError;
use crate::templates::{TemplateSource, TemplateStore, TEMPLATE_EXTENSION};
use liquid::partials::{InMemorySource, LazyCompiler};

// Partials are parsed on first use, so one broken template does not block the rest.
type Partials = LazyCompiler<InMemorySource>;

/// Parses and renders Liquid templates with the standard filters and tags.
pub struct LiquidEngine {
    parser: liquid::Parser,
}

impl LiquidEngine {
    pub fn new() -> Result<Self, PreviewError> {
        Self::with_partials(Vec::new())
    }

    /// Build an engine whose `include` / `render` tags resolve against the
    /// given templates, by file name or by file stem.
    pub fn with_partials(templates: Vec<TemplateSource>) -> Result<Self, PreviewError> {
        let mut partials = Partials::empty();
        for template in templates {
            let stem = template
                .file_name
                .strip_suffix(TEMPLATE_EXTENSION)
                .map(str::to_string);
            if let Some(stem) = stem {
                partials.add(stem, template.source.clone());
            }
            partials.add(template.file_name, template.source);
        }

        let parser = liquid::ParserBuilder::with_stdlib()
            .block(loops::ForBlock)
            .partials(partials)
            .build()
            .map_err(|source| PreviewError::Render {
                name: "partials".to_string(),
                source,
            })?;
        Ok(Self { parser })
    }

    /// Engine with every template of `store` registered as a partial.
    pub async fn for_store(store: &TemplateStore) -> Result<Self, PreviewError> {
        let templates = store.partial_sources().await?;
        tracing::debug!(
            "Registered {} partial template(s) from {}",
            templates.len(),
            store.root().display()
        );
        Self::with_partials(templates)
    }

    pub fn parse(&self, name: &str, source: &str) -> Result<liquid::Template, PreviewError> {
        self.parser
            .parse(source)
            .map_err(|source| PreviewError::Render {
                name: name.to_string(),
                source,
            })
    }

    pub fn render(
        &self,
        name: &str,
        template: &liquid::Template,
        context: RenderingContext,
    ) -> Result<String, PreviewError> {
        let globals = context.into_globals()?;
        template
            .render(&globals)
            .map_err(|source| PreviewError::Render {
                name: name.to_string(),
                source,
            })
    }
}
