use super::{Processor, OUTPUT_EXTENSION};
use crate::context::build_detail_context;
use crate::error::{PreviewError, ProcessingState};
use crate::sample_data::{NavigationMenuModel, SampleDataDocument};
use crate::templates::{TemplateLookup, TemplateStore};
use crate::utils::{is_contained_relative_path, with_extension_if_missing};
use crate::value::{DynamicMap, DynamicValue};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const ITEMS_KEY: &str = "Items";
pub const DETAIL_TEMPLATE_KEY: &str = "detail_liquid_file";
pub const ROUTE_PATH_KEY: &str = "RoutePath";

/// An item of the target's list that asks for its own page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetailRecord<'a> {
    pub template: &'a str,
    pub route_path: Option<&'a str>,
    pub fields: &'a DynamicMap,
}

/// Items of `target.Items` that are maps with a non-empty detail template.
/// Anything else, including a target without an item list, yields nothing.
pub fn detail_records(target: &DynamicValue) -> Vec<DetailRecord<'_>> {
    let Some(items) = target
        .as_map()
        .and_then(|target| target.get(ITEMS_KEY))
        .and_then(DynamicValue::as_list)
    else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(DynamicValue::as_map)
        .filter_map(|fields| {
            let template = fields.get_str(DETAIL_TEMPLATE_KEY)?;
            (!template.is_empty()).then_some(DetailRecord {
                template,
                route_path: fields.get_str(ROUTE_PATH_KEY),
                fields,
            })
        })
        .collect()
}

/// Output file name for a route, or `None` when the route is empty or would
/// leave the output directory.
pub fn route_output_name(route: &str) -> Option<String> {
    if route.is_empty() || !is_contained_relative_path(Path::new(route)) {
        return None;
    }
    Some(with_extension_if_missing(route, OUTPUT_EXTENSION))
}

impl Processor {
    /// Render one page per detail record. Parsed templates are shared between
    /// records of this document; problems with a single record are recorded
    /// in `state` and the record is skipped.
    pub(super) async fn render_detail_pages(
        &self,
        document: &SampleDataDocument,
        navigation_menus: &[NavigationMenuModel],
        state: &mut ProcessingState,
    ) -> Result<Vec<PathBuf>, PreviewError> {
        let target = DynamicValue::from_json(&document.target);
        let records = detail_records(&target);
        if records.is_empty() {
            return Ok(Vec::new());
        }
        tracing::info!("Rendering {} detail page(s)...", records.len());

        let mut cache: HashMap<String, liquid::Template> = HashMap::new();
        let mut outputs = Vec::new();

        for record in records {
            let file_name = TemplateStore::file_name(record.template);
            let template = match cache.entry(file_name.clone()) {
                Entry::Occupied(entry) => {
                    tracing::debug!("Reusing parsed detail template {}", file_name);
                    entry.into_mut()
                }
                Entry::Vacant(entry) => match self.templates.lookup(record.template).await? {
                    TemplateLookup::Found(template) => {
                        entry.insert(self.engine.parse(&template.file_name, &template.source)?)
                    }
                    TemplateLookup::Missing(path) => {
                        state.add_warning(
                            format!("Detail template not found: {}", path.display()),
                            Some("detail_template".to_string()),
                        );
                        continue;
                    }
                },
            };

            let Some(output_name) = record.route_path.and_then(route_output_name) else {
                state.add_warning(
                    format!(
                        "Skipping detail page for {}: missing or invalid {} {:?}",
                        file_name, ROUTE_PATH_KEY, record.route_path
                    ),
                    Some("route_path".to_string()),
                );
                continue;
            };

            let context = build_detail_context(document, record.fields.clone())
                .with_navigation_menus(navigation_menus.to_vec());
            let html = self.engine.render(&file_name, template, context)?;
            let path = self.write_output(&output_name, &html).await?;
            tracing::info!("  - {}", output_name);
            outputs.push(path);
        }

        Ok(outputs)
    }
}
