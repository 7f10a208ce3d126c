//! Liquid Template Preview Library
//!
//! This library renders Liquid page templates against JSON sample data so
//! that templates can be inspected as static HTML without running the
//! content platform they belong to.

mod config;
mod context;
mod engine;
mod error;
mod processor;
mod sample_data;
mod templates;
mod utils;
mod value;

pub use config::{discover_sample_files, find_project_root, PreviewConfig, MENUS_FILE_NAME};
pub use context::{build_context, build_detail_context, RenderingContext};
pub use engine::LiquidEngine;
pub use error::{PreviewError, ProcessingMessage, ProcessingOutcome, ProcessingState};
pub use processor::{
    detail_records, route_output_name, BatchFailure, BatchSummary, DetailRecord, Processor,
    ProcessorBuilder, RenderReport,
};
pub use sample_data::{
    ChoiceModel, ContentTypeFieldModel, ContentTypeModel, MenusData, NavigationMenuItemModel,
    NavigationMenuModel, OrganizationModel, SampleDataDocument, UserModel,
};
pub use templates::{TemplateLookup, TemplateSource, TemplateStore};
pub use value::{DynamicList, DynamicMap, DynamicValue};
