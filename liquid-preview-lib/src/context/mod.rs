//! Rendering contexts built from sample data.

use crate::error::PreviewError;
use crate::sample_data::{
    ContentTypeModel, NavigationMenuModel, OrganizationModel, SampleDataDocument, UserModel,
};
use crate::value::{DynamicList, DynamicMap, DynamicValue};
use serde::Serialize;

/// Everything one render call sees. Built fresh for every render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderingContext {
    pub target: DynamicValue,
    pub content_type: ContentTypeModel,
    pub current_organization: OrganizationModel,
    pub current_user: UserModel,
    pub path_base: String,
    pub query_params: Vec<(String, String)>,
    pub navigation_menus: Vec<NavigationMenuModel>,
}

/// Context for the document's main template.
pub fn build_context(document: &SampleDataDocument) -> RenderingContext {
    assemble(document, DynamicValue::from_json(&document.target))
}

/// Context for a detail page: the record replaces the target, everything
/// else comes from the parent document.
pub fn build_detail_context(
    document: &SampleDataDocument,
    detail_record: DynamicMap,
) -> RenderingContext {
    assemble(document, DynamicValue::Map(detail_record))
}

fn assemble(document: &SampleDataDocument, target: DynamicValue) -> RenderingContext {
    RenderingContext {
        target,
        content_type: document.content_type.clone().unwrap_or_default(),
        current_organization: document
            .current_organization
            .clone()
            .unwrap_or_else(OrganizationModel::sample),
        current_user: document.current_user.clone().unwrap_or_default(),
        path_base: document.path_base.clone().unwrap_or_default(),
        query_params: document.query_params.clone().unwrap_or_default(),
        navigation_menus: Vec::new(),
    }
}

fn to_dynamic<T: Serialize>(model: &T) -> Result<DynamicValue, PreviewError> {
    Ok(DynamicValue::from(serde_json::to_value(model)?))
}

impl RenderingContext {
    pub fn with_navigation_menus(self, navigation_menus: Vec<NavigationMenuModel>) -> Self {
        Self {
            navigation_menus,
            ..self
        }
    }

    /// The global variables templates are rendered against.
    pub fn into_globals(self) -> Result<DynamicMap, PreviewError> {
        let mut user = match to_dynamic(&self.current_user)? {
            DynamicValue::Map(map) => map,
            _ => DynamicMap::new(),
        };
        user.insert("FullName", self.current_user.full_name());

        let main_menu = match self.navigation_menus.iter().find(|menu| menu.is_main_menu) {
            Some(menu) => to_dynamic(menu)?,
            None => DynamicValue::Null,
        };
        let menus = self
            .navigation_menus
            .iter()
            .map(to_dynamic)
            .collect::<Result<DynamicList, _>>()?;

        let query_params: DynamicMap = self
            .query_params
            .into_iter()
            .map(|(key, value)| (key, DynamicValue::String(value)))
            .collect();

        let mut globals = DynamicMap::new();
        globals.insert("Target", self.target);
        globals.insert("ContentType", to_dynamic(&self.content_type)?);
        globals.insert(
            "CurrentOrganization",
            to_dynamic(&self.current_organization)?,
        );
        globals.insert("CurrentUser", user);
        globals.insert("PathBase", self.path_base);
        globals.insert("QueryParams", query_params);
        globals.insert("NavigationMenus", menus);
        globals.insert("MainMenu", main_menu);
        Ok(globals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: serde_json::Value) -> SampleDataDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_defaults() {
        let context = build_context(&document(json!({"liquid_file": "list"})));

        assert_eq!(context.current_organization.organization_name, "Sample Organization");
        assert_eq!(context.current_organization.time_zone, "UTC");
        assert!(!context.current_user.is_authenticated);
        assert_eq!(context.current_user.full_name(), "");
        assert_eq!(context.content_type, ContentTypeModel::default());
        assert_eq!(context.path_base, "");
        assert!(context.query_params.is_empty());
        assert!(context.target.is_null());
        assert!(context.navigation_menus.is_empty());
    }

    #[test]
    fn test_target_is_converted() {
        let context = build_context(&document(json!({
            "liquid_file": "list",
            "Target": {"Title": "Posts", "Count": 3}
        })));

        let target = context.target.as_map().unwrap();
        assert_eq!(target.get_str("title"), Some("Posts"));
        assert_eq!(target.get("COUNT"), Some(&DynamicValue::Integer(3)));
    }

    #[test]
    fn test_detail_context_inherits_everything_but_target() {
        let parent = document(json!({
            "liquid_file": "list",
            "Target": {"Items": [{"Title": "a"}]},
            "ContentType": {"LabelPlural": "Posts"},
            "CurrentOrganization": {"OrganizationName": "Acme", "TimeZone": "Europe/Paris"},
            "CurrentUser": {"IsAuthenticated": true, "FirstName": "Ada"},
            "PathBase": "/blog",
            "QueryParams": {"page": "1"}
        }));
        let mut record = DynamicMap::new();
        record.insert("Title", "a");

        let main = build_context(&parent);
        let detail = build_detail_context(&parent, record.clone());

        assert_eq!(detail.target, DynamicValue::Map(record));
        assert_ne!(detail.target, main.target);
        assert_eq!(detail.content_type, main.content_type);
        assert_eq!(detail.current_organization, main.current_organization);
        assert_eq!(detail.current_user, main.current_user);
        assert_eq!(detail.path_base, "/blog");
        assert_eq!(detail.query_params, main.query_params);
    }

    #[test]
    fn test_globals() {
        let context = build_context(&document(json!({
            "liquid_file": "list",
            "Target": {"Title": "Posts"},
            "CurrentUser": {"FirstName": "Ada", "LastName": "Lovelace"},
            "QueryParams": {"sort": "desc", "page": "2"}
        })))
        .with_navigation_menus(vec![
            NavigationMenuModel {
                developer_name: "footer".to_string(),
                ..NavigationMenuModel::default()
            },
            NavigationMenuModel {
                developer_name: "main_menu".to_string(),
                is_main_menu: true,
                ..NavigationMenuModel::default()
            },
        ]);

        let globals = context.into_globals().unwrap();
        let keys: Vec<&str> = globals.keys().collect();
        assert_eq!(
            keys,
            vec![
                "Target",
                "ContentType",
                "CurrentOrganization",
                "CurrentUser",
                "PathBase",
                "QueryParams",
                "NavigationMenus",
                "MainMenu"
            ]
        );

        let user = globals.get("currentuser").and_then(DynamicValue::as_map).unwrap();
        assert_eq!(user.get_str("fullname"), Some("Ada Lovelace"));
        assert_eq!(user.get("IsAuthenticated"), Some(&DynamicValue::Bool(false)));

        let organization = globals
            .get("CurrentOrganization")
            .and_then(DynamicValue::as_map)
            .unwrap();
        assert_eq!(
            organization.get_str("organizationname"),
            Some("Sample Organization")
        );

        let query = globals.get("QueryParams").and_then(DynamicValue::as_map).unwrap();
        assert_eq!(query.get_str("SORT"), Some("desc"));
        assert_eq!(query.keys().collect::<Vec<_>>(), vec!["sort", "page"]);

        assert_eq!(globals.get("NavigationMenus").unwrap().as_list().unwrap().len(), 2);
        let main_menu = globals.get("MainMenu").and_then(DynamicValue::as_map).unwrap();
        assert_eq!(main_menu.get_str("DeveloperName"), Some("main_menu"));
    }

    #[test]
    fn test_main_menu_is_null_without_menus() {
        let globals = build_context(&document(json!({"liquid_file": "list"})))
            .into_globals()
            .unwrap();
        assert!(globals.get("MainMenu").unwrap().is_null());
        assert!(globals.get("NavigationMenus").unwrap().as_list().unwrap().is_empty());
    }
}
