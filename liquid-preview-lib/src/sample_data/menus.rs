use crate::error::PreviewError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Contents of a `menus.json` companion file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenusData {
    #[serde(default)]
    pub menus: Option<Vec<NavigationMenuModel>>,
}

impl MenusData {
    /// Load `menus.json` from a sample data directory. A directory without
    /// one yields `Ok(None)`.
    pub async fn from_dir(dir: impl AsRef<Path>) -> Result<Option<Self>, PreviewError> {
        let path = dir.as_ref().join(crate::config::MENUS_FILE_NAME);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(None);
        }
        tracing::debug!("Loading navigation menus from {}", path.display());
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| PreviewError::Read {
                path: path.clone(),
                source,
            })?;
        let menus = serde_json::from_slice(&bytes)
            .map_err(|source| PreviewError::Parse { path, source })?;
        Ok(Some(menus))
    }

    pub fn into_menus(self) -> Vec<NavigationMenuModel> {
        self.menus.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationMenuModel {
    #[serde(rename = "Id", default)]
    pub id: String,
    #[serde(rename = "Label", default)]
    pub label: String,
    #[serde(rename = "DeveloperName", default)]
    pub developer_name: String,
    #[serde(rename = "IsMainMenu", default)]
    pub is_main_menu: bool,
    #[serde(rename = "MenuItems", default)]
    pub menu_items: Option<Vec<NavigationMenuItemModel>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationMenuItemModel {
    #[serde(rename = "Id", default)]
    pub id: String,
    #[serde(rename = "Label", default)]
    pub label: String,
    #[serde(rename = "Url", default)]
    pub url: String,
    #[serde(rename = "IsDisabled", default)]
    pub is_disabled: bool,
    #[serde(rename = "OpenInNewTab", default)]
    pub open_in_new_tab: bool,
    #[serde(rename = "CssClassName", default)]
    pub css_class_name: Option<String>,
    #[serde(rename = "Ordinal", default)]
    pub ordinal: i32,
    #[serde(rename = "IsFirstItem", default)]
    pub is_first_item: bool,
    #[serde(rename = "IsLastItem", default)]
    pub is_last_item: bool,
    #[serde(rename = "MenuItems", default)]
    pub menu_items: Option<Vec<NavigationMenuItemModel>>,
}
