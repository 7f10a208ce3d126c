mod menus;

pub use menus::{MenusData, NavigationMenuItemModel, NavigationMenuModel};

use crate::error::PreviewError;
use crate::utils::parse_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;

pub const DEFAULT_ORGANIZATION_NAME: &str = "Sample Organization";
pub const DEFAULT_TIME_ZONE: &str = "UTC";

fn default_time_zone() -> String {
    DEFAULT_TIME_ZONE.to_string()
}

/// Root structure of a sample data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleDataDocument {
    #[serde(rename = "liquid_file", default)]
    pub liquid_file: String,
    #[serde(rename = "Target", default)]
    pub target: serde_json::Value,
    #[serde(rename = "ContentType", default)]
    pub content_type: Option<ContentTypeModel>,
    #[serde(rename = "CurrentOrganization", default)]
    pub current_organization: Option<OrganizationModel>,
    #[serde(rename = "CurrentUser", default)]
    pub current_user: Option<UserModel>,
    #[serde(rename = "PathBase", default)]
    pub path_base: Option<String>,
    #[serde(
        rename = "QueryParams",
        default,
        deserialize_with = "deserialize_query_params",
        serialize_with = "serialize_query_params"
    )]
    pub query_params: Option<Vec<(String, String)>>,
}

impl SampleDataDocument {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Read, parse and validate a sample data file.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, PreviewError> {
        let path = path.as_ref();
        tracing::info!("Loading sample data from: {}", path.display());
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| PreviewError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let document = Self::from_slice(&bytes).map_err(|source| PreviewError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        document.validate()?;
        Ok(document)
    }

    pub fn validate(&self) -> Result<(), PreviewError> {
        if self.liquid_file.is_empty() {
            return Err(PreviewError::InvalidSampleData(
                "Sample data must specify 'liquid_file' property".into(),
            ));
        }
        Ok(())
    }
}

/// Content type metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentTypeModel {
    #[serde(rename = "LabelPlural", default)]
    pub label_plural: String,
    #[serde(rename = "LabelSingular", default)]
    pub label_singular: String,
    #[serde(rename = "DeveloperName", default)]
    pub developer_name: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "ContentTypeFields", default)]
    pub content_type_fields: Option<Vec<ContentTypeFieldModel>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentTypeFieldModel {
    #[serde(rename = "Label", default)]
    pub label: String,
    #[serde(rename = "DeveloperName", default)]
    pub developer_name: String,
    #[serde(rename = "FieldType", default)]
    pub field_type: String,
    #[serde(rename = "Choices", default)]
    pub choices: Option<Vec<ChoiceModel>>,
}

/// Choice for dropdown, radio and multiple select fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChoiceModel {
    #[serde(rename = "Label", default)]
    pub label: String,
    #[serde(rename = "DeveloperName", default)]
    pub developer_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationModel {
    #[serde(rename = "OrganizationName", default)]
    pub organization_name: String,
    #[serde(rename = "TimeZone", default = "default_time_zone")]
    pub time_zone: String,
}

impl OrganizationModel {
    /// Organization used when the sample data does not describe one.
    pub fn sample() -> Self {
        Self {
            organization_name: DEFAULT_ORGANIZATION_NAME.to_string(),
            time_zone: default_time_zone(),
        }
    }
}

impl Default for OrganizationModel {
    fn default() -> Self {
        Self {
            organization_name: String::new(),
            time_zone: default_time_zone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserModel {
    #[serde(rename = "IsAuthenticated", default)]
    pub is_authenticated: bool,
    #[serde(rename = "IsAdmin", default)]
    pub is_admin: bool,
    #[serde(rename = "UserId", default)]
    pub user_id: String,
    #[serde(rename = "FirstName", default)]
    pub first_name: String,
    #[serde(rename = "LastName", default)]
    pub last_name: String,
    #[serde(rename = "EmailAddress", default)]
    pub email_address: String,
    #[serde(rename = "Roles", default)]
    pub roles: Option<Vec<String>>,
    #[serde(rename = "UserGroups", default)]
    pub user_groups: Option<Vec<String>>,
    #[serde(
        rename = "LastModificationTime",
        default,
        deserialize_with = "deserialize_timestamp"
    )]
    pub last_modification_time: Option<DateTime<Utc>>,
}

impl UserModel {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_timestamp(&raw).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!("Invalid LastModificationTime: {raw:?}"))
        }),
    }
}

/// Query parameters keep the order they have in the file.
fn deserialize_query_params<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<(String, String)>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(params) = Option::<serde_json::Map<String, serde_json::Value>>::deserialize(deserializer)?
    else {
        return Ok(None);
    };
    params
        .into_iter()
        .map(|(key, value)| match value {
            serde_json::Value::String(value) => Ok((key, value)),
            other => Err(serde::de::Error::custom(format!(
                "QueryParams value for {key:?} must be a string, got {other}"
            ))),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn serialize_query_params<S>(
    params: &Option<Vec<(String, String)>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match params {
        Some(params) => serializer.collect_map(params.iter().map(|(key, value)| (key, value))),
        None => serializer.serialize_none(),
    }
}
