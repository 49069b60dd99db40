use ortserver_common::model::OptionalValue;
use ortserver_model::RepositoryType;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateRepository {
    #[serde(rename = "type")]
    pub r#type: RepositoryType,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRepository {
    #[serde(default, rename = "type")]
    pub r#type: OptionalValue<RepositoryType>,
    #[serde(default)]
    pub url: OptionalValue<String>,
    #[serde(default)]
    pub description: OptionalValue<Option<String>>,
}
