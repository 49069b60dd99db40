use ortserver_common::model::OptionalValue;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateOrganization {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Changes to an organization, absent fields stay as they are.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOrganization {
    #[serde(default)]
    pub name: OptionalValue<String>,
    #[serde(default)]
    pub description: OptionalValue<Option<String>>,
}
