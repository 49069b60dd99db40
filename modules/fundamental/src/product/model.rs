use ortserver_common::model::OptionalValue;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProduct {
    #[serde(default)]
    pub name: OptionalValue<String>,
    #[serde(default)]
    pub description: OptionalValue<Option<String>>,
}
