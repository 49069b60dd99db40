use ortserver_common::model::FilterOperatorAndValue;
use serde::{Deserialize, Serialize};

/// Filters for the packages of a run.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageFilters {
    /// Matched against `type:namespace:name:version`
    #[serde(default)]
    pub identifier: Option<FilterOperatorAndValue<String>>,
    #[serde(default)]
    pub purl: Option<FilterOperatorAndValue<String>>,
    #[serde(default)]
    pub processed_declared_license: Option<FilterOperatorAndValue<Vec<String>>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LicenseCount {
    pub license: String,
    pub count: u64,
}
