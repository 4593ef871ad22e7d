use serde::{Deserialize, Serialize};

/// Normalized representation of one record imported from an integration.
///
/// Timestamps pass through verbatim from the provider; absent values stay
/// absent rather than defaulting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntegrationItem {
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub parent_id: Option<String>,
    pub parent_path_or_name: Option<String>,
    pub creation_time: Option<String>,
    pub last_modified_time: Option<String>,
}
