use crate::integrations::item::IntegrationItem;
use serde_json::Value;

/// Convert one HubSpot API record into an IntegrationItem. Pure function, no
/// I/O.
///
/// Name resolution: companies use the `name` property with an "Unnamed
/// Company" placeholder; contacts join first and last name, falling back to
/// the email property, then to "Unnamed Contact". Timestamps and the record
/// id pass through verbatim.
pub fn map_object(
    record: &Value,
    item_type: &str,
    parent_id: Option<&str>,
    parent_name: Option<&str>,
) -> IntegrationItem {
    let properties = record.get("properties");

    let name = if item_type == "Company" {
        prop(properties, "name").unwrap_or_else(|| "Unnamed Company".to_string())
    } else {
        let firstname = prop(properties, "firstname").unwrap_or_default();
        let lastname = prop(properties, "lastname").unwrap_or_default();
        let full = format!("{firstname} {lastname}").trim().to_string();
        if full.is_empty() {
            prop(properties, "email").unwrap_or_else(|| "Unnamed Contact".to_string())
        } else {
            full
        }
    };

    IntegrationItem {
        id: record.get("id").and_then(value_to_string),
        name,
        item_type: item_type.to_string(),
        parent_id: parent_id.map(str::to_string),
        parent_path_or_name: parent_name.map(str::to_string),
        creation_time: prop(properties, "createdate"),
        last_modified_time: prop(properties, "lastmodifieddate"),
    }
}

/// Non-empty string property, or None.
fn prop(properties: Option<&Value>, key: &str) -> Option<String> {
    properties?
        .get(key)?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
