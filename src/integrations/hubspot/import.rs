use crate::config::HubSpotConfig;
use crate::error::AppError;
use crate::integrations::hubspot::mapper::map_object;
use crate::integrations::item::IntegrationItem;

/// Property set requested for every contact.
const CONTACT_PROPERTIES: &str =
    "firstname,lastname,email,createdate,lastmodifieddate,company,phone,jobtitle";

/// Single page, no pagination.
const PAGE_LIMIT: &str = "100";

/// Fetch one page of contacts and map each record into an IntegrationItem,
/// preserving the provider's order.
///
/// This is synchronous blocking I/O with no timeout of its own; callers on an
/// async runtime must offload it with `spawn_blocking`. A non-200 response
/// degrades to an empty list rather than an error.
pub fn fetch_items(
    config: &HubSpotConfig,
    credentials: &str,
) -> Result<Vec<IntegrationItem>, AppError> {
    let credentials: serde_json::Value = serde_json::from_str(credentials)
        .map_err(|e| AppError::InvalidCredentials(e.to_string()))?;
    let access_token = credentials
        .get("access_token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| AppError::InvalidCredentials("missing access_token".to_string()))?;

    let url = format!(
        "{}/crm/v3/objects/contacts",
        config.api_base_url.trim_end_matches('/')
    );

    let client = reqwest::blocking::Client::new();
    let response = client
        .get(url)
        .bearer_auth(access_token)
        .query(&[("limit", PAGE_LIMIT), ("properties", CONTACT_PROPERTIES)])
        .send()
        .map_err(|e| AppError::Internal(format!("contacts request failed: {e}")))?;

    if response.status() != reqwest::StatusCode::OK {
        tracing::warn!(
            status = %response.status(),
            "contacts request returned non-200, importing no items"
        );
        return Ok(Vec::new());
    }

    let body: serde_json::Value = response
        .json()
        .map_err(|e| AppError::Internal(format!("invalid contacts response: {e}")))?;

    let items: Vec<IntegrationItem> = body
        .get("results")
        .and_then(|v| v.as_array())
        .map(|records| {
            records
                .iter()
                .map(|record| map_object(record, "Contact", None, None))
                .collect()
        })
        .unwrap_or_default();

    tracing::debug!(count = items.len(), "imported HubSpot contacts");
    Ok(items)
}
