use anyhow::{Context, Result};

use super::models::ToolingQueryResponse;
use super::salesforce_api_client::{MetadataClient, SalesforceConnection};

/// Тип метаданных макетов страниц
pub const LAYOUT_METADATA_TYPE: &str = "Layout";

/// Получить абсолютные URL всех артефактов указанного типа метаданных через tooling API
pub async fn urls_for_metadata_type(
    client: &dyn MetadataClient,
    connection: &SalesforceConnection,
    metadata_type: &str,
) -> Result<Vec<String>> {
    if metadata_type.is_empty()
        || !metadata_type
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        anyhow::bail!("Invalid metadata type: {:?}", metadata_type);
    }

    let soql = format!("SELECT+Id+FROM+{}", metadata_type);
    let url = connection.tooling_query_url(&soql);
    let response: ToolingQueryResponse = client
        .get(connection, &url)
        .await?
        .json()
        .with_context(|| format!("Failed to list {} metadata", metadata_type))?;

    let mut urls = Vec::with_capacity(response.records.len());
    for record in response.records {
        let relative = record.attributes.and_then(|a| a.url);
        match (relative, record.id) {
            (Some(path), _) => urls.push(connection.absolute_url(&path)),
            (None, Some(id)) => urls.push(connection.tooling_record_url(metadata_type, &id)),
            (None, None) => {
                tracing::warn!("Skipping {} record without url and Id", metadata_type);
            }
        }
    }

    tracing::info!("Found {} {} artifacts", urls.len(), metadata_type);
    Ok(urls)
}
