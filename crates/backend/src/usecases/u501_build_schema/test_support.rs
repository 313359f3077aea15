//! Подставной MetadataClient и фикстуры для тестов use case

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::salesforce_api_client::{ApiResponse, MetadataClient, SalesforceConnection};
use crate::shared::config::SalesforceConfig;

pub const INSTANCE_URL: &str = "https://example.my.salesforce.com";

pub fn test_connection() -> SalesforceConnection {
    SalesforceConnection {
        instance_url: INSTANCE_URL.into(),
        org_id: "00D000000000001".into(),
        access_token: "token".into(),
        api_version: 59,
    }
}

pub fn test_salesforce_config() -> SalesforceConfig {
    SalesforceConfig {
        api_version: 59,
        request_timeout_secs: 120,
    }
}

/// Отдаёт заранее заданные ответы по URL; неизвестный URL считается сетевой ошибкой
#[derive(Default)]
pub struct FakeMetadataClient {
    responses: HashMap<String, ApiResponse>,
    requests: Mutex<Vec<String>>,
}

impl FakeMetadataClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, url: &str, status: u16, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            ApiResponse {
                status,
                body: body.to_string(),
            },
        );
        self
    }

    pub fn with_json(self, url: &str, body: &str) -> Self {
        self.with_response(url, 200, body)
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataClient for FakeMetadataClient {
    async fn get(&self, _connection: &SalesforceConnection, url: &str) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Connection error: no route to {}", url))
    }
}

/// Описание объекта из каталога
pub fn sobject_summary(name: &str, label: &str) -> String {
    format!(
        r#"{{"name": "{name}", "label": "{label}", "custom": {custom}, "urls": {{"describe": "/services/data/v59.0/sobjects/{name}/describe", "sobject": "/services/data/v59.0/sobjects/{name}"}}}}"#,
        name = name,
        label = label,
        custom = name.ends_with("__c"),
    )
}

pub fn describe_url(name: &str) -> String {
    format!("{}/services/data/v59.0/sobjects/{}/describe", INSTANCE_URL, name)
}

pub fn catalog(names: &[(&str, &str)]) -> String {
    let items: Vec<String> = names
        .iter()
        .map(|(name, label)| sobject_summary(name, label))
        .collect();
    format!(
        r#"{{"encoding": "UTF-8", "maxBatchSize": 200, "sobjects": [{}]}}"#,
        items.join(",")
    )
}
