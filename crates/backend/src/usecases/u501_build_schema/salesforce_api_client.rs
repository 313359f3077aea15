use anyhow::Result;
use async_trait::async_trait;
use contracts::domain::a001_schema::aggregate::Schema;

/// Параметры подключения одного запуска к REST API Salesforce
#[derive(Debug, Clone)]
pub struct SalesforceConnection {
    pub instance_url: String,
    pub org_id: String,
    pub access_token: String,
    pub api_version: u32,
}

impl SalesforceConnection {
    pub fn from_schema(schema: &Schema, api_version: u32) -> Self {
        Self {
            instance_url: schema.instance_url.trim_end_matches('/').to_string(),
            org_id: schema.org_id.clone(),
            access_token: schema.access_token.clone(),
            api_version,
        }
    }

    fn data_path(&self) -> String {
        format!("{}/services/data/v{}.0", self.instance_url, self.api_version)
    }

    /// URL каталога всех объектов (describe global)
    pub fn describe_global_url(&self) -> String {
        format!("{}/sobjects/", self.data_path())
    }

    /// URL tooling query, `soql` уже закодирован для query string
    pub fn tooling_query_url(&self, soql: &str) -> String {
        format!("{}/tooling/query/?q={}", self.data_path(), soql)
    }

    /// URL записи tooling API по типу и Id
    pub fn tooling_record_url(&self, sobject_type: &str, id: &str) -> String {
        format!("{}/tooling/sobjects/{}/{}", self.data_path(), sobject_type, id)
    }

    /// Превратить путь из ответа API ("/services/data/...") в абсолютный URL
    pub fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.instance_url, path)
        } else {
            format!("{}/{}", self.instance_url, path)
        }
    }
}

/// Ответ удалённого API: статус и тело как есть
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Тело как JSON; для неуспешного статуса ошибка с телом ответа
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        if !self.is_success() {
            anyhow::bail!("Request failed with status {}: {}", self.status, preview(&self.body));
        }
        serde_json::from_str::<T>(&self.body).map_err(|e| {
            anyhow::anyhow!("Failed to parse JSON: {}. Response: {}", e, preview(&self.body))
        })
    }
}

/// Аутентифицированный доступ к метаданным удалённой CRM
#[async_trait]
pub trait MetadataClient: Send + Sync {
    /// GET с bearer-токеном. Сетевые ошибки возвращаются как Err,
    /// неуспешный HTTP-статус возвращается вместе с телом.
    async fn get(&self, connection: &SalesforceConnection, url: &str) -> Result<ApiResponse>;
}

/// HTTP-клиент для REST API Salesforce
pub struct SalesforceApiClient {
    client: reqwest::Client,
}

impl SalesforceApiClient {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl MetadataClient for SalesforceApiClient {
    async fn get(&self, connection: &SalesforceConnection, url: &str) -> Result<ApiResponse> {
        tracing::info!("GET {} (org {})", url, connection.org_id);
        let start_time = std::time::Instant::now();

        let response = match self
            .client
            .get(url)
            .bearer_auth(&connection.access_token)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                let error_msg = if e.is_timeout() {
                    format!("Request timeout: {}", e)
                } else if e.is_connect() {
                    format!("Connection error: {}", e)
                } else {
                    format!("Network error: {}", e)
                };
                tracing::error!("{} ({})", error_msg, url);
                return Err(anyhow::anyhow!("{} ({})", error_msg, url));
            }
        };

        let status = response.status();
        let body = response.text().await?;
        tracing::info!(
            "Request completed in {:.2}s with status {}",
            start_time.elapsed().as_secs_f64(),
            status
        );
        tracing::debug!("Response preview: {}", preview(&body));

        if !status.is_success() {
            tracing::warn!("Salesforce API returned {} for {}", status, url);
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }
}

/// Первые 500 символов ответа (UTF-8 безопасно)
pub fn preview(body: &str) -> String {
    let preview: String = body.chars().take(500).collect();
    if preview.len() < body.len() {
        format!("{}...", preview)
    } else {
        preview
    }
}
