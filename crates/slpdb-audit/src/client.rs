//! Transport to the slpserve query endpoint.

use async_trait::async_trait;
use tracing::debug;

use slpdb_query::QueryDescriptor;

use crate::config::AuditConfig;
use crate::error::{Error, Result};
use crate::response::QueryResponse;

/// Sends a query descriptor and returns the decoded answer.
///
/// Implementations must be stateless per call: the runner may issue many
/// queries concurrently through one transport.
#[async_trait]
pub trait QueryTransport: Send + Sync {
    /// Executes one query. No retries.
    async fn query(&self, query: &QueryDescriptor) -> Result<QueryResponse>;
}

/// HTTP client for slpserve: `GET <endpoint>/<base64(json)>`.
#[derive(Debug, Clone)]
pub struct SlpdbClient {
    endpoint: String,
    client: reqwest::Client,
}

impl SlpdbClient {
    /// Creates a client from a validated configuration.
    pub fn new(config: &AuditConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            endpoint: config.endpoint.trim().to_string(),
            client: builder.build()?,
        })
    }

    /// Base endpoint queries are appended to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl QueryTransport for SlpdbClient {
    async fn query(&self, query: &QueryDescriptor) -> Result<QueryResponse> {
        let url = query.request_url(&self.endpoint)?;
        debug!("GET {}", url);

        let resp = self.client.get(&url).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
            return Err(Error::Status { status, body });
        }

        let body: serde_json::Value = resp.json().await?;
        QueryResponse::from_value(body)
    }
}
