use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;

use super::http_client;
use crate::config::SiteConfig;
use crate::diagnostics::probes::{ProbeError, SiteApi, SiteResponse};

pub const HEALTH_CHECK_PATH: &str = "/api/health-check";

/// Client for the marketing site's API routes.
pub struct SiteClient {
    site: SiteConfig,
    client: Client,
}

impl SiteClient {
    pub fn new(site: SiteConfig) -> Result<Self, ProbeError> {
        Ok(Self {
            site,
            client: http_client()?,
        })
    }
}

async fn into_site_response(response: Response) -> SiteResponse {
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.ok();
    SiteResponse { status, body }
}

#[async_trait]
impl SiteApi for SiteClient {
    async fn health_check(&self) -> Result<SiteResponse, ProbeError> {
        let response = self
            .client
            .get(self.site.url_for(HEALTH_CHECK_PATH))
            .send()
            .await
            .map_err(|err| ProbeError::Transport(err.to_string()))?;
        Ok(into_site_response(response).await)
    }

    async fn submit_form(
        &self,
        endpoint: &str,
        payload: &Value,
    ) -> Result<SiteResponse, ProbeError> {
        let response = self
            .client
            .post(self.site.url_for(endpoint))
            .json(payload)
            .send()
            .await
            .map_err(|err| ProbeError::Transport(err.to_string()))?;
        Ok(into_site_response(response).await)
    }
}
