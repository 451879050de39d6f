use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::http_client;
use crate::config::DatabaseConfig;
use crate::diagnostics::probes::{DataStore, DatabaseProbe, ProbeError};
use crate::forms::FormType;

/// Hosted database reached through its REST interface.
pub struct RestDataStore {
    config: Option<DatabaseConfig>,
    client: Client,
}

impl RestDataStore {
    pub fn new(config: Option<DatabaseConfig>) -> Result<Self, ProbeError> {
        Ok(Self {
            config,
            client: http_client()?,
        })
    }

    fn table_url(config: &DatabaseConfig, table: &str) -> String {
        format!("{}/rest/v1/{}?select=id&limit=1", config.url, table)
    }
}

#[async_trait]
impl DataStore for RestDataStore {
    async fn probe_table(&self, table: &str) -> Result<(), ProbeError> {
        let config = self
            .config
            .as_ref()
            .ok_or(ProbeError::NotConfigured("database"))?;

        let url = Self::table_url(config, table);
        debug!(%url, "probing database table");
        let response = self
            .client
            .get(&url)
            .header("apikey", &config.anon_key)
            .bearer_auth(&config.anon_key)
            .send()
            .await
            .map_err(|err| ProbeError::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("message")?.as_str().map(str::to_string))
            .unwrap_or_else(|| format!("database responded with HTTP {}", status.as_u16()));
        Err(ProbeError::Rejected(message))
    }
}

#[async_trait]
impl DatabaseProbe for RestDataStore {
    async fn test_connection(&self) -> Result<bool, ProbeError> {
        match self.probe_table(FormType::Contact.table()).await {
            Ok(()) => Ok(true),
            Err(err) => {
                warn!(%err, "database connection test failed");
                Ok(false)
            }
        }
    }
}
