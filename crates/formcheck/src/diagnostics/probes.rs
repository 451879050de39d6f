use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// Failure of a single outbound check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("{0}")]
    Rejected(String),
    #[error("unexpected reply: {0}")]
    Protocol(String),
}

/// Read access to the hosted database tables backing the forms.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Selects at most one row id from `table`.
    async fn probe_table(&self, table: &str) -> Result<(), ProbeError>;
}

/// Boolean connectivity check against the database.
///
/// `Ok(false)` means the database answered badly or not at all. `Err` means the probe itself
/// broke, which aborts a full system test.
#[async_trait]
pub trait DatabaseProbe: Send + Sync {
    async fn test_connection(&self) -> Result<bool, ProbeError>;
}

/// HTTP status plus the JSON body, when there was one.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl SiteResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `message` field the site's API puts into its JSON envelopes.
    pub fn message(&self) -> Option<&str> {
        self.body.as_ref()?.get("message")?.as_str()
    }
}

/// The marketing site's own API.
#[async_trait]
pub trait SiteApi: Send + Sync {
    /// `GET /api/health-check`.
    async fn health_check(&self) -> Result<SiteResponse, ProbeError>;

    /// `POST` a JSON payload to one of the form endpoints.
    async fn submit_form(&self, endpoint: &str, payload: &Value)
        -> Result<SiteResponse, ProbeError>;
}

/// Outbound mail relay.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Confirms the relay accepts connections.
    async fn verify(&self) -> Result<(), ProbeError>;
}

/// Status of one external service as reported by the test endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Unknown,
    Working,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCheck {
    pub status: ServiceStatus,
    pub error: Option<String>,
}

impl ServiceCheck {
    pub fn unknown() -> Self {
        Self {
            status: ServiceStatus::Unknown,
            error: None,
        }
    }

    pub fn is_working(&self) -> bool {
        self.status == ServiceStatus::Working
    }
}

impl From<Result<(), ProbeError>> for ServiceCheck {
    fn from(result: Result<(), ProbeError>) -> Self {
        match result {
            Ok(()) => Self {
                status: ServiceStatus::Working,
                error: None,
            },
            Err(err) => Self {
                status: ServiceStatus::Failed,
                error: Some(err.to_string()),
            },
        }
    }
}
