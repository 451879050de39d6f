use formcheck::adapters::{RestDataStore, SiteClient, SmtpVerifier};
use formcheck::config::AppConfig;
use formcheck::diagnostics::{FormTestService, ProbeError, SystemHealthAggregator};
use formcheck::forms::FormType;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type LiveAggregator = SystemHealthAggregator<RestDataStore, SiteClient>;
pub(crate) type LiveFormTestService = FormTestService<RestDataStore, SmtpVerifier>;

/// Outbound clients shared by the CLI commands and the HTTP service.
pub(crate) struct Probes {
    pub(crate) store: Arc<RestDataStore>,
    pub(crate) site: Arc<SiteClient>,
    pub(crate) mail: Arc<SmtpVerifier>,
}

impl Probes {
    pub(crate) fn from_config(config: &AppConfig) -> Result<Self, ProbeError> {
        if config.database.is_none() {
            warn!("database URL or key not set; database checks will report failures");
        }
        if config.smtp.is_none() {
            warn!("SMTP_HOST, SMTP_USER or SMTP_PASS not set; email checks will report failures");
        }

        Ok(Self {
            store: Arc::new(RestDataStore::new(config.database.clone())?),
            site: Arc::new(SiteClient::new(config.site.clone())?),
            mail: Arc::new(SmtpVerifier::new(config.smtp.clone())),
        })
    }

    pub(crate) fn aggregator(&self) -> LiveAggregator {
        SystemHealthAggregator::new(self.store.clone(), self.site.clone())
    }

    pub(crate) fn form_test_service(&self) -> Arc<LiveFormTestService> {
        Arc::new(FormTestService::new(self.store.clone(), self.mail.clone()))
    }
}

pub(crate) fn parse_form_type(raw: &str) -> Result<FormType, String> {
    raw.parse::<FormType>().map_err(|err| err.to_string())
}
