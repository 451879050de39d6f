use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::diagnostics::probes::{
    DataStore, DatabaseProbe, MailTransport, ProbeError, SiteApi, SiteResponse,
};
use crate::diagnostics::{FormTestService, FormTester, SystemHealthAggregator};

pub(crate) struct StubDatabase {
    result: Result<bool, ProbeError>,
}

impl StubDatabase {
    pub(crate) fn connected(connected: bool) -> Self {
        Self {
            result: Ok(connected),
        }
    }

    pub(crate) fn broken(message: &str) -> Self {
        Self {
            result: Err(ProbeError::Transport(message.to_string())),
        }
    }
}

#[async_trait]
impl DatabaseProbe for StubDatabase {
    async fn test_connection(&self) -> Result<bool, ProbeError> {
        self.result.clone()
    }
}

pub(crate) fn health_body(status: &str) -> Value {
    json!({
        "success": true,
        "data": { "services": { "email": { "status": status } } }
    })
}

pub(crate) struct StubSite {
    health: Result<SiteResponse, ProbeError>,
    submission: Result<SiteResponse, ProbeError>,
    pub(crate) submitted: Mutex<Vec<(String, Value)>>,
}

impl StubSite {
    pub(crate) fn email_healthy(healthy: bool) -> Self {
        let status = if healthy { "healthy" } else { "unhealthy" };
        Self::with_health(Ok(SiteResponse {
            status: 200,
            body: Some(health_body(status)),
        }))
    }

    pub(crate) fn with_health(health: Result<SiteResponse, ProbeError>) -> Self {
        Self {
            health,
            submission: Ok(SiteResponse {
                status: 200,
                body: Some(json!({ "success": true })),
            }),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_submission(mut self, submission: Result<SiteResponse, ProbeError>) -> Self {
        self.submission = submission;
        self
    }
}

#[async_trait]
impl SiteApi for StubSite {
    async fn health_check(&self) -> Result<SiteResponse, ProbeError> {
        self.health.clone()
    }

    async fn submit_form(
        &self,
        endpoint: &str,
        payload: &Value,
    ) -> Result<SiteResponse, ProbeError> {
        self.submitted
            .lock()
            .expect("submission mutex poisoned")
            .push((endpoint.to_string(), payload.clone()));
        self.submission.clone()
    }
}

pub(crate) fn aggregator(
    database: StubDatabase,
    site: StubSite,
) -> SystemHealthAggregator<StubDatabase, StubSite> {
    SystemHealthAggregator::new(Arc::new(database), Arc::new(site))
}

pub(crate) fn aggregator_with_forms(
    database: StubDatabase,
    site: StubSite,
    forms: FormTester,
) -> SystemHealthAggregator<StubDatabase, StubSite> {
    SystemHealthAggregator::with_form_tester(Arc::new(database), Arc::new(site), forms)
}

#[derive(Default)]
pub(crate) struct StubStore {
    failure: Option<ProbeError>,
    pub(crate) probed: Mutex<Vec<String>>,
}

impl StubStore {
    pub(crate) fn failing(failure: ProbeError) -> Self {
        Self {
            failure: Some(failure),
            probed: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn probed_tables(&self) -> Vec<String> {
        self.probed.lock().expect("store mutex poisoned").clone()
    }
}

#[async_trait]
impl DataStore for StubStore {
    async fn probe_table(&self, table: &str) -> Result<(), ProbeError> {
        self.probed
            .lock()
            .expect("store mutex poisoned")
            .push(table.to_string());
        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub(crate) struct StubMail {
    failure: Option<ProbeError>,
}

impl StubMail {
    pub(crate) fn failing(failure: ProbeError) -> Self {
        Self {
            failure: Some(failure),
        }
    }
}

#[async_trait]
impl MailTransport for StubMail {
    async fn verify(&self) -> Result<(), ProbeError> {
        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }
}

pub(crate) struct PanickingMail;

#[async_trait]
impl MailTransport for PanickingMail {
    async fn verify(&self) -> Result<(), ProbeError> {
        panic!("relay client crashed");
    }
}

pub(crate) fn form_test_service<D, M>(store: D, mail: M) -> Arc<FormTestService<D, M>>
where
    D: DataStore + 'static,
    M: MailTransport + 'static,
{
    Arc::new(FormTestService::new(Arc::new(store), Arc::new(mail)))
}
