use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::form_tester::{FormTester, TestResult};
use super::probes::{DatabaseProbe, ProbeError, SiteApi};
use crate::forms::FormType;

/// Per-form validation results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FormFlags {
    pub contact: bool,
    pub project: bool,
    pub job: bool,
}

impl FormFlags {
    pub fn all_passed(&self) -> bool {
        self.contact && self.project && self.job
    }

    pub fn get(&self, form_type: FormType) -> bool {
        match form_type {
            FormType::Contact => self.contact,
            FormType::Project => self.project,
            FormType::Job => self.job,
        }
    }
}

/// Supporting data collected during a system test. Fields stay empty when the run aborted
/// before reaching them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemTestDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_connection: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_service: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_validations: Option<Vec<TestResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Snapshot of every check; recomputed on each run, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemStatus {
    pub database: bool,
    pub email: bool,
    pub forms: FormFlags,
    pub overall: bool,
    pub details: SystemTestDetails,
    #[serde(skip)]
    pub checked_at: DateTime<Utc>,
}

impl SystemStatus {
    /// All checks false, as a run starts.
    pub fn pending(checked_at: DateTime<Utc>) -> Self {
        Self {
            database: false,
            email: false,
            forms: FormFlags::default(),
            overall: false,
            details: SystemTestDetails::default(),
            checked_at,
        }
    }

    /// Logical AND of every component flag.
    pub fn all_operational(&self) -> bool {
        self.database && self.email && self.forms.all_passed()
    }
}

#[derive(Debug, Deserialize)]
struct HealthCheckBody {
    #[serde(default)]
    success: bool,
    data: Option<HealthCheckData>,
}

#[derive(Debug, Deserialize)]
struct HealthCheckData {
    services: Option<HealthCheckServices>,
}

#[derive(Debug, Deserialize)]
struct HealthCheckServices {
    email: Option<ServiceHealth>,
}

#[derive(Debug, Deserialize)]
struct ServiceHealth {
    status: Option<String>,
}

fn email_reported_healthy(body: &Value) -> bool {
    let Ok(parsed) = HealthCheckBody::deserialize(body) else {
        return false;
    };
    parsed.success
        && parsed
            .data
            .and_then(|data| data.services)
            .and_then(|services| services.email)
            .and_then(|email| email.status)
            .is_some_and(|status| status == "healthy")
}

/// Runs the database probe, the email health check and the form tests one after another
/// and folds them into a [`SystemStatus`].
pub struct SystemHealthAggregator<D, S> {
    database: Arc<D>,
    site: Arc<S>,
    forms: FormTester,
}

impl<D, S> SystemHealthAggregator<D, S>
where
    D: DatabaseProbe + 'static,
    S: SiteApi + 'static,
{
    pub fn new(database: Arc<D>, site: Arc<S>) -> Self {
        Self::with_form_tester(database, site, FormTester::standard())
    }

    pub fn with_form_tester(database: Arc<D>, site: Arc<S>, forms: FormTester) -> Self {
        Self {
            database,
            site,
            forms,
        }
    }

    /// Never fails: a broken probe is recorded in `details.error` and the partially filled
    /// status is returned.
    pub async fn run_full_system_test(&self) -> SystemStatus {
        info!("starting full form system test");
        let mut status = SystemStatus::pending(Utc::now());

        match self.fill_status(&mut status).await {
            Ok(()) if status.overall => info!("system test completed: all systems operational"),
            Ok(()) => warn!(?status.details, "system test completed: issues detected"),
            Err(err) => {
                error!(%err, "system test aborted");
                status.details.error = Some(err.to_string());
            }
        }

        status
    }

    async fn fill_status(&self, status: &mut SystemStatus) -> Result<(), ProbeError> {
        debug!("testing database connection");
        status.database = self.database.test_connection().await?;
        info!(connected = status.database, "database probe finished");

        debug!("testing email service");
        status.email = self.test_email_service().await;
        info!(healthy = status.email, "email health check finished");

        debug!("testing form validations");
        let summary = self.forms.run_all_form_tests();
        status.forms = FormFlags {
            contact: summary.passed_for(FormType::Contact),
            project: summary.passed_for(FormType::Project),
            job: summary.passed_for(FormType::Job),
        };

        status.details = SystemTestDetails {
            database_connection: Some(status.database),
            email_service: Some(status.email),
            form_validations: Some(summary.details),
            timestamp: Some(status.checked_at),
            error: None,
        };
        status.overall = status.all_operational();
        Ok(())
    }

    /// Healthy only for a success status whose body reports the email service as `healthy`.
    pub async fn test_email_service(&self) -> bool {
        match self.site.health_check().await {
            Ok(response) if response.is_success() => response
                .body
                .as_ref()
                .is_some_and(email_reported_healthy),
            Ok(response) => {
                warn!(status = response.status, "health check returned an error status");
                false
            }
            Err(err) => {
                warn!(%err, "email service test failed");
                false
            }
        }
    }

    /// Posts `payload` to the form's endpoint; `true` iff the site answered with success.
    pub async fn test_form_submission(&self, form_type: FormType, payload: &Value) -> bool {
        info!(form = %form_type, endpoint = form_type.endpoint(), "testing form submission");
        match self.site.submit_form(form_type.endpoint(), payload).await {
            Ok(response) if response.is_success() => {
                info!(form = %form_type, "form submission test passed");
                true
            }
            Ok(response) => {
                warn!(
                    form = %form_type,
                    status = response.status,
                    message = response.message().unwrap_or("no message"),
                    "form submission test failed"
                );
                false
            }
            Err(err) => {
                warn!(form = %form_type, %err, "form submission test error");
                false
            }
        }
    }

    pub fn database(&self) -> &D {
        &self.database
    }

    pub fn site(&self) -> &S {
        &self.site
    }
}
