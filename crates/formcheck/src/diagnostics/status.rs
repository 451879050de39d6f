use std::fmt::Write;

use serde::Serialize;
use tracing::error;

use super::aggregator::SystemHealthAggregator;
use super::probes::{DatabaseProbe, SiteApi};
use crate::forms::FormType;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndicatorState {
    pub database: bool,
    pub email: bool,
    pub testing: bool,
}

/// Message shown under the service list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    AllClear,
    Degraded { database_down: bool, email_down: bool },
}

/// Per-form status widget: database and email health plus the endpoint the form posts to.
///
/// Checks run only when [`FormStatusIndicator::check_system_status`] is called; there is no
/// background polling.
#[derive(Debug, Clone)]
pub struct FormStatusIndicator {
    form_type: FormType,
    state: IndicatorState,
}

impl FormStatusIndicator {
    pub fn new(form_type: FormType) -> Self {
        Self {
            form_type,
            state: IndicatorState::default(),
        }
    }

    pub fn form_type(&self) -> FormType {
        self.form_type
    }

    pub fn state(&self) -> IndicatorState {
        self.state
    }

    /// Probes the database, then the email service. A broken database probe keeps the
    /// previous flags.
    pub async fn check_system_status<D, S>(&mut self, aggregator: &SystemHealthAggregator<D, S>)
    where
        D: DatabaseProbe + 'static,
        S: SiteApi + 'static,
    {
        self.state.testing = true;

        let database = match aggregator.database().test_connection().await {
            Ok(connected) => connected,
            Err(err) => {
                error!(form = %self.form_type, %err, "system status check failed");
                self.state.testing = false;
                return;
            }
        };
        let email = aggregator.test_email_service().await;

        self.state = IndicatorState {
            database,
            email,
            testing: false,
        };
    }

    pub fn advisory(&self) -> Advisory {
        if self.state.database && self.state.email {
            Advisory::AllClear
        } else {
            Advisory::Degraded {
                database_down: !self.state.database,
                email_down: !self.state.email,
            }
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let heading = if self.state.testing {
            "Form System Status (checking...)"
        } else {
            "Form System Status"
        };
        let _ = writeln!(out, "{heading} [{}]", self.form_type.label());
        let _ = writeln!(
            out,
            "  Database ({}): {}",
            self.form_type.table(),
            badge(self.state.database, "Connected")
        );
        let _ = writeln!(
            out,
            "  Email Service: {}",
            badge(self.state.email, "Working")
        );
        let _ = writeln!(out, "  API Endpoint: {}", self.form_type.endpoint());

        match self.advisory() {
            Advisory::AllClear => {
                let _ = writeln!(out, "✅ All systems operational - forms ready for submissions");
            }
            Advisory::Degraded {
                database_down,
                email_down,
            } => {
                let _ = writeln!(out, "⚠️ System Status:");
                if database_down {
                    let _ = writeln!(out, "  • Database connection issues detected");
                }
                if email_down {
                    let _ = writeln!(out, "  • Email service may be unavailable");
                }
                let _ = writeln!(out, "  Forms will continue working with fallback handling.");
            }
        }

        out
    }
}

fn badge(ok: bool, label: &str) -> String {
    if ok {
        format!("✅ {label}")
    } else {
        "⚠️ Failed".to_string()
    }
}
