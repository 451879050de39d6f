use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::transport::smtp::extension::ClientId;
use lettre::transport::smtp::Error as SmtpError;
use lettre::{AsyncSmtpTransport, Tokio1Executor};
use tracing::{debug, warn};

use crate::config::{SmtpConfig, SmtpTls};
use crate::diagnostics::probes::{MailTransport, ProbeError};

const EHLO_NAME: &str = "formcheck.localhost";

/// Verifies the relay the way a mailer would before sending: greeting, EHLO, TLS per
/// [`SmtpTls`], then AUTH with the configured credentials.
pub struct SmtpVerifier {
    config: Option<SmtpConfig>,
}

impl SmtpVerifier {
    pub fn new(config: Option<SmtpConfig>) -> Self {
        Self { config }
    }

    fn transport(config: &SmtpConfig) -> Result<AsyncSmtpTransport<Tokio1Executor>, ProbeError> {
        let tls = match config.tls {
            SmtpTls::StartTls => Tls::Required(tls_parameters(&config.host)?),
            SmtpTls::Implicit => Tls::Wrapper(tls_parameters(&config.host)?),
            SmtpTls::None => Tls::None,
        };

        Ok(
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.host.as_str())
                .port(config.port)
                .tls(tls)
                .hello_name(ClientId::Domain(EHLO_NAME.to_string()))
                .credentials(Credentials::new(
                    config.user.clone(),
                    config.password.clone(),
                ))
                .timeout(Some(config.greeting_timeout))
                .build(),
        )
    }
}

#[async_trait]
impl MailTransport for SmtpVerifier {
    async fn verify(&self) -> Result<(), ProbeError> {
        let config = self
            .config
            .as_ref()
            .ok_or(ProbeError::NotConfigured("SMTP relay"))?;

        debug!(host = %config.host, port = config.port, tls = ?config.tls, "verifying SMTP relay");
        let transport = Self::transport(config)?;
        let connected = tokio::time::timeout(config.greeting_timeout, transport.test_connection())
            .await
            .map_err(|_| {
                ProbeError::Transport(format!(
                    "no SMTP response from {}:{} within {}s",
                    config.host,
                    config.port,
                    config.greeting_timeout.as_secs()
                ))
            })?
            .map_err(classify)?;

        if connected {
            Ok(())
        } else {
            Err(ProbeError::Protocol(
                "relay dropped the session after login".to_string(),
            ))
        }
    }
}

fn tls_parameters(host: &str) -> Result<TlsParameters, ProbeError> {
    TlsParameters::new(host.to_string()).map_err(|err| ProbeError::Transport(err.to_string()))
}

/// Maps a relay failure onto the probe taxonomy. 530, 534 and 535 are the
/// authentication refusals; other replies are protocol failures.
fn classify(err: SmtpError) -> ProbeError {
    match err.status().map(|code| code.to_string()) {
        Some(code) if is_auth_refusal(&code) => {
            warn!(%code, "SMTP relay refused the configured credentials");
            ProbeError::Rejected(format!("SMTP authentication failed: {err}"))
        }
        Some(_) => ProbeError::Protocol(err.to_string()),
        None => ProbeError::Transport(err.to_string()),
    }
}

fn is_auth_refusal(code: &str) -> bool {
    matches!(code, "530" | "534" | "535")
}
