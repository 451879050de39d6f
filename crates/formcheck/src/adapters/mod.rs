//! Outbound clients for the database, the marketing site and the mail relay.

mod rest;
mod site;
mod smtp;

pub use rest::RestDataStore;
pub use site::{SiteClient, HEALTH_CHECK_PATH};
pub use smtp::SmtpVerifier;

use reqwest::Client;

use crate::diagnostics::probes::ProbeError;

// No request timeout: checks inherit the client's defaults.
fn http_client() -> Result<Client, ProbeError> {
    Client::builder()
        .user_agent(concat!("formcheck/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|err| ProbeError::Transport(err.to_string()))
}
