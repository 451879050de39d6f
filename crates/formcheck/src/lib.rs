//! Diagnostics for the site's contact, project-inquiry and job-application forms: required
//! field validation, database and mail relay probes, and the form test endpoint.

pub mod adapters;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod forms;
pub mod telemetry;
