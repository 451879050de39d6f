//! Form catalogue and required-field validation for the site's public forms.

pub mod domain;
mod samples;
mod validator;

pub use domain::{FormType, RequiredField, UnknownFormType};
pub use samples::sample_payload;
pub use validator::{validate, ValidationOutcome};
