use crate::infra::{parse_form_type, Probes};
use clap::Args;
use formcheck::config::AppConfig;
use formcheck::diagnostics::{generate_test_report, FormStatusIndicator, SystemStatus};
use formcheck::error::AppError;
use formcheck::forms::{sample_payload, FormType};
use formcheck::telemetry;

#[derive(Args, Debug, Default)]
pub(crate) struct CheckArgs {
    /// Print the raw system status as JSON instead of the text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct StatusArgs {
    /// Form to show (contact, project or job)
    #[arg(long, value_parser = parse_form_type)]
    pub(crate) form: FormType,
}

#[derive(Args, Debug)]
pub(crate) struct SubmitArgs {
    /// Form endpoint to post to (contact, project or job)
    #[arg(long, value_parser = parse_form_type)]
    pub(crate) form: FormType,
    /// JSON payload to send; defaults to the built-in sample for the form
    #[arg(long)]
    pub(crate) payload: Option<String>,
}

fn load_probes() -> Result<(AppConfig, Probes), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let probes = Probes::from_config(&config)?;
    Ok((config, probes))
}

pub(crate) async fn run_system_check(args: CheckArgs) -> Result<(), AppError> {
    let (_config, probes) = load_probes()?;
    let status = probes.aggregator().run_full_system_test().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("{}", generate_test_report(&status));
    }

    if status.overall {
        Ok(())
    } else {
        Err(AppError::Unhealthy(failing_components(&status)))
    }
}

pub(crate) async fn run_status(args: StatusArgs) -> Result<(), AppError> {
    let (_config, probes) = load_probes()?;
    let aggregator = probes.aggregator();

    let mut indicator = FormStatusIndicator::new(args.form);
    indicator.check_system_status(&aggregator).await;
    print!("{}", indicator.render());
    Ok(())
}

pub(crate) async fn run_submission(args: SubmitArgs) -> Result<(), AppError> {
    let SubmitArgs { form, payload } = args;
    let payload = match payload {
        Some(raw) => serde_json::from_str(&raw)?,
        None => sample_payload(form),
    };

    let (config, probes) = load_probes()?;
    let accepted = probes
        .aggregator()
        .test_form_submission(form, &payload)
        .await;

    let target = config.site.url_for(form.endpoint());
    if accepted {
        println!("{} submission accepted by {target}", form.label());
        Ok(())
    } else {
        Err(AppError::Unhealthy(format!(
            "{} submission rejected by {target}",
            form.label()
        )))
    }
}

fn failing_components(status: &SystemStatus) -> String {
    if let Some(error) = &status.details.error {
        return error.clone();
    }

    let mut failing = Vec::new();
    if !status.database {
        failing.push("database");
    }
    if !status.email {
        failing.push("email service");
    }
    for form_type in FormType::ALL {
        if !status.forms.get(form_type) {
            failing.push(form_type.label());
        }
    }
    format!("failing: {}", failing.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use formcheck::diagnostics::FormFlags;

    #[test]
    fn lists_failing_components() {
        let mut status = SystemStatus::pending(Utc::now());
        status.database = true;
        status.forms = FormFlags {
            contact: true,
            project: false,
            job: true,
        };
        assert_eq!(
            failing_components(&status),
            "failing: email service, Project Builder"
        );
    }

    #[test]
    fn aborted_run_reports_its_error() {
        let mut status = SystemStatus::pending(Utc::now());
        status.details.error = Some("request failed: reset".to_string());
        assert_eq!(failing_components(&status), "request failed: reset");
    }
}
