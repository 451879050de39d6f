use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::forms::{sample_payload, validate, FormType};

/// Outcome of one named check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormTestSummary {
    pub passed: usize,
    pub total: usize,
    pub details: Vec<TestResult>,
}

impl FormTestSummary {
    /// Whether the named form's test passed; `false` when it was not run.
    pub fn passed_for(&self, form_type: FormType) -> bool {
        self.details
            .iter()
            .find(|result| result.name == form_type.label())
            .map(|result| result.passed)
            .unwrap_or(false)
    }
}

/// Runs each form's sample payload through the validator.
#[derive(Debug, Clone)]
pub struct FormTester {
    // One payload per form, in `FormType::ALL` order.
    payloads: [Value; 3],
}

impl Default for FormTester {
    fn default() -> Self {
        Self::standard()
    }
}

impl FormTester {
    pub fn standard() -> Self {
        Self {
            payloads: FormType::ALL.map(sample_payload),
        }
    }

    /// Replaces the payload used for `form_type`.
    pub fn with_payload(mut self, form_type: FormType, payload: Value) -> Self {
        *self.slot_mut(form_type) = payload;
        self
    }

    fn slot(&self, form_type: FormType) -> &Value {
        &self.payloads[Self::index(form_type)]
    }

    fn slot_mut(&mut self, form_type: FormType) -> &mut Value {
        &mut self.payloads[Self::index(form_type)]
    }

    fn index(form_type: FormType) -> usize {
        match form_type {
            FormType::Contact => 0,
            FormType::Project => 1,
            FormType::Job => 2,
        }
    }

    pub fn test_form(&self, form_type: FormType) -> TestResult {
        let name = form_type.label().to_string();
        let payload = self.slot(form_type);

        let outcome = validate(form_type, payload);
        if outcome.is_valid {
            info!(form = %form_type, "form validation passed");
            TestResult {
                name,
                passed: true,
                error: None,
            }
        } else {
            warn!(form = %form_type, errors = ?outcome.errors, "form validation failed");
            TestResult {
                name,
                passed: false,
                error: Some(outcome.errors.join("; ")),
            }
        }
    }

    /// Tests contact, project and job in that order; one failure never skips the others.
    pub fn run_all_form_tests(&self) -> FormTestSummary {
        info!("running form tests");
        let details: Vec<TestResult> = FormType::ALL
            .iter()
            .map(|form_type| self.test_form(*form_type))
            .collect();
        let passed = details.iter().filter(|result| result.passed).count();
        let total = details.len();

        info!(passed, total, "form tests completed");
        FormTestSummary {
            passed,
            total,
            details,
        }
    }
}

/// Runs the standard sample payloads.
pub fn run_all_form_tests() -> FormTestSummary {
    FormTester::standard().run_all_form_tests()
}
