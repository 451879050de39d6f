use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The three public forms on the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormType {
    Contact,
    Project,
    Job,
}

/// A field that must be filled in, addressed by its path inside the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredField {
    pub path: &'static [&'static str],
    pub label: &'static str,
}

impl RequiredField {
    const fn new(path: &'static [&'static str], label: &'static str) -> Self {
        Self { path, label }
    }

    pub fn missing_message(&self) -> String {
        format!("{} is required", self.label)
    }
}

const CONTACT_FIELDS: &[RequiredField] = &[
    RequiredField::new(&["name"], "Name"),
    RequiredField::new(&["email"], "Email"),
    RequiredField::new(&["message"], "Message"),
];

const PROJECT_FIELDS: &[RequiredField] = &[
    RequiredField::new(&["projectType"], "Project type"),
    RequiredField::new(&["industry"], "Industry"),
    RequiredField::new(&["budget"], "Budget"),
    RequiredField::new(&["contactInfo", "name"], "Contact name"),
    RequiredField::new(&["contactInfo", "email"], "Contact email"),
];

const JOB_FIELDS: &[RequiredField] = &[
    RequiredField::new(&["full_name"], "Full name"),
    RequiredField::new(&["email"], "Email"),
    RequiredField::new(&["cover_letter"], "Cover letter"),
];

impl FormType {
    /// Declaration order; reports and test summaries follow it.
    pub const ALL: [FormType; 3] = [FormType::Contact, FormType::Project, FormType::Job];

    pub fn as_str(self) -> &'static str {
        match self {
            FormType::Contact => "contact",
            FormType::Project => "project",
            FormType::Job => "job",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormType::Contact => "Contact Form",
            FormType::Project => "Project Builder",
            FormType::Job => "Job Application",
        }
    }

    /// Table receiving submissions of this form.
    pub fn table(self) -> &'static str {
        match self {
            FormType::Contact => "contact_submissions",
            FormType::Project => "project_submissions",
            FormType::Job => "job_applications",
        }
    }

    /// Site endpoint accepting submissions of this form.
    pub fn endpoint(self) -> &'static str {
        match self {
            FormType::Contact => "/api/contact",
            FormType::Project => "/api/project-builder",
            FormType::Job => "/api/job-application",
        }
    }

    pub fn required_fields(self) -> &'static [RequiredField] {
        match self {
            FormType::Contact => CONTACT_FIELDS,
            FormType::Project => PROJECT_FIELDS,
            FormType::Job => JOB_FIELDS,
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown form type '{0}', expected contact, project or job")]
pub struct UnknownFormType(pub String);

impl FromStr for FormType {
    type Err = UnknownFormType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "contact" => Ok(FormType::Contact),
            "project" => Ok(FormType::Project),
            "job" => Ok(FormType::Job),
            other => Err(UnknownFormType(other.to_string())),
        }
    }
}
