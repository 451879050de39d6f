use serde_json::{json, Value};

use super::domain::FormType;

/// Synthetic payload used to exercise a form without a real visitor.
pub fn sample_payload(form_type: FormType) -> Value {
    match form_type {
        FormType::Contact => json!({
            "name": "Test User",
            "email": "test@example.com",
            "company": "Test Company",
            "service": "Custom AI/ML Development",
            "message": "This is a test message to verify form functionality."
        }),
        FormType::Project => json!({
            "projectType": "chatbot",
            "industry": "Healthcare",
            "budget": "$15,000 - $50,000",
            "timeline": "2-4 months",
            "features": ["Real-time Processing", "Multi-language Support"],
            "description": "Test project description",
            "contactInfo": {
                "name": "Test User",
                "email": "test@example.com",
                "company": "Test Company"
            }
        }),
        FormType::Job => json!({
            "full_name": "Test Candidate",
            "email": "candidate@example.com",
            "phone": "+1234567890",
            "cover_letter": "This is a comprehensive test cover letter that meets the minimum length requirements for validation.",
            "experience_years": 5,
            "skills": ["JavaScript", "React", "AI/ML"],
            "availability": "immediate"
        }),
    }
}
