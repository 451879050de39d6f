use std::fmt::Write;

use chrono::Local;

use super::aggregator::SystemStatus;

fn mark(ok: bool, pass: &str, fail: &str) -> String {
    if ok {
        format!("✅ {pass}")
    } else {
        format!("❌ {fail}")
    }
}

/// Renders a system test as a markdown report. Uses the status's own timestamp.
pub fn generate_test_report(results: &SystemStatus) -> String {
    let generated = results
        .checked_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S %Z");
    let details = serde_json::to_string_pretty(&results.details)
        .unwrap_or_else(|err| format!("\"details unavailable: {err}\""));

    let mut report = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(report, "# Form Integration Test Report");
    let _ = writeln!(report, "Generated: {generated}");
    let _ = writeln!(report);
    let _ = writeln!(
        report,
        "## Overall Status: {}",
        mark(results.overall, "ALL SYSTEMS OPERATIONAL", "ISSUES DETECTED")
    );
    let _ = writeln!(report);
    let _ = writeln!(report, "## System Components:");
    let _ = writeln!(
        report,
        "- Database Connection: {}",
        mark(results.database, "Working", "Failed")
    );
    let _ = writeln!(
        report,
        "- Email Service: {}",
        mark(results.email, "Working", "Failed")
    );
    let _ = writeln!(report);
    let _ = writeln!(report, "## Form Validations:");
    let _ = writeln!(
        report,
        "- Contact Form: {}",
        mark(results.forms.contact, "Valid", "Issues")
    );
    let _ = writeln!(
        report,
        "- Project Builder: {}",
        mark(results.forms.project, "Valid", "Issues")
    );
    let _ = writeln!(
        report,
        "- Job Applications: {}",
        mark(results.forms.job, "Valid", "Issues")
    );
    let _ = writeln!(report);
    let _ = writeln!(report, "## Test Details:");
    let _ = writeln!(report, "{details}");
    let _ = writeln!(report);
    let _ = writeln!(report, "## Next Steps:");
    if results.overall {
        let _ = writeln!(
            report,
            "🚀 All systems are working correctly. Forms are ready for production use."
        );
    } else {
        let _ = writeln!(
            report,
            "🔧 Please address the issues above before deploying to production."
        );
    }
    let _ = writeln!(report);
    let _ = writeln!(report, "---");
    let _ = writeln!(report, "Form Integration Testing System");

    report
}
