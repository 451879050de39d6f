//! Form and system health checks.
//!
//! The aggregator and status indicator consume the boolean probes; the form test endpoint
//! reports each external service with its failure message. Every public check returns a
//! value and never an error: failures become data on the result.

pub mod aggregator;
pub mod form_tester;
pub mod probes;
pub mod report;
pub mod router;
pub mod status;

#[cfg(test)]
mod tests;

pub use aggregator::{FormFlags, SystemHealthAggregator, SystemStatus, SystemTestDetails};
pub use form_test::{
    FormTestReport, FormTestRequest, FormTestService, ValidationCheck, ValidationStatus,
};
pub use form_tester::{run_all_form_tests, FormTestSummary, FormTester, TestResult};
pub use probes::{
    DataStore, DatabaseProbe, MailTransport, ProbeError, ServiceCheck, ServiceStatus, SiteApi,
    SiteResponse,
};
pub use report::generate_test_report;
pub use router::{form_test_router, FormTestError, FORM_TEST_PATH};
pub use status::{Advisory, FormStatusIndicator, IndicatorState};
