pub mod detector;
pub mod dispatch;
pub mod report;
pub mod runner;
pub mod step;
pub mod telemetry;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use detector::{ChangeDetector, DetectionOutcome};
pub use dispatch::{backend::DispatchBackend, github::GitHubBackend, noop::NoopBackend};
pub use report::{AbortRecord, RunReport, StepOutcome, StepRecord};
pub use runner::{ScheduledStep, UpdateRunner};
pub use step::{CommandStep, Runnable, StepFailure};
