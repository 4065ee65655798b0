use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::DataPublicError;
use crate::types::{DispatchTarget, FailurePolicy, ProbeSpec, StepSpec};

/// TOML-backed orchestration config. Every section is optional and falls
/// back to the values the update scripts were authored with.
/// Secrets (the dispatch token) stay as env vars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub probe: ProbeSpec,
    #[serde(default = "default_steps")]
    pub steps: Vec<StepSpec>,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Name of the env var holding the bearer token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default)]
    pub target: DispatchTarget,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Where to write the JSON run report after a completed update run.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            dispatch: DispatchConfig::default(),
            probe: ProbeSpec::default(),
            steps: default_steps(),
            report: ReportConfig::default(),
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            token_env: default_token_env(),
            target: DispatchTarget::default(),
        }
    }
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn python(name: &str, script: &str, args: &[&str], policy: FailurePolicy) -> StepSpec {
    let mut full = vec![script];
    full.extend_from_slice(args);
    StepSpec::new(name, "python", &full, policy)
}

/// The per-source updaters, in the order they have always run.
fn default_steps() -> Vec<StepSpec> {
    use FailurePolicy::{AbortOnFailure, WarnAndContinue};

    vec![
        python("nytimes", "scripts/update_nytimes_data.py", &[], AbortOnFailure),
        python("covid_county_data", "scripts/update_covid_county_data.py", &[], AbortOnFailure),
        python(
            "covid_tracking",
            "scripts/update_covid_tracking_data.py",
            &["--replace-local-mirror", "--generate-common-csv"],
            WarnAndContinue,
        ),
        python("hhs_hospital", "scripts/update_hhs_hospital_data.py", &[], AbortOnFailure),
        python(
            "hhs_testing",
            "scripts/update_hhs_testing_data.py",
            &["--replace-local-mirror", "--generate-common-csv"],
            AbortOnFailure,
        ),
        python(
            "cms_testing",
            "scripts/update_cms_testing_data.py",
            &["--replace-local-mirror", "--generate-common-csv"],
            WarnAndContinue,
        ),
        python("cdc_testing", "scripts/update_cdc_test_data.py", &["--fetch"], AbortOnFailure),
        python("cdc_vaccines", "scripts/update_cdc_vaccine_data.py", &["--fetch"], WarnAndContinue),
        python(
            "can_scraper_state_providers",
            "scripts/update_can_scraper_state_providers.py",
            &["--fetch"],
            AbortOnFailure,
        ),
        python("covid_data_scraper", "scripts/update_covid_data_scraper.py", &[], WarnAndContinue),
        python("forecast_hub", "scripts/update_forecast_hub.py", &[], WarnAndContinue),
        python("covid_care_map", "scripts/update_covid_care_map.py", &["--no-fetch"], WarnAndContinue),
        python("can_location_urls", "scripts/update_can_location_urls.py", &[], WarnAndContinue),
    ]
}

impl FileConfig {
    /// Reject configs the runner could not execute faithfully.
    pub fn validate(&self) -> crate::Result<()> {
        if self.steps.is_empty() {
            return Err(DataPublicError::Config("at least one [[steps]] entry is required".into()));
        }

        let mut seen = HashSet::new();
        for step in &self.steps {
            if step.name.trim().is_empty() {
                return Err(DataPublicError::Config("step name must not be empty".into()));
            }
            if step.program.trim().is_empty() {
                return Err(DataPublicError::Config(format!(
                    "step '{}' has an empty program",
                    step.name
                )));
            }
            if !seen.insert(step.name.as_str()) {
                return Err(DataPublicError::Config(format!(
                    "duplicate step name '{}'",
                    step.name
                )));
            }
        }

        if self.probe.program.trim().is_empty() {
            return Err(DataPublicError::Config("probe program must not be empty".into()));
        }
        if self.dispatch.token_env.trim().is_empty() {
            return Err(DataPublicError::Config("dispatch.token_env must not be empty".into()));
        }
        if self.dispatch.target.url().trim().is_empty() {
            return Err(DataPublicError::Config("dispatch.target.url must not be empty".into()));
        }
        Ok(())
    }
}

/// Conventional location, relative to the repository root.
pub const DEFAULT_CONFIG_PATH: &str = "config/datapublic.toml";

/// An explicit path must exist. Without one, [`DEFAULT_CONFIG_PATH`] is used
/// when present and the built-in defaults otherwise.
pub fn load_or_default(explicit: Option<&Path>) -> Result<FileConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    let fallback = Path::new(DEFAULT_CONFIG_PATH);
    if fallback.is_file() {
        tracing::info!(config = %fallback.display(), "Loading config");
        return load_config(fallback);
    }
    tracing::info!("No config file found, using built-in defaults");
    Ok(FileConfig::default())
}

/// Load and parse a TOML config file.
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    Ok(config)
}
