//! Facade configuration
//!
//! Global alarm defaults (naming prefix, account, region) are an explicit
//! object threaded into every alarm factory the facade creates. Configuration
//! can be built in code, parsed from TOML, or layered from a file plus
//! `SYNAPSED_MONITORING__*` environment variables.

use crate::{view::ViewName, MonitoringError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Defaults applied to every alarm the facade creates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringDefaults {
    /// Prefix of every alarm name
    pub alarm_name_prefix: String,
    pub account: Option<String>,
    pub region: Option<String>,
    /// Whether alarm actions are enabled unless a spec says otherwise
    pub actions_enabled: bool,
}

impl Default for MonitoringDefaults {
    fn default() -> Self {
        Self {
            alarm_name_prefix: "Monitoring".to_string(),
            account: None,
            region: None,
            actions_enabled: true,
        }
    }
}

/// Configuration for a [`MonitoringFacade`](crate::MonitoringFacade)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacadeConfig {
    pub defaults: MonitoringDefaults,
    /// Prefix of every dashboard name
    pub dashboard_name_prefix: String,
    pub create_detail_dashboard: bool,
    pub create_summary_dashboard: bool,
    pub create_alarm_dashboard: bool,
    /// Custom views that get their own dashboard
    pub custom_views: Vec<String>,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            defaults: MonitoringDefaults::default(),
            dashboard_name_prefix: "Monitoring".to_string(),
            create_detail_dashboard: true,
            create_summary_dashboard: false,
            create_alarm_dashboard: false,
            custom_views: Vec::new(),
        }
    }
}

impl FacadeConfig {
    /// Environment prefix used by [`FacadeConfig::load`]
    pub const ENV_PREFIX: &'static str = "SYNAPSED_MONITORING";

    pub fn with_defaults(defaults: MonitoringDefaults) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, then apply `SYNAPSED_MONITORING__SECTION__KEY` overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path))
            .add_source(
                ::config::Environment::with_prefix(Self::ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        tracing::debug!(
            path = %path.display(),
            prefix = %config.defaults.alarm_name_prefix,
            "Loaded facade configuration"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_prefix("alarm name prefix", &self.defaults.alarm_name_prefix)?;
        check_prefix("dashboard name prefix", &self.dashboard_name_prefix)?;
        for view in &self.custom_views {
            if ViewName::from(view.as_str()).is_default() {
                return Err(MonitoringError::Configuration(format!(
                    "custom view '{view}' shadows a default view"
                )));
            }
        }
        Ok(())
    }

    /// Views that get a named dashboard, in summary, detail, alarms, custom order
    pub fn enabled_views(&self) -> Vec<ViewName> {
        let mut views = Vec::new();
        if self.create_summary_dashboard {
            views.push(ViewName::Summary);
        }
        if self.create_detail_dashboard {
            views.push(ViewName::Detail);
        }
        if self.create_alarm_dashboard {
            views.push(ViewName::Alarms);
        }
        views.extend(self.custom_views.iter().map(|name| ViewName::custom(name.clone())));
        views
    }

    pub fn is_enabled(&self, view: &ViewName) -> bool {
        match view {
            ViewName::Summary => self.create_summary_dashboard,
            ViewName::Detail => self.create_detail_dashboard,
            ViewName::Alarms => self.create_alarm_dashboard,
            ViewName::Custom(name) => self.custom_views.iter().any(|v| v == name),
        }
    }

    pub fn dashboard_name(&self, view: &ViewName) -> String {
        match view {
            ViewName::Detail => self.dashboard_name_prefix.clone(),
            ViewName::Summary => format!("{}-Summary", self.dashboard_name_prefix),
            ViewName::Alarms => format!("{}-Alarms", self.dashboard_name_prefix),
            ViewName::Custom(name) => format!("{}-{}", self.dashboard_name_prefix, name),
        }
    }
}

fn check_prefix(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(MonitoringError::Configuration(format!("{what} is empty")));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(MonitoringError::Configuration(format!(
            "{what} '{value}' contains whitespace"
        )));
    }
    Ok(())
}
