//! # Synapsed Monitoring
//!
//! Composition engine for observability artifacts. Independently defined
//! monitoring segments contribute widgets and alarms; the facade routes their
//! widgets into named dashboard views and derives composite and cloned alarms
//! from everything produced so far.
//!
//! ## Key Components
//! - **SegmentRegistry**: ordered record of every segment ever added
//! - **AlarmIndex**: live, recomputed view over all created alarms
//! - **DashboardRouter**: stores routing intent, materializes views on demand
//! - **CompositeAlarmBuilder**: OR-combines filtered alarms into composites
//! - **AlarmCloner**: derives new alarms from existing ones
//! - **MonitoringFacade**: single entry point owning all of the above

pub mod alarm;
pub mod cloner;
pub mod composite;
pub mod config;
pub mod facade;
pub mod index;
pub mod logging;
pub mod registry;
pub mod router;
pub mod segment;
pub mod view;
pub mod widget;

// Re-export main types
pub use alarm::{
    AlarmDefinition, AlarmFactory, AlarmId, AlarmRecord, AlarmSpec, ComparisonOperator, MetricRef,
};
pub use cloner::AlarmCloner;
pub use composite::{CompositeAlarm, CompositeAlarmBuilder, CompositeAlarmOptions, LogicalOperator};
pub use crate::config::{FacadeConfig, MonitoringDefaults};
pub use facade::{MonitoringFacade, SegmentFactory};
pub use index::AlarmIndex;
pub use registry::SegmentRegistry;
pub use router::{Dashboard, DashboardRouter};
pub use segment::{
    AlarmSource, BasicMonitoring, DynamicSegment, SegmentHandle, SegmentKey, SingleWidgetSegment,
    StaticSegment, StaticSegmentAdapter,
};
pub use view::{RoutingDirective, ViewName};
pub use widget::{HeaderLevel, Widget};

use thiserror::Error;

/// Monitoring-specific error types
#[derive(Error, Debug)]
pub enum MonitoringError {
    #[error("Invalid alarm: {0}")]
    InvalidAlarm(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Segment error: {0}")]
    Segment(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl From<::config::ConfigError> for MonitoringError {
    fn from(err: ::config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl From<toml::de::Error> for MonitoringError {
    fn from(err: toml::de::Error) -> Self {
        Self::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MonitoringError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MonitoringError::InvalidAlarm("threshold is NaN".to_string());
        assert_eq!(err.to_string(), "Invalid alarm: threshold is NaN");

        let err: MonitoringError = toml::from_str::<FacadeConfig>("defaults = 3")
            .unwrap_err()
            .into();
        assert!(matches!(err, MonitoringError::Configuration(_)));
    }
}
