//! Alarm definitions, records, and the factory that instantiates them
//!
//! An [`AlarmRecord`] is immutable once created. Records keep a handle to the
//! [`AlarmFactory`] that created them so derived alarms inherit the same
//! naming prefix and account/region defaults.

use crate::{config::MonitoringDefaults, MonitoringError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Unique identity of an alarm record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AlarmId(Uuid);

impl AlarmId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AlarmId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AlarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to the metric an alarm watches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRef {
    pub namespace: String,
    pub name: String,
    pub statistic: String,
    pub dimensions: BTreeMap<String, String>,
}

impl MetricRef {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        statistic: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            statistic: statistic.into(),
            dimensions: BTreeMap::new(),
        }
    }

    pub fn with_dimension(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.dimensions.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for MetricRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({})", self.namespace, self.name, self.statistic)
    }
}

/// How the metric is compared against the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    GreaterThanThreshold,
    GreaterThanOrEqualToThreshold,
    LessThanThreshold,
    LessThanOrEqualToThreshold,
}

impl ComparisonOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::GreaterThanThreshold => ">",
            ComparisonOperator::GreaterThanOrEqualToThreshold => ">=",
            ComparisonOperator::LessThanThreshold => "<",
            ComparisonOperator::LessThanOrEqualToThreshold => "<=",
        }
    }
}

/// Metric, threshold and evaluation settings of one alarm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmDefinition {
    pub metric: MetricRef,
    pub threshold: f64,
    pub comparison: ComparisonOperator,
    pub evaluation_periods: u32,
    pub datapoints_to_alarm: u32,
}

impl AlarmDefinition {
    pub fn new(metric: MetricRef, comparison: ComparisonOperator, threshold: f64) -> Self {
        Self {
            metric,
            threshold,
            comparison,
            evaluation_periods: 1,
            datapoints_to_alarm: 1,
        }
    }

    pub fn with_periods(mut self, evaluation_periods: u32, datapoints_to_alarm: u32) -> Self {
        self.evaluation_periods = evaluation_periods;
        self.datapoints_to_alarm = datapoints_to_alarm;
        self
    }

    /// Human-readable threshold description used for widget overlays
    pub fn annotation(&self) -> String {
        format!(
            "{} {} {} for {} datapoints within {} periods",
            self.metric.name,
            self.comparison.symbol(),
            self.threshold,
            self.datapoints_to_alarm,
            self.evaluation_periods
        )
    }
}

/// Request to create an alarm, handed to [`AlarmFactory::create`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmSpec {
    pub alarm_name_suffix: String,
    pub definition: AlarmDefinition,
    pub description: Option<String>,
    pub disambiguator: Option<String>,
    pub tags: BTreeSet<String>,
    /// Overrides the factory default when set
    pub actions_enabled: Option<bool>,
}

impl AlarmSpec {
    pub fn new(alarm_name_suffix: impl Into<String>, definition: AlarmDefinition) -> Self {
        Self {
            alarm_name_suffix: alarm_name_suffix.into(),
            definition,
            description: None,
            disambiguator: None,
            tags: BTreeSet::new(),
            actions_enabled: None,
        }
    }

    /// Spec that reproduces an existing record; the usual starting point for clone transforms
    pub fn from_record(record: &AlarmRecord) -> Self {
        Self {
            alarm_name_suffix: record.alarm_name_suffix.clone(),
            definition: record.definition.clone(),
            description: record.description.clone(),
            disambiguator: record.disambiguator.clone(),
            tags: record.tags.clone(),
            actions_enabled: Some(record.actions_enabled),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_disambiguator(mut self, disambiguator: impl Into<String>) -> Self {
        self.disambiguator = Some(disambiguator.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.definition.threshold = threshold;
        self
    }
}

/// An instantiated alarm plus its filterable metadata
#[derive(Debug, Clone, Serialize)]
pub struct AlarmRecord {
    pub id: AlarmId,
    pub name: String,
    pub alarm_name_suffix: String,
    pub definition: AlarmDefinition,
    pub tags: BTreeSet<String>,
    pub disambiguator: Option<String>,
    pub annotation: String,
    pub description: Option<String>,
    pub actions_enabled: bool,
    pub account: Option<String>,
    pub region: Option<String>,
    #[serde(skip)]
    factory: Arc<AlarmFactory>,
}

impl AlarmRecord {
    /// Factory that created this alarm
    pub fn factory(&self) -> &Arc<AlarmFactory> {
        &self.factory
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn has_disambiguator(&self, value: &str) -> bool {
        self.disambiguator.as_deref() == Some(value)
    }
}

impl PartialEq for AlarmRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AlarmRecord {}

impl fmt::Display for AlarmRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Alarm[{}: {}]", self.name, self.annotation)
    }
}

/// Creates alarms with a naming prefix and account/region defaults
#[derive(Debug, Clone, PartialEq)]
pub struct AlarmFactory {
    defaults: MonitoringDefaults,
    name_prefix: String,
}

impl AlarmFactory {
    pub fn new(defaults: MonitoringDefaults) -> Self {
        let name_prefix = defaults.alarm_name_prefix.clone();
        Self {
            defaults,
            name_prefix,
        }
    }

    /// Factory sharing `defaults` but naming alarms with a different prefix
    pub fn with_prefix(defaults: MonitoringDefaults, name_prefix: impl Into<String>) -> Self {
        Self {
            defaults,
            name_prefix: name_prefix.into(),
        }
    }

    pub fn name_prefix(&self) -> &str {
        &self.name_prefix
    }

    pub fn defaults(&self) -> &MonitoringDefaults {
        &self.defaults
    }

    /// `prefix-suffix[-disambiguator]`
    pub fn alarm_name(&self, suffix: &str, disambiguator: Option<&str>) -> String {
        match disambiguator {
            Some(d) => format!("{}-{}-{}", self.name_prefix, suffix, d),
            None => format!("{}-{}", self.name_prefix, suffix),
        }
    }

    /// Validate and instantiate an alarm
    pub fn create(self: &Arc<Self>, spec: AlarmSpec) -> Result<AlarmRecord> {
        validate_spec(&spec)?;

        let name = self.alarm_name(&spec.alarm_name_suffix, spec.disambiguator.as_deref());
        let annotation = spec.definition.annotation();
        tracing::trace!(alarm = %name, "Created alarm");

        Ok(AlarmRecord {
            id: AlarmId::new(),
            name,
            alarm_name_suffix: spec.alarm_name_suffix,
            definition: spec.definition,
            tags: spec.tags,
            disambiguator: spec.disambiguator,
            annotation,
            description: spec.description,
            actions_enabled: spec.actions_enabled.unwrap_or(self.defaults.actions_enabled),
            account: self.defaults.account.clone(),
            region: self.defaults.region.clone(),
            factory: Arc::clone(self),
        })
    }
}

fn validate_spec(spec: &AlarmSpec) -> Result<()> {
    if spec.alarm_name_suffix.trim().is_empty() {
        return Err(MonitoringError::InvalidAlarm("alarm name suffix is empty".to_string()));
    }
    let definition = &spec.definition;
    if !definition.threshold.is_finite() {
        return Err(MonitoringError::InvalidAlarm(format!(
            "{}: threshold must be finite, got {}",
            spec.alarm_name_suffix, definition.threshold
        )));
    }
    if definition.evaluation_periods == 0 {
        return Err(MonitoringError::InvalidAlarm(format!(
            "{}: evaluation periods must be at least 1",
            spec.alarm_name_suffix
        )));
    }
    if definition.datapoints_to_alarm == 0
        || definition.datapoints_to_alarm > definition.evaluation_periods
    {
        return Err(MonitoringError::InvalidAlarm(format!(
            "{}: datapoints to alarm ({}) must be between 1 and evaluation periods ({})",
            spec.alarm_name_suffix, definition.datapoints_to_alarm, definition.evaluation_periods
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> Arc<AlarmFactory> {
        Arc::new(AlarmFactory::new(MonitoringDefaults {
            alarm_name_prefix: "Orders".to_string(),
            account: Some("123456789012".to_string()),
            region: Some("eu-west-1".to_string()),
            actions_enabled: true,
        }))
    }

    fn latency() -> AlarmDefinition {
        AlarmDefinition::new(
            MetricRef::new("Service", "Latency", "p99"),
            ComparisonOperator::GreaterThanThreshold,
            300.0,
        )
        .with_periods(5, 3)
    }

    #[test]
    fn test_alarm_naming() {
        let factory = factory();
        let plain = factory.create(AlarmSpec::new("Latency", latency())).unwrap();
        assert_eq!(plain.name, "Orders-Latency");

        let disambiguated = factory
            .create(AlarmSpec::new("Latency", latency()).with_disambiguator("Critical"))
            .unwrap();
        assert_eq!(disambiguated.name, "Orders-Latency-Critical");
        assert!(disambiguated.has_disambiguator("Critical"));
    }

    #[test]
    fn test_alarm_inherits_defaults() {
        let record = factory().create(AlarmSpec::new("Latency", latency())).unwrap();
        assert_eq!(record.account.as_deref(), Some("123456789012"));
        assert_eq!(record.region.as_deref(), Some("eu-west-1"));
        assert!(record.actions_enabled);
        assert_eq!(record.annotation, "Latency > 300 for 3 datapoints within 5 periods");
        assert_eq!(record.factory().name_prefix(), "Orders");
    }

    #[test]
    fn test_invalid_specs_are_rejected() {
        let factory = factory();
        assert!(matches!(
            factory.create(AlarmSpec::new("  ", latency())),
            Err(MonitoringError::InvalidAlarm(_))
        ));
        assert!(factory
            .create(AlarmSpec::new("Latency", latency()).with_threshold(f64::NAN))
            .is_err());
        assert!(factory
            .create(AlarmSpec::new("Latency", latency().with_periods(2, 3)))
            .is_err());
        assert!(factory
            .create(AlarmSpec::new("Latency", latency().with_periods(0, 0)))
            .is_err());
    }

    #[test]
    fn test_spec_from_record_round_trips_metadata() {
        let record = factory()
            .create(
                AlarmSpec::new("Latency", latency())
                    .with_tag("oncall")
                    .with_disambiguator("Warning"),
            )
            .unwrap();
        let spec = AlarmSpec::from_record(&record);
        assert_eq!(spec.alarm_name_suffix, "Latency");
        assert!(spec.tags.contains("oncall"));
        assert_eq!(spec.disambiguator.as_deref(), Some("Warning"));
        assert_eq!(spec.actions_enabled, Some(true));
    }

    #[test]
    fn test_records_compare_by_identity() {
        let factory = factory();
        let a = factory.create(AlarmSpec::new("Latency", latency())).unwrap();
        let b = factory.create(AlarmSpec::new("Latency", latency())).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }
}
