//! Composite alarms
//!
//! A composite alarm combines a filtered set of existing alarms. Composites
//! live in their own registry and never enter the alarm index, so building a
//! composite over a tag never changes what later tag queries return.

use crate::alarm::{AlarmFactory, AlarmId, AlarmRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// How child alarms are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LogicalOperator {
    #[default]
    Or,
    And,
}

impl LogicalOperator {
    pub fn keyword(&self) -> &'static str {
        match self {
            LogicalOperator::Or => "OR",
            LogicalOperator::And => "AND",
        }
    }
}

/// Options for building a composite alarm
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositeAlarmOptions {
    /// Overrides the filter key as the composite's disambiguator
    pub disambiguator: Option<String>,
    /// Name suffix, `Composite` when unset
    pub alarm_name_suffix: Option<String>,
    pub description: Option<String>,
    pub actions_enabled: Option<bool>,
    /// Action target passed through to the emission layer
    pub action: Option<String>,
    pub operator: LogicalOperator,
}

impl CompositeAlarmOptions {
    pub const DEFAULT_NAME_SUFFIX: &'static str = "Composite";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_disambiguator(mut self, disambiguator: impl Into<String>) -> Self {
        self.disambiguator = Some(disambiguator.into());
        self
    }

    pub fn with_name_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.alarm_name_suffix = Some(suffix.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_actions_enabled(mut self, enabled: bool) -> Self {
        self.actions_enabled = Some(enabled);
        self
    }

    pub fn with_operator(mut self, operator: LogicalOperator) -> Self {
        self.operator = operator;
        self
    }
}

/// Combination of existing alarms, referenced by identity
#[derive(Debug, Clone, Serialize)]
pub struct CompositeAlarm {
    pub id: AlarmId,
    pub name: String,
    pub disambiguator: String,
    pub operator: LogicalOperator,
    /// Deduplicated children in first-seen order
    pub children: Vec<AlarmRecord>,
    pub description: Option<String>,
    pub actions_enabled: bool,
    pub action: Option<String>,
}

impl CompositeAlarm {
    /// Alarm rule, e.g. `ALARM("a") OR ALARM("b")`
    pub fn rule_expression(&self) -> String {
        let separator = format!(" {} ", self.operator.keyword());
        self.children
            .iter()
            .map(|child| format!("ALARM(\"{}\")", child.name))
            .collect::<Vec<_>>()
            .join(&separator)
    }

    pub fn child_ids(&self) -> Vec<AlarmId> {
        self.children.iter().map(|child| child.id).collect()
    }
}

impl fmt::Display for CompositeAlarm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompositeAlarm[{}: {}]", self.name, self.rule_expression())
    }
}

/// Builds composites and keeps every composite it created
#[derive(Debug, Default)]
pub struct CompositeAlarmBuilder {
    created: Vec<CompositeAlarm>,
}

impl CompositeAlarmBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Combine `alarms` into a new composite
    ///
    /// Returns `None` without creating anything when `alarms` is empty.
    /// `filter_key` is the tag or disambiguator that selected the alarms and
    /// becomes the composite's disambiguator unless the options override it.
    pub fn build(
        &mut self,
        factory: &AlarmFactory,
        alarms: Vec<AlarmRecord>,
        filter_key: &str,
        options: CompositeAlarmOptions,
    ) -> Option<CompositeAlarm> {
        let mut seen = HashSet::new();
        let children: Vec<AlarmRecord> = alarms
            .into_iter()
            .filter(|alarm| seen.insert(alarm.id))
            .collect();

        if children.is_empty() {
            tracing::debug!(filter = %filter_key, "No alarms matched, skipping composite alarm");
            return None;
        }

        let disambiguator = options
            .disambiguator
            .unwrap_or_else(|| filter_key.to_string());
        let suffix = options
            .alarm_name_suffix
            .as_deref()
            .unwrap_or(CompositeAlarmOptions::DEFAULT_NAME_SUFFIX);

        let composite = CompositeAlarm {
            id: AlarmId::new(),
            name: factory.alarm_name(suffix, Some(&disambiguator)),
            disambiguator,
            operator: options.operator,
            children,
            description: options.description,
            actions_enabled: options
                .actions_enabled
                .unwrap_or(factory.defaults().actions_enabled),
            action: options.action,
        };

        tracing::debug!(
            composite = %composite.name,
            children = composite.children.len(),
            "Created composite alarm"
        );
        self.created.push(composite.clone());
        Some(composite)
    }

    pub fn created(&self) -> &[CompositeAlarm] {
        &self.created
    }
}
