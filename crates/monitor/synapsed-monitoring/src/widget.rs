//! Widget values contributed by segments
//!
//! Widgets are opaque to the composition engine: it only orders and routes
//! them. Layout and rendering belong to the emission layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Header size used by the header helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeaderLevel {
    Large,
    Medium,
    Small,
}

impl HeaderLevel {
    /// Markdown prefix for this level
    pub fn markdown_prefix(&self) -> &'static str {
        match self {
            HeaderLevel::Large => "#",
            HeaderLevel::Medium => "##",
            HeaderLevel::Small => "###",
        }
    }
}

/// A single dashboard widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Widget {
    /// Section header
    Header { text: String, level: HeaderLevel },
    /// Free-form markdown text
    Text { markdown: String },
    /// Metric graph with optional threshold annotations
    Graph {
        title: String,
        metrics: Vec<String>,
        annotations: Vec<String>,
    },
    /// Status panel listing alarms by name
    AlarmStatus { title: String, alarms: Vec<String> },
    /// Anything else; the rendering layer interprets `properties`
    Custom {
        kind: String,
        properties: serde_json::Value,
    },
}

impl Widget {
    pub fn header(text: impl Into<String>, level: HeaderLevel) -> Self {
        Widget::Header {
            text: text.into(),
            level,
        }
    }

    pub fn text(markdown: impl Into<String>) -> Self {
        Widget::Text {
            markdown: markdown.into(),
        }
    }

    pub fn graph(title: impl Into<String>, metrics: Vec<String>) -> Self {
        Widget::Graph {
            title: title.into(),
            metrics,
            annotations: Vec::new(),
        }
    }

    pub fn alarm_status(title: impl Into<String>, alarms: Vec<String>) -> Self {
        Widget::AlarmStatus {
            title: title.into(),
            alarms,
        }
    }

    /// Attach a threshold annotation; no-op for widgets that cannot carry one
    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        if let Widget::Graph { annotations, .. } = &mut self {
            annotations.push(annotation.into());
        }
        self
    }

    /// Short title used in logs
    pub fn title(&self) -> &str {
        match self {
            Widget::Header { text, .. } => text,
            Widget::Text { markdown } => markdown,
            Widget::Graph { title, .. } | Widget::AlarmStatus { title, .. } => title,
            Widget::Custom { kind, .. } => kind,
        }
    }
}

impl fmt::Display for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Widget::Header { text, level } => write!(f, "{} {}", level.markdown_prefix(), text),
            Widget::Text { markdown } => write!(f, "{}", markdown),
            Widget::Graph { title, metrics, .. } => {
                write!(f, "Graph[{}; {} metrics]", title, metrics.len())
            }
            Widget::AlarmStatus { title, alarms } => {
                write!(f, "AlarmStatus[{}; {} alarms]", title, alarms.len())
            }
            Widget::Custom { kind, .. } => write!(f, "Custom[{}]", kind),
        }
    }
}
