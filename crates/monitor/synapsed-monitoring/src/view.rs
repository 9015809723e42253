//! View names and per-segment routing directives

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Name of an output view (dashboard)
///
/// The three default views are always known; any other name is a custom view.
/// Views form an open set, so parsing never fails.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ViewName {
    /// Compact overview of the most important widgets
    Summary,
    /// Full detail of every segment
    Detail,
    /// Alarm-annotated widgets only
    Alarms,
    /// Caller-defined view
    Custom(String),
}

impl ViewName {
    /// The default views in materialization order
    pub const DEFAULTS: [ViewName; 3] = [ViewName::Summary, ViewName::Detail, ViewName::Alarms];

    /// View by name; the default view names resolve to their variants
    pub fn custom(name: impl Into<String>) -> Self {
        ViewName::from(name.into().as_str())
    }

    pub fn is_default(&self) -> bool {
        !matches!(self, ViewName::Custom(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            ViewName::Summary => "summary",
            ViewName::Detail => "detail",
            ViewName::Alarms => "alarms",
            ViewName::Custom(name) => name,
        }
    }
}

impl fmt::Display for ViewName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ViewName {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "summary" => ViewName::Summary,
            "detail" => ViewName::Detail,
            "alarms" => ViewName::Alarms,
            _ => ViewName::Custom(s.to_string()),
        })
    }
}

impl From<&str> for ViewName {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(view) => view,
            Err(never) => match never {},
        }
    }
}

/// Which views a segment's contribution is routed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingDirective {
    pub add_to_summary: bool,
    pub add_to_detail: bool,
    pub add_to_alarms: bool,
    /// Custom views the segment is routed to
    pub custom_views: BTreeSet<String>,
    /// Route to every view, known or not; only dynamic segments get this
    every_view: bool,
}

impl Default for RoutingDirective {
    /// Narrative default: summary and detail, not alarms
    fn default() -> Self {
        Self {
            add_to_summary: true,
            add_to_detail: true,
            add_to_alarms: false,
            custom_views: BTreeSet::new(),
            every_view: false,
        }
    }
}

impl RoutingDirective {
    /// Default for alarm widgets: detail and alarms, not summary
    pub fn alarm_widgets() -> Self {
        Self {
            add_to_summary: false,
            add_to_alarms: true,
            ..Self::default()
        }
    }

    /// Directive used by the convenience helpers; detail is always included
    pub fn from_flags(add_to_summary: bool, add_to_alarms: bool) -> Self {
        Self {
            add_to_summary,
            add_to_alarms,
            ..Self::default()
        }
    }

    /// Every default view; custom views still have to be listed
    pub fn everywhere() -> Self {
        Self {
            add_to_summary: true,
            add_to_detail: true,
            add_to_alarms: true,
            custom_views: BTreeSet::new(),
            every_view: false,
        }
    }

    /// Any view, known or not; the segment itself decides what it contributes
    pub(crate) fn any_view() -> Self {
        Self {
            every_view: true,
            ..Self::everywhere()
        }
    }

    /// Add a view by name; default view names set the matching flag
    pub fn with_custom_view(mut self, name: impl Into<String>) -> Self {
        match ViewName::custom(name) {
            ViewName::Summary => self.add_to_summary = true,
            ViewName::Detail => self.add_to_detail = true,
            ViewName::Alarms => self.add_to_alarms = true,
            ViewName::Custom(name) => {
                self.custom_views.insert(name);
            }
        }
        self
    }

    pub fn includes(&self, view: &ViewName) -> bool {
        self.every_view || self.selects(view)
    }

    /// Whether the view is selected by name, ignoring the any-view wildcard
    pub fn selects(&self, view: &ViewName) -> bool {
        match view {
            ViewName::Summary => self.add_to_summary,
            ViewName::Detail => self.add_to_detail,
            ViewName::Alarms => self.add_to_alarms,
            ViewName::Custom(name) => self.custom_views.contains(name),
        }
    }

    /// Views included by either directive
    pub fn union(&self, other: &RoutingDirective) -> RoutingDirective {
        RoutingDirective {
            add_to_summary: self.add_to_summary || other.add_to_summary,
            add_to_detail: self.add_to_detail || other.add_to_detail,
            add_to_alarms: self.add_to_alarms || other.add_to_alarms,
            custom_views: self.custom_views.union(&other.custom_views).cloned().collect(),
            every_view: self.every_view || other.every_view,
        }
    }

    /// Whether every view selected by `other` is already selected here
    pub fn covers(&self, other: &RoutingDirective) -> bool {
        if self.every_view {
            return true;
        }
        !other.every_view
            && (self.add_to_summary || !other.add_to_summary)
            && (self.add_to_detail || !other.add_to_detail)
            && (self.add_to_alarms || !other.add_to_alarms)
            && other.custom_views.is_subset(&self.custom_views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_name_parsing() {
        assert_eq!(ViewName::from("SUMMARY"), ViewName::Summary);
        assert_eq!(ViewName::from("detail"), ViewName::Detail);
        assert_eq!(ViewName::from("Alarms"), ViewName::Alarms);
        assert_eq!(ViewName::from("oncall"), ViewName::custom("oncall"));
        assert!(!ViewName::custom("oncall").is_default());
    }

    #[test]
    fn test_default_directive_asymmetry() {
        let plain = RoutingDirective::default();
        assert!(plain.includes(&ViewName::Summary));
        assert!(plain.includes(&ViewName::Detail));
        assert!(!plain.includes(&ViewName::Alarms));

        let alarms = RoutingDirective::alarm_widgets();
        assert!(!alarms.includes(&ViewName::Summary));
        assert!(alarms.includes(&ViewName::Detail));
        assert!(alarms.includes(&ViewName::Alarms));
    }

    #[test]
    fn test_custom_views_and_union() {
        let a = RoutingDirective::from_flags(false, false).with_custom_view("oncall");
        assert!(a.includes(&ViewName::custom("oncall")));
        assert!(!a.includes(&ViewName::custom("capacity")));
        assert!(a.includes(&ViewName::Detail));

        let b = RoutingDirective::alarm_widgets();
        let merged = a.union(&b);
        assert!(merged.includes(&ViewName::Alarms));
        assert!(merged.includes(&ViewName::custom("oncall")));
        assert!(!merged.includes(&ViewName::Summary));
    }

    #[test]
    fn test_everywhere_covers_default_views_only() {
        let directive = RoutingDirective::everywhere();
        for view in ViewName::DEFAULTS.iter() {
            assert!(directive.includes(view));
        }
        assert!(!directive.includes(&ViewName::custom("anything")));

        let wildcard = RoutingDirective::any_view();
        assert!(wildcard.includes(&ViewName::custom("anything")));
        assert!(!wildcard.selects(&ViewName::custom("anything")));
    }

    #[test]
    fn test_directive_serde_keeps_wildcard() {
        let wildcard = RoutingDirective::any_view();
        let json = serde_json::to_string(&wildcard).unwrap();
        let back: RoutingDirective = serde_json::from_str(&json).unwrap();
        assert_eq!(back, wildcard);

        let listed = RoutingDirective::everywhere().with_custom_view("oncall");
        let json = serde_json::to_string(&listed).unwrap();
        let back: RoutingDirective = serde_json::from_str(&json).unwrap();
        assert_eq!(back, listed);

        // absent fields take the narrative default
        let partial: RoutingDirective = serde_json::from_str(r#"{"add_to_alarms": true}"#).unwrap();
        assert!(partial.includes(&ViewName::Summary));
        assert!(partial.includes(&ViewName::Alarms));
        assert!(!partial.includes(&ViewName::custom("oncall")));
    }

    #[test]
    fn test_default_names_are_not_custom_views() {
        assert_eq!(ViewName::custom("Summary"), ViewName::Summary);
        assert_eq!(ViewName::custom("ALARMS"), ViewName::Alarms);

        let directive = RoutingDirective::from_flags(false, false)
            .with_custom_view("summary")
            .with_custom_view("oncall");
        assert!(directive.includes(&ViewName::from("Summary")));
        assert!(!directive.includes(&ViewName::Alarms));
        assert_eq!(
            directive.custom_views.iter().collect::<Vec<_>>(),
            vec!["oncall"]
        );
    }

    #[test]
    fn test_covers() {
        let plain = RoutingDirective::default();
        assert!(plain.covers(&RoutingDirective::from_flags(false, false)));
        assert!(!plain.covers(&RoutingDirective::alarm_widgets()));
        assert!(!plain.covers(&plain.clone().with_custom_view("oncall")));
        assert!(!RoutingDirective::everywhere().covers(&RoutingDirective::any_view()));
        assert!(RoutingDirective::any_view().covers(&RoutingDirective::everywhere()));
    }
}
