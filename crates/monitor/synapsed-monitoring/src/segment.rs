//! Segment capabilities
//!
//! A segment is one unit of visual and alarm contribution for a monitored
//! entity. Segments come in two shapes:
//! - [`StaticSegment`]: fixed widgets, routed by a fixed [`RoutingDirective`]
//! - [`DynamicSegment`]: computes widgets per requested view
//!
//! Alarm ownership is a separate capability ([`AlarmSource`]) that either
//! shape may expose through `as_alarm_source`. The router only ever sees the
//! dynamic shape; static segments are wrapped in a [`StaticSegmentAdapter`].

use crate::{
    alarm::{AlarmFactory, AlarmRecord, AlarmSpec},
    view::{RoutingDirective, ViewName},
    widget::Widget,
    Result,
};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Capability of segments that own alarms
pub trait AlarmSource: Send + Sync {
    /// Alarms created by this segment so far, in creation order
    fn created_alarms(&self) -> Vec<AlarmRecord>;
}

/// Segment with a fixed widget set
///
/// Implementations must be pure functions of their construction-time state:
/// repeated calls return equal output.
pub trait StaticSegment: Send + Sync {
    /// Widgets for the detail view and for custom views
    fn widgets(&self) -> Vec<Widget>;

    /// Widgets for the summary view
    fn summary_widgets(&self) -> Vec<Widget> {
        self.widgets()
    }

    /// Widgets for the alarms view
    fn alarm_widgets(&self) -> Vec<Widget> {
        self.widgets()
    }

    fn as_alarm_source(&self) -> Option<&dyn AlarmSource> {
        None
    }
}

/// Segment that computes its widgets for each requested view
pub trait DynamicSegment: Send + Sync {
    /// Widgets for `view`; empty when the segment does not contribute to it
    fn widgets_for_view(&self, view: &ViewName) -> Vec<Widget>;

    fn as_alarm_source(&self) -> Option<&dyn AlarmSource> {
        None
    }
}

/// Presents a static segment through the dynamic protocol
///
/// Per-view output is the static widget list for that view, or nothing when
/// the directive excludes the view. Custom views must be listed by name.
pub struct StaticSegmentAdapter {
    segment: Arc<dyn StaticSegment>,
    directive: RoutingDirective,
}

impl StaticSegmentAdapter {
    pub fn new(segment: Arc<dyn StaticSegment>, directive: RoutingDirective) -> Self {
        Self { segment, directive }
    }

    pub fn directive(&self) -> &RoutingDirective {
        &self.directive
    }
}

impl DynamicSegment for StaticSegmentAdapter {
    fn widgets_for_view(&self, view: &ViewName) -> Vec<Widget> {
        let routed = match view {
            ViewName::Custom(_) => self.directive.selects(view),
            _ => self.directive.includes(view),
        };
        if !routed {
            return Vec::new();
        }
        match view {
            ViewName::Summary => self.segment.summary_widgets(),
            ViewName::Alarms => self.segment.alarm_widgets(),
            ViewName::Detail | ViewName::Custom(_) => self.segment.widgets(),
        }
    }

    fn as_alarm_source(&self) -> Option<&dyn AlarmSource> {
        self.segment.as_alarm_source()
    }
}

/// Identity of a registered segment (address of the shared allocation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentKey(usize);

impl SegmentKey {
    fn of<T: ?Sized>(segment: &Arc<T>) -> Self {
        Self(Arc::as_ptr(segment) as *const () as usize)
    }
}

impl fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "segment@{:#x}", self.0)
    }
}

/// A segment as accepted at the facade boundary
#[derive(Clone)]
pub enum SegmentHandle {
    Static(Arc<dyn StaticSegment>),
    Dynamic(Arc<dyn DynamicSegment>),
}

impl SegmentHandle {
    pub fn key(&self) -> SegmentKey {
        match self {
            SegmentHandle::Static(segment) => SegmentKey::of(segment),
            SegmentHandle::Dynamic(segment) => SegmentKey::of(segment),
        }
    }

    pub fn as_alarm_source(&self) -> Option<&dyn AlarmSource> {
        match self {
            SegmentHandle::Static(segment) => segment.as_alarm_source(),
            SegmentHandle::Dynamic(segment) => segment.as_alarm_source(),
        }
    }

    /// Whether this segment owns alarms
    pub fn is_monitoring(&self) -> bool {
        self.as_alarm_source().is_some()
    }

    /// Uniform dynamic representation used by the router
    pub fn to_dynamic(&self, directive: &RoutingDirective) -> Arc<dyn DynamicSegment> {
        match self {
            SegmentHandle::Static(segment) => Arc::new(StaticSegmentAdapter::new(
                Arc::clone(segment),
                directive.clone(),
            )),
            SegmentHandle::Dynamic(segment) => Arc::clone(segment),
        }
    }
}

impl fmt::Debug for SegmentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            SegmentHandle::Static(_) => "Static",
            SegmentHandle::Dynamic(_) => "Dynamic",
        };
        f.debug_struct("SegmentHandle")
            .field("kind", &kind)
            .field("key", &self.key())
            .field("monitoring", &self.is_monitoring())
            .finish()
    }
}

/// Segment carrying exactly one widget; used by the header and widget helpers
#[derive(Debug, Clone, PartialEq)]
pub struct SingleWidgetSegment {
    widget: Widget,
}

impl SingleWidgetSegment {
    pub fn new(widget: Widget) -> Self {
        Self { widget }
    }
}

impl StaticSegment for SingleWidgetSegment {
    fn widgets(&self) -> Vec<Widget> {
        vec![self.widget.clone()]
    }
}

/// General-purpose monitoring segment
///
/// Holds detail, summary, and alarm widgets plus a live list of alarms.
/// Alarms added after registration are picked up by the facade's alarm index.
#[derive(Debug)]
pub struct BasicMonitoring {
    title: String,
    widgets: Vec<Widget>,
    summary_widgets: Option<Vec<Widget>>,
    alarm_widgets: Option<Vec<Widget>>,
    alarms: RwLock<Vec<AlarmRecord>>,
}

impl BasicMonitoring {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            widgets: Vec::new(),
            summary_widgets: None,
            alarm_widgets: None,
            alarms: RwLock::new(Vec::new()),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn with_widget(mut self, widget: Widget) -> Self {
        self.widgets.push(widget);
        self
    }

    /// Use a dedicated summary widget instead of the detail widgets
    pub fn with_summary_widget(mut self, widget: Widget) -> Self {
        self.summary_widgets.get_or_insert_with(Vec::new).push(widget);
        self
    }

    /// Use a dedicated alarm widget instead of the generated alarm status panel
    pub fn with_alarm_widget(mut self, widget: Widget) -> Self {
        self.alarm_widgets.get_or_insert_with(Vec::new).push(widget);
        self
    }

    /// Create an alarm owned by this segment
    pub fn add_alarm(&self, factory: &Arc<AlarmFactory>, spec: AlarmSpec) -> Result<AlarmRecord> {
        let record = factory.create(spec)?;
        self.alarms.write().push(record.clone());
        Ok(record)
    }
}

impl StaticSegment for BasicMonitoring {
    fn widgets(&self) -> Vec<Widget> {
        self.widgets.clone()
    }

    fn summary_widgets(&self) -> Vec<Widget> {
        match &self.summary_widgets {
            Some(widgets) => widgets.clone(),
            None => self.widgets(),
        }
    }

    /// Explicit alarm widgets, else one status panel over the owned alarms
    fn alarm_widgets(&self) -> Vec<Widget> {
        if let Some(widgets) = &self.alarm_widgets {
            return widgets.clone();
        }
        let alarms = self.alarms.read();
        if alarms.is_empty() {
            return Vec::new();
        }
        vec![Widget::alarm_status(
            self.title.clone(),
            alarms.iter().map(|alarm| alarm.name.clone()).collect(),
        )]
    }

    fn as_alarm_source(&self) -> Option<&dyn AlarmSource> {
        Some(self)
    }
}

impl AlarmSource for BasicMonitoring {
    fn created_alarms(&self) -> Vec<AlarmRecord> {
        self.alarms.read().clone()
    }
}
