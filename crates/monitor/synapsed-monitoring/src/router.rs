//! Dashboard routing and view materialization
//!
//! The router stores routing intent, `(segment, directive)` pairs, and only
//! asks segments for widgets when a view is materialized. A dynamic segment
//! may return different widgets per view, and views may be materialized any
//! number of times.

use crate::{
    segment::{DynamicSegment, SegmentHandle, SegmentKey},
    view::{RoutingDirective, ViewName},
    widget::Widget,
    Result,
};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

struct RouteEntry {
    key: SegmentKey,
    directive: RoutingDirective,
    segment: Arc<dyn DynamicSegment>,
}

/// Routes segments to views, at most once per (segment, view) pair
#[derive(Default)]
pub struct DashboardRouter {
    entries: Vec<RouteEntry>,
    coverage: HashMap<SegmentKey, RoutingDirective>,
}

impl DashboardRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `segment` contributes to the views selected by `directive`
    ///
    /// Routing a segment that is already routed appends only the views it did
    /// not reach before; views it already reaches keep their original position.
    pub fn route(&mut self, segment: &SegmentHandle, directive: RoutingDirective) {
        let key = segment.key();
        match self.coverage.entry(key) {
            Entry::Occupied(mut covered) => {
                if covered.get().covers(&directive) {
                    tracing::debug!(segment = %key, "Segment already reaches every requested view");
                    return;
                }
                let widened = covered.get().union(&directive);
                covered.insert(widened);
                tracing::debug!(segment = %key, "Widened routing for segment");
            }
            Entry::Vacant(slot) => {
                slot.insert(directive.clone());
                tracing::trace!(segment = %key, "Routed segment");
            }
        }

        self.entries.push(RouteEntry {
            key,
            segment: segment.to_dynamic(&directive),
            directive,
        });
    }

    /// Widgets of every segment routed to `view`, in routing order
    ///
    /// A segment contributes at its first entry that reaches the view.
    /// Unknown views materialize as empty.
    pub fn materialize(&self, view: &ViewName) -> Vec<Widget> {
        let mut seen = HashSet::new();
        let widgets: Vec<Widget> = self
            .entries
            .iter()
            .filter(|entry| entry.directive.includes(view) && seen.insert(entry.key))
            .flat_map(|entry| entry.segment.widgets_for_view(view))
            .collect();
        tracing::trace!(view = %view, widgets = widgets.len(), "Materialized view");
        widgets
    }

    /// Union of every directive a segment was routed with
    pub fn directive_for(&self, segment: &SegmentHandle) -> Option<&RoutingDirective> {
        self.coverage.get(&segment.key())
    }

    /// Number of distinct routed segments
    pub fn len(&self) -> usize {
        self.coverage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coverage.is_empty()
    }
}

/// A materialized, named view handed to the rendering layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub name: String,
    pub view: ViewName,
    pub widgets: Vec<Widget>,
}

impl Dashboard {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
