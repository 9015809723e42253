//! Ordered record of every segment added to a facade

use crate::segment::SegmentHandle;

/// Append-only, insertion-ordered segment list
///
/// Segments are never deduplicated: adding the same segment twice yields two entries.
#[derive(Debug, Default, Clone)]
pub struct SegmentRegistry {
    segments: Vec<SegmentHandle>,
}

impl SegmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, segment: SegmentHandle) {
        tracing::trace!(
            segment = %segment.key(),
            position = self.segments.len(),
            "Registered segment"
        );
        self.segments.push(segment);
    }

    pub fn all(&self) -> &[SegmentHandle] {
        &self.segments
    }

    /// Segments that own alarms, in registration order
    pub fn monitoring_segments(&self) -> impl Iterator<Item = &SegmentHandle> + '_ {
        self.segments.iter().filter(|segment| segment.is_monitoring())
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{BasicMonitoring, SingleWidgetSegment};
    use crate::widget::Widget;
    use std::sync::Arc;

    #[test]
    fn test_registry_preserves_order_and_duplicates() {
        let mut registry = SegmentRegistry::new();
        let text = SegmentHandle::Static(Arc::new(SingleWidgetSegment::new(Widget::text("a"))));
        let queue = SegmentHandle::Static(Arc::new(BasicMonitoring::new("Queue")));

        registry.add(text.clone());
        registry.add(queue.clone());
        registry.add(text.clone());

        assert_eq!(registry.len(), 3);
        let keys: Vec<_> = registry.all().iter().map(SegmentHandle::key).collect();
        assert_eq!(keys, vec![text.key(), queue.key(), text.key()]);

        let monitoring: Vec<_> = registry.monitoring_segments().map(SegmentHandle::key).collect();
        assert_eq!(monitoring, vec![queue.key()]);
    }
}
