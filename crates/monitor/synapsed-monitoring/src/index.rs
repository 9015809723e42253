//! Alarm index
//!
//! The index is not a second store kept in sync with the segments. It is a
//! borrowed view over the segment registry and the clone list, recomputed on
//! every query, so it always reflects the live alarm lists of all segments.

use crate::{alarm::AlarmRecord, registry::SegmentRegistry};

/// Read-only query view over every created alarm
#[derive(Debug, Clone, Copy)]
pub struct AlarmIndex<'a> {
    registry: &'a SegmentRegistry,
    clones: &'a [AlarmRecord],
}

impl<'a> AlarmIndex<'a> {
    pub fn new(registry: &'a SegmentRegistry, clones: &'a [AlarmRecord]) -> Self {
        Self { registry, clones }
    }

    /// Alarms of every monitoring segment in registration order, then clones in creation order
    pub fn all_alarms(&self) -> Vec<AlarmRecord> {
        self.registry
            .monitoring_segments()
            .filter_map(|segment| segment.as_alarm_source())
            .flat_map(|source| source.created_alarms())
            .chain(self.clones.iter().cloned())
            .collect()
    }

    pub fn by_tag(&self, tag: &str) -> Vec<AlarmRecord> {
        self.filtered(|alarm| alarm.has_tag(tag))
    }

    pub fn by_disambiguator(&self, value: &str) -> Vec<AlarmRecord> {
        self.filtered(|alarm| alarm.has_disambiguator(value))
    }

    fn filtered<F>(&self, predicate: F) -> Vec<AlarmRecord>
    where
        F: Fn(&AlarmRecord) -> bool,
    {
        self.all_alarms().into_iter().filter(|alarm| predicate(alarm)).collect()
    }
}
