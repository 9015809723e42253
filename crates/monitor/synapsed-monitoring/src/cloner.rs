//! Alarm cloning
//!
//! Derives new alarms from existing ones through a caller-supplied transform.
//! Clones are created by the source alarm's own factory, so they inherit its
//! naming prefix and account/region defaults.

use crate::{
    alarm::{AlarmRecord, AlarmSpec},
    Result,
};

/// Creates cloned alarms and keeps them in creation order
#[derive(Debug, Default)]
pub struct AlarmCloner {
    clones: Vec<AlarmRecord>,
}

impl AlarmCloner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `transform` to each source in order
    ///
    /// `None` from the transform skips that source. Alarm construction errors
    /// are returned as-is; clones created before the failure stay registered.
    pub fn clone_alarms<F>(
        &mut self,
        sources: &[AlarmRecord],
        mut transform: F,
    ) -> Result<Vec<AlarmRecord>>
    where
        F: FnMut(&AlarmRecord) -> Option<AlarmSpec>,
    {
        let mut created = Vec::new();
        for source in sources {
            let Some(spec) = transform(source) else {
                tracing::trace!(source = %source.name, "Clone transform skipped alarm");
                continue;
            };
            let clone = source.factory().create(spec)?;
            tracing::debug!(source = %source.name, clone = %clone.name, "Cloned alarm");
            self.clones.push(clone.clone());
            created.push(clone);
        }
        Ok(created)
    }

    /// Every clone created so far, in creation order
    pub fn clones(&self) -> &[AlarmRecord] {
        &self.clones
    }
}
