//! Monitoring facade
//!
//! Single entry point that owns the segment registry, dashboard router,
//! composite registry, and clone registry. All mutation happens through the
//! methods below; the alarm index is computed from the registry and the
//! clone list on every query.

use crate::{
    alarm::{AlarmFactory, AlarmRecord, AlarmSpec},
    cloner::AlarmCloner,
    composite::{CompositeAlarm, CompositeAlarmBuilder, CompositeAlarmOptions},
    config::FacadeConfig,
    index::AlarmIndex,
    registry::SegmentRegistry,
    router::{Dashboard, DashboardRouter},
    segment::{DynamicSegment, SegmentHandle, SingleWidgetSegment, StaticSegment},
    view::{RoutingDirective, ViewName},
    widget::{HeaderLevel, Widget},
    Result,
};
use std::sync::Arc;

/// Builds a segment for one monitored resource
///
/// Implemented by resource-specific builders. The factory passed in carries
/// the facade's naming prefix and account/region defaults.
pub trait SegmentFactory {
    fn build(&self, alarm_factory: &Arc<AlarmFactory>) -> Result<Arc<dyn StaticSegment>>;
}

impl<F> SegmentFactory for F
where
    F: Fn(&Arc<AlarmFactory>) -> Result<Arc<dyn StaticSegment>>,
{
    fn build(&self, alarm_factory: &Arc<AlarmFactory>) -> Result<Arc<dyn StaticSegment>> {
        self(alarm_factory)
    }
}

/// Composes segments into dashboards and derives composite and cloned alarms
pub struct MonitoringFacade {
    config: FacadeConfig,
    alarm_factory: Arc<AlarmFactory>,
    registry: SegmentRegistry,
    router: DashboardRouter,
    composites: CompositeAlarmBuilder,
    cloner: AlarmCloner,
}

impl MonitoringFacade {
    pub fn new(config: FacadeConfig) -> Result<Self> {
        config.validate()?;
        let alarm_factory = Arc::new(AlarmFactory::new(config.defaults.clone()));
        tracing::debug!(
            alarm_prefix = %config.defaults.alarm_name_prefix,
            dashboard_prefix = %config.dashboard_name_prefix,
            "Created monitoring facade"
        );
        Ok(Self {
            config,
            alarm_factory,
            registry: SegmentRegistry::new(),
            router: DashboardRouter::new(),
            composites: CompositeAlarmBuilder::new(),
            cloner: AlarmCloner::new(),
        })
    }

    pub fn config(&self) -> &FacadeConfig {
        &self.config
    }

    /// Factory carrying the facade's defaults
    pub fn created_alarm_factory(&self) -> &Arc<AlarmFactory> {
        &self.alarm_factory
    }

    /// Factory sharing the facade's defaults with a different naming prefix
    pub fn alarm_factory_with_prefix(&self, name_prefix: impl Into<String>) -> Arc<AlarmFactory> {
        Arc::new(AlarmFactory::with_prefix(self.config.defaults.clone(), name_prefix))
    }

    // Segments

    pub fn add_dynamic_segment(&mut self, segment: Arc<dyn DynamicSegment>) -> &mut Self {
        self.register(SegmentHandle::Dynamic(segment), RoutingDirective::any_view())
    }

    /// Register a static segment; `None` routes to summary and detail
    pub fn add_segment(
        &mut self,
        segment: Arc<dyn StaticSegment>,
        directive: Option<RoutingDirective>,
    ) -> &mut Self {
        self.register(SegmentHandle::Static(segment), directive.unwrap_or_default())
    }

    fn register(&mut self, segment: SegmentHandle, directive: RoutingDirective) -> &mut Self {
        tracing::debug!(
            segment = %segment.key(),
            monitoring = segment.is_monitoring(),
            "Adding segment"
        );
        self.router.route(&segment, directive);
        self.registry.add(segment);
        self
    }

    /// Build a resource segment and add it
    pub fn monitor<F: SegmentFactory>(
        &mut self,
        factory: F,
        directive: Option<RoutingDirective>,
    ) -> Result<&mut Self> {
        let segment = factory.build(&self.alarm_factory)?;
        Ok(self.add_segment(segment, directive))
    }

    pub fn add_large_header(&mut self, text: impl Into<String>) -> &mut Self {
        self.add_header(text, HeaderLevel::Large, true, false)
    }

    pub fn add_medium_header(&mut self, text: impl Into<String>) -> &mut Self {
        self.add_header(text, HeaderLevel::Medium, true, false)
    }

    pub fn add_small_header(&mut self, text: impl Into<String>) -> &mut Self {
        self.add_header(text, HeaderLevel::Small, true, false)
    }

    pub fn add_header(
        &mut self,
        text: impl Into<String>,
        level: HeaderLevel,
        add_to_summary: bool,
        add_to_alarms: bool,
    ) -> &mut Self {
        self.add_widget_routed(Widget::header(text, level), add_to_summary, add_to_alarms)
    }

    /// Add a plain widget to the summary and detail views
    pub fn add_widget(&mut self, widget: Widget) -> &mut Self {
        self.add_widget_routed(widget, true, false)
    }

    /// Add a plain widget; the detail view is always included
    pub fn add_widget_routed(
        &mut self,
        widget: Widget,
        add_to_summary: bool,
        add_to_alarms: bool,
    ) -> &mut Self {
        self.add_segment(
            Arc::new(SingleWidgetSegment::new(widget)),
            Some(RoutingDirective::from_flags(add_to_summary, add_to_alarms)),
        )
    }

    /// Add an alarm-annotated widget to the alarms and detail views
    pub fn add_alarm_widget(&mut self, widget: Widget) -> &mut Self {
        self.add_widget_routed(widget, false, true)
    }

    pub fn created_segments(&self) -> &[SegmentHandle] {
        self.registry.all()
    }

    /// Segments that own alarms
    pub fn created_monitorings(&self) -> Vec<&SegmentHandle> {
        self.registry.monitoring_segments().collect()
    }

    // Alarms

    pub fn alarm_index(&self) -> AlarmIndex<'_> {
        AlarmIndex::new(&self.registry, self.cloner.clones())
    }

    pub fn created_alarms(&self) -> Vec<AlarmRecord> {
        self.alarm_index().all_alarms()
    }

    pub fn created_alarms_with_tag(&self, tag: &str) -> Vec<AlarmRecord> {
        self.alarm_index().by_tag(tag)
    }

    pub fn created_alarms_with_disambiguator(&self, value: &str) -> Vec<AlarmRecord> {
        self.alarm_index().by_disambiguator(value)
    }

    pub fn created_cloned_alarms(&self) -> &[AlarmRecord] {
        self.cloner.clones()
    }

    /// Composite over alarms carrying `tag`; `None` when no alarm matches
    pub fn create_composite_alarm_using_tag(
        &mut self,
        tag: &str,
        options: CompositeAlarmOptions,
    ) -> Option<CompositeAlarm> {
        let alarms = self.created_alarms_with_tag(tag);
        self.composites.build(&self.alarm_factory, alarms, tag, options)
    }

    /// Composite over alarms with disambiguator `value`; `None` when no alarm matches
    pub fn create_composite_alarm_using_disambiguator(
        &mut self,
        value: &str,
        options: CompositeAlarmOptions,
    ) -> Option<CompositeAlarm> {
        let alarms = self.created_alarms_with_disambiguator(value);
        self.composites.build(&self.alarm_factory, alarms, value, options)
    }

    pub fn created_composite_alarms(&self) -> &[CompositeAlarm] {
        self.composites.created()
    }

    /// Derive new alarms from `sources`; see [`AlarmCloner::clone_alarms`]
    pub fn clone_alarms<F>(
        &mut self,
        sources: &[AlarmRecord],
        transform: F,
    ) -> Result<Vec<AlarmRecord>>
    where
        F: FnMut(&AlarmRecord) -> Option<AlarmSpec>,
    {
        self.cloner.clone_alarms(sources, transform)
    }

    // Dashboards

    /// Widgets routed to `view`, in registration order
    pub fn materialize(&self, view: &ViewName) -> Vec<Widget> {
        self.router.materialize(view)
    }

    /// Named dashboard for `view`, if the configuration enables it
    pub fn dashboard(&self, view: &ViewName) -> Option<Dashboard> {
        if !self.config.is_enabled(view) {
            return None;
        }
        Some(Dashboard {
            name: self.config.dashboard_name(view),
            view: view.clone(),
            widgets: self.materialize(view),
        })
    }

    pub fn created_dashboard(&self) -> Option<Dashboard> {
        self.dashboard(&ViewName::Detail)
    }

    pub fn created_summary_dashboard(&self) -> Option<Dashboard> {
        self.dashboard(&ViewName::Summary)
    }

    pub fn created_alarm_dashboard(&self) -> Option<Dashboard> {
        self.dashboard(&ViewName::Alarms)
    }

    /// Every enabled dashboard
    pub fn created_dashboards(&self) -> Vec<Dashboard> {
        self.config
            .enabled_views()
            .iter()
            .filter_map(|view| self.dashboard(view))
            .collect()
    }
}

impl std::fmt::Debug for MonitoringFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitoringFacade")
            .field("config", &self.config)
            .field("segments", &self.registry.len())
            .field("composites", &self.composites.created().len())
            .field("clones", &self.cloner.clones().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::{AlarmDefinition, ComparisonOperator, MetricRef};
    use crate::segment::BasicMonitoring;
    use crate::MonitoringError;

    fn facade() -> MonitoringFacade {
        MonitoringFacade::new(FacadeConfig::default()).unwrap()
    }

    fn spec(suffix: &str) -> AlarmSpec {
        AlarmSpec::new(
            suffix,
            AlarmDefinition::new(
                MetricRef::new("Lambda", suffix, "Sum"),
                ComparisonOperator::GreaterThanThreshold,
                10.0,
            ),
        )
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = FacadeConfig::default();
        config.defaults.alarm_name_prefix = String::new();
        assert!(matches!(
            MonitoringFacade::new(config),
            Err(MonitoringError::Configuration(_))
        ));
    }

    #[test]
    fn test_chaining_helpers() {
        let mut facade = facade();
        facade
            .add_large_header("Service")
            .add_widget(Widget::text("plain"))
            .add_alarm_widget(Widget::text("alarm"));

        assert_eq!(facade.created_segments().len(), 3);
        assert_eq!(
            facade.materialize(&ViewName::Detail),
            vec![
                Widget::header("Service", HeaderLevel::Large),
                Widget::text("plain"),
                Widget::text("alarm"),
            ]
        );
        assert_eq!(facade.materialize(&ViewName::Alarms), vec![Widget::text("alarm")]);
    }

    #[test]
    fn test_monitor_passes_facade_factory() {
        let mut facade = facade();
        facade
            .monitor(
                |factory: &Arc<AlarmFactory>| -> Result<Arc<dyn StaticSegment>> {
                    let monitoring = BasicMonitoring::new("Function");
                    monitoring.add_alarm(factory, spec("Errors"))?;
                    Ok(Arc::new(monitoring))
                },
                None,
            )
            .unwrap();

        let alarms = facade.created_alarms();
        assert_eq!(alarms.len(), 1);
        assert_eq!(alarms[0].name, "Monitoring-Errors");
        assert_eq!(facade.created_monitorings().len(), 1);
    }

    #[test]
    fn test_monitor_propagates_builder_errors() {
        let mut facade = facade();
        let result = facade.monitor(
            |factory: &Arc<AlarmFactory>| -> Result<Arc<dyn StaticSegment>> {
                let monitoring = BasicMonitoring::new("Function");
                monitoring.add_alarm(factory, spec(""))?;
                Ok(Arc::new(monitoring))
            },
            None,
        );
        assert!(matches!(result, Err(MonitoringError::InvalidAlarm(_))));
        assert!(facade.created_segments().is_empty());
    }

    #[test]
    fn test_dashboards_follow_config() {
        let config = FacadeConfig {
            dashboard_name_prefix: "Checkout".to_string(),
            create_alarm_dashboard: true,
            ..FacadeConfig::default()
        };
        let mut facade = MonitoringFacade::new(config).unwrap();
        facade.add_widget(Widget::text("a"));

        assert!(facade.created_summary_dashboard().is_none());
        assert_eq!(facade.created_dashboard().unwrap().name, "Checkout");
        let alarms = facade.created_alarm_dashboard().unwrap();
        assert_eq!(alarms.name, "Checkout-Alarms");
        assert!(alarms.widgets.is_empty());

        let names: Vec<_> = facade.created_dashboards().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Checkout", "Checkout-Alarms"]);

        // materialize ignores dashboard enablement
        assert_eq!(facade.materialize(&ViewName::Summary), vec![Widget::text("a")]);
    }

    #[test]
    fn test_alarm_factory_with_prefix_shares_defaults() {
        let facade = facade();
        let factory = facade.alarm_factory_with_prefix("Batch");
        assert_eq!(factory.name_prefix(), "Batch");
        assert_eq!(factory.defaults(), facade.created_alarm_factory().defaults());
    }
}
