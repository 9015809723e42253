use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use synapsed_monitoring::*;

fn populated_facade(segments: usize, alarms_per_segment: usize) -> MonitoringFacade {
    let mut facade = MonitoringFacade::new(FacadeConfig::default()).unwrap();
    let factory = Arc::clone(facade.created_alarm_factory());
    for s in 0..segments {
        let segment = BasicMonitoring::new(format!("Segment{s}"))
            .with_widget(Widget::graph("Errors", vec![format!("errors-{s}")]));
        for a in 0..alarms_per_segment {
            let spec = AlarmSpec::new(
                format!("Alarm{s}x{a}"),
                AlarmDefinition::new(
                    MetricRef::new("Bench", "Errors", "Sum"),
                    ComparisonOperator::GreaterThanThreshold,
                    a as f64,
                ),
            )
            .with_tag(if a % 2 == 0 { "even" } else { "odd" });
            segment.add_alarm(&factory, spec).unwrap();
        }
        facade.add_segment(Arc::new(segment), Some(RoutingDirective::everywhere()));
    }
    facade
}

fn bench_materialize(c: &mut Criterion) {
    let facade = populated_facade(200, 5);
    c.bench_function("materialize_detail_200_segments", |b| {
        b.iter(|| black_box(facade.materialize(&ViewName::Detail)))
    });
    c.bench_function("materialize_alarms_200_segments", |b| {
        b.iter(|| black_box(facade.materialize(&ViewName::Alarms)))
    });
}

fn bench_alarm_queries(c: &mut Criterion) {
    let facade = populated_facade(200, 5);
    c.bench_function("created_alarms_with_tag_1000_alarms", |b| {
        b.iter(|| black_box(facade.created_alarms_with_tag("even")))
    });
}

criterion_group!(benches, bench_materialize, bench_alarm_queries);
criterion_main!(benches);
