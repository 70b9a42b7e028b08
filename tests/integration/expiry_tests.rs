//! Timeout behavior driven by a manual clock

use std::sync::Arc;
use std::time::Duration;

use promsrv::{spawn_sweeper, LabelSet, ManualClock, MetricType, PrometheusExporter};
use tokio_test::assert_ok;

fn setup() -> (Arc<PrometheusExporter>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let exporter = Arc::new(PrometheusExporter::with_clock(clock.clone()));

    assert_ok!(exporter.register(
        "test_meas_1",
        MetricType::Gauge,
        "yeah",
        Duration::from_secs(12)
    ));
    assert_ok!(exporter.register(
        "test_meas_2",
        MetricType::Gauge,
        "yeah",
        Duration::ZERO
    ));
    (exporter, clock)
}

fn has_line(exporter: &PrometheusExporter, line: &str) -> bool {
    exporter.render().lines().any(|l| l == line)
}

#[test]
fn test_timeout() {
    let (exporter, clock) = setup();
    assert_ok!(exporter.set("test_meas_1", Some(12.3), [("foo", "bar")]));

    assert!(has_line(&exporter, r#"test_meas_1{foo="bar"} 12.3"#));

    clock.advance(Duration::from_secs(11));
    assert!(has_line(&exporter, r#"test_meas_1{foo="bar"} 12.3"#));

    clock.advance(Duration::from_secs(2));
    assert!(!has_line(&exporter, r#"test_meas_1{foo="bar"} 12.3"#));
    assert!(!has_line(&exporter, "# HELP test_meas_1 yeah"));
    assert!(!has_line(&exporter, "# TYPE test_meas_1 gauge"));
}

#[test]
fn test_expired_value_reads_as_absent() {
    let (exporter, clock) = setup();
    assert_ok!(exporter.set("test_meas_1", Some(1.0), [("foo", "bar")]));

    clock.advance(Duration::from_secs(11));
    assert_eq!(exporter.value("test_meas_1", [("foo", "bar")]), Some(1.0));
    assert_eq!(exporter.instance_count(), 1);

    clock.advance(Duration::from_secs(2));
    assert_eq!(exporter.value("test_meas_1", [("foo", "bar")]), None);
    assert_eq!(exporter.instance_count(), 0);
    assert_eq!(exporter.stored_count(), 1);

    assert_eq!(exporter.render(), "");
    assert_eq!(exporter.stored_count(), 0);
}

#[test]
fn test_zero_timeout_never_expires() {
    let (exporter, clock) = setup();
    assert_ok!(exporter.set("test_meas_2", Some(1.0), LabelSet::new()));

    clock.advance(Duration::from_secs(365 * 24 * 3600));
    assert!(has_line(&exporter, "test_meas_2 1"));
    assert_eq!(exporter.sweep(), 0);
}

#[test]
fn test_instances_expire_independently() {
    let (exporter, clock) = setup();
    assert_ok!(exporter.set("test_meas_1", Some(1.0), [("id", "early")]));
    clock.advance(Duration::from_secs(8));
    assert_ok!(exporter.set("test_meas_1", Some(2.0), [("id", "late")]));
    clock.advance(Duration::from_secs(8));

    let out = exporter.render();
    assert!(!out.contains(r#"id="early""#));
    assert!(out.contains(r#"test_meas_1{id="late"} 2"#));
    assert!(out.contains("# HELP test_meas_1 yeah"));
}

#[test]
fn test_expired_instance_can_be_set_again() {
    let (exporter, clock) = setup();
    assert_ok!(exporter.set("test_meas_1", Some(1.0), [("foo", "bar")]));
    clock.advance(Duration::from_secs(20));
    assert_eq!(exporter.sweep(), 1);

    assert_ok!(exporter.set("test_meas_1", Some(3.0), [("foo", "bar")]));
    assert!(has_line(&exporter, r#"test_meas_1{foo="bar"} 3"#));
}

#[tokio::test]
async fn test_background_sweeper() {
    let (exporter, clock) = setup();
    assert_ok!(exporter.set("test_meas_1", Some(1.0), [("foo", "bar")]));
    assert_ok!(exporter.set("test_meas_2", Some(1.0), [("foo", "bar")]));

    let sweeper = spawn_sweeper(exporter.clone(), Duration::from_millis(5));
    clock.advance(Duration::from_secs(13));

    for _ in 0..200 {
        if exporter.stored_count() == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(exporter.stored_count(), 1);
    assert!(exporter.value("test_meas_2", [("foo", "bar")]).is_some());

    assert!(!sweeper.is_finished());
    sweeper.shutdown().await;
}
