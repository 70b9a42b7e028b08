//! Shared use from several producer threads and a scraper

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use promsrv::{MetricType, PrometheusExporter};
use tokio_test::assert_ok;

#[test]
fn test_concurrent_producers_and_render() {
    let exporter = Arc::new(PrometheusExporter::new());
    assert_ok!(exporter.register("reading", MetricType::Gauge, "Sensor reading", Duration::ZERO));

    let producers: Vec<_> = (0..4)
        .map(|sensor| {
            let exporter = exporter.clone();
            thread::spawn(move || {
                let id = sensor.to_string();
                for i in 0..500 {
                    exporter
                        .set("reading", Some(f64::from(i)), [("sensor", id.as_str())])
                        .unwrap();
                }
            })
        })
        .collect();

    let scraper = {
        let exporter = exporter.clone();
        thread::spawn(move || {
            for _ in 0..100 {
                let out = exporter.render();
                for line in out.lines().filter(|l| !l.starts_with('#')) {
                    let (series, value) = line.rsplit_once(' ').unwrap();
                    assert!(series.starts_with("reading{sensor=\""));
                    assert!(value.parse::<f64>().is_ok());
                }
            }
        })
    };

    for producer in producers {
        producer.join().unwrap();
    }
    scraper.join().unwrap();

    let out = exporter.render();
    for sensor in 0..4 {
        assert!(out.contains(&format!("reading{{sensor=\"{sensor}\"}} 499")));
    }
    assert_eq!(out.matches("# HELP reading").count(), 1);
    assert_eq!(exporter.instance_count(), 4);
}

#[test]
fn test_concurrent_registration_of_same_name() {
    let exporter = Arc::new(PrometheusExporter::new());

    let results: Vec<bool> = (0..8)
        .map(|_| {
            let exporter = exporter.clone();
            thread::spawn(move || {
                exporter
                    .register("shared", MetricType::Counter, "h", Duration::ZERO)
                    .is_ok()
            })
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect();

    assert_eq!(results.iter().filter(|ok| **ok).count(), 1);
    assert_eq!(exporter.metric_count(), 1);
}
