//! Scheduler behaviour against real sockets.

use std::sync::Arc;
use std::time::{Duration, Instant};

use pinger::observability::{MetricsSink, PrometheusSink};
use pinger::probe::{build_client, SeriesKey};
use pinger::registry::{Snapshot, TargetRegistry};
use pinger::scheduler::ProbeScheduler;
use pinger::Shutdown;

mod common;

struct Harness {
    _dir: tempfile::TempDir,
    path: std::path::PathBuf,
    registry: Arc<TargetRegistry>,
    sink: Arc<PrometheusSink>,
    scheduler: ProbeScheduler,
}

fn harness(content: &str) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_targets(&dir, "targets.yml", content);
    let registry = Arc::new(TargetRegistry::new(Snapshot::empty(15.0, 5.0)));
    let sink = Arc::new(PrometheusSink::new());
    let scheduler = ProbeScheduler::new(
        registry.clone(),
        sink.clone(),
        build_client().unwrap(),
        path.clone(),
    );
    Harness {
        _dir: dir,
        path,
        registry,
        sink,
        scheduler,
    }
}

#[tokio::test]
async fn test_reachable_http_target_is_up() {
    let addr = common::start_mock_backend("pong").await;
    let url = format!("http://{}/", addr);
    let h = harness(&format!(
        "request_timeout_seconds: 2\ntargets:\n  - name: web\n    url: {}\n    threshold_seconds: 0.3\n",
        url
    ));

    let report = h.scheduler.tick().await;
    assert!(report.reloaded);
    assert_eq!(report.probed, 1);
    assert_eq!(report.failed, 0);

    let record = h.sink.record_for(&SeriesKey::new("web", "http", url)).unwrap();
    assert!(record.up);
    assert!(record.latency_secs.unwrap() >= 0.0);
    assert_eq!(record.threshold_secs, Some(0.3));
    assert_eq!(record.errors, 0);
}

#[tokio::test]
async fn test_redirect_is_followed() {
    let target = common::start_mock_backend("landed").await;
    let location = format!("Location: http://{}/final\r\n", target);
    let redirect = common::start_programmable_backend(move || {
        let location = location.clone();
        async move { common::http_response("302 Found", &location, "") }
    })
    .await;
    let url = format!("http://{}/start", redirect);
    let h = harness(&format!("targets:\n  - name: r\n    url: {}\n", url));

    h.scheduler.tick().await;

    assert!(h.sink.record_for(&SeriesKey::new("r", "http", url)).unwrap().up);
}

#[tokio::test]
async fn test_error_status_is_down() {
    let addr = common::start_status_backend("500 Internal Server Error").await;
    let url = format!("http://{}/", addr);
    let h = harness(&format!("targets:\n  - name: broken\n    url: {}\n", url));

    let report = h.scheduler.tick().await;
    assert_eq!(report.failed, 1);

    let record = h.sink.record_for(&SeriesKey::new("broken", "http", url)).unwrap();
    assert!(!record.up);
    assert_eq!(record.errors, 1);
    assert_eq!(record.latency_secs, None);
}

#[tokio::test]
async fn test_refused_tcp_keeps_stale_latency() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let h = harness(&format!(
        "request_timeout_seconds: 1\ntargets:\n  - name: db\n    url: tcp://127.0.0.1:{}\n",
        port
    ));
    let key = SeriesKey::new("db", "tcp", format!("127.0.0.1:{}", port));

    h.scheduler.tick().await;
    let before = h.sink.record_for(&key).unwrap();
    assert!(before.up);
    assert_eq!(before.errors, 0);

    drop(listener);
    h.scheduler.tick().await;

    let after = h.sink.record_for(&key).unwrap();
    assert!(!after.up);
    assert_eq!(after.errors, before.errors + 1);
    assert_eq!(after.latency_secs, before.latency_secs);
    assert_eq!(after.threshold_secs, before.threshold_secs);
}

#[tokio::test]
async fn test_malformed_tcp_target_is_counted() {
    let h = harness("targets:\n  - name: bad\n    url: tcp://target\n  - name: odd\n    url: gopher://x\n");

    let start = Instant::now();
    let report = h.scheduler.tick().await;
    assert!(start.elapsed() < Duration::from_millis(500));
    assert_eq!(report.probed, 2);
    assert_eq!(report.failed, 2);

    let record = h.sink.record_for(&SeriesKey::new("bad", "tcp", "target")).unwrap();
    assert!(!record.up);
    assert_eq!(record.errors, 1);

    let record = h
        .sink
        .record_for(&SeriesKey::new("odd", "gopher", "gopher://x"))
        .unwrap();
    assert!(!record.up);
    assert_eq!(record.errors, 1);
}

#[tokio::test]
async fn test_unreadable_config_reuses_previous_snapshot() {
    let h = harness(&format!(
        "interval_seconds: 3\nrequest_timeout_seconds: 1\ntargets:\n  - name: c\n    url: tcp://127.0.0.1:{}\n",
        common::closed_port()
    ));

    let first = h.scheduler.tick().await;
    assert!(first.reloaded);
    let used = h.registry.current();

    std::fs::remove_file(&h.path).unwrap();
    let second = h.scheduler.tick().await;
    assert!(!second.reloaded);
    assert_eq!(*h.registry.current(), *used);
    assert_eq!(second.interval, first.interval);
    assert_eq!(second.probed, 1);

    std::fs::write(&h.path, "targets: [ {").unwrap();
    let third = h.scheduler.tick().await;
    assert!(!third.reloaded);
    assert_eq!(*h.registry.current(), *used);
}

#[tokio::test]
async fn test_slow_target_does_not_hold_back_batch() {
    let slow = common::start_hanging_backend(Duration::from_secs(10)).await;
    let fast_a = common::start_mock_backend("a").await;
    let fast_b = common::start_mock_backend("b").await;
    let h = harness(&format!(
        "request_timeout_seconds: 1\ntargets:\n  - {{name: slow, url: 'http://{}/'}}\n  - {{name: a, url: 'http://{}/'}}\n  - {{name: b, url: 'http://{}/'}}\n",
        slow, fast_a, fast_b
    ));

    let start = Instant::now();
    let report = h.scheduler.tick().await;
    let elapsed = start.elapsed();

    assert!(elapsed >= Duration::from_millis(900), "{:?}", elapsed);
    assert!(elapsed < Duration::from_secs(3), "{:?}", elapsed);
    assert_eq!(report.probed, 3);
    assert_eq!(report.failed, 1);

    let slow_record = h
        .sink
        .record_for(&SeriesKey::new("slow", "http", format!("http://{}/", slow)))
        .unwrap();
    assert!(!slow_record.up);
    assert_eq!(slow_record.errors, 1);
    for (name, addr) in [("a", fast_a), ("b", fast_b)] {
        let record = h
            .sink
            .record_for(&SeriesKey::new(name, "http", format!("http://{}/", addr)))
            .unwrap();
        assert!(record.up, "{}", name);
    }
}

#[tokio::test]
async fn test_empty_target_list_skips_probing() {
    let h = harness("interval_seconds: 0.5\n");

    let report = h.scheduler.tick().await;
    assert!(report.reloaded);
    assert_eq!(report.probed, 0);
    assert_eq!(report.interval, Duration::from_millis(500));
    assert!(h.sink.records().is_empty());
    assert!(h.sink.render().lines().all(|l| l.is_empty() || l.starts_with('#')));
}

#[tokio::test]
async fn test_closed_port_end_to_end() {
    let h = harness(
        "request_timeout_seconds: 1\ntargets:\n  - name: svc-a\n    url: http://127.0.0.1:9/\n",
    );

    h.scheduler.tick().await;

    let record = h
        .sink
        .record_for(&SeriesKey::new("svc-a", "http", "http://127.0.0.1:9/"))
        .unwrap();
    assert!(!record.up);
    assert_eq!(record.errors, 1);

    let text = h.sink.render();
    assert!(text.contains("ping_errors_total"));
    assert!(text.contains("svc-a"));
}

#[tokio::test]
async fn test_run_loop_ticks_until_shutdown() {
    let addr = common::start_mock_backend("ok").await;
    let url = format!("http://{}/", addr);
    let h = harness(&format!(
        "interval_seconds: 0.1\nrequest_timeout_seconds: 1\ntargets:\n  - name: loop\n    url: {}\n",
        url
    ));
    let shutdown = Shutdown::new();
    let scheduler = h.scheduler.with_startup_delay(Duration::from_millis(10));
    let handle = tokio::spawn(scheduler.run(shutdown.subscribe()));

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(h.sink.record_for(&SeriesKey::new("loop", "http", url)).unwrap().up);
    assert!(h.registry.len() == 1);

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("scheduler did not stop")
        .unwrap();
}

#[tokio::test]
async fn test_oversized_timing_is_rejected_and_loop_survives() {
    let addr = common::start_mock_backend("ok").await;
    let url = format!("http://{}/", addr);
    let good = format!(
        "interval_seconds: 0.1\nrequest_timeout_seconds: 1\ntargets:\n  - name: keep\n    url: {}\n",
        url
    );
    let h = harness(&good);

    let first = h.scheduler.tick().await;
    assert!(first.reloaded);
    let used = h.registry.current();

    for bad in [
        "interval_seconds: 1e20\n".to_string(),
        format!("request_timeout_seconds: 1e20\ntargets:\n  - url: {}\n", url),
    ] {
        std::fs::write(&h.path, bad).unwrap();
        let report = h.scheduler.tick().await;
        assert!(!report.reloaded);
        assert_eq!(*h.registry.current(), *used);
        assert_eq!(report.interval, first.interval);
        assert_eq!(report.probed, 1);
    }

    // The loop keeps ticking on the stale snapshot instead of dying.
    let shutdown = Shutdown::new();
    let scheduler = h.scheduler.with_startup_delay(Duration::from_millis(10));
    let handle = tokio::spawn(scheduler.run(shutdown.subscribe()));
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(!handle.is_finished());
    assert!(h.sink.record_for(&SeriesKey::new("keep", "http", url)).unwrap().up);

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("scheduler did not stop")
        .unwrap();
}

#[tokio::test]
async fn test_scheduler_started_after_shutdown_exits() {
    let h = harness("interval_seconds: 0.1\n");
    let shutdown = Shutdown::new();
    shutdown.trigger();

    let handle = tokio::spawn(h.scheduler.run(shutdown.subscribe()));
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("scheduler ignored an earlier shutdown")
        .unwrap();
}

#[tokio::test]
async fn test_unresolvable_tcp_host_is_down() {
    let h = harness(
        "request_timeout_seconds: 2\ntargets:\n  - name: ghost\n    url: tcp://nonexistent.invalid:80\n",
    );

    let report = h.scheduler.tick().await;
    assert_eq!(report.failed, 1);

    let record = h
        .sink
        .record_for(&SeriesKey::new("ghost", "tcp", "nonexistent.invalid:80"))
        .unwrap();
    assert!(!record.up);
    assert_eq!(record.errors, 1);
    assert_eq!(record.latency_secs, None);
}
