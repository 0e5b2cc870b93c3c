use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use mnat_common::error::{RunError, ScanError};
use mnat_common::network::device::{Device, Hostname};
use pnet::util::MacAddr;

use super::fakes::{FakeScanner, SlowResolver, TableResolver, device, orchestrator};

#[tokio::test]
async fn found_devices_keep_reply_order_and_failed_lookups_are_unresolved() {
    let resolver = Arc::new(TableResolver::default().with(Ipv4Addr::new(192, 168, 1, 1), "router.lan"));
    let orch = orchestrator(
        FakeScanner::Replies(vec![device(1, 0xaa), device(7, 0xbb)]),
        resolver.clone(),
    );

    let result = orch.run("192.168.1.0", 24, None).await.unwrap();

    assert!(result.found);
    assert_eq!(result.devices.len(), 2);
    assert_eq!(result.devices[0].ip, Ipv4Addr::new(192, 168, 1, 1));
    assert_eq!(result.devices[0].hostname, Hostname::Resolved("router.lan".into()));
    assert_eq!(result.devices[1].ip, Ipv4Addr::new(192, 168, 1, 7));
    assert_eq!(result.devices[1].hostname, Hostname::Unresolved);
    assert_eq!(result.devices[1].hostname.to_string(), "unresolved");
    assert!(result.saved_to.is_none());
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn three_replies_with_one_failed_lookup() {
    let ip = |n| Ipv4Addr::new(10, 0, 0, n);
    let mac = |b| MacAddr::new(b, b, b, b, b, b);
    let resolver = Arc::new(TableResolver::default().with(ip(5), "host-a").with(ip(9), "host-b"));
    let orch = orchestrator(
        FakeScanner::Replies(vec![
            Device::new(ip(5), mac(0xaa)),
            Device::new(ip(9), mac(0xbb)),
            Device::new(ip(12), mac(0xcc)),
        ]),
        resolver,
    );

    let result = orch.run("10.0.0.0", 24, None).await.unwrap();

    assert!(result.found);
    assert_eq!(
        result.devices,
        vec![
            Device::new(ip(5), mac(0xaa)).with_hostname(Hostname::Resolved("host-a".into())),
            Device::new(ip(9), mac(0xbb)).with_hostname(Hostname::Resolved("host-b".into())),
            Device::new(ip(12), mac(0xcc)),
        ]
    );
}

#[tokio::test]
async fn silent_network_is_not_found_and_skips_lookups() {
    let resolver = Arc::new(TableResolver::default());
    let orch = orchestrator(FakeScanner::Replies(vec![]), resolver.clone());

    let result = orch.run("10.0.0.0", 24, None).await.unwrap();

    assert!(!result.found);
    assert!(result.devices.is_empty());
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn duplicate_replies_keep_first_pair() {
    let orch = orchestrator(
        FakeScanner::Replies(vec![device(5, 0x01), device(6, 0x02), device(5, 0x03)]),
        Arc::new(TableResolver::default()),
    );

    let result = orch.run("192.168.1.0", 24, None).await.unwrap();

    assert_eq!(result.devices.len(), 2);
    assert_eq!(result.devices[0], device(5, 0x01));
    assert_eq!(result.devices[1], device(6, 0x02));
}

#[tokio::test]
async fn every_ip_appears_once() {
    let replies = (1..=40u8).chain(1..=40u8).map(|n| device(n, n)).collect();
    let orch = orchestrator(FakeScanner::Replies(replies), Arc::new(TableResolver::default()));

    let result = orch.run("192.168.1.0", 24, None).await.unwrap();

    let unique: HashSet<Ipv4Addr> = result.devices.iter().map(|d| d.ip).collect();
    assert_eq!(unique.len(), 40);
    assert_eq!(result.devices.len(), 40);
}

#[tokio::test]
async fn invalid_base_address_is_rejected() {
    let orch = orchestrator(FakeScanner::Replies(vec![]), Arc::new(TableResolver::default()));

    let err = orch.run("not-an-ip", 24, None).await.unwrap_err();

    assert!(matches!(err, RunError::Scan(ScanError::InvalidRange(_))));
}

#[tokio::test]
async fn invalid_prefix_is_rejected() {
    let orch = orchestrator(FakeScanner::Replies(vec![]), Arc::new(TableResolver::default()));

    let err = orch.run("10.0.0.0", 33, None).await.unwrap_err();

    assert!(matches!(err, RunError::Scan(ScanError::InvalidRange(_))));
}

#[tokio::test]
async fn permission_error_propagates_without_result() {
    let resolver = Arc::new(TableResolver::default());
    let orch = orchestrator(FakeScanner::Denied, resolver.clone());

    let err = orch.run("192.168.1.0", 24, None).await.unwrap_err();

    assert!(matches!(err, RunError::Scan(ScanError::Permission { .. })));
    assert!(err.result().is_none());
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn lookups_never_exceed_twenty_in_flight() {
    let resolver = Arc::new(SlowResolver::default());
    let replies = (1..=60u8).map(|n| device(n, n)).collect();
    let orch = orchestrator(FakeScanner::Replies(replies), resolver.clone());

    let result = orch.run("192.168.1.0", 24, None).await.unwrap();

    assert_eq!(resolver.peak.load(Ordering::SeqCst), 20);
    assert_eq!(result.devices.len(), 60);
    for (n, device) in (1..=60u8).zip(&result.devices) {
        assert_eq!(device.ip, Ipv4Addr::new(192, 168, 1, n));
        assert_eq!(device.hostname, Hostname::Resolved(format!("host-{n}")));
    }
}

#[tokio::test]
async fn lookups_start_in_reply_order() {
    let resolver = Arc::new(SlowResolver::default());
    let replies = (1..=30u8).rev().map(|n| device(n, n)).collect();
    let orch = orchestrator(FakeScanner::Replies(replies), resolver.clone());

    orch.run("192.168.1.0", 24, None).await.unwrap();

    let started = resolver.started.lock().unwrap();
    let mut head: Vec<Ipv4Addr> = started[..20].to_vec();
    head.sort();
    let expected: Vec<Ipv4Addr> = (11..=30u8).map(|n| Ipv4Addr::new(192, 168, 1, n)).collect();
    assert_eq!(head, expected);
    assert_eq!(started.len(), 30);
}

#[tokio::test]
async fn progress_is_reported_once_per_device() {
    let seen: Arc<Mutex<Vec<(usize, usize)>>> = Arc::default();
    let sink = seen.clone();
    let orch = orchestrator(
        FakeScanner::Replies(vec![device(1, 1), device(2, 2), device(3, 3)]),
        Arc::new(TableResolver::default()),
    )
    .on_resolved(move |progress| sink.lock().unwrap().push((progress.completed, progress.total)));

    orch.run("192.168.1.0", 24, None).await.unwrap();

    let mut seen = seen.lock().unwrap().clone();
    seen.sort();
    assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3)]);
}
