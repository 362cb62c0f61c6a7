//! End-to-end scans against listeners bound on the loopback interface.

use portsift::scanner::{run_scan, ScanConfig, ScanMode};
use portsift::types::{validate_range, Port, PortRange};
use std::net::Ipv4Addr;
use std::time::Duration;
use tokio::net::{TcpListener, UdpSocket};

fn config() -> ScanConfig {
    ScanConfig::new(Ipv4Addr::LOCALHOST).with_timeout(Duration::from_millis(200))
}

fn ports(list: &[u16]) -> Vec<Port> {
    list.iter().copied().map(Port::new).collect()
}

/// Bind a TCP listener on some port `p` and a UDP socket on `p + 1`.
async fn adjacent_listeners() -> (TcpListener, UdpSocket, u16) {
    for _ in 0..50 {
        let tcp = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let port = tcp.local_addr().unwrap().port();
        if port == 0 || port > 65533 {
            continue;
        }
        if let Ok(udp) = UdpSocket::bind((Ipv4Addr::LOCALHOST, port + 1)).await {
            return (tcp, udp, port);
        }
    }
    panic!("could not find adjacent free tcp/udp ports");
}

fn spawn_echo(socket: UdpSocket) {
    tokio::spawn(async move {
        let mut buf = [0u8; 1024];
        while let Ok((n, peer)) = socket.recv_from(&mut buf).await {
            let _ = socket.send_to(&buf[..n], peer).await;
        }
    });
}

#[tokio::test]
async fn tcp_and_udp_listeners_are_reported_per_protocol() {
    let (_tcp, udp, port) = adjacent_listeners().await;
    spawn_echo(udp);
    let range = PortRange::new(Port::new(port - 1), Port::new(port + 2));

    for mode in [ScanMode::Sequential, ScanMode::Concurrent] {
        let results = run_scan(&config(), range, mode).await;

        assert_eq!(results.report.open_tcp_ports, ports(&[port]), "{mode}");
        assert_eq!(results.report.open_udp_ports, ports(&[port + 1]), "{mode}");
        assert_eq!(results.ports_scanned, 4);
    }
}

#[tokio::test]
async fn port_one_without_listeners_is_empty_in_both_modes() {
    let range = validate_range(1, 1).unwrap();

    for mode in [ScanMode::Sequential, ScanMode::Concurrent] {
        let results = run_scan(&config(), range, mode).await;
        assert!(results.report.open_tcp_ports.is_empty(), "{mode}");
        assert!(results.report.open_udp_ports.is_empty(), "{mode}");
    }
}

#[tokio::test]
async fn sequential_and_concurrent_agree_on_tcp() {
    let first = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let port = first.local_addr().unwrap().port();
    let _second = TcpListener::bind((Ipv4Addr::LOCALHOST, port + 2)).await.ok();
    let range = PortRange::new(Port::new(port - 1), Port::new(port + 3));

    let sequential = run_scan(&config(), range, ScanMode::Sequential).await;
    let concurrent = run_scan(&config(), range, ScanMode::Concurrent).await;

    assert_eq!(
        sequential.report.open_tcp_ports,
        concurrent.report.open_tcp_ports
    );
    assert!(concurrent.report.open_tcp_ports.contains(&Port::new(port)));
}

#[tokio::test]
async fn report_is_ascending_and_within_range() {
    let mut listeners = Vec::new();
    for _ in 0..5 {
        listeners.push(TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap());
    }
    let bound: Vec<u16> = listeners
        .iter()
        .map(|l| l.local_addr().unwrap().port())
        .collect();
    let anchor = *bound.iter().min().unwrap();
    let range = PortRange::new(Port::new(anchor), Port::new(anchor.saturating_add(40)));

    let results = run_scan(&config().with_concurrency(8), range, ScanMode::Concurrent).await;

    for list in [&results.report.open_tcp_ports, &results.report.open_udp_ports] {
        assert!(list.windows(2).all(|w| w[0] < w[1]));
        assert!(list.iter().all(|p| range.contains(*p)));
    }
    assert!(results.report.open_tcp_ports.contains(&Port::new(anchor)));
}

#[tokio::test]
async fn reversed_range_scans_nothing() {
    let range = validate_range(10, 5).unwrap();
    let results = run_scan(&config(), range, ScanMode::Concurrent).await;

    assert_eq!(results.ports_scanned, 0);
    assert!(results.report.is_empty());
}
