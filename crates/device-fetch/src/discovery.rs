//! SSDP discovery of UPnP devices
//!
//! Sends one M-SEARCH to the multicast group and collects the LOCATION header
//! of every response until the network goes quiet or the hard deadline passes.

use fetchtv_core::{DiscoveryConfig, FetchError, Result};
use std::collections::BTreeSet;
use std::net::{Ipv4Addr, SocketAddr};
use tokio::net::UdpSocket;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Discover the description URLs advertised on the local network
///
/// Returns an empty set when nothing answered; only socket failures are errors.
pub async fn discover_locations(config: &DiscoveryConfig) -> Result<BTreeSet<String>> {
    let target = config.multicast_socket_addr()?;
    info!(
        "Starting SSDP discovery on {} ({} ms idle timeout, {} ms deadline)",
        target, config.idle_timeout_ms, config.deadline_ms
    );

    let socket = create_search_socket().map_err(socket_error)?;
    let msearch = build_msearch(&config.multicast_addr, config.mx, &config.search_target);
    let sent = socket.send_to(msearch.as_bytes(), target).await.map_err(socket_error)?;
    debug!("Sent M-SEARCH for {} ({} bytes to {})", config.search_target, sent, target);

    let deadline = Instant::now() + config.deadline();
    let mut locations = BTreeSet::new();
    let mut responses = 0usize;
    let mut buf = [0u8; 2048];

    loop {
        // The idle timeout restarts on every datagram, the deadline never does
        let wake = (Instant::now() + config.idle_timeout()).min(deadline);

        match tokio::time::timeout_at(wake, socket.recv_from(&mut buf)).await {
            Ok(Ok((len, addr))) => {
                responses += 1;
                let response = String::from_utf8_lossy(&buf[..len]);
                debug!("Received SSDP response from {} ({} bytes)", addr, len);

                if let Some(location) = parse_location(&response) {
                    if locations.insert(location.clone()) {
                        info!("Found location {} (from {})", location, addr);
                    }
                }
            }
            Ok(Err(e)) => return Err(socket_error(e)),
            Err(_) => break,
        }

        if Instant::now() >= deadline {
            warn!("Discovery deadline reached while responses were still arriving");
            break;
        }
    }

    info!(
        "SSDP discovery complete: {} response(s), {} unique location(s)",
        responses,
        locations.len()
    );
    Ok(locations)
}

/// Build the M-SEARCH request datagram
pub fn build_msearch(host: &str, mx: u8, search_target: &str) -> String {
    format!(
        "M-SEARCH * HTTP/1.1\r\n\
         HOST: {}\r\n\
         MAN: \"ssdp:discover\"\r\n\
         MX: {}\r\n\
         ST: {}\r\n\
         \r\n",
        host, mx, search_target
    )
}

/// Extract the LOCATION header value from an SSDP response
pub fn parse_location(response: &str) -> Option<String> {
    response.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if !name.trim().eq_ignore_ascii_case("location") {
            return None;
        }
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

fn create_search_socket() -> std::io::Result<UdpSocket> {
    let socket = socket2::Socket::new(
        socket2::Domain::IPV4,
        socket2::Type::DGRAM,
        Some(socket2::Protocol::UDP),
    )?;

    socket.set_reuse_address(true)?;
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0));
    socket.bind(&addr.into())?;
    socket.set_multicast_ttl_v4(2)?;
    socket.set_nonblocking(true)?;

    let socket: std::net::UdpSocket = socket.into();
    debug!("SSDP socket bound to {}", socket.local_addr()?);
    UdpSocket::from_std(socket)
}

fn socket_error(e: std::io::Error) -> FetchError {
    FetchError::Discovery(format!("a socket error occurred: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn local_config(target: SocketAddr, idle_ms: u64, deadline_ms: u64) -> DiscoveryConfig {
        DiscoveryConfig {
            multicast_addr: target.to_string(),
            idle_timeout_ms: idle_ms,
            deadline_ms,
            ..Default::default()
        }
    }

    #[test]
    fn test_build_msearch() {
        assert_eq!(
            build_msearch("239.255.255.250:1900", 1, "ssdp:all"),
            "M-SEARCH * HTTP/1.1\r\nHOST: 239.255.255.250:1900\r\nMAN: \"ssdp:discover\"\r\nMX: 1\r\nST: ssdp:all\r\n\r\n"
        );
    }

    #[test]
    fn test_parse_location() {
        let response = "HTTP/1.1 200 OK\r\n\
                        CACHE-CONTROL: max-age=1800\r\n\
                        LOCATION: http://192.168.1.147:49152/MediaServer.xml\r\n\
                        ST: upnp:rootdevice\r\n\r\n";
        assert_eq!(
            parse_location(response),
            Some("http://192.168.1.147:49152/MediaServer.xml".to_string())
        );

        let lower = "HTTP/1.1 200 OK\r\nlocation:http://10.0.0.5:80/desc.xml\r\n\r\n";
        assert_eq!(parse_location(lower), Some("http://10.0.0.5:80/desc.xml".to_string()));

        assert_eq!(parse_location("HTTP/1.1 200 OK\r\nST: ssdp:all\r\n\r\n"), None);
        assert_eq!(parse_location("HTTP/1.1 200 OK\r\nLocation:   \r\n"), None);
    }

    #[tokio::test]
    async fn test_no_responses_is_empty_set() {
        // Bound but silent: nothing will ever answer the M-SEARCH
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let config = local_config(silent.local_addr().unwrap(), 150, 2000);

        let locations = discover_locations(&config).await.unwrap();
        assert!(locations.is_empty());
    }

    #[tokio::test]
    async fn test_collects_unique_locations() {
        let responder = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let config = local_config(responder.local_addr().unwrap(), 300, 3000);

        let task = tokio::spawn(async move {
            let mut buf = [0u8; 1024];
            let (len, from) = responder.recv_from(&mut buf).await.unwrap();
            assert!(String::from_utf8_lossy(&buf[..len]).starts_with("M-SEARCH"));

            for location in ["http://a/desc.xml", "http://b/desc.xml", "http://a/desc.xml"] {
                let reply = format!("HTTP/1.1 200 OK\r\nLOCATION: {}\r\n\r\n", location);
                responder.send_to(reply.as_bytes(), from).await.unwrap();
            }
            responder.send_to(b"HTTP/1.1 200 OK\r\n\r\n", from).await.unwrap();
        });

        let locations = discover_locations(&config).await.unwrap();
        task.await.unwrap();

        let expected: BTreeSet<String> = ["http://a/desc.xml", "http://b/desc.xml"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(locations, expected);
    }

    #[tokio::test]
    async fn test_response_flood_stops_at_deadline() {
        let responder = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let config = local_config(responder.local_addr().unwrap(), 200, 600);

        let task = tokio::spawn(async move {
            let mut buf = [0u8; 1024];
            let (_, from) = responder.recv_from(&mut buf).await.unwrap();
            let reply = b"HTTP/1.1 200 OK\r\nLOCATION: http://flood/desc.xml\r\n\r\n";
            loop {
                if responder.send_to(reply, from).await.is_err() {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        });

        let started = std::time::Instant::now();
        let locations = discover_locations(&config).await.unwrap();
        let elapsed = started.elapsed();
        task.abort();

        assert!(locations.contains("http://flood/desc.xml"));
        assert!(elapsed < Duration::from_secs(2), "took {:?}", elapsed);
    }
}
