#![allow(clippy::unwrap_used)]
// Loopback tests for `DiscoverySocket`.

use std::net::{Ipv4Addr, SocketAddr};

use tokio::net::UdpSocket;

use plumly_api::{DISCOVERY_PAYLOAD, DiscoverySocket, parse_announcement};

#[tokio::test]
async fn test_broadcast_and_receive_announcement() {
    // Stand-in lightpad listening on loopback.
    let lightpad = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let lightpad_addr = lightpad.local_addr().unwrap();

    let socket = DiscoverySocket::bind_to(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)), lightpad_addr)
        .await
        .unwrap();
    socket.broadcast().await.unwrap();

    let mut buf = [0u8; 16];
    let (len, requester) = lightpad.recv_from(&mut buf).await.unwrap();
    assert_eq!(&buf[..len], DISCOVERY_PAYLOAD);
    assert_eq!(requester, socket.local_addr().unwrap());

    lightpad
        .send_to(b"PLUM 8888 aaaa-bbbb 8443", requester)
        .await
        .unwrap();

    let (raw, sender) = socket.recv().await.unwrap();
    assert_eq!(sender, lightpad_addr);
    let announcement = parse_announcement(&raw).unwrap();
    assert_eq!(announcement.lpid, "aaaa-bbbb");
    assert_eq!(announcement.command_port, 8443);
}
