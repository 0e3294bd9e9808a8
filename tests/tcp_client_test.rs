//! Integration tests for the one-shot TCP client against a local listener.

use board_link::config::TcpSettings;
use board_link::error::LinkError;
use board_link::tcp::TcpClient;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// Spawns a listener that echoes the first chunk it receives back to the
/// client, then closes. Returns the ephemeral port it bound.
fn spawn_echo_server() -> (u16, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 1024];
        let n = stream.read(&mut buf).unwrap();
        stream.write_all(&buf[..n]).unwrap();
    });
    (port, handle)
}

fn settings_for(port: u16) -> TcpSettings {
    TcpSettings {
        port,
        ..TcpSettings::default()
    }
}

#[test]
fn echo_server_round_trip() {
    let (port, server) = spawn_echo_server();

    let mut client = TcpClient::connect(&settings_for(port)).unwrap();
    let reply = client.exchange().unwrap();

    assert_eq!(reply, "Hello, server!");
    server.join().unwrap();
}

#[test]
fn reported_peer_matches_settings() {
    let (port, server) = spawn_echo_server();

    let mut client = TcpClient::connect(&settings_for(port)).unwrap();
    let peer = client.peer_addr().unwrap();
    assert_eq!(peer.port(), port);
    assert!(peer.ip().is_loopback());

    // Drain the exchange so the server thread finishes cleanly.
    client.exchange().unwrap();
    server.join().unwrap();
}

#[test]
fn connection_refused_propagates() {
    // Bind and immediately drop a listener to get a port with nothing
    // behind it.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    match TcpClient::connect(&settings_for(port)) {
        Err(LinkError::Io(e)) => {
            assert_eq!(e.kind(), std::io::ErrorKind::ConnectionRefused);
        }
        other => panic!("unexpected result: {:?}", other.map(|_| "connected")),
    }
}

#[test]
fn reply_is_bounded_by_recv_buffer() {
    let (port, server) = spawn_echo_server();

    let mut settings = settings_for(port);
    settings.recv_buffer = 5;
    let mut client = TcpClient::connect(&settings).unwrap();
    let reply = client.exchange().unwrap();

    // One receive call of at most 5 bytes; the rest of the echo is simply
    // never read.
    assert_eq!(reply, "Hello");
    drop(client);
    server.join().unwrap();
}

#[test]
fn empty_reply_decodes_to_empty_string() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = thread::spawn(move || {
        // Accept, read the greeting, close without replying.
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 1024];
        let _ = stream.read(&mut buf).unwrap();
    });

    let mut client = TcpClient::connect(&settings_for(port)).unwrap();
    let reply = client.exchange().unwrap();
    assert_eq!(reply, "");
    server.join().unwrap();
}

#[test]
fn hostname_instead_of_ip_is_a_configuration_error() {
    let settings = TcpSettings {
        host: "localhost".to_string(),
        ..TcpSettings::default()
    };
    match TcpClient::connect(&settings) {
        Err(LinkError::Configuration(msg)) => assert!(msg.contains("localhost")),
        other => panic!("unexpected result: {:?}", other.map(|_| "connected")),
    }
}
