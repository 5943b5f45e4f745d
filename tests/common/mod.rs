#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{sleep, timeout};

use relay_chat::config::DuplicateNamePolicy;
use relay_chat::registry::ConnectionRegistry;
use relay_chat::{RelayConfig, Server};

pub const READ_TIMEOUT: Duration = Duration::from_secs(3);
pub const SILENCE_WINDOW: Duration = Duration::from_millis(200);

/// Starts a relay on an ephemeral port.
pub async fn start_server(policy: DuplicateNamePolicy) -> (SocketAddr, ConnectionRegistry) {
    start_server_with(RelayConfig {
        duplicate_names: policy,
        ..RelayConfig::default()
    })
    .await
}

/// Starts a relay with `config`, forcing an ephemeral loopback port.
pub async fn start_server_with(config: RelayConfig) -> (SocketAddr, ConnectionRegistry) {
    let config = RelayConfig {
        bind_address: "127.0.0.1".to_string(),
        port: 0,
        ..config
    };

    let server = Server::bind(config).await.expect("server should bind");
    let addr = server.local_addr().expect("bound server has an address");
    let registry = server.registry();

    tokio::spawn(async move { server.start().await });
    (addr, registry)
}

/// Connects, sends `name` and waits until the server has registered it.
pub async fn join(addr: SocketAddr, registry: &ConnectionRegistry, name: &str) -> TcpStream {
    let mut stream = TcpStream::connect(addr).await.expect("connect to relay");
    stream.write_all(name.as_bytes()).await.expect("send name");
    wait_for(registry, name, true).await;
    stream
}

/// Polls the registry until `name` is present (or absent).
pub async fn wait_for(registry: &ConnectionRegistry, name: &str, present: bool) {
    timeout(READ_TIMEOUT, async {
        while registry.contains(name).await != present {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {name} (present = {present})"));
}

/// Reads exactly the bytes of `expected` and compares them.
pub async fn expect_message(stream: &mut TcpStream, expected: &str) {
    let mut buffer = vec![0u8; expected.len()];
    timeout(READ_TIMEOUT, stream.read_exact(&mut buffer))
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for {expected:?}"))
        .expect("read from relay");
    assert_eq!(String::from_utf8_lossy(&buffer), expected);
}

/// Asserts nothing arrives for a short while.
pub async fn expect_silence(stream: &mut TcpStream) {
    let mut buffer = [0u8; 256];
    if let Ok(result) = timeout(SILENCE_WINDOW, stream.read(&mut buffer)).await {
        let n = result.expect("read from relay");
        panic!(
            "expected silence, received {:?}",
            String::from_utf8_lossy(&buffer[..n])
        );
    }
}

/// Asserts the server closed the connection.
pub async fn expect_closed(stream: &mut TcpStream) {
    let mut buffer = [0u8; 256];
    let n = timeout(READ_TIMEOUT, stream.read(&mut buffer))
        .await
        .expect("timed out waiting for close")
        .expect("read from relay");
    assert_eq!(n, 0, "expected end of stream, got {:?}", &buffer[..n]);
}

/// A connected socket pair; the first stream is the "server" side.
pub async fn socket_pair() -> (TcpStream, TcpStream) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let (client, accepted) = tokio::join!(TcpStream::connect(addr), listener.accept());
    let (server_side, _) = accepted.expect("accept");
    (server_side, client.expect("connect"))
}
