mod common;

use std::sync::Arc;

use tokio::sync::Mutex;

use common::{expect_message, expect_silence, socket_pair};
use relay_chat::broadcast::broadcast;
use relay_chat::error::RelayError;
use relay_chat::registry::{
    ClientName, ConnectionHandle, ConnectionId, ConnectionRegistry, SharedWriter,
};

fn name(raw: &str) -> ClientName {
    ClientName::parse(raw).expect("valid name")
}

/// A registry handle backed by a real socket, plus the remote end to read
/// deliveries from and the owning writer that keeps the handle alive.
async fn connection() -> (ConnectionHandle, SharedWriter, tokio::net::TcpStream) {
    let (server_side, remote) = socket_pair().await;
    let peer = server_side.peer_addr().expect("peer addr");
    let (_, writer) = server_side.into_split();
    let writer: SharedWriter = Arc::new(Mutex::new(writer));
    let handle = ConnectionHandle::new(ConnectionId::next(), peer, &writer);
    (handle, writer, remote)
}

#[tokio::test]
async fn unregister_is_idempotent() {
    let registry = ConnectionRegistry::new();
    let (handle, _writer, _remote) = connection().await;

    assert!(registry.register(name("alice"), handle).await.is_none());
    assert!(registry.unregister("alice").await.is_some());
    assert!(registry.unregister("alice").await.is_none());
    assert!(registry.unregister("nobody").await.is_none());
    assert!(registry.is_empty().await);
}

#[tokio::test]
async fn register_overwrites_existing_slot() {
    let registry = ConnectionRegistry::new();
    let (first, _w1, _r1) = connection().await;
    let (second, _w2, _r2) = connection().await;
    let first_id = first.id();
    let second_id = second.id();

    registry.register(name("alice"), first).await;
    let displaced = registry
        .register(name("alice"), second)
        .await
        .expect("first handle is displaced");

    assert_eq!(displaced.id(), first_id);
    assert_eq!(registry.len().await, 1);

    // The displaced connection cannot evict its successor.
    assert!(!registry.unregister_connection("alice", first_id).await);
    assert!(registry.contains("alice").await);
    assert!(registry.unregister_connection("alice", second_id).await);
    assert!(!registry.contains("alice").await);
}

#[tokio::test]
async fn try_register_refuses_taken_names() {
    let registry = ConnectionRegistry::new();
    let (first, _w1, _r1) = connection().await;
    let (second, _w2, _r2) = connection().await;
    let first_id = first.id();

    registry
        .try_register(name("alice"), first)
        .await
        .expect("free name is accepted");
    let result = registry.try_register(name("alice"), second).await;

    assert!(matches!(result, Err(RelayError::NameTaken(ref taken)) if taken == "alice"));
    assert!(registry.unregister_connection("alice", first_id).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_register_and_unregister_stay_consistent() {
    let registry = ConnectionRegistry::new();
    let (handle, _writer, _remote) = connection().await;

    let mut tasks = Vec::new();
    for i in 0..64 {
        let registry = registry.clone();
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            let client = format!("client-{i:02}");
            registry.register(name(&client), handle).await;
            tokio::task::yield_now().await;
            if i % 2 == 1 {
                registry.unregister(&client).await;
                registry.unregister(&client).await;
            }
        }));
    }
    for task in tasks {
        task.await.expect("task completes");
    }

    let expected: Vec<ClientName> = (0..64)
        .filter(|i| i % 2 == 0)
        .map(|i| name(&format!("client-{i:02}")))
        .collect();
    assert_eq!(registry.names().await, expected);
    assert_eq!(registry.len().await, 32);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn broadcasts_never_observe_partial_updates() {
    let registry = ConnectionRegistry::new();
    let (handle, _writer, _remote) = connection().await;
    registry.register(name("listener"), handle.clone()).await;

    let churn = {
        let registry = registry.clone();
        tokio::spawn(async move {
            for i in 0..100 {
                let client = name(&format!("churn-{i}"));
                registry.register(client.clone(), handle.clone()).await;
                registry.unregister(client.as_str()).await;
            }
        })
    };

    // Every churn entry shares the listener's socket, so each broadcast
    // reports how many entries it saw at one instant: one or two.
    for _ in 0..20 {
        let report = broadcast(&registry, "x", "nobody").await;
        assert!((1..=2).contains(&report.delivered.len()));
        assert!(report.failed.is_empty());
    }
    churn.await.expect("churn completes");

    assert_eq!(registry.names().await, vec![name("listener")]);
}

#[tokio::test]
async fn broadcast_skips_sender_and_survives_failed_delivery() {
    let registry = ConnectionRegistry::new();
    let (alice, _alice_writer, mut alice_remote) = connection().await;
    let (bob, _bob_writer, mut bob_remote) = connection().await;
    let (carol, carol_writer, _carol_remote) = connection().await;
    let (dave, _dave_writer, mut dave_remote) = connection().await;

    registry.register(name("alice"), alice).await;
    registry.register(name("bob"), bob).await;
    registry.register(name("carol"), carol).await;
    registry.register(name("dave"), dave).await;

    // Carol's session is gone; her registry handle can no longer deliver.
    drop(carol_writer);

    let report = broadcast(&registry, "[alice] hi", "alice").await;

    let mut delivered = report.delivered.clone();
    delivered.sort();
    assert_eq!(delivered, vec![name("bob"), name("dave")]);
    assert_eq!(report.failed, vec![name("carol")]);

    expect_message(&mut bob_remote, "[alice] hi").await;
    expect_message(&mut dave_remote, "[alice] hi").await;
    expect_silence(&mut alice_remote).await;
}

#[tokio::test]
async fn broadcast_to_empty_registry_is_a_no_op() {
    let registry = ConnectionRegistry::new();
    let report = broadcast(&registry, "anyone?", "alice").await;
    assert_eq!(report.recipients(), 0);
}
