mod common;

use common::{connect, drain, harness};
use futures::{SinkExt, StreamExt};
use mentorlink_server::models::MessageStatus;
use mentorlink_server::protocol::ServerEvent;
use mentorlink_server::router::router;
use mentorlink_server::AppState;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn serve(state: AppState) -> String {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(state);
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("ws://{}", addr)
}

async fn next_json(socket: &mut Client) -> Value {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("socket closed")
            .unwrap();
        if let WsMessage::Text(text) = frame {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

#[tokio::test]
async fn socket_registers_acks_and_deregisters_on_close() {
    let h = harness().await;
    let (_watcher, mut mentor_rx) = connect(&h.state, &h.mentor);
    let conversation = h
        .state
        .messaging
        .open_conversation(&h.alice.id, &h.mentor.id)
        .await
        .unwrap();
    let base = serve(h.state.clone()).await;

    assert!(connect_async(format!("{}/ws?token=garbage", base)).await.is_err());
    assert!(!h.state.presence.is_online(&h.alice.id));

    let token = h.state.auth.issue(&h.alice.id).unwrap();
    let (mut socket, _) = connect_async(format!("{}/ws?token={}", base, token))
        .await
        .unwrap();

    // The snapshot is taken just before this connection registers.
    let snapshot = next_json(&mut socket).await;
    assert_eq!(snapshot["type"], "presence-snapshot");
    assert_eq!(snapshot["online"], json!([h.mentor.id]));
    assert!(h.state.presence.is_online(&h.alice.id));
    assert!(drain(&mut mentor_rx).iter().any(|e| matches!(
        e,
        ServerEvent::PresenceChanged { identity, online: true } if identity == &h.alice.id
    )));

    let frame = json!({
        "type": "message-send",
        "request_id": "req-1",
        "conversation": conversation.id,
        "to": h.mentor.id,
        "body": "hello from a real socket",
    });
    socket
        .send(WsMessage::Text(frame.to_string().into()))
        .await
        .unwrap();

    let ack = next_json(&mut socket).await;
    assert_eq!(ack["type"], "ack");
    assert_eq!(ack["request_id"], "req-1");
    assert_eq!(ack["ok"], true);
    assert_eq!(ack["message"]["status"], "delivered");
    let message_id = ack["message"]["id"].as_str().unwrap().to_string();

    // Pushes from other components reach the socket through its writer.
    h.state
        .messaging
        .mark_message(&h.mentor.id, &message_id, MessageStatus::Read)
        .await
        .unwrap();
    let update = next_json(&mut socket).await;
    assert_eq!(update["type"], "message-update");
    assert_eq!(update["message_id"], message_id.as_str());
    assert_eq!(update["status"], "read");

    socket
        .send(WsMessage::Text("{not json".to_string().into()))
        .await
        .unwrap();
    let ack = next_json(&mut socket).await;
    assert_eq!(ack["ok"], false);
    assert_eq!(ack["error"]["kind"], "validation");

    socket.close(None).await.unwrap();

    let mut waited = Duration::ZERO;
    while h.state.presence.is_online(&h.alice.id) && waited < Duration::from_secs(5) {
        tokio::time::sleep(Duration::from_millis(20)).await;
        waited += Duration::from_millis(20);
    }
    assert!(!h.state.presence.is_online(&h.alice.id));
    assert_eq!(h.state.presence.online(), vec![h.mentor.id.clone()]);
    assert!(drain(&mut mentor_rx).iter().any(|e| matches!(
        e,
        ServerEvent::PresenceChanged { identity, online: false } if identity == &h.alice.id
    )));
}
