mod common;

use common::{connect, drain, harness};
use mentorlink_server::models::NewNotification;
use mentorlink_server::protocol::ServerEvent;
use mentorlink_server::Error;
use serde_json::json;

fn notice(owner: &str, title: &str) -> NewNotification {
    NewNotification {
        owner_id: owner.to_string(),
        title: title.to_string(),
        body: "Something happened".to_string(),
        link: None,
        kind: "general".to_string(),
        metadata: json!({}),
    }
}

#[tokio::test]
async fn offline_notification_waits_until_listed() {
    let h = harness().await;
    let fanout = &h.state.notifications;

    let created = fanout.create(notice(&h.alice.id, "Welcome")).await.unwrap();
    assert!(!created.read);

    let (_conn, mut alice_rx) = connect(&h.state, &h.alice);
    assert!(drain(&mut alice_rx).is_empty(), "nothing is replayed on connect");

    let listed = fanout.list(&h.alice.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
    assert_eq!(fanout.unread_count(&h.alice.id).await.unwrap(), 1);

    let read = fanout.mark_read(&created.id, &h.alice.id).await.unwrap();
    assert!(read.read);
    assert_eq!(fanout.unread_count(&h.alice.id).await.unwrap(), 0);
}

#[tokio::test]
async fn online_owner_receives_push() {
    let h = harness().await;
    let (_conn, mut alice_rx) = connect(&h.state, &h.alice);
    let (_other, mut bob_rx) = connect(&h.state, &h.bob);
    // Bob coming online is broadcast to Alice; only the notification matters here.
    drain(&mut alice_rx);

    let created = h
        .state
        .notifications
        .create(notice(&h.alice.id, "Reminder"))
        .await
        .unwrap();

    let events = drain(&mut alice_rx);
    assert!(matches!(
        &events[..],
        [ServerEvent::NotificationCreated { notification }] if notification.id == created.id
    ));
    assert!(drain(&mut bob_rx).is_empty());
}

#[tokio::test]
async fn only_owner_can_mark_read() {
    let h = harness().await;
    let fanout = &h.state.notifications;
    let created = fanout.create(notice(&h.alice.id, "Private")).await.unwrap();

    let err = fanout.mark_read(&created.id, &h.bob.id).await.unwrap_err();
    assert!(matches!(err, Error::Authorization(_)));
    assert_eq!(fanout.unread_count(&h.alice.id).await.unwrap(), 1);

    let err = fanout.mark_read("no-such-notification", &h.alice.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn create_requires_owner_and_title() {
    let h = harness().await;
    let fanout = &h.state.notifications;

    let err = fanout.create(notice("", "Title")).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    let err = fanout.create(notice(&h.alice.id, "  ")).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(fanout.list(&h.alice.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn bulk_operations_stay_within_owner() {
    let h = harness().await;
    let fanout = &h.state.notifications;

    for title in ["One", "Two", "Three"] {
        fanout.create(notice(&h.alice.id, title)).await.unwrap();
    }
    fanout.create(notice(&h.bob.id, "Bob's")).await.unwrap();

    let listed = fanout.list(&h.alice.id).await.unwrap();
    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0].title, "Three", "newest first");

    assert_eq!(fanout.mark_all_read(&h.alice.id).await.unwrap(), 3);
    assert_eq!(fanout.mark_all_read(&h.alice.id).await.unwrap(), 0);
    assert_eq!(fanout.unread_count(&h.bob.id).await.unwrap(), 1);

    assert_eq!(fanout.clear(&h.alice.id).await.unwrap(), 3);
    assert!(fanout.list(&h.alice.id).await.unwrap().is_empty());
    assert_eq!(fanout.list(&h.bob.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn cleared_notification_is_not_reported_read() {
    let h = harness().await;
    let fanout = &h.state.notifications;
    let created = fanout.create(notice(&h.alice.id, "Short-lived")).await.unwrap();

    // Marking twice is fine while the record exists.
    fanout.mark_read(&created.id, &h.alice.id).await.unwrap();
    fanout.mark_read(&created.id, &h.alice.id).await.unwrap();

    fanout.clear(&h.alice.id).await.unwrap();
    assert!(!h
        .state
        .store
        .mark_notification_read(&created.id, &h.alice.id)
        .await
        .unwrap());
    let err = fanout.mark_read(&created.id, &h.alice.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}
