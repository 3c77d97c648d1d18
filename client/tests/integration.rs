extern crate tably_client;

use std::cell::RefCell;
use std::rc::Rc;

use tably_client::controller::{ToggleClient, TOGGLE_FAILED_NOTICE};
use tably_client::testkit::{ManualTransport, RecordingBinder};
use tably_client::toggle::{ReactionKind, ToggleKey, ToggleKind, ToggleState};
use tably_client::transport::TransportError;

fn setup() -> (
    ToggleClient<ManualTransport>,
    ManualTransport,
    Rc<RefCell<RecordingBinder>>,
) {
    tably_client::init_logger();
    let binder = Rc::new(RefCell::new(RecordingBinder::default()));
    let transport = ManualTransport::new();
    let client = ToggleClient::new(transport.clone(), binder.clone());
    (client, transport, binder)
}

#[tokio::test]
async fn favorite_restaurant_round_trip() {
    let (mut client, transport, binder) = setup();
    let handle = client.handle();
    let key = ToggleKey::new(ToggleKind::RestaurantFavorite, "R42");

    handle.seed(ToggleKind::RestaurantFavorite, "R42", ToggleState::Off);
    handle.click(ToggleKind::RestaurantFavorite, "R42");

    // optimistic render happens before any request settles
    assert_eq!(binder.borrow().shown(&key), Some(ToggleState::On));

    client.advance_once().await;
    assert_eq!(transport.in_flight(), 1);

    transport.resolve_next(Ok(r#"{"status":"success","is_favorite":true,"message":"已收藏餐廳"}"#));
    client.advance_once().await;

    assert_eq!(
        handle.confirmed(ToggleKind::RestaurantFavorite, "R42"),
        Some(ToggleState::On)
    );
    assert_eq!(binder.borrow().shown(&key), Some(ToggleState::On));
    assert_eq!(transport.sent().len(), 1);
    assert!(binder.borrow().notices.is_empty());
}

#[tokio::test]
async fn failed_toggle_rolls_back_and_notifies_once() {
    let (mut client, transport, binder) = setup();
    let handle = client.handle();
    let key = ToggleKey::new(ToggleKind::RestaurantFavorite, "R42");

    handle.seed(ToggleKind::RestaurantFavorite, "R42", ToggleState::Off);
    handle.click(ToggleKind::RestaurantFavorite, "R42");
    client.advance_once().await;

    transport.resolve_next(Ok(r#"{"status":"error"}"#));
    client.advance_once().await;

    // state strictly before the toggle, one visible notice
    assert_eq!(
        handle.confirmed(ToggleKind::RestaurantFavorite, "R42"),
        Some(ToggleState::Off)
    );
    assert_eq!(binder.borrow().shown(&key), Some(ToggleState::Off));
    assert_eq!(binder.borrow().notices, vec![TOGGLE_FAILED_NOTICE.to_owned()]);
}

#[tokio::test]
async fn network_status_and_malformed_failures_are_uniform() {
    let failures = [
        Err(TransportError::Network("connection reset".into())),
        Err(TransportError::Status(502)),
        Ok(r#"{"status":"success"}"#), // 2xx but missing is_favorite
    ];

    for failure in failures {
        let (mut client, transport, binder) = setup();
        let handle = client.handle();

        handle.click(ToggleKind::PostFavorite, "7");
        client.advance_once().await;
        transport.resolve_next(failure.clone());
        client.advance_once().await;

        assert_eq!(
            handle.confirmed(ToggleKind::PostFavorite, "7"),
            Some(ToggleState::Off)
        );
        assert_eq!(binder.borrow().notices.len(), 1);
        // no automatic retry
        assert_eq!(transport.sent().len(), 1);
    }
}

#[tokio::test]
async fn rapid_reaction_clicks_coalesce_into_one_request() {
    let (mut client, transport, binder) = setup();
    let handle = client.handle();
    let key = ToggleKey::new(ToggleKind::Reaction, "P7");

    // like then immediately love, both before the pump runs
    handle.request_toggle(ToggleKind::Reaction, "P7", ToggleState::Reacted(ReactionKind::Like));
    handle.request_toggle(ToggleKind::Reaction, "P7", ToggleState::Reacted(ReactionKind::Love));
    assert_eq!(
        binder.borrow().shown(&key),
        Some(ToggleState::Reacted(ReactionKind::Love))
    );

    client.advance_once().await;

    // exactly one request, carrying the latest intent
    assert_eq!(transport.sent().len(), 1);
    assert_eq!(transport.sent()[0].path, "/post/P7/reaction/add/");
    assert_eq!(
        transport.sent()[0].body.as_deref(),
        Some("reaction_type=love")
    );

    transport.resolve_next(Ok(r#"{
        "status": "success",
        "reactions_count": {"like": 0, "love": 5, "haha": 0, "wow": 0, "sad": 0, "angry": 0},
        "total_reactions": 5
    }"#));
    client.advance_once().await;

    assert_eq!(
        handle.confirmed(ToggleKind::Reaction, "P7"),
        Some(ToggleState::Reacted(ReactionKind::Love))
    );
    let counts = binder.borrow().counts.clone();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].0, key);
    assert_eq!(counts[0].1[&ReactionKind::Love], 5);
    assert_eq!(counts[0].2, 5);
}

#[tokio::test]
async fn click_during_flight_never_double_sends() {
    let (mut client, transport, binder) = setup();
    let handle = client.handle();
    let key = ToggleKey::new(ToggleKind::Follow, "u3");

    handle.click(ToggleKind::Follow, "u3");
    client.advance_once().await;
    assert_eq!(transport.in_flight(), 1);

    // second and third intents arrive while the first request is in flight
    handle.click(ToggleKind::Follow, "u3");
    handle.click(ToggleKind::Follow, "u3");
    client.advance_once().await;

    // still exactly one outstanding request for this id
    assert_eq!(transport.in_flight(), 1);
    assert_eq!(transport.sent().len(), 1);

    transport.resolve_next(Ok(r#"{"status":"success","is_following":true}"#));
    client.advance_once().await;

    // the coalesced intent (flip, flip back -> On) fires exactly once
    assert_eq!(transport.sent().len(), 2);
    assert_eq!(transport.in_flight(), 1);

    transport.resolve_next(Ok(r#"{"status":"success","is_following":true}"#));
    client.advance_once().await;

    assert_eq!(handle.confirmed(ToggleKind::Follow, "u3"), Some(ToggleState::On));
    assert_eq!(binder.borrow().shown(&key), Some(ToggleState::On));
    assert_eq!(client.in_flight_requests(), 0);
}

#[tokio::test]
async fn different_ids_proceed_concurrently() {
    let (mut client, transport, _binder) = setup();
    let handle = client.handle();

    handle.click(ToggleKind::PostFavorite, "1");
    handle.click(ToggleKind::PostFavorite, "2");
    handle.click(ToggleKind::Follow, "u9");
    client.advance_once().await;

    // one request per id, all outstanding at once
    assert_eq!(transport.in_flight(), 3);

    // settle them out of order
    transport.resolve_next(Ok(r#"{"status":"success","is_favorite":true}"#));
    transport.resolve_next(Ok(r#"{"status":"success","is_favorite":true}"#));
    transport.resolve_next(Ok(r#"{"status":"success","is_following":true}"#));
    client.advance_once().await;
    client.advance_once().await;
    client.advance_once().await;

    assert_eq!(handle.confirmed(ToggleKind::PostFavorite, "1"), Some(ToggleState::On));
    assert_eq!(handle.confirmed(ToggleKind::PostFavorite, "2"), Some(ToggleState::On));
    assert_eq!(handle.confirmed(ToggleKind::Follow, "u9"), Some(ToggleState::On));
}

#[tokio::test]
async fn failure_drops_queued_intent() {
    let (mut client, transport, binder) = setup();
    let handle = client.handle();
    let key = ToggleKey::new(ToggleKind::PostFavorite, "7");

    handle.click(ToggleKind::PostFavorite, "7");
    client.advance_once().await;

    // queue a follow-up intent, then fail the in-flight request
    handle.click(ToggleKind::PostFavorite, "7");
    client.advance_once().await;
    transport.resolve_next(Err(TransportError::Network("timeout".into())));
    client.advance_once().await;

    // rollback, and the queued intent does not fire on its own
    assert_eq!(binder.borrow().shown(&key), Some(ToggleState::Off));
    assert_eq!(transport.sent().len(), 1);
    assert_eq!(client.in_flight_requests(), 0);
    assert_eq!(binder.borrow().notices.len(), 1);
}

#[tokio::test]
async fn settlement_after_eviction_is_discarded() {
    let (mut client, transport, binder) = setup();
    let handle = client.handle();

    handle.click(ToggleKind::PostFavorite, "7");
    client.advance_once().await;

    assert!(handle.evict(ToggleKind::PostFavorite, "7"));
    let mutations_before = binder.borrow().mutations.len();

    transport.resolve_next(Ok(r#"{"status":"success","is_favorite":true}"#));
    client.advance_once().await;

    // nothing re-rendered, nothing recreated
    assert_eq!(binder.borrow().mutations.len(), mutations_before);
    assert_eq!(handle.confirmed(ToggleKind::PostFavorite, "7"), None);
}

#[tokio::test]
async fn stale_settlement_from_before_eviction_is_discarded() {
    let (mut client, transport, binder) = setup();
    let handle = client.handle();
    let key = ToggleKey::new(ToggleKind::PostFavorite, "7");

    // first lifecycle: request goes out, then the element leaves the page
    handle.click(ToggleKind::PostFavorite, "7");
    client.advance_once().await;
    assert!(handle.evict(ToggleKind::PostFavorite, "7"));

    // the element comes back and the user toggles again while the old
    // request is still outstanding
    handle.click(ToggleKind::PostFavorite, "7");
    client.advance_once().await;
    assert_eq!(transport.in_flight(), 2);

    // the evicted lifecycle's reply lands first and must not be taken as
    // confirmation for the new entry
    transport.resolve_next(Ok(r#"{"status":"success","is_favorite":false}"#));
    client.advance_once().await;
    transport.resolve_next(Ok(r#"{"status":"success","is_favorite":true}"#));
    client.advance_once().await;

    assert_eq!(
        handle.confirmed(ToggleKind::PostFavorite, "7"),
        Some(ToggleState::On)
    );
    assert_eq!(binder.borrow().shown(&key), Some(ToggleState::On));
    assert!(binder.borrow().notices.is_empty());
}

#[tokio::test]
async fn render_is_idempotent_by_mutation_count() {
    let (_client, _transport, binder) = setup();
    let key = ToggleKey::new(ToggleKind::PostFavorite, "7");

    {
        use tably_client::render::RenderBinder;
        let mut binder = binder.borrow_mut();
        binder.render(&key, ToggleState::On);
        binder.render(&key, ToggleState::On);
        binder.render(&key, ToggleState::On);
    }

    assert_eq!(binder.borrow().renders, 3);
    assert_eq!(binder.borrow().mutations.len(), 1);
}
