mod common;

use solana_sdk::pubkey::Pubkey;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::*;
use luckypacket_blinks::consts::NOT_CONFIGURED_NOTICE;
use luckypacket_blinks::dashboard::PacketList;
use luckypacket_blinks::format;
use luckypacket_blinks::packet::PacketStatus;

#[tokio::test]
async fn lists_created_claimed_and_shared() {
    let mock = Arc::new(MockContract::default());
    let creator = Pubkey::new_unique();
    let viewer = Pubkey::new_unique();
    mock.insert(packet(1, creator, 3600));
    mock.insert(packet(2, viewer, 3600));
    mock.settle_claim(1, viewer, 100_000_000);

    let app = app(mock);
    let (status, body) = get(&app, &format!("/?account={viewer}&packet=1")).await;

    assert_eq!(status, 200, "{body}");
    assert_eq!(body["active_view"], "list");
    assert_eq!(body["created"].as_array().unwrap().len(), 1);
    assert_eq!(body["created"][0]["button_label"], "Cannot claim your own packet");
    assert_eq!(body["claimed"][0]["packet"]["id"], 1);
    assert_eq!(body["claimed"][0]["button_label"], "Claimed");
    assert_eq!(body["shared"]["has_claimed"], true);
    assert_eq!(body["shared"]["shares"], "3/4");
    assert!(body.get("notice").is_none());
}

#[tokio::test]
async fn anonymous_visitor_sees_shared_packet_only() {
    let mock = Arc::new(MockContract::default());
    mock.insert(packet(5, Pubkey::new_unique(), 3600));

    let app = app(mock);
    let (status, body) = get(&app, "/?packet=5").await;

    assert_eq!(status, 200);
    assert_eq!(body["active_view"], "create");
    assert!(body["created"].as_array().unwrap().is_empty());
    assert_eq!(body["shared"]["button_label"], "Connect wallet");
    assert_eq!(body["shared"]["button_enabled"], false);
    assert_eq!(
        body["shared"]["share_link"],
        "https://luckypacket.app/?packet=5"
    );
    assert!(body["notice"].is_string());
}

#[tokio::test]
async fn recent_view_lists_open_packets_newest_first() {
    let mock = Arc::new(MockContract::default());
    let creator = Pubkey::new_unique();
    let viewer = Pubkey::new_unique();
    for id in 1..=24 {
        mock.insert(packet(id, creator, 3600));
    }
    mock.counter.store(25, Ordering::SeqCst);
    mock.insert(packet(23, creator, -10));
    mock.packets.lock().unwrap().get_mut(&22).unwrap().status = PacketStatus::Refunded;
    mock.settle_claim(21, viewer, 100_000_000);

    let app = app(mock);
    let (status, body) = get(&app, &format!("/?account={viewer}")).await;

    assert_eq!(status, 200);
    let ids: Vec<u64> = body["recent"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["packet"]["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, [24, 21, 20, 19, 18, 17, 16, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5]);
    assert_eq!(body["recent"][1]["button_label"], "Claimed");
}

#[tokio::test]
async fn unconfigured_program_shows_setup_notice() {
    let mock = Arc::new(MockContract::default());
    let viewer = Pubkey::new_unique();
    mock.insert(packet(1, viewer, 3600));

    let app = unconfigured_app(mock);
    let (status, body) = get(&app, &format!("/?account={viewer}&packet=1")).await;

    assert_eq!(status, 200);
    assert_eq!(body["notice"], NOT_CONFIGURED_NOTICE);
    assert!(body["created"].as_array().unwrap().is_empty());
    assert!(body["recent"].as_array().unwrap().is_empty());
    assert!(body["shared"].is_null());
}

#[tokio::test]
async fn failed_reads_fall_back_to_empty() {
    let mock = MockContract::default();
    let viewer = Pubkey::new_unique();
    mock.insert(packet(1, viewer, 3600));
    mock.fail_reads.store(true, Ordering::SeqCst);

    let mut list = PacketList::new(&mock, Some(viewer), Some(1));
    list.refresh().await;

    let snapshot = list.snapshot();
    assert!(snapshot.created.is_empty());
    assert!(snapshot.claimed.is_empty());
    assert!(snapshot.shared.packet.is_none());

    mock.fail_reads.store(false, Ordering::SeqCst);
    list.refresh().await;
    assert_eq!(list.snapshot().created.len(), 1);
    assert!(list.snapshot().shared.packet.is_some());
}

#[tokio::test]
async fn refresh_trigger_ignores_zero_and_repeats() {
    let mock = MockContract::default();
    let viewer = Pubkey::new_unique();
    let mut list = PacketList::new(&mock, Some(viewer), None);

    assert!(!list.set_refresh_trigger(0).await);
    assert!(list.set_refresh_trigger(1).await);
    assert!(list.snapshot().created.is_empty());

    mock.insert(packet(9, viewer, 3600));
    assert!(!list.set_refresh_trigger(1).await);
    assert!(list.snapshot().created.is_empty());

    assert!(list.set_refresh_trigger(2).await);
    assert_eq!(list.snapshot().created[0].id, 9);
}

#[tokio::test]
async fn missing_packets_in_a_batch_are_skipped() {
    let mock = MockContract::default();
    let viewer = Pubkey::new_unique();
    mock.insert(packet(1, viewer, 3600));
    mock.created.lock().unwrap().get_mut(&viewer).unwrap().push(42);

    let mut list = PacketList::new(&mock, Some(viewer), None);
    list.refresh().await;

    let view = list.view(BASE_URL, format::now_unix());
    assert_eq!(view.created.len(), 1);
    assert_eq!(view.created[0].packet.id, 1);
}

#[tokio::test]
async fn stats_and_packet_reads() {
    let mock = Arc::new(MockContract::default());
    let creator = Pubkey::new_unique();
    let claimer = Pubkey::new_unique();
    mock.insert(packet(1, creator, 3600));
    mock.settle_claim(1, claimer, 200_000_000);

    let app = app(mock);

    let (_, stats) = get(&app, "/api/stats").await;
    assert_eq!(stats["active_packets"], 1);
    assert_eq!(stats["platform_fee_bps"], 100);

    let (_, claims) = get(&app, "/api/packets/1/claims").await;
    assert_eq!(claims[0]["claimer"], claimer.to_string());
    assert_eq!(claims[0]["amount_sol"], "0.2000");

    let (_, claimed) = get(&app, &format!("/api/packets/1/claimed/{claimer}")).await;
    assert_eq!(claimed["claimed"], true);

    let (_, created) = get(&app, &format!("/api/users/{creator}/created")).await;
    assert_eq!(created[0]["remaining_count"], 3);

    let (_, preview) = get(&app, "/api/preview?amount=1&count=4&is_random=false").await;
    assert_eq!(preview["valid"], true);
    assert_eq!(preview["preview"]["after_fee_display"], "0.9900");
    assert_eq!(preview["preview"]["per_share_display"], "0.247500");

    let (status, _) = get(&app, "/api/packets/404").await;
    assert_eq!(status, 404);
}
