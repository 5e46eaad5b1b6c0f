//! End-to-end: HTTP client + dashboard runtime against a mocked stats API

use std::sync::Arc;
use std::time::Duration;

use swarm_insights::api::{ApiClient, ApiClientConfig};
use swarm_insights::dashboard::{Dashboard, Intent};
use swarm_insights::playback::PlaybackStatus;
use swarm_insights::render::{render_frame, RenderOptions};

const GEO_BODY: &str = r#"[
    {"id":"4f1","venue_name":"Time Out Market","lat":38.7069,"lng":-9.1459,"timestamp":1420113600,"shout":"lunch"},
    {"id":"4f2","venue_name":"Belem Tower","lat":38.6916,"lng":-9.2160,"timestamp":1451649600,"shout":null},
    {"id":"4f3","venue_name":null,"lat":41.1496,"lng":-8.6110,"timestamp":1483272000,"shout":""}
]"#;

#[tokio::test]
async fn replays_checkins_from_api() {
    let mut server = mockito::Server::new_async().await;
    let stats = server
        .mock("GET", "/api/stats")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"total_checkins":3,"unique_venues":3,"top_city":"Lisbon","total_distance_km":0.0}"#)
        .create_async()
        .await;
    let timeline = server
        .mock("GET", "/api/timeline/weekly")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;
    let geo = server
        .mock("GET", "/api/checkins/geo")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(GEO_BODY)
        .create_async()
        .await;

    let client = ApiClient::new(ApiClientConfig {
        base_url: server.url(),
        request_timeout_ms: 5_000,
    })
    .unwrap();

    let dashboard = Dashboard::new(Arc::new(client), Duration::from_millis(5));
    let handle = dashboard.handle();
    let mut started = false;
    let mut quitting = false;

    let run = dashboard.run(|state| {
        if !started && state.checkins.ready().is_some() {
            started = true;
            handle.send(Intent::Play);
        }
        if !quitting && state.is_loaded() && state.playback.status() == PlaybackStatus::Finished {
            quitting = true;
            handle.quit();
        }
    });
    let state = tokio::time::timeout(Duration::from_secs(10), run)
        .await
        .expect("dashboard did not finish");

    assert_eq!(state.stats.ready().map(|s| s.total_checkins), Some(3));
    assert!(state.timeline.error().is_some());

    let ids: Vec<&str> = state.visible_points().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["4f1", "4f2", "4f3"]);
    assert_eq!(state.display_year(), "2017");

    let frame = render_frame(&state, &RenderOptions::default());
    assert!(frame.contains("Lisbon"));
    assert!(frame.contains("timeline unavailable"));
    assert!(frame.contains("3/3"));
    assert!(frame.contains("Unknown venue"));

    stats.assert_async().await;
    timeline.assert_async().await;
    geo.assert_async().await;
}
