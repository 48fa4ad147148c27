use std::sync::Arc;
use std::time::Instant;

use reqwest::StatusCode;
use serde_json::{Value, json};
use spotlist::management::{
    KEY_LAST_FOUND, KEY_LAST_NOT_FOUND_COUNT, KEY_LAST_PLAYLIST_URL, KEY_LAST_TOTAL, Session,
    StaticCredential,
};
use spotlist::spotify::client::PLAYLIST_DESCRIPTION;
use spotlist::spotify::{ApiConfig, RetryPolicy, SpotifyClient};
use spotlist::sync::{ProgressEvent, ProgressLog, committer, import_playlist, resolver};
use spotlist::types::SongQuery;
use spotlist::{Error, TransportError};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-token";

fn session() -> Session {
    Session::new(Arc::new(StaticCredential::new(TOKEN)))
}

fn api(server: &MockServer) -> ApiConfig {
    ApiConfig::new(format!("{}/v1", server.uri()), RetryPolicy::with_max_retries(2))
}

fn search_hit(uri: &str) -> Value {
    json!({ "tracks": { "items": [{ "uri": uri, "name": "x" }] } })
}

fn search_miss() -> Value {
    json!({ "tracks": { "items": [] } })
}

async fn mount_account(server: &MockServer, playlist_id: &str) {
    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "user1" })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/users/user1/playlists"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": playlist_id,
            "external_urls": { "spotify": format!("https://open.spotify.com/playlist/{}", playlist_id) }
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_search(server: &MockServer, q: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("q", q))
        .and(query_param("type", "track"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_import_night_drive() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "user1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/users/user1/playlists"))
        .and(body_json(json!({
            "name": "Night Drive",
            "public": true,
            "description": PLAYLIST_DESCRIPTION
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "pl1",
            "external_urls": { "spotify": "https://open.spotify.com/playlist/pl1" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_search(
        &server,
        "track:Goosebumps artist:Travis Scott",
        search_hit("spotify:track:goose"),
    )
    .await;
    mount_search(&server, "track:Mask Off artist:Future", search_hit("spotify:track:mask")).await;
    Mock::given(method("POST"))
        .and(path("/v1/playlists/pl1/tracks"))
        .and(body_json(json!({ "uris": ["spotify:track:goose", "spotify:track:mask"] })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "snapshot_id": "s1" })))
        .expect(1)
        .mount(&server)
        .await;

    let session = session();
    let mut log = ProgressLog::default();
    let raw = "1. Goosebumps - Travis Scott\n2. Mask Off - Future\n";

    let summary = import_playlist(&session, &api(&server), "  Night Drive ", raw, &mut log)
        .await
        .unwrap();

    assert_eq!(summary.playlist_id, "pl1");
    assert_eq!(summary.playlist_url, "https://open.spotify.com/playlist/pl1");
    assert_eq!(summary.total, 2);
    assert_eq!(summary.found, 2);
    assert!(summary.not_found.is_empty());

    let store = session.store();
    assert_eq!(store.get(KEY_LAST_TOTAL).as_deref(), Some("2"));
    assert_eq!(store.get(KEY_LAST_FOUND).as_deref(), Some("2"));
    assert_eq!(store.get(KEY_LAST_NOT_FOUND_COUNT).as_deref(), Some("0"));
    assert_eq!(
        store.get(KEY_LAST_PLAYLIST_URL).as_deref(),
        Some("https://open.spotify.com/playlist/pl1")
    );
    assert!(store.last_not_found().is_empty());

    assert_eq!(
        log.events,
        vec![
            ProgressEvent::Searching {
                index: 1,
                total: 2,
                query: SongQuery::new("Goosebumps", "Travis Scott"),
            },
            ProgressEvent::Searching {
                index: 2,
                total: 2,
                query: SongQuery::new("Mask Off", "Future"),
            },
            ProgressEvent::SendingBatch {
                batch: 1,
                total_batches: 1,
                added_so_far: 0,
                total: 2,
                batch_size: 2,
            },
            ProgressEvent::BatchDone {
                batch: 1,
                total_batches: 1,
                added_so_far: 2,
                total: 2,
                batch_size: 2,
            },
        ]
    );
}

#[tokio::test]
async fn test_import_records_not_found_in_order() {
    let server = MockServer::start().await;
    mount_account(&server, "pl2").await;
    mount_search(&server, "track:Ghost One", search_miss()).await;
    mount_search(&server, "track:Moonlight artist:XXXTENTACION", search_hit("spotify:track:moon")).await;
    mount_search(&server, "track:Ghost Two artist:Nobody", search_miss()).await;
    Mock::given(method("POST"))
        .and(path("/v1/playlists/pl2/tracks"))
        .and(body_json(json!({ "uris": ["spotify:track:moon"] })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "snapshot_id": "s" })))
        .expect(1)
        .mount(&server)
        .await;

    let raw = json!([
        "Ghost One",
        { "title": "Moonlight", "artist": "XXXTENTACION" },
        { "title": "Ghost Two", "artist": "Nobody" }
    ])
    .to_string();

    let session = session();
    let summary = import_playlist(&session, &api(&server), "Mixed", &raw, &mut ProgressLog::default())
        .await
        .unwrap();

    assert_eq!(summary.found, 1);
    assert_eq!(summary.found + summary.not_found.len(), summary.total);
    assert_eq!(
        summary.not_found,
        vec![SongQuery::new("Ghost One", ""), SongQuery::new("Ghost Two", "Nobody")]
    );
    assert_eq!(session.store().last_not_found(), summary.not_found);
    assert_eq!(session.store().get_count(KEY_LAST_NOT_FOUND_COUNT), 2);
}

#[tokio::test]
async fn test_import_with_no_matches_leaves_playlist_empty() {
    let server = MockServer::start().await;
    mount_account(&server, "pl3").await;
    mount_search(&server, "track:Nothing", search_miss()).await;
    Mock::given(method("POST"))
        .and(path("/v1/playlists/pl3/tracks"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut log = ProgressLog::default();
    let summary = import_playlist(&session(), &api(&server), "Empty", "Nothing", &mut log)
        .await
        .unwrap();

    assert_eq!(summary.found, 0);
    assert_eq!(summary.not_found.len(), 1);
    assert_eq!(log.events.len(), 1);
}

#[tokio::test]
async fn test_import_requires_credentials_before_any_request() {
    let server = MockServer::start().await;
    let session = Session::new(Arc::new(StaticCredential::none()));

    let err = import_playlist(&session, &api(&server), "Name", "Song", &mut ProgressLog::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::AuthRequired));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_import_validates_input_before_any_request() {
    let server = MockServer::start().await;
    let session = session();

    let err = import_playlist(&session, &api(&server), "   ", "Song", &mut ProgressLog::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let err = import_playlist(&session, &api(&server), "Name", " \n \n", &mut ProgressLog::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_import_rejects_overlapping_operation() {
    let server = MockServer::start().await;
    let session = session();
    let _running = session.begin().unwrap();

    let err = import_playlist(&session, &api(&server), "Name", "Song", &mut ProgressLog::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Busy));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_import_aborts_when_search_fails() {
    let server = MockServer::start().await;
    mount_account(&server, "pl4").await;
    mount_search(&server, "track:First", search_hit("spotify:track:1")).await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("q", "track:Second"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad query"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("q", "track:Third"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_miss()))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/playlists/pl4/tracks"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let session = session();
    let err = import_playlist(
        &session,
        &api(&server),
        "Broken",
        "First\nSecond\nThird",
        &mut ProgressLog::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        Error::Transport(TransportError::RequestFailed { status, .. }) if status == StatusCode::BAD_REQUEST
    ));
    assert_eq!(session.store().get(KEY_LAST_TOTAL), None);

    // the guard is released once the operation ends
    assert!(session.begin().is_ok());
}

#[tokio::test]
async fn test_resolve_all_keeps_counts_and_order() {
    let server = MockServer::start().await;
    mount_search(&server, "track:A", search_hit("spotify:track:a")).await;
    mount_search(&server, "track:B", search_miss()).await;
    mount_search(&server, "track:C", search_hit("spotify:track:c")).await;
    mount_search(&server, "track:D", json!({})).await;

    let client = SpotifyClient::new(format!("{}/v1", server.uri()), TOKEN, RetryPolicy::default());
    let songs: Vec<SongQuery> = ["A", "B", "C", "D"]
        .iter()
        .map(|t| SongQuery::new(*t, ""))
        .collect();

    let mut log = ProgressLog::default();
    let result = resolver::resolve_all(&client, &songs, &mut log).await.unwrap();

    assert_eq!(result.total(), songs.len());
    assert_eq!(result.uris(), vec!["spotify:track:a", "spotify:track:c"]);
    assert_eq!(
        result.not_found,
        vec![SongQuery::new("B", ""), SongQuery::new("D", "")]
    );
    let indices: Vec<usize> = log
        .events
        .iter()
        .map(|e| match e {
            ProgressEvent::Searching { index, .. } => *index,
            other => panic!("unexpected event: {other:?}"),
        })
        .collect();
    assert_eq!(indices, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_commit_sends_ordered_batches() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/playlists/big/tracks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "snapshot_id": "s" })))
        .expect(3)
        .mount(&server)
        .await;

    let client = SpotifyClient::new(format!("{}/v1", server.uri()), TOKEN, RetryPolicy::default());
    let uris: Vec<String> = (0..250).map(|i| format!("spotify:track:{}", i)).collect();

    let mut log = ProgressLog::default();
    let started = Instant::now();
    committer::commit(&client, "big", &uris, &mut log).await.unwrap();
    assert!(started.elapsed() >= committer::BATCH_DELAY * 2);

    let requests = server.received_requests().await.unwrap();
    let sent: Vec<Vec<String>> = requests
        .iter()
        .map(|r| {
            let body: Value = serde_json::from_slice(&r.body).unwrap();
            serde_json::from_value(body["uris"].clone()).unwrap()
        })
        .collect();
    assert_eq!(
        sent.iter().map(Vec::len).collect::<Vec<_>>(),
        vec![100, 100, 50]
    );
    assert_eq!(sent.concat(), uris);

    let done: Vec<(usize, usize)> = log
        .events
        .iter()
        .filter_map(|e| match e {
            ProgressEvent::BatchDone {
                batch,
                added_so_far,
                ..
            } => Some((*batch, *added_so_far)),
            _ => None,
        })
        .collect();
    assert_eq!(done, vec![(1, 100), (2, 200), (3, 250)]);
}

#[tokio::test]
async fn test_commit_failure_keeps_earlier_batches() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/playlists/part/tracks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "snapshot_id": "s" })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/playlists/part/tracks"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let client = SpotifyClient::new(format!("{}/v1", server.uri()), TOKEN, RetryPolicy::default());
    let uris: Vec<String> = (0..300).map(|i| format!("spotify:track:{}", i)).collect();

    let mut log = ProgressLog::default();
    let err = committer::commit(&client, "part", &uris, &mut log)
        .await
        .unwrap_err();

    match err {
        Error::PartialCommit { committed, source } => {
            assert_eq!(committed, 100);
            assert_eq!(source.status(), Some(StatusCode::FORBIDDEN));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // no third batch is attempted
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
    assert!(matches!(
        log.events.last(),
        Some(ProgressEvent::SendingBatch { batch: 2, .. })
    ));
}

#[tokio::test]
async fn test_commit_failing_first_batch_is_plain_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/playlists/none/tracks"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no playlist"))
        .expect(1)
        .mount(&server)
        .await;

    let client = SpotifyClient::new(format!("{}/v1", server.uri()), TOKEN, RetryPolicy::default());
    let uris: Vec<String> = (0..150).map(|i| format!("spotify:track:{}", i)).collect();

    let err = committer::commit(&client, "none", &uris, &mut ProgressLog::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Transport(TransportError::RequestFailed { status, .. }) if status == StatusCode::NOT_FOUND
    ));
}

#[tokio::test]
async fn test_closure_receives_progress() {
    let server = MockServer::start().await;
    mount_account(&server, "pl5").await;
    mount_search(&server, "track:Only artist:One", search_hit("spotify:track:only")).await;
    Mock::given(method("POST"))
        .and(path("/v1/playlists/pl5/tracks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "snapshot_id": "s" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut kinds: Vec<&'static str> = Vec::new();
    let mut sink = |event: ProgressEvent| {
        kinds.push(match event {
            ProgressEvent::Searching { .. } => "searching",
            ProgressEvent::SendingBatch { .. } => "sending",
            ProgressEvent::BatchDone { .. } => "done",
            ProgressEvent::FetchingPage { .. } => "page",
        })
    };

    import_playlist(&session(), &api(&server), "Solo", "Only - One", &mut sink)
        .await
        .unwrap();

    assert_eq!(kinds, vec!["searching", "sending", "done"]);
}
