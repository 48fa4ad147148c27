use std::sync::Arc;

use spotlist::Error;
use spotlist::management::{
    KEY_LAST_FOUND, KEY_LAST_NOT_FOUND, KEY_LAST_TOTAL, Session, SessionStore, StaticCredential,
};
use spotlist::types::SongQuery;

#[test]
fn test_store_set_get_remove() {
    let store = SessionStore::new();
    assert_eq!(store.get(KEY_LAST_TOTAL), None);

    store.set(KEY_LAST_TOTAL, "12");
    assert_eq!(store.get(KEY_LAST_TOTAL).as_deref(), Some("12"));

    store.set(KEY_LAST_TOTAL, "13");
    assert_eq!(store.get(KEY_LAST_TOTAL).as_deref(), Some("13"));

    assert_eq!(store.remove(KEY_LAST_TOTAL).as_deref(), Some("13"));
    assert_eq!(store.get(KEY_LAST_TOTAL), None);
}

#[test]
fn test_store_counts_default_to_zero() {
    let store = SessionStore::new();
    assert_eq!(store.get_count(KEY_LAST_FOUND), 0);

    store.set(KEY_LAST_FOUND, "7");
    assert_eq!(store.get_count(KEY_LAST_FOUND), 7);

    store.set(KEY_LAST_FOUND, "seven");
    assert_eq!(store.get_count(KEY_LAST_FOUND), 0);
}

#[test]
fn test_store_not_found_list() {
    let store = SessionStore::new();
    assert!(store.last_not_found().is_empty());

    let songs = vec![SongQuery::new("Ghost", ""), SongQuery::new("Echo", "Nobody")];
    store.set(KEY_LAST_NOT_FOUND, serde_json::to_string(&songs).unwrap());
    assert_eq!(store.last_not_found(), songs);

    store.set(KEY_LAST_NOT_FOUND, "{not json");
    assert!(store.last_not_found().is_empty());
}

#[test]
fn test_begin_is_exclusive_until_guard_drops() {
    let session = Session::new(Arc::new(StaticCredential::new("t")));

    let guard = session.begin().unwrap();
    assert!(matches!(session.begin(), Err(Error::Busy)));

    drop(guard);
    assert!(session.begin().is_ok());
}

#[tokio::test]
async fn test_bearer_token() {
    let session = Session::new(Arc::new(StaticCredential::new("abc")));
    assert_eq!(session.bearer_token().await.unwrap(), "abc");

    let session = Session::new(Arc::new(StaticCredential::none()));
    assert!(matches!(session.bearer_token().await, Err(Error::AuthRequired)));

    let session = Session::new(Arc::new(StaticCredential::new("")));
    assert!(matches!(session.bearer_token().await, Err(Error::AuthRequired)));
    assert_eq!(session.credentials().bearer_token().await, None);
}
