use api::response::{LoginResponse, UserData};

use crate::{logout, restore, save, FileStore, KeyValueStore, MemoryStore, TOKEN_KEY, USER_DATA_KEY};

fn account() -> LoginResponse {
    LoginResponse {
        message: Some("ok".to_string()),
        data: Some(UserData {
            id: 1,
            email: "jane@example.com".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            my_cameras_count: 2,
            shared_cameras_count: 1,
            total_cameras_count: 3,
            ..Default::default()
        }),
        error: None,
    }
}

#[test]
fn test_save_and_restore() {
    let mut store = MemoryStore::new();
    save(&mut store, "tok", &account()).unwrap();

    let session = restore(&mut store).unwrap().expect("session should be restored");
    assert_eq!(session.token, "tok");
    assert_eq!(session.account.data.unwrap().display_name(), "Jane Doe");
}

#[test]
fn test_stale_token_is_cleared() {
    let mut store = MemoryStore::new();
    store.set(TOKEN_KEY, "tok").unwrap();

    assert!(restore(&mut store).unwrap().is_none());
    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
}

#[test]
fn test_summary_without_token_is_cleared() {
    let mut store = MemoryStore::new();
    store
        .set(USER_DATA_KEY, &serde_json::to_string(&account()).unwrap())
        .unwrap();

    assert!(restore(&mut store).unwrap().is_none());
    assert_eq!(store.get(USER_DATA_KEY).unwrap(), None);
}

#[test]
fn test_corrupted_summary_clears_session() {
    let mut store = MemoryStore::new();
    store.set(TOKEN_KEY, "tok").unwrap();
    store.set(USER_DATA_KEY, "{not json").unwrap();

    assert!(restore(&mut store).unwrap().is_none());
    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(store.get(USER_DATA_KEY).unwrap(), None);
}

#[test]
fn test_logout() {
    let mut store = MemoryStore::new();
    save(&mut store, "tok", &account()).unwrap();
    logout(&mut store).unwrap();
    assert!(restore(&mut store).unwrap().is_none());
}

#[test]
fn test_file_store_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("session.json");

    let mut store = FileStore::open(&path).unwrap();
    assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    save(&mut store, "tok", &account()).unwrap();

    let mut reopened = FileStore::open(&path).unwrap();
    let session = restore(&mut reopened).unwrap().unwrap();
    assert_eq!(session.token, "tok");

    logout(&mut reopened).unwrap();
    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get(TOKEN_KEY).unwrap(), None);
}

#[test]
fn test_file_store_corrupted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "[1, 2").unwrap();

    let err = FileStore::open(&path).unwrap_err();
    assert!(err.to_string().contains("is corrupted"));
}
