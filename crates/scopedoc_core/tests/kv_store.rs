use scopedoc_core::db::{open_db, open_db_in_memory};
use scopedoc_core::{PersistenceStore, SqliteKvStore, PROJECT_DATA_KEY, THEME_KEY};

#[test]
fn save_then_load_returns_latest_value() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::new(&conn);

    store.save(THEME_KEY, "light").unwrap();
    store.save(THEME_KEY, "dark").unwrap();

    assert_eq!(store.load(THEME_KEY).unwrap().as_deref(), Some("dark"));
    assert_eq!(store.keys().unwrap(), vec![THEME_KEY.to_string()]);
}

#[test]
fn load_of_missing_key_is_absent() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::new(&conn);

    assert_eq!(store.load(PROJECT_DATA_KEY).unwrap(), None);
}

#[test]
fn remove_deletes_key_and_tolerates_missing_keys() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::new(&conn);

    store.save(PROJECT_DATA_KEY, "{}").unwrap();
    store.remove(PROJECT_DATA_KEY).unwrap();
    store.remove(PROJECT_DATA_KEY).unwrap();

    assert_eq!(store.load(PROJECT_DATA_KEY).unwrap(), None);
}

#[test]
fn values_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scopedoc.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        SqliteKvStore::new(&conn)
            .save(PROJECT_DATA_KEY, r#"{"title":"persisted"}"#)
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = SqliteKvStore::new(&conn);
    assert_eq!(
        store.load(PROJECT_DATA_KEY).unwrap().as_deref(),
        Some(r#"{"title":"persisted"}"#)
    );
}

#[test]
fn write_to_read_only_database_is_storage_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scopedoc.sqlite3");
    drop(open_db(&path).unwrap());

    let conn = rusqlite::Connection::open_with_flags(
        &path,
        rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
    )
    .unwrap();
    let err = SqliteKvStore::new(&conn)
        .save(THEME_KEY, "dark")
        .unwrap_err();

    assert_eq!(err.code(), "storage_unavailable");
}
