use std::fs;

use mcdesk::adapter::session::{FileTokenStore, Session};
use mcdesk::port::{StoredTokens, TokenStore};

fn tokens(access: &str) -> StoredTokens {
    StoredTokens {
        access_token: access.into(),
        refresh_token: Some("refresh-1".into()),
    }
}

fn file_session(path: &std::path::Path) -> Session {
    Session::new(Box::new(FileTokenStore::new(path)))
}

#[test]
fn login_in_one_process_is_seen_by_another() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let cli = file_session(&path);
    let other = file_session(&path);

    assert!(!other.is_signed_in());
    cli.set_tokens(tokens("access-1")).unwrap();
    assert_eq!(other.access_token().as_deref(), Some("access-1"));

    other.clear().unwrap();
    assert!(!cli.is_signed_in());
    assert!(!path.exists());
}

#[test]
fn tokens_are_stored_as_camel_case_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("session.json");
    FileTokenStore::new(&path).save(&tokens("access-2")).unwrap();

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["accessToken"], "access-2");
    assert_eq!(raw["refreshToken"], "refresh-1");
}

#[cfg(unix)]
#[test]
fn token_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    FileTokenStore::new(&path).save(&tokens("access-3")).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[cfg(unix)]
#[test]
fn saving_over_a_world_readable_file_tightens_it() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, "{}").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

    FileTokenStore::new(&path).save(&tokens("access-5")).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
    let loaded = FileTokenStore::new(&path).load().unwrap().unwrap();
    assert_eq!(loaded.access_token, "access-5");
}

#[test]
fn corrupt_file_falls_back_to_the_mirror() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let session = file_session(&path);

    session.set_tokens(tokens("access-4")).unwrap();
    fs::write(&path, "{ not json").unwrap();

    assert!(FileTokenStore::new(&path).load().is_err());
    assert_eq!(session.access_token().as_deref(), Some("access-4"));
}

#[test]
fn blank_file_means_signed_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, "\n").unwrap();

    assert_eq!(FileTokenStore::new(&path).load().unwrap(), None);
    assert!(!file_session(&path).is_signed_in());
}

#[test]
fn refreshed_access_token_keeps_refresh_token_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let session = file_session(&path);

    session.set_tokens(tokens("stale")).unwrap();
    session.set_access_token("fresh").unwrap();

    let stored = FileTokenStore::new(&path).load().unwrap().unwrap();
    assert_eq!(stored.access_token, "fresh");
    assert_eq!(stored.refresh_token.as_deref(), Some("refresh-1"));
}

#[test]
fn clearing_twice_is_fine() {
    let dir = tempfile::tempdir().unwrap();
    let session = file_session(&dir.path().join("session.json"));
    session.clear().unwrap();
    session.clear().unwrap();
}
